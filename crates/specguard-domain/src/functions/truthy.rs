use specguard_types::ids;

use super::{RuleFunction, RuleFunctionContext, RuleFunctionSchema};
use crate::document::Node;
use crate::model::RuleFunctionResult;

/// The node (or its `field`) must be present and not empty, `false`, or `0`.
pub struct Truthy;

impl RuleFunction for Truthy {
    fn get_schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named(ids::FUNCTION_TRUTHY)
    }

    fn run_rule(
        &self,
        nodes: &[&Node],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let field = context.action.field.as_deref();
        nodes
            .iter()
            .filter(|node| match field {
                Some(f) => !node.get(f).is_some_and(Node::is_truthy),
                None => !node.is_truthy(),
            })
            .map(|node| {
                let property = field.unwrap_or("value");
                let error = format!("`{property}` must be truthy");
                RuleFunctionResult::new(context.message(property, &error), context.rule.clone())
                    .at(node.position, node.position)
            })
            .collect()
    }
}
