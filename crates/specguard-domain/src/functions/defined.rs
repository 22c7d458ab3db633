use specguard_types::ids;

use super::{RuleFunction, RuleFunctionContext, RuleFunctionSchema};
use crate::document::Node;
use crate::model::RuleFunctionResult;

/// `field` must exist on every matched node. Without a field, the node must not be null.
pub struct Defined;

/// `field` must not exist on any matched node. Without a field, no node may match at all.
pub struct Undefined;

impl RuleFunction for Defined {
    fn get_schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named(ids::FUNCTION_DEFINED)
    }

    fn run_rule(
        &self,
        nodes: &[&Node],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let field = context.action.field.as_deref();
        let mut results = Vec::new();
        for node in nodes {
            let missing = match field {
                Some(f) => node.get_entry(f).is_none(),
                None => node.is_null(),
            };
            if missing {
                let property = field.unwrap_or("value");
                let error = format!("`{property}` must be defined");
                results.push(
                    RuleFunctionResult::new(
                        context.message(property, &error),
                        context.rule.clone(),
                    )
                    .at(node.position, node.position),
                );
            }
        }
        results
    }
}

impl RuleFunction for Undefined {
    fn get_schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named(ids::FUNCTION_UNDEFINED)
    }

    fn run_rule(
        &self,
        nodes: &[&Node],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let field = context.action.field.as_deref();
        let mut results = Vec::new();
        for node in nodes {
            // Point at the offending key when there is one.
            let found = match field {
                Some(f) => node.get_entry(f).map(|(key, _)| key),
                None => Some(*node),
            };
            if let Some(at) = found {
                let property = field.unwrap_or("value");
                let error = format!("`{property}` must be undefined");
                results.push(
                    RuleFunctionResult::new(
                        context.message(property, &error),
                        context.rule.clone(),
                    )
                    .at(at.position, at.position),
                );
            }
        }
        results
    }
}
