use crate::document::Node;
use crate::model::{Rule, RuleAction, RuleFunctionResult};
use specguard_types::{Position, Severity, lookup_category};
use std::sync::Arc;

pub fn rule(id: &str, severity: Severity, category: &str) -> Arc<Rule> {
    Arc::new(Rule {
        id: id.to_string(),
        description: format!("{id} description"),
        severity,
        category: lookup_category(category),
        recommended: true,
        given: vec!["$".to_string()],
        then: vec![RuleAction {
            function: "truthy".to_string(),
            ..RuleAction::default()
        }],
        ..Rule::default()
    })
}

pub fn result_at(rule: Arc<Rule>, line: u32) -> RuleFunctionResult {
    let position = Position::new(line, 0);
    RuleFunctionResult::new(format!("{} fired", rule.id), rule).at(position, position)
}

/// An OpenAPI-shaped document whose path keys sit on consecutive lines starting at 2.
pub fn paths_doc(templates: &[&str]) -> Node {
    let paths = templates
        .iter()
        .zip(2u32..)
        .map(|(t, line)| {
            (
                Node::scalar(*t).at(line, 2),
                Node::mapping(vec![(Node::scalar("get"), Node::mapping(Vec::new()))]),
            )
        })
        .collect();
    Node::mapping(vec![
        (Node::scalar("openapi"), Node::scalar("3.0.0")),
        (Node::scalar("paths"), Node::mapping(paths).at(1, 0)),
    ])
}
