use regex::Regex;
use serde_json::Value as JsonValue;
use specguard_types::ids;

use super::{RuleFunction, RuleFunctionContext, RuleFunctionSchema};
use crate::document::Node;
use crate::model::RuleFunctionResult;

const MATCH: &str = "match";
const NOT_MATCH: &str = "notMatch";

/// Scalar values must match `match` and must not match `notMatch`.
///
/// Non-scalar nodes and missing fields are skipped; pair with `defined` to require presence.
pub struct Pattern;

impl RuleFunction for Pattern {
    fn get_schema(&self) -> RuleFunctionSchema {
        let mut schema = RuleFunctionSchema::named(ids::FUNCTION_PATTERN)
            .property(MATCH, "regular expression the value must match")
            .property(NOT_MATCH, "regular expression the value must not match");
        schema.min_properties = Some(1);
        schema.error_message = Some("pattern needs `match`, `notMatch`, or both".to_string());
        schema
    }

    fn validate_options(&self, options: Option<&JsonValue>) -> Result<(), Vec<String>> {
        self.get_schema().validate_options(options)?;
        let mut problems = Vec::new();
        for key in [MATCH, NOT_MATCH] {
            match options.and_then(|o| o.get(key)) {
                None => {}
                Some(JsonValue::String(expr)) => {
                    if let Err(err) = Regex::new(expr) {
                        problems.push(format!("`{key}` is not a valid regex: {err}"));
                    }
                }
                Some(_) => problems.push(format!("`{key}` must be a string")),
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }

    fn run_rule(
        &self,
        nodes: &[&Node],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let compile = |key: &str| context.option_str(key).and_then(|e| Regex::new(e).ok());
        let (must, must_not) = (compile(MATCH), compile(NOT_MATCH));
        if must.is_none() && must_not.is_none() {
            return Vec::new();
        }

        let field = context.action.field.as_deref();
        let property = field.unwrap_or("value");
        let mut results = Vec::new();
        for node in nodes {
            let target = match field {
                Some(f) => node.get(f),
                None => Some(*node),
            };
            let Some((value, at)) = target.and_then(|t| t.as_scalar().map(|v| (v, t))) else {
                continue;
            };

            let error = match (&must, &must_not) {
                (Some(re), _) if !re.is_match(value) => Some(format!(
                    "`{property}` must match the pattern '{}'",
                    re.as_str()
                )),
                (_, Some(re)) if re.is_match(value) => Some(format!(
                    "`{property}` must not match the pattern '{}'",
                    re.as_str()
                )),
                _ => None,
            };
            if let Some(error) = error {
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
