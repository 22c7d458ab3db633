//! Validation of ruleset definition documents against the published ruleset schema.

use serde_json::Value as JsonValue;
use specguard_domain::{Error, RuleSet, create_rule_set_from_value};

/// The published ruleset JSON Schema (draft 7).
pub const RULESET_SCHEMA: &str = include_str!("ruleset.schema.json");

/// Check a parsed ruleset document against [`RULESET_SCHEMA`].
///
/// Every violation is collected; none of them is fatal on its own.
pub fn validate_rule_set_document(document: &JsonValue) -> Result<(), Error> {
    let schema: JsonValue = serde_json::from_str(RULESET_SCHEMA)
        .map_err(|e| Error::parse(format!("ruleset schema is not valid JSON: {e}")))?;
    let validator = jsonschema::draft7::new(&schema)
        .map_err(|e| Error::parse(format!("ruleset schema does not compile: {e}")))?;

    let violations: Vec<String> = validator
        .iter_errors(document)
        .map(|err| {
            let at = err.instance_path().to_string();
            if at.is_empty() {
                err.to_string()
            } else {
                format!("{at}: {err}")
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Error::SchemaValidation { violations })
    }
}

/// Parse a YAML or JSON ruleset document, validate it, and build the ruleset.
///
/// Nothing is returned for a document that fails either step.
pub fn load_rule_set(data: &[u8]) -> Result<RuleSet, Error> {
    let document: JsonValue = serde_yaml::from_slice(data)
        .map_err(|e| Error::parse(format!("invalid ruleset document: {e}")))?;
    if !document.is_object() {
        return Err(Error::parse("ruleset document must be a mapping"));
    }
    validate_rule_set_document(&document)?;
    create_rule_set_from_value(document)
}
