use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use specguard_types::Severity;

use super::rule::Rule;
use crate::error::{Error, Result};

/// How a ruleset adjusts a rule it inherited through `extends`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleOverride {
    /// `false` or `"off"`.
    Disable,
    /// `true`: force-enable a rule the variant left out.
    Enable,
    /// A severity string replaces the inherited severity.
    Severity(Severity),
}

/// A named collection of rules plus the rulesets it extends.
///
/// Rules keep the order they were declared in; parents are resolved elsewhere
/// (see `specguard-settings`), so a freshly parsed ruleset holds only its own
/// definitions and overrides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    pub documentation_url: Option<String>,
    pub description: Option<String>,
    /// Raw `extends` value as written: a string, or a list of strings and `[id, variant]` pairs.
    pub extends: Option<JsonValue>,
    rules: BTreeMap<String, Arc<Rule>>,
    rule_order: Vec<String>,
    pub overrides: BTreeMap<String, RuleOverride>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a rule. Replacing keeps the original declaration slot.
    pub fn insert_rule(&mut self, rule: impl Into<Arc<Rule>>) {
        let rule = rule.into();
        if !self.rules.contains_key(&rule.id) {
            self.rule_order.push(rule.id.clone());
        }
        self.rules.insert(rule.id.clone(), rule);
    }

    pub fn remove_rule(&mut self, id: &str) -> Option<Arc<Rule>> {
        let removed = self.rules.remove(id)?;
        self.rule_order.retain(|r| r != id);
        Some(removed)
    }

    pub fn get_rule(&self, id: &str) -> Option<&Arc<Rule>> {
        self.rules.get(id)
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rule_order.iter().filter_map(|id| self.rules.get(id))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parent rulesets in declaration order as `(id, variant)`.
    ///
    /// A bare string means "the parent's default variant" and carries the id as
    /// its own variant. Malformed members are skipped.
    pub fn extends_entries(&self) -> Vec<(String, String)> {
        let Some(extends) = &self.extends else {
            return Vec::new();
        };
        match extends {
            JsonValue::String(id) => vec![(id.clone(), id.clone())],
            JsonValue::Array(items) => items.iter().filter_map(extends_member).collect(),
            _ => Vec::new(),
        }
    }

    /// Flat `id -> variant` view of `extends`. Unrecognized shapes give an empty map.
    pub fn get_extends_value(&self) -> BTreeMap<String, String> {
        self.extends_entries().into_iter().collect()
    }
}

fn extends_member(item: &JsonValue) -> Option<(String, String)> {
    match item {
        JsonValue::String(id) => Some((id.clone(), id.clone())),
        JsonValue::Array(pair) => match pair.as_slice() {
            [JsonValue::String(id)] => Some((id.clone(), id.clone())),
            [JsonValue::String(id), JsonValue::String(variant)] => {
                Some((id.clone(), variant.clone()))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Build a ruleset from a YAML (or JSON) document. A missing `rules` key means no rules.
pub fn create_rule_set_from_data(data: &[u8]) -> Result<RuleSet> {
    let value: JsonValue = serde_yaml::from_slice(data)
        .map_err(|e| Error::parse(format!("invalid ruleset document: {e}")))?;
    from_value(value, false)
}

/// Build a ruleset from an already parsed document, e.g. one that passed schema validation.
pub fn create_rule_set_from_value(value: JsonValue) -> Result<RuleSet> {
    from_value(value, false)
}

/// Build a ruleset from a JSON document. The document must carry a `rules` mapping.
pub fn create_rule_set_using_json(data: &[u8]) -> Result<RuleSet> {
    let value: JsonValue = serde_json::from_slice(data)
        .map_err(|e| Error::parse(format!("invalid ruleset JSON: {e}")))?;
    from_value(value, true)
}

fn from_value(value: JsonValue, require_rules: bool) -> Result<RuleSet> {
    let JsonValue::Object(doc) = value else {
        return Err(Error::parse("ruleset document must be a mapping"));
    };

    let mut rule_set = RuleSet {
        documentation_url: optional_string(&doc, "documentationUrl")?,
        description: optional_string(&doc, "description")?,
        extends: doc.get("extends").filter(|v| !v.is_null()).cloned(),
        ..RuleSet::default()
    };

    match doc.get("rules") {
        None | Some(JsonValue::Null) if !require_rules => {}
        None | Some(JsonValue::Null) => {
            return Err(Error::parse("ruleset document has no `rules` mapping"));
        }
        Some(JsonValue::Object(rules)) => {
            for (id, entry) in rules {
                parse_rule_entry(&mut rule_set, id, entry)?;
            }
        }
        Some(_) => return Err(Error::parse("`rules` must be a mapping")),
    }

    Ok(rule_set)
}

fn parse_rule_entry(rule_set: &mut RuleSet, id: &str, entry: &JsonValue) -> Result<()> {
    let over = match entry {
        JsonValue::Bool(false) => RuleOverride::Disable,
        JsonValue::Bool(true) => RuleOverride::Enable,
        JsonValue::String(s) if s == "off" => RuleOverride::Disable,
        JsonValue::String(s) => Severity::parse_known(s)
            .map(RuleOverride::Severity)
            .ok_or_else(|| Error::parse(format!("rule '{id}': unknown override '{s}'")))?,
        JsonValue::Object(_) => {
            let mut rule: Rule = serde_json::from_value(entry.clone())
                .map_err(|e| Error::parse(format!("rule '{id}': {e}")))?;
            rule.id = id.to_string();
            if rule.given.is_empty() {
                return Err(Error::parse(format!("rule '{id}' has no `given` selector")));
            }
            if rule.then.is_empty() || rule.then.iter().any(|a| a.function.trim().is_empty()) {
                return Err(Error::parse(format!("rule '{id}' names no function")));
            }
            rule_set.insert_rule(rule);
            return Ok(());
        }
        _ => return Err(Error::parse(format!("rule '{id}' must be a mapping"))),
    };
    rule_set.overrides.insert(id.to_string(), over);
    Ok(())
}

fn optional_string(doc: &Map<String, JsonValue>, key: &str) -> Result<Option<String>> {
    match doc.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::parse(format!("`{key}` must be a string"))),
    }
}
