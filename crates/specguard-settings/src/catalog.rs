//! Rulesets that `extends` can name.

use std::collections::BTreeMap;

use specguard_domain::{Error, RuleSet};
use specguard_types::ids;

use crate::schema::load_rule_set;

const SPECTRAL_OAS: &str = include_str!("../rulesets/spectral-oas.yaml");

/// Ruleset id -> ruleset. Built once per run and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct RulesetCatalog {
    rulesets: BTreeMap<String, RuleSet>,
}

impl RulesetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rulesets, validated like any user ruleset.
    pub fn builtin() -> Result<Self, Error> {
        let oas = load_rule_set(SPECTRAL_OAS.as_bytes())?;
        let mut catalog = Self::new();
        catalog.insert(ids::RULESET_SPECGUARD_OAS, oas.clone());
        catalog.insert(ids::RULESET_SPECTRAL_OAS, oas);
        Ok(catalog)
    }

    pub fn insert(&mut self, id: impl Into<String>, rule_set: RuleSet) {
        self.rulesets.insert(id.into(), rule_set);
    }

    pub fn get(&self, id: &str) -> Option<&RuleSet> {
        self.rulesets.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rulesets.keys().map(String::as_str)
    }
}
