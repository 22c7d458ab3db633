use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "specguard.config.v1";

/// `specguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LintConfigV1 {
    /// Optional schema string for tooling (`specguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Built-in ruleset to lint with when no ruleset document is given (`spectral:oas`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Variant of `extends`: `recommended` (default), `all`, or `off`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Worker threads for rule evaluation. Defaults to the available parallelism.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<u32>,

    /// Lowest severity that fails the run: `error` (default), `warn`, `info`, or `hint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Map of rule id -> adjustment.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Turn an inherited rule on or off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override the rule severity: `error`, `warn`, `info`, `hint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
