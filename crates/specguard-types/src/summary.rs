use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for the lint summary.
pub const SCHEMA_LINT_SUMMARY_V1: &str = "specguard.summary.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Findings and health of one category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    /// 0..=100; see `RuleResultSet::calculate_category_health`.
    pub health: u32,
    pub errors: u32,
    pub warnings: u32,
    pub infos: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LintSummary {
    pub schema: String,
    pub verdict: Verdict,
    pub errors: u32,
    pub warnings: u32,
    pub infos: u32,
    pub hints: u32,
    /// Rules that failed to evaluate. Never folded into the counts above.
    pub failed_rules: u32,
    /// Every registered category, in registry order.
    pub categories: Vec<CategorySummary>,
}
