//! Config parsing, ruleset validation, and `extends` resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration and ruleset
//! documents provided as strings or bytes.

#![forbid(unsafe_code)]

mod catalog;
mod extends;
mod model;
mod resolve;
mod schema;

pub use catalog::RulesetCatalog;
pub use extends::resolve_extends;
pub use model::{LintConfigV1, RuleConfig, SCHEMA_CONFIG_V1};
pub use resolve::{Overrides, ResolvedConfig};
pub use schema::{RULESET_SCHEMA, load_rule_set, validate_rule_set_document};

/// Parse `specguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<LintConfigV1> {
    let cfg: LintConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (defaults + file + overrides).
pub fn resolve_config(cfg: LintConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
