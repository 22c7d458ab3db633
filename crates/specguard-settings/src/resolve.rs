use crate::model::LintConfigV1;
use anyhow::Context;
use specguard_domain::RuleOverride;
use specguard_types::{Severity, ids};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub extends: Option<String>,
    pub variant: Option<String>,
    pub workers: Option<u32>,
    pub fail_on: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub extends: String,
    pub variant: String,
    pub workers: usize,
    pub fail_on: Severity,
    /// Per-rule adjustments applied on top of the ruleset.
    pub rule_overrides: BTreeMap<String, RuleOverride>,
}

pub fn resolve_config(cfg: LintConfigV1, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != crate::SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {})", crate::SCHEMA_CONFIG_V1);
    }

    let extends = overrides
        .extends
        .or(cfg.extends)
        .unwrap_or_else(|| ids::RULESET_SPECTRAL_OAS.to_string());

    let variant = overrides
        .variant
        .or(cfg.variant)
        .unwrap_or_else(|| ids::VARIANT_RECOMMENDED.to_string());
    parse_variant(&variant)?;

    let workers = match overrides.workers.or(cfg.workers) {
        Some(0) => anyhow::bail!("workers must be at least 1"),
        Some(n) => n as usize,
        None => std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1),
    };

    let fail_on = match overrides.fail_on.or(cfg.fail_on) {
        Some(v) => parse_severity(&v).context("invalid fail_on")?,
        None => Severity::Error,
    };

    // per-rule overrides
    let mut rule_overrides = BTreeMap::new();
    for (rule_id, rc) in cfg.rules.iter() {
        let over = match (rc.enabled, rc.severity.as_deref()) {
            (Some(false), _) => RuleOverride::Disable,
            (_, Some(sev)) => RuleOverride::Severity(
                parse_severity(sev).with_context(|| format!("invalid severity for {rule_id}"))?,
            ),
            (Some(true), None) => RuleOverride::Enable,
            (None, None) => continue,
        };
        rule_overrides.insert(rule_id.clone(), over);
    }

    Ok(ResolvedConfig {
        extends,
        variant,
        workers,
        fail_on,
        rule_overrides,
    })
}

fn parse_variant(v: &str) -> anyhow::Result<()> {
    match v {
        ids::VARIANT_RECOMMENDED | ids::VARIANT_ALL | ids::VARIANT_OFF => Ok(()),
        other => anyhow::bail!("unknown variant: {other} (expected recommended|all|off)"),
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    Severity::parse_known(v)
        .ok_or_else(|| anyhow::anyhow!("unknown severity: {v} (expected error|warn|info|hint)"))
}
