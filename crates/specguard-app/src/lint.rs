//! The `lint` use case: resolve the ruleset, evaluate it, and summarize the results.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use specguard_domain::{
    EngineOptions, FunctionRegistry, Node, RuleFailure, RuleResultSet, RuleSet, SpecIndex,
    compile_rules, evaluate,
};
use specguard_settings::{Overrides, ResolvedConfig, RulesetCatalog};
use specguard_types::{LintSummary, Verdict};
use time::OffsetDateTime;
use tracing::debug;

use crate::summary::summarize;

/// Input for the lint use case.
#[derive(Clone, Debug)]
pub struct LintInput<'a> {
    /// Path of the API description, as shown in reports.
    pub source: &'a Utf8Path,
    /// API description contents (YAML or JSON).
    pub document_text: &'a str,
    /// Ruleset document contents. `None` lints with the configured built-in ruleset.
    pub ruleset_text: Option<&'a str>,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the lint use case.
#[derive(Clone, Debug)]
pub struct LintOutput {
    pub source: Utf8PathBuf,
    /// The flattened ruleset that was evaluated.
    pub rule_set: RuleSet,
    pub results: RuleResultSet,
    /// Rules that failed to evaluate; reported apart from `results`.
    pub failures: Vec<RuleFailure>,
    pub summary: LintSummary,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    pub started_at: OffsetDateTime,
    pub finished_at: OffsetDateTime,
}

/// Run the lint use case: parse config, build the ruleset, evaluate it, summarize.
pub fn run_lint(input: LintInput<'_>) -> anyhow::Result<LintOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        specguard_settings::LintConfigV1::default()
    } else {
        specguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = specguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let catalog = RulesetCatalog::builtin().context("load built-in rulesets")?;
    let mut top = match input.ruleset_text {
        Some(text) => {
            specguard_settings::load_rule_set(text.as_bytes()).context("load ruleset")?
        }
        None => {
            let mut builtin = RuleSet::new();
            builtin.extends = Some(json!([[&resolved.extends, &resolved.variant]]));
            builtin
        }
    };
    // Config adjustments beat the ruleset's own overrides.
    top.overrides.extend(resolved.rule_overrides.clone());

    let rule_set =
        specguard_settings::resolve_extends(&top, &catalog).context("resolve extends")?;
    let compiled = compile_rules(&rule_set, FunctionRegistry::builtin()).map_err(|errors| {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        anyhow::anyhow!("{} rule(s) misconfigured:\n  {}", errors.len(), lines.join("\n  "))
    })?;
    debug!(rules = compiled.len(), source = %input.source, "ruleset ready");

    let root = Node::from_yaml_str(input.document_text)
        .with_context(|| format!("parse {}", input.source))?;
    if !root.is_mapping() {
        anyhow::bail!("{} is not a mapping at the top level", input.source);
    }
    let index = SpecIndex::new(&root);

    let report = evaluate(
        &compiled,
        &index,
        EngineOptions {
            workers: Some(resolved.workers),
        },
    );
    let summary = summarize(&report.results, report.failures.len(), resolved.fail_on);

    Ok(LintOutput {
        source: input.source.to_path_buf(),
        rule_set,
        results: report.results,
        failures: report.failures,
        summary,
        resolved_config: resolved,
        started_at,
        finished_at: OffsetDateTime::now_utc(),
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specguard_types::Severity;

    const PETSTORE: &str = r#"
openapi: 3.0.0
info:
  title: Pets
  description: all the pets
  contact: {name: pets team}
  license: {name: MIT}
tags:
  - name: pets
paths:
  /pets/{id}:
    get:
      operationId: getPet
  /pets/mine:
    get:
      operationId: getMine
"#;

    fn input<'a>(document_text: &'a str, config_text: &'a str) -> LintInput<'a> {
        LintInput {
            source: Utf8Path::new("petstore.yaml"),
            document_text,
            ruleset_text: None,
            config_text,
            overrides: Overrides::default(),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let output = run_lint(input(PETSTORE, "")).expect("run_lint");
        assert_eq!(output.resolved_config.extends, "spectral:oas");
        assert_eq!(output.rule_set.len(), 7);
        assert!(output.results.is_empty());
        assert!(output.failures.is_empty());
        assert_eq!(output.summary.verdict, Verdict::Pass);
        assert!(output.finished_at >= output.started_at);
    }

    #[test]
    fn config_rules_adjust_the_builtin_ruleset() {
        let config = r#"
[rules.info-contact]
enabled = false

[rules.no-x-internal-leak]
severity = "error"
"#;
        let output = run_lint(input(PETSTORE, config)).expect("run_lint");
        assert!(output.rule_set.get_rule("info-contact").is_none());
        assert_eq!(
            output
                .rule_set
                .get_rule("no-x-internal-leak")
                .map(|r| r.severity),
            Some(Severity::Error)
        );
    }

    #[test]
    fn misconfigured_rules_are_reported_together() {
        let ruleset = r#"
rules:
  a: {given: $, then: {function: cookForTenMins}}
  b: {given: $, then: {function: bakeForAnHour}}
"#;
        let err = run_lint(LintInput {
            ruleset_text: Some(ruleset),
            ..input(PETSTORE, "")
        })
        .expect_err("misconfigured");
        let text = format!("{err:#}");
        assert!(text.contains("2 rule(s) misconfigured"));
        assert!(text.contains("cookForTenMins"));
        assert!(text.contains("bakeForAnHour"));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let err = run_lint(input("just text", "")).expect_err("not a mapping");
        assert!(err.to_string().contains("not a mapping"));
    }

    #[test]
    fn verdict_exit_codes() {
        assert_eq!(verdict_exit_code(Verdict::Pass), 0);
        assert_eq!(verdict_exit_code(Verdict::Fail), 2);
    }
}
