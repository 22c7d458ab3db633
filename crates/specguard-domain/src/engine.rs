use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Error, EvaluationError, Result};
use crate::functions::{FunctionRegistry, RuleFunction, RuleFunctionContext};
use crate::index::SpecIndex;
use crate::model::{Rule, RuleAction, RuleFunctionResult, RuleResultSet, RuleSet};

/// A rule whose functions have been resolved and whose options have been checked.
#[derive(Clone)]
pub struct CompiledRule {
    rule: Arc<Rule>,
    actions: Vec<(RuleAction, Arc<dyn RuleFunction>)>,
}

impl CompiledRule {
    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("rule", &self.rule.id)
            .field(
                "functions",
                &self
                    .actions
                    .iter()
                    .map(|(a, _)| &a.function)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Worker threads for rule evaluation. `None` uses the shared rayon pool.
    pub workers: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleFailure {
    pub rule_id: String,
    pub error: EvaluationError,
}

#[derive(Clone, Debug, Default)]
pub struct EngineReport {
    pub results: RuleResultSet,
    pub failures: Vec<RuleFailure>,
}

/// Resolve every rule's functions, collecting every configuration error.
pub fn compile_rules(
    rule_set: &RuleSet,
    registry: &FunctionRegistry,
) -> std::result::Result<Vec<CompiledRule>, Vec<Error>> {
    let mut compiled = Vec::new();
    let mut errors = Vec::new();
    for rule in rule_set.rules() {
        match compile_rule(rule, registry) {
            Ok(c) => compiled.push(c),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        debug!(rules = compiled.len(), "compiled ruleset");
        Ok(compiled)
    } else {
        Err(errors)
    }
}

fn compile_rule(rule: &Arc<Rule>, registry: &FunctionRegistry) -> Result<CompiledRule> {
    if !rule.severity.is_known() {
        return Err(Error::configuration(&rule.id, "unknown severity"));
    }
    if rule.given.is_empty() {
        return Err(Error::configuration(&rule.id, "no `given` selector"));
    }

    let mut actions = Vec::with_capacity(rule.then.len());
    for action in &rule.then {
        let function = registry.get(&action.function).ok_or_else(|| {
            Error::configuration(&rule.id, format!("unknown function '{}'", action.function))
        })?;
        function
            .validate_options(action.function_options.as_ref())
            .map_err(|problems| {
                Error::configuration(
                    &rule.id,
                    format!(
                        "invalid options for '{}': {}",
                        action.function,
                        problems.join("; ")
                    ),
                )
            })?;
        actions.push((action.clone(), Arc::clone(function)));
    }

    Ok(CompiledRule {
        rule: Arc::clone(rule),
        actions,
    })
}

/// Run every rule against the index.
///
/// Rules run in parallel; results are concatenated in rule order, so the output
/// does not depend on scheduling. A rule that fails is reported in `failures`
/// and the others still run.
pub fn evaluate(
    rules: &[CompiledRule],
    index: &SpecIndex<'_>,
    options: EngineOptions,
) -> EngineReport {
    let run = || {
        rules
            .par_iter()
            .map(|rule| run_compiled(rule, index))
            .collect::<Vec<_>>()
    };

    let outcomes = match options.workers {
        Some(workers) => match rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(err) => {
                warn!(error = %err, workers, "could not build worker pool, using the shared pool");
                run()
            }
        },
        None => run(),
    };

    let mut results = Vec::new();
    let mut failures = Vec::new();
    for (rule_results, rule_failures) in outcomes {
        results.extend(rule_results);
        failures.extend(rule_failures);
    }

    info!(
        rules = rules.len(),
        results = results.len(),
        failures = failures.len(),
        "evaluation finished"
    );
    EngineReport {
        results: RuleResultSet::new(results),
        failures,
    }
}

fn run_compiled(
    compiled: &CompiledRule,
    index: &SpecIndex<'_>,
) -> (Vec<RuleFunctionResult>, Vec<RuleFailure>) {
    let rule = &compiled.rule;
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for given in &rule.given {
        let nodes = match index.find_nodes(given) {
            Ok(nodes) => nodes,
            Err(error) => {
                warn!(rule = %rule.id, %error, "selector failed");
                failures.push(RuleFailure {
                    rule_id: rule.id.clone(),
                    error,
                });
                continue;
            }
        };

        for (action, function) in &compiled.actions {
            let context = RuleFunctionContext {
                rule: Arc::clone(rule),
                action: action.clone(),
                given: given.clone(),
                index: Some(index),
            };
            match panic::catch_unwind(AssertUnwindSafe(|| function.run_rule(&nodes, &context))) {
                Ok(found) => results.extend(found),
                Err(payload) => {
                    let error = EvaluationError::FunctionPanicked {
                        function: action.function.clone(),
                        message: panic_message(payload.as_ref()),
                    };
                    warn!(rule = %rule.id, %error, "rule function failed");
                    failures.push(RuleFailure {
                        rule_id: rule.id.clone(),
                        error,
                    });
                }
            }
        }
    }

    debug!(rule = %rule.id, results = results.len(), "rule evaluated");
    (results, failures)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use crate::functions::RuleFunctionSchema;
    use crate::model::create_rule_set_from_data;
    use crate::test_support::paths_doc;
    use specguard_types::Severity;

    const RULESET: &str = r#"
rules:
  no-ambiguous-paths:
    severity: error
    category: operations
    given: $
    then: {function: ambiguousPaths}
  paths-must-exist:
    category: operations
    given: $
    then: {field: paths, function: defined}
  info-present:
    severity: info
    category: info
    given: $
    then: {field: info, function: truthy}
"#;

    struct Exploding;

    impl RuleFunction for Exploding {
        fn get_schema(&self) -> RuleFunctionSchema {
            RuleFunctionSchema::named("explode")
        }

        fn run_rule(&self, _: &[&Node], _: &RuleFunctionContext<'_>) -> Vec<RuleFunctionResult> {
            panic!("boom");
        }
    }

    fn compile(text: &str, registry: &FunctionRegistry) -> Vec<CompiledRule> {
        let rule_set = create_rule_set_from_data(text.as_bytes()).expect("ruleset");
        compile_rules(&rule_set, registry).expect("compile")
    }

    #[test]
    fn evaluates_rules_in_declaration_order() {
        let rules = compile(RULESET, FunctionRegistry::builtin());
        let doc = paths_doc(&["/{id}/x", "/x/{id}"]);
        let index = SpecIndex::new(&doc);

        let report = evaluate(&rules, &index, EngineOptions::default());
        assert!(report.failures.is_empty());

        let ids: Vec<&str> = report.results.iter().map(|r| r.rule.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["no-ambiguous-paths", "no-ambiguous-paths", "info-present"]
        );
        assert_eq!(report.results.get_error_count(), 2);
        assert_eq!(report.results.get_info_count(), 1);
    }

    #[test]
    fn worker_count_does_not_change_output() {
        let rules = compile(RULESET, FunctionRegistry::builtin());
        let doc = paths_doc(&["/{id}/x", "/x/{id}", "/a/{b}/c", "/a/{d}/{e}"]);
        let index = SpecIndex::new(&doc);

        let single = evaluate(&rules, &index, EngineOptions { workers: Some(1) });
        let many = evaluate(&rules, &index, EngineOptions { workers: Some(4) });
        let shared = evaluate(&rules, &index, EngineOptions::default());
        assert_eq!(single.results, many.results);
        assert_eq!(single.results, shared.results);
    }

    #[test]
    fn unknown_function_and_bad_options_are_configuration_errors() {
        let rule_set = create_rule_set_from_data(
            br#"
rules:
  a: {given: $, then: {function: cookForTenMins}}
  b: {given: $, then: {function: pattern, functionOptions: {match: "("}}}
  c: {given: $, then: {function: truthy}}
"#,
        )
        .expect("ruleset");
        let errors = compile_rules(&rule_set, FunctionRegistry::builtin()).expect_err("invalid");
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, Error::Configuration { .. })));
        assert!(errors[0].to_string().contains("unknown function 'cookForTenMins'"));
    }

    #[test]
    fn unknown_severity_is_rejected_at_compile_time() {
        let rule_set = create_rule_set_from_data(
            b"rules:\n  a: {given: $, severity: fatal, then: {function: truthy}}\n",
        )
        .expect("ruleset");
        let errors = compile_rules(&rule_set, FunctionRegistry::builtin()).expect_err("invalid");
        assert!(errors[0].to_string().contains("unknown severity"));
        assert_eq!(
            rule_set.get_rule("a").map(|r| r.severity),
            Some(Severity::Unrecognized)
        );
    }

    #[test]
    fn failing_rule_does_not_abort_the_run() {
        let mut registry = FunctionRegistry::with_builtins();
        registry.register(Arc::new(Exploding));
        let rules = compile(
            r#"
rules:
  explodes: {given: $, then: {function: explode}}
  bad-selector: {given: "$[", then: {function: truthy}}
  info-present: {given: $, then: {field: info, function: truthy}}
"#,
            &registry,
        );
        let doc = paths_doc(&["/a"]);
        let index = SpecIndex::new(&doc);

        let report = evaluate(&rules, &index, EngineOptions { workers: Some(2) });
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].rule_id, "explodes");
        assert_eq!(
            report.failures[0].error,
            EvaluationError::FunctionPanicked {
                function: "explode".to_string(),
                message: "boom".to_string(),
            }
        );
        assert!(matches!(
            report.failures[1].error,
            EvaluationError::Selector { .. }
        ));
    }

    #[test]
    fn empty_ruleset_yields_empty_report() {
        let doc = paths_doc(&[]);
        let index = SpecIndex::new(&doc);
        let report = evaluate(&[], &index, EngineOptions::default());
        assert!(report.results.is_empty());
        assert!(report.failures.is_empty());
    }
}
