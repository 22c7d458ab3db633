use specguard_domain::RuleResultSet;
use specguard_types::{
    CategorySummary, LintSummary, SCHEMA_LINT_SUMMARY_V1, Severity, Verdict, all_categories,
};

/// Counts, per-category health, and the verdict for one run.
///
/// `failed_rules` is carried as-is; failed rules never change counts or health.
pub fn summarize(results: &RuleResultSet, failed_rules: usize, fail_on: Severity) -> LintSummary {
    let categories = all_categories()
        .iter()
        .map(|c| CategorySummary {
            id: c.id.to_string(),
            name: c.name.to_string(),
            health: results.calculate_category_health(c.id),
            errors: results.get_errors_by_rule_category(c.id).len() as u32,
            warnings: results.get_warnings_by_rule_category(c.id).len() as u32,
            infos: results.get_info_by_rule_category(c.id).len() as u32,
        })
        .collect();

    let verdict = if results.iter().any(|r| r.severity().meets(fail_on)) {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    LintSummary {
        schema: SCHEMA_LINT_SUMMARY_V1.to_string(),
        verdict,
        errors: results.get_error_count() as u32,
        warnings: results.get_warn_count() as u32,
        infos: results.get_info_count() as u32,
        hints: results.get_hint_count() as u32,
        failed_rules: failed_rules as u32,
        categories,
    }
}
