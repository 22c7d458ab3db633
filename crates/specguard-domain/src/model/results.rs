use std::sync::Arc;

use specguard_types::{
    Category, Position, RangePosition, ReportRange, Severity, SpectralReport, SpectralReportEntry,
    lookup_category,
};

use super::rule::Rule;

/// One finding: a message, the rule that produced it, and where it points.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleFunctionResult {
    pub message: String,
    pub rule: Arc<Rule>,
    pub start: Position,
    pub end: Position,
    /// Segments from the document root to the offending node, e.g. `["paths", "/pets/{id}"]`.
    pub path: Vec<String>,
}

impl RuleFunctionResult {
    pub fn new(message: impl Into<String>, rule: Arc<Rule>) -> Self {
        Self {
            message: message.into(),
            rule,
            start: Position::default(),
            end: Position::default(),
            path: Vec::new(),
        }
    }

    pub fn at(mut self, start: Position, end: Position) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_path<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.path = segments.into_iter().map(Into::into).collect();
        self
    }

    /// The path as a selector-style locator, e.g. `$.paths['/pets/{id}']`.
    pub fn locator(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        let mut out = String::from("$");
        for segment in &self.path {
            let plain = !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if plain {
                out.push('.');
                out.push_str(segment);
            } else {
                out.push_str("['");
                out.push_str(segment);
                out.push_str("']");
            }
        }
        Some(out)
    }

    pub fn severity(&self) -> Severity {
        self.rule.severity
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleResultSet {
    pub results: Vec<RuleFunctionResult>,
}

/// Results of one category, borrowed from a [`RuleResultSet`].
#[derive(Clone, Debug, PartialEq)]
pub struct RuleResultsForCategory<'a> {
    pub results: Vec<&'a RuleFunctionResult>,
    pub category: Option<&'static Category>,
}

impl RuleResultsForCategory<'_> {
    /// Most severe first; unrecognized severities last. Stable within a severity.
    pub fn sort(&mut self) {
        self.results.sort_by_key(|r| r.severity().sort_key());
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl RuleResultSet {
    pub fn new(results: Vec<RuleFunctionResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleFunctionResult> {
        self.results.iter()
    }

    fn count(&self, severity: Severity) -> usize {
        self.results.iter().filter(|r| r.severity() == severity).count()
    }

    pub fn get_error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn get_warn_count(&self) -> usize {
        self.count(Severity::Warn)
    }

    pub fn get_info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    pub fn get_hint_count(&self) -> usize {
        self.count(Severity::Hint)
    }

    pub fn get_results_by_rule_category(&self, category: &str) -> Vec<&RuleFunctionResult> {
        self.results
            .iter()
            .filter(|r| r.rule.in_category(category))
            .collect()
    }

    fn by_category_and_severity(
        &self,
        category: &str,
        severity: Severity,
    ) -> Vec<&RuleFunctionResult> {
        self.results
            .iter()
            .filter(|r| r.rule.in_category(category) && r.severity() == severity)
            .collect()
    }

    pub fn get_errors_by_rule_category(&self, category: &str) -> Vec<&RuleFunctionResult> {
        self.by_category_and_severity(category, Severity::Error)
    }

    pub fn get_warnings_by_rule_category(&self, category: &str) -> Vec<&RuleFunctionResult> {
        self.by_category_and_severity(category, Severity::Warn)
    }

    pub fn get_info_by_rule_category(&self, category: &str) -> Vec<&RuleFunctionResult> {
        self.by_category_and_severity(category, Severity::Info)
    }

    /// All results ordered by start line; equal lines keep their original order.
    pub fn sort_results_by_line_number(&self) -> Vec<&RuleFunctionResult> {
        let mut sorted: Vec<&RuleFunctionResult> = self.results.iter().collect();
        sorted.sort_by_key(|r| r.start.line);
        sorted
    }

    pub fn get_rule_results_for_category(&self, category: &str) -> RuleResultsForCategory<'_> {
        RuleResultsForCategory {
            results: self.get_results_by_rule_category(category),
            category: lookup_category(category),
        }
    }

    /// `100 - (errors * 10 + warnings * 0.5)`, floored at zero and truncated.
    pub fn calculate_category_health(&self, category: &str) -> u32 {
        let errors = self.get_errors_by_rule_category(category).len() as f64;
        let warnings = self.get_warnings_by_rule_category(category).len() as f64;
        let score = 100.0 - (errors * 10.0 + warnings * 0.5);
        score.max(0.0) as u32
    }

    /// Spectral-compatible report entries in result order; positions are passed through as-is.
    pub fn generate_spectral_report(&self, source: &str) -> SpectralReport {
        self.results
            .iter()
            .map(|r| SpectralReportEntry {
                code: r.rule.id.clone(),
                path: r.path.clone(),
                message: r.message.clone(),
                severity: r.rule.get_severity_as_int_value(),
                range: ReportRange {
                    start: range_position(r.start),
                    end: range_position(r.end),
                },
                source: source.to_string(),
            })
            .collect()
    }
}

fn range_position(position: Position) -> RangePosition {
    RangePosition {
        line: position.line,
        character: position.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{result_at, rule};
    use specguard_types::ids;

    fn mixed() -> RuleResultSet {
        RuleResultSet::new(vec![
            result_at(rule("e", Severity::Error, ids::CATEGORY_INFO), 0),
            result_at(rule("w", Severity::Warn, ids::CATEGORY_INFO), 0),
            result_at(rule("i", Severity::Info, ids::CATEGORY_INFO), 0),
            result_at(rule("h", Severity::Hint, ids::CATEGORY_INFO), 0),
        ])
    }

    #[test]
    fn new_result_set_holds_results() {
        let set = RuleResultSet::new(vec![result_at(
            rule("r", Severity::Warn, ids::CATEGORY_INFO),
            1,
        )]);
        assert_eq!(set.len(), 1);
        assert!(!RuleResultSet::default().iter().any(|_| true));
    }

    #[test]
    fn severity_counts_are_repeatable() {
        let set = mixed();
        for _ in 0..2 {
            assert_eq!(set.get_error_count(), 1);
            assert_eq!(set.get_warn_count(), 1);
            assert_eq!(set.get_info_count(), 1);
            assert_eq!(set.get_hint_count(), 1);
        }
    }

    #[test]
    fn unrecognized_severity_is_not_counted() {
        let set = RuleResultSet::new(vec![result_at(
            rule("odd", Severity::from("fatal"), ids::CATEGORY_INFO),
            1,
        )]);
        assert_eq!(
            set.get_error_count() + set.get_warn_count() + set.get_info_count(),
            0
        );
        assert_eq!(set.calculate_category_health(ids::CATEGORY_INFO), 100);
    }

    #[test]
    fn results_by_category() {
        let set = RuleResultSet::new(vec![
            result_at(rule("a", Severity::Error, ids::CATEGORY_INFO), 0),
            result_at(rule("b", Severity::Error, ids::CATEGORY_INFO), 0),
            result_at(rule("c", Severity::Error, ids::CATEGORY_SCHEMAS), 0),
        ]);
        assert_eq!(set.get_results_by_rule_category(ids::CATEGORY_INFO).len(), 2);
        assert_eq!(set.get_results_by_rule_category(ids::CATEGORY_SCHEMAS).len(), 1);
        assert!(set.get_results_by_rule_category(ids::CATEGORY_TAGS).is_empty());
    }

    #[test]
    fn sort_by_line_number() {
        let set = RuleResultSet::new(vec![
            result_at(rule("ten", Severity::Warn, ids::CATEGORY_INFO), 10),
            result_at(rule("twenty", Severity::Warn, ids::CATEGORY_INFO), 20),
            result_at(rule("three", Severity::Warn, ids::CATEGORY_INFO), 3),
        ]);
        let ids: Vec<&str> = set
            .sort_results_by_line_number()
            .iter()
            .map(|r| r.rule.id.as_str())
            .collect();
        assert_eq!(ids, vec!["three", "ten", "twenty"]);
    }

    #[test]
    fn severity_by_category() {
        let set = mixed();
        assert_eq!(set.get_errors_by_rule_category(ids::CATEGORY_INFO).len(), 1);
        assert_eq!(set.get_warnings_by_rule_category(ids::CATEGORY_INFO).len(), 1);
        assert_eq!(set.get_info_by_rule_category(ids::CATEGORY_INFO).len(), 1);
    }

    #[test]
    fn spectral_report_has_one_entry_per_result() {
        let set = mixed();
        let report = set.generate_spectral_report("api.yaml");
        assert_eq!(report.len(), 4);
        assert_eq!(report[0].code, "e");
        assert_eq!(report[0].severity, 0);
        assert_eq!(report[3].severity, 3);
        assert!(report.iter().all(|e| e.source == "api.yaml"));
    }

    #[test]
    fn spectral_report_carries_path_segments() {
        let set = RuleResultSet::new(vec![
            result_at(rule("p", Severity::Error, ids::CATEGORY_OPERATIONS), 4)
                .with_path(["paths", "/a/{id}"]),
            result_at(rule("q", Severity::Error, ids::CATEGORY_OPERATIONS), 5)
                .with_path(["paths", "/{lat},{lng}/x']"]),
        ]);
        let report = set.generate_spectral_report("api.yaml");
        assert_eq!(report[0].path, vec!["paths", "/a/{id}"]);
        assert_eq!(report[0].range.start.line, 4);
        assert_eq!(report[1].path, vec!["paths", "/{lat},{lng}/x']"]);
    }

    #[test]
    fn locator_renders_plain_and_quoted_segments() {
        let result = result_at(rule("p", Severity::Warn, ids::CATEGORY_INFO), 1);
        assert_eq!(result.locator(), None);

        let result = result.with_path(["paths", "/a/{id}", "get"]);
        assert_eq!(result.locator().as_deref(), Some("$.paths['/a/{id}'].get"));
    }

    #[test]
    fn category_health() {
        assert_eq!(mixed().calculate_category_health(ids::CATEGORY_INFO), 89);

        let two_warnings = RuleResultSet::new(vec![
            result_at(rule("w1", Severity::Warn, ids::CATEGORY_INFO), 0),
            result_at(rule("w2", Severity::Warn, ids::CATEGORY_INFO), 0),
        ]);
        assert_eq!(two_warnings.calculate_category_health(ids::CATEGORY_INFO), 99);

        let warn = rule("w", Severity::Warn, ids::CATEGORY_INFO);
        let hundred = RuleResultSet::new((0..100).map(|i| result_at(warn.clone(), i)).collect());
        assert_eq!(hundred.calculate_category_health(ids::CATEGORY_INFO), 50);

        let error = rule("e", Severity::Error, ids::CATEGORY_INFO);
        let wrecked = RuleResultSet::new((0..900).map(|i| result_at(error.clone(), i)).collect());
        assert_eq!(wrecked.calculate_category_health(ids::CATEGORY_INFO), 0);
    }

    #[test]
    fn category_results_sort_most_severe_first() {
        let set = RuleResultSet::new(vec![
            result_at(rule("w", Severity::Warn, ids::CATEGORY_SCHEMAS), 0),
            result_at(rule("e", Severity::Error, ids::CATEGORY_SCHEMAS), 0),
            result_at(rule("x", Severity::Error, ids::CATEGORY_INFO), 0),
        ]);
        let mut schemas = set.get_rule_results_for_category(ids::CATEGORY_SCHEMAS);
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas.category.map(|c| c.id), Some(ids::CATEGORY_SCHEMAS));
        schemas.sort();
        assert_eq!(schemas.results[0].rule.id, "e");
        assert_eq!(schemas.results[1].rule.id, "w");
    }
}
