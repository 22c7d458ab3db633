//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - result ordering by line number
//! - category health bounds
//! - path ambiguity detection
//! - `extends` normalization

use crate::functions::{AmbiguousPaths, RuleFunction, RuleFunctionContext};
use crate::index::SpecIndex;
use crate::model::{RuleResultSet, create_rule_set_from_data};
use crate::test_support::{paths_doc, result_at, rule};
use proptest::prelude::*;
use specguard_types::{Severity, ids};

// ============================================================================
// Strategies
// ============================================================================

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Error),
        Just(Severity::Warn),
        Just(Severity::Info),
        Just(Severity::Hint),
        Just(Severity::Unrecognized),
    ]
}

/// Small alphabets so that collisions actually happen.
fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("{id}".to_string()),
        Just("{name}".to_string()),
    ]
}

fn arb_template() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_segment(), 1..4).prop_map(|segs| format!("/{}", segs.join("/")))
}

fn arb_extends() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("extends: spectral:oas".to_string()),
        Just("extends: [\"spectral:oas\"]".to_string()),
        Just("extends: [[\"spectral:oas\", all]]".to_string()),
        Just("extends: [[\"spectral:oas\", \"off\"], \"specguard:oas\"]".to_string()),
        Just("extends: 42".to_string()),
    ]
}

fn flagged(templates: &[&str]) -> Vec<String> {
    let doc = paths_doc(templates);
    let index = SpecIndex::new(&doc);
    let context = RuleFunctionContext {
        rule: rule(ids::RULE_NO_AMBIGUOUS_PATHS, Severity::Error, ids::CATEGORY_OPERATIONS),
        index: Some(&index),
        ..RuleFunctionContext::default()
    };
    let mut paths: Vec<String> = AmbiguousPaths
        .run_rule(&[&doc], &context)
        .into_iter()
        .filter_map(|r| r.locator())
        .collect();
    paths.sort();
    paths
}

// ============================================================================
// Results
// ============================================================================

proptest! {
    /// Sorting by line is ordered, a permutation of the input, and stable for equal lines.
    #[test]
    fn line_sort_is_stable(lines in prop::collection::vec(0u32..5, 0..30)) {
        let results: Vec<_> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                result_at(rule(&format!("r{i}"), Severity::Warn, ids::CATEGORY_INFO), *line)
            })
            .collect();
        let set = RuleResultSet::new(results);
        let sorted = set.sort_results_by_line_number();

        prop_assert_eq!(sorted.len(), lines.len());
        for pair in sorted.windows(2) {
            prop_assert!(pair[0].start.line <= pair[1].start.line);
            if pair[0].start.line == pair[1].start.line {
                let order = |id: &str| id.trim_start_matches('r').parse::<usize>().unwrap_or(0);
                prop_assert!(order(&pair[0].rule.id) < order(&pair[1].rule.id));
            }
        }
    }

    /// Health stays within 0..=100 and never rises when an error is added.
    #[test]
    fn health_is_bounded_and_monotone(severities in prop::collection::vec(arb_severity(), 0..300)) {
        let mut results: Vec<_> = severities
            .iter()
            .map(|s| result_at(rule("r", *s, ids::CATEGORY_SCHEMAS), 1))
            .collect();
        let before =
            RuleResultSet::new(results.clone()).calculate_category_health(ids::CATEGORY_SCHEMAS);
        prop_assert!(before <= 100);

        results.push(result_at(rule("e", Severity::Error, ids::CATEGORY_SCHEMAS), 1));
        let after =
            RuleResultSet::new(results).calculate_category_health(ids::CATEGORY_SCHEMAS);
        prop_assert!(after <= before);
    }
}

// ============================================================================
// Ambiguous paths
// ============================================================================

proptest! {
    /// Declaration order of two templates does not change which ones are flagged.
    #[test]
    fn ambiguity_is_symmetric(a in arb_template(), b in arb_template()) {
        prop_assume!(a != b);
        prop_assert_eq!(flagged(&[a.as_str(), b.as_str()]), flagged(&[b.as_str(), a.as_str()]));
    }

    /// Templates of different lengths never collide.
    #[test]
    fn different_lengths_never_collide(a in arb_template(), b in arb_template()) {
        prop_assume!(a.matches('/').count() != b.matches('/').count());
        prop_assert!(flagged(&[a.as_str(), b.as_str()]).is_empty());
    }

    /// A flagged pair always yields exactly two results.
    #[test]
    fn pairs_flag_both_members(a in arb_template(), b in arb_template()) {
        prop_assume!(a != b);
        let found = flagged(&[a.as_str(), b.as_str()]);
        prop_assert!(found.is_empty() || found.len() == 2);
    }
}

// ============================================================================
// Extends
// ============================================================================

proptest! {
    /// Reading `extends` is pure.
    #[test]
    fn extends_value_is_idempotent(doc in arb_extends()) {
        let rs = create_rule_set_from_data(doc.as_bytes()).expect("ruleset");
        let first = rs.get_extends_value();
        prop_assert_eq!(&first, &rs.get_extends_value());
        prop_assert!(rs.extends_entries().len() >= first.len());
    }
}
