//! Detects path templates that a request could match without a clear winner.
//!
//! Two templates collide when they have the same number of segments, agree on
//! every position where both are literal, and neither is more specific than the
//! other. Specificity is judged on the set of literal positions: a template whose
//! literal positions are a strict superset of the other's wins the match, and so
//! does one with more literal segments overall. What remains are templates with
//! the same number of literals in different places, such as `/{id}/x` and
//! `/x/{id}`; a request for `/x/x` fits both. Templates with identical literal
//! positions are duplicates that differ only in parameter names and are not
//! reported here.

use std::collections::{BTreeMap, BTreeSet};

use specguard_types::ids;

use super::{RuleFunction, RuleFunctionContext, RuleFunctionSchema};
use crate::document::Node;
use crate::model::RuleFunctionResult;

pub struct AmbiguousPaths;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Parameter,
}

struct PathTemplate<'a> {
    raw: &'a str,
    key: &'a Node,
    segments: Vec<Segment<'a>>,
}

impl<'a> PathTemplate<'a> {
    fn parse(key: &'a Node) -> Option<Self> {
        let raw = key.as_scalar()?;
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let segments = trimmed.split('/').map(classify).collect();
        Some(Self { raw, key, segments })
    }

    fn literal_positions(&self) -> BTreeSet<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter(|(_, s)| matches!(s, Segment::Literal(_)))
            .map(|(i, _)| i)
            .collect()
    }
}

/// A parameter is a whole segment of the form `{name}`; anything else is literal.
fn classify(segment: &str) -> Segment<'_> {
    let templated = segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}');
    if templated {
        Segment::Parameter
    } else {
        Segment::Literal(segment)
    }
}

fn literals_conflict(a: &PathTemplate<'_>, b: &PathTemplate<'_>) -> bool {
    a.segments
        .iter()
        .zip(&b.segments)
        .any(|pair| matches!(pair, (Segment::Literal(x), Segment::Literal(y)) if x != y))
}

fn is_ambiguous(a: &PathTemplate<'_>, b: &PathTemplate<'_>) -> bool {
    if a.segments.len() != b.segments.len() || literals_conflict(a, b) {
        return false;
    }
    let (la, lb) = (a.literal_positions(), b.literal_positions());
    // Equal-sized but different sets are incomparable; otherwise one side is more specific.
    la != lb && la.len() == lb.len()
}

impl RuleFunction for AmbiguousPaths {
    fn get_schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named(ids::FUNCTION_AMBIGUOUS_PATHS)
    }

    fn run_rule(
        &self,
        nodes: &[&Node],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        if nodes.is_empty() {
            return Vec::new();
        }
        let Some(index) = context.index else {
            return Vec::new();
        };

        let mut by_length: BTreeMap<usize, Vec<PathTemplate<'_>>> = BTreeMap::new();
        for template in index
            .path_template_keys()
            .into_iter()
            .filter_map(PathTemplate::parse)
        {
            by_length
                .entry(template.segments.len())
                .or_default()
                .push(template);
        }

        let mut results = Vec::new();
        for group in by_length.values() {
            for (i, a) in group.iter().enumerate() {
                for b in &group[i + 1..] {
                    if is_ambiguous(a, b) {
                        results.push(report(a, b, context));
                        results.push(report(b, a, context));
                    }
                }
            }
        }
        results
    }
}

fn report(
    template: &PathTemplate<'_>,
    other: &PathTemplate<'_>,
    context: &RuleFunctionContext<'_>,
) -> RuleFunctionResult {
    let error = format!(
        "paths are ambiguous with one another: `{}` and `{}`",
        template.raw, other.raw
    );
    RuleFunctionResult::new(context.message(template.raw, &error), context.rule.clone())
        .at(template.key.position, template.key.position)
        .with_path(["paths", template.raw])
}
