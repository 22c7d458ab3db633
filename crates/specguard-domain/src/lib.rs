//! Pure rule evaluation (no IO).
//!
//! Input: a parsed document tree and a ruleset constructed elsewhere.
//! Output: rule function results, aggregated into a `RuleResultSet`.

#![forbid(unsafe_code)]

pub mod document;
pub mod error;
pub mod functions;
pub mod index;
pub mod model;
pub mod selector;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use document::{Node, NodeValue};
pub use engine::{CompiledRule, EngineOptions, EngineReport, RuleFailure, compile_rules, evaluate};
pub use error::{Error, EvaluationError, Result};
pub use functions::{
    AmbiguousPaths, Defined, FunctionRegistry, Pattern, RuleFunction, RuleFunctionContext,
    RuleFunctionProperty, RuleFunctionSchema, Truthy, Undefined,
};
pub use index::{OperationRef, SpecIndex};
pub use model::{
    Rule, RuleAction, RuleFunctionResult, RuleOverride, RuleResultSet, RuleResultsForCategory,
    RuleSet, create_rule_set_from_data, create_rule_set_from_value, create_rule_set_using_json,
};
