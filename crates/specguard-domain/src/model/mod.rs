mod results;
mod rule;
mod ruleset;

pub use results::{RuleFunctionResult, RuleResultSet, RuleResultsForCategory};
pub use rule::{Rule, RuleAction};
pub use ruleset::{
    RuleOverride, RuleSet, create_rule_set_from_data, create_rule_set_from_value,
    create_rule_set_using_json,
};
