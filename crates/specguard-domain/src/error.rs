use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while building rulesets and compiling rules.
#[derive(Debug, Error)]
pub enum Error {
    /// The ruleset document is malformed.
    #[error("ruleset parse error: {0}")]
    Parse(String),

    /// The ruleset document is well-formed but violates the ruleset schema.
    #[error("ruleset failed schema validation: {}", .violations.join("; "))]
    SchemaValidation { violations: Vec<String> },

    /// A rule references an unknown function, or its options fail the function's schema.
    #[error("rule '{rule_id}' is misconfigured: {message}")]
    Configuration { rule_id: String, message: String },

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

impl Error {
    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    pub fn configuration(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Configuration {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }
}

/// Unexpected failure of a single rule during evaluation.
///
/// Never aborts the run; the engine reports it next to the results of the other rules.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("cannot resolve selector '{expression}': {reason}")]
    Selector { expression: String, reason: String },

    #[error("function '{function}' panicked: {message}")]
    FunctionPanicked { function: String, message: String },
}
