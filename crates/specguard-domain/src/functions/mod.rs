//! The rule-function contract and the built-in function catalog.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use serde_json::Value as JsonValue;

use crate::document::Node;
use crate::index::SpecIndex;
use crate::model::{Rule, RuleAction, RuleFunctionResult};

mod ambiguous_paths;
mod defined;
mod pattern;
mod truthy;


pub use ambiguous_paths::AmbiguousPaths;
pub use defined::{Defined, Undefined};
pub use pattern::Pattern;
pub use truthy::Truthy;

/// A named analysis routine invoked by rules.
///
/// Implementations are stateless and shared across worker threads. A function
/// must return an empty list for an empty node list or a context it cannot use.
pub trait RuleFunction: Send + Sync {
    fn get_schema(&self) -> RuleFunctionSchema;

    fn run_rule(&self, nodes: &[&Node], context: &RuleFunctionContext<'_>)
    -> Vec<RuleFunctionResult>;

    /// Check `functionOptions` when a rule is compiled. Returns every problem found.
    fn validate_options(&self, options: Option<&JsonValue>) -> Result<(), Vec<String>> {
        self.get_schema().validate_options(options)
    }
}

/// Everything a function needs to evaluate one rule action.
#[derive(Clone, Debug, Default)]
pub struct RuleFunctionContext<'a> {
    pub rule: Arc<Rule>,
    pub action: RuleAction,
    /// The `given` expression that selected the nodes.
    pub given: String,
    pub index: Option<&'a SpecIndex<'a>>,
}

impl RuleFunctionContext<'_> {
    pub fn options(&self) -> Option<&JsonValue> {
        self.action.function_options.as_ref()
    }

    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options()?.get(name)?.as_str()
    }

    /// The rule's message template rendered with `property` and `error`, or `error` itself.
    pub fn message(&self, property: &str, error: &str) -> String {
        match &self.rule.message {
            Some(template) => template
                .replace("{{property}}", property)
                .replace("{{error}}", error),
            None => error.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleFunctionProperty {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleFunctionSchema {
    pub name: String,
    pub properties: Vec<RuleFunctionProperty>,
    pub required: Vec<String>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub error_message: Option<String>,
}

impl RuleFunctionSchema {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn property(mut self, name: &str, description: &str) -> Self {
        self.properties.push(RuleFunctionProperty {
            name: name.to_string(),
            description: description.to_string(),
        });
        self
    }

    /// Description of the named property; empty when there is no such property.
    pub fn get_property_description(&self, name: &str) -> &str {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.description.as_str())
            .unwrap_or("")
    }

    pub fn validate_options(&self, options: Option<&JsonValue>) -> Result<(), Vec<String>> {
        let empty = serde_json::Map::new();
        let map = match options {
            None | Some(JsonValue::Null) => &empty,
            Some(JsonValue::Object(map)) => map,
            Some(_) => return Err(vec!["functionOptions must be a mapping".to_string()]),
        };

        let mut problems = Vec::new();
        for key in map.keys() {
            if !self.properties.iter().any(|p| &p.name == key) {
                problems.push(format!("unknown option '{key}'"));
            }
        }
        for key in &self.required {
            if !map.contains_key(key) {
                problems.push(format!("missing required option '{key}'"));
            }
        }
        if let Some(min) = self.min_properties
            && map.len() < min
        {
            problems.push(format!(
                "expected at least {min} option(s), got {}",
                map.len()
            ));
        }
        if let Some(max) = self.max_properties
            && map.len() > max
        {
            problems.push(format!(
                "expected at most {max} option(s), got {}",
                map.len()
            ));
        }

        if problems.is_empty() {
            return Ok(());
        }
        if let Some(message) = &self.error_message {
            problems.insert(0, message.clone());
        }
        Err(problems)
    }
}

/// Function name to implementation. Rules resolve `then.function` here at compile time.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: BTreeMap<String, Arc<dyn RuleFunction>>,
}

static BUILTIN: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::with_builtins);

impl FunctionRegistry {
    /// Shared registry of the built-in functions.
    pub fn builtin() -> &'static FunctionRegistry {
        &BUILTIN
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::default();
        registry.register(Arc::new(AmbiguousPaths));
        registry.register(Arc::new(Truthy));
        registry.register(Arc::new(Defined));
        registry.register(Arc::new(Undefined));
        registry.register(Arc::new(Pattern));
        registry
    }

    /// Register under the name in the function's schema, replacing any previous entry.
    pub fn register(&mut self, function: Arc<dyn RuleFunction>) {
        self.functions.insert(function.get_schema().name, function);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RuleFunction>> {
        self.functions.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
