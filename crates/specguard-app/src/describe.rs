//! The `describe` use case: self-documentation of rule functions.

use specguard_domain::{FunctionRegistry, RuleFunctionSchema};

/// Output from the describe use case.
#[derive(Clone, Debug)]
pub enum DescribeOutput {
    /// Found the function; carries its declared schema.
    Found(RuleFunctionSchema),
    /// Unknown function name; includes the registered names.
    NotFound {
        name: String,
        available: Vec<String>,
    },
}

/// Look up a rule function by the name used in `then.function`.
pub fn describe_function(registry: &FunctionRegistry, name: &str) -> DescribeOutput {
    match registry.get(name) {
        Some(function) => DescribeOutput::Found(function.get_schema()),
        None => DescribeOutput::NotFound {
            name: name.to_string(),
            available: registry.names().map(str::to_string).collect(),
        },
    }
}

/// Format a function schema for terminal display.
pub fn format_function_schema(schema: &RuleFunctionSchema) -> String {
    let mut out = String::new();

    out.push_str(&schema.name);
    out.push('\n');
    out.push_str(&"=".repeat(schema.name.len()));
    out.push_str("\n\n");

    if schema.properties.is_empty() {
        out.push_str("Takes no options.\n");
        return out;
    }

    out.push_str("Options\n");
    out.push_str("-------\n");
    for property in &schema.properties {
        let required = if schema.required.contains(&property.name) {
            " (required)"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {}{}: {}\n",
            property.name, required, property.description
        ));
    }
    if let Some(message) = &schema.error_message {
        out.push('\n');
        out.push_str(message);
        out.push('\n');
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(name: &str, available: &[String]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule function: {}\n\n", name));
    out.push_str("Available functions:\n");
    for function in available {
        out.push_str(&format!("  - {}\n", function));
    }

    out
}
