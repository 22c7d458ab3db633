//! Stable identifiers for functions, rulesets, categories, and built-in rules.
//!
//! Function names are camelCase (they appear in `then.function`). Rule ids are kebab-case.

// Rule functions
pub const FUNCTION_AMBIGUOUS_PATHS: &str = "ambiguousPaths";
pub const FUNCTION_TRUTHY: &str = "truthy";
pub const FUNCTION_DEFINED: &str = "defined";
pub const FUNCTION_UNDEFINED: &str = "undefined";
pub const FUNCTION_PATTERN: &str = "pattern";

// Rulesets
pub const RULESET_SPECTRAL_OAS: &str = "spectral:oas";
pub const RULESET_SPECGUARD_OAS: &str = "specguard:oas";

// Ruleset variants
pub const VARIANT_RECOMMENDED: &str = "recommended";
pub const VARIANT_ALL: &str = "all";
pub const VARIANT_OFF: &str = "off";

// Categories
pub const CATEGORY_EXAMPLES: &str = "examples";
pub const CATEGORY_OPERATIONS: &str = "operations";
pub const CATEGORY_INFO: &str = "info";
pub const CATEGORY_DESCRIPTIONS: &str = "descriptions";
pub const CATEGORY_SCHEMAS: &str = "schemas";
pub const CATEGORY_SECURITY: &str = "security";
pub const CATEGORY_TAGS: &str = "tags";
pub const CATEGORY_VALIDATION: &str = "validation";

// Built-in rules (spectral:oas)
pub const RULE_NO_AMBIGUOUS_PATHS: &str = "no-ambiguous-paths";
pub const RULE_INFO_CONTACT: &str = "info-contact";
pub const RULE_INFO_DESCRIPTION: &str = "info-description";
pub const RULE_INFO_LICENSE: &str = "info-license";
pub const RULE_OPERATION_OPERATION_ID: &str = "operation-operationId";
pub const RULE_OPENAPI_TAGS: &str = "openapi-tags";
pub const RULE_NO_EVAL_IN_MARKDOWN: &str = "no-eval-in-markdown";
pub const RULE_NO_X_INTERNAL_LEAK: &str = "no-x-internal-leak";
