use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use specguard_types::{Category, Severity};

/// A single check: which nodes to select (`given`) and what to run on them (`then`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Key of the rule in its ruleset; assigned during ruleset construction.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default)]
    pub description: String,

    /// Message template; overrides the function's default message when set.
    /// `{{property}}` and `{{error}}` are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub severity: Severity,

    #[serde(
        default,
        with = "category_ref",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<&'static Category>,

    #[serde(default = "default_recommended")]
    pub recommended: bool,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,

    #[serde(deserialize_with = "one_or_many")]
    pub given: Vec<String>,

    #[serde(deserialize_with = "one_or_many")]
    pub then: Vec<RuleAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_fix: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    /// Child key of each matched node the function inspects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    pub function: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_options: Option<JsonValue>,
}

impl Rule {
    pub fn get_severity_as_int_value(&self) -> i32 {
        self.severity.rank()
    }

    pub fn category_id(&self) -> Option<&'static str> {
        self.category.map(|c| c.id)
    }

    pub fn in_category(&self, category_id: &str) -> bool {
        self.category_id() == Some(category_id)
    }

    pub fn with_severity(&self, severity: Severity) -> Rule {
        Rule {
            severity,
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn default_recommended() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => vec![v],
        OneOrMany::Many(v) => v,
    })
}

mod category_ref {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use specguard_types::{Category, lookup_category};

    pub fn serialize<S: Serializer>(
        category: &Option<&'static Category>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match category {
            Some(c) => serializer.serialize_str(c.id),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<&'static Category>, D::Error> {
        let id: Option<String> = Option::deserialize(deserializer)?;
        id.map(|id| {
            lookup_category(&id).ok_or_else(|| D::Error::custom(format!("unknown category '{id}'")))
        })
        .transpose()
    }
}
