use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a rule and of every result it produces.
///
/// The rank orders severities for scoring and sorting: `error` (0) is the most
/// severe, `hint` (3) the least. A severity string that is not one of the four
/// known levels becomes [`Severity::Unrecognized`], which ranks `-1` and is left
/// out of every count and ordering-dependent computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Severity {
    Error,
    #[default]
    Warn,
    Info,
    Hint,
    Unrecognized,
}

impl Severity {
    pub const KNOWN: [Severity; 4] = [
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Hint,
    ];

    /// Parse a severity string. Never fails: unknown input maps to `Unrecognized`.
    pub fn parse(value: &str) -> Self {
        match value {
            "error" => Severity::Error,
            "warn" | "warning" => Severity::Warn,
            "info" => Severity::Info,
            "hint" => Severity::Hint,
            _ => Severity::Unrecognized,
        }
    }

    /// Strict variant of [`Severity::parse`] for configuration surfaces.
    pub fn parse_known(value: &str) -> Option<Self> {
        Some(Self::parse(value)).filter(Severity::is_known)
    }

    pub fn rank(self) -> i32 {
        match self {
            Severity::Error => 0,
            Severity::Warn => 1,
            Severity::Info => 2,
            Severity::Hint => 3,
            Severity::Unrecognized => -1,
        }
    }

    /// Sort key that places unrecognized severities after every known one.
    pub fn sort_key(self) -> u8 {
        match self.rank() {
            -1 => u8::MAX,
            rank => rank as u8,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Severity::Unrecognized
    }

    /// True when `self` is at least as severe as `threshold`.
    pub fn meets(self, threshold: Severity) -> bool {
        self.is_known() && threshold.is_known() && self.rank() <= threshold.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Info => "info",
            Severity::Hint => "hint",
            Severity::Unrecognized => "unrecognized",
        }
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        Severity::parse(&value)
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        Severity::parse(value)
    }
}

impl From<Severity> for &'static str {
    fn from(value: Severity) -> Self {
        value.as_str()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_severity_order() {
        assert_eq!(Severity::Error.rank(), 0);
        assert_eq!(Severity::Warn.rank(), 1);
        assert_eq!(Severity::Info.rank(), 2);
        assert_eq!(Severity::Hint.rank(), 3);
        assert_eq!(Severity::parse("pizza").rank(), -1);
    }

    #[test]
    fn unrecognized_sorts_last() {
        let mut all = vec![Severity::Unrecognized, Severity::Hint, Severity::Error];
        all.sort_by_key(|s| s.sort_key());
        assert_eq!(all, vec![Severity::Error, Severity::Hint, Severity::Unrecognized]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Severity::Warn).expect("serialize");
        assert_eq!(json, "\"warn\"");
        let parsed: Severity = serde_json::from_str("\"warning\"").expect("deserialize");
        assert_eq!(parsed, Severity::Warn);
        let odd: Severity = serde_json::from_str("\"fatal\"").expect("deserialize");
        assert_eq!(odd, Severity::Unrecognized);
    }

    #[test]
    fn meets_threshold() {
        assert!(Severity::Error.meets(Severity::Warn));
        assert!(Severity::Warn.meets(Severity::Warn));
        assert!(!Severity::Info.meets(Severity::Warn));
        assert!(!Severity::Unrecognized.meets(Severity::Hint));
        assert_eq!(Severity::parse_known("fatal"), None);
        assert_eq!(Severity::parse_known("hint"), Some(Severity::Hint));
    }
}
