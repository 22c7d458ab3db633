use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for the spectral-compatible report.
pub const SCHEMA_SPECTRAL_REPORT_V1: &str = "specguard.spectral-report.v1";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RangePosition {
    pub line: u32,
    pub character: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportRange {
    pub start: RangePosition,
    pub end: RangePosition,
}

/// One entry of a spectral-style lint report.
///
/// The field names and the numeric severity (0 = error .. 3 = hint) follow the
/// report format existing spectral viewers consume.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpectralReportEntry {
    pub code: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    pub message: String,
    pub severity: i32,
    pub range: ReportRange,
    pub source: String,
}

pub type SpectralReport = Vec<SpectralReportEntry>;
