//! Stable DTOs and IDs used across the specguard workspace.
//!
//! This crate is intentionally boring:
//! - severity levels and their scoring rank
//! - the process-wide category registry
//! - source positions
//! - the spectral-compatible report entry
//! - the lint summary (counts, category health, verdict)
//! - stable string IDs for functions, rulesets, and built-in rules

#![forbid(unsafe_code)]

pub mod category;
pub mod ids;
pub mod position;
pub mod report;
pub mod severity;
pub mod summary;

pub use category::{Category, all_categories, lookup_category};
pub use position::Position;
pub use report::{
    RangePosition, ReportRange, SCHEMA_SPECTRAL_REPORT_V1, SpectralReport, SpectralReportEntry,
};
pub use severity::Severity;
pub use summary::{CategorySummary, LintSummary, SCHEMA_LINT_SUMMARY_V1, Verdict};
