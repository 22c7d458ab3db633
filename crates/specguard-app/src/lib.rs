//! Use case orchestration for specguard.
//!
//! This crate provides the application layer: use cases that coordinate the settings and domain
//! layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! Reading files and printing output is left to the caller.

#![forbid(unsafe_code)]

mod describe;
mod lint;
mod report;
mod summary;

pub use describe::{DescribeOutput, describe_function, format_function_schema, format_not_found};
pub use lint::{LintInput, LintOutput, run_lint, verdict_exit_code};
pub use report::{serialize_spectral_report, serialize_summary};
pub use summary::summarize;
