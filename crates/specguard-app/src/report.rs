use anyhow::Context;
use camino::Utf8Path;
use specguard_domain::RuleResultSet;
use specguard_types::LintSummary;

/// Pretty JSON of the spectral-compatible report, with a trailing newline.
pub fn serialize_spectral_report(
    results: &RuleResultSet,
    source: &Utf8Path,
) -> anyhow::Result<String> {
    let report = results.generate_spectral_report(source.as_str());
    let mut json = serde_json::to_string_pretty(&report).context("serialize spectral report")?;
    json.push('\n');
    Ok(json)
}

pub fn serialize_summary(summary: &LintSummary) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(summary).context("serialize summary")
}
