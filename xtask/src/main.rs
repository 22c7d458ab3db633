//! Developer tasks (schema generation, ruleset fixture checks, report conformance).
//!
//! Keeping this separate keeps the library crates free of tooling code.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use schemars::schema_for;
use std::fs;

/// Get the project root (parent of xtask directory).
fn project_root() -> Utf8PathBuf {
    let manifest_dir = Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    match manifest_dir.parent() {
        Some(parent) if manifest_dir.ends_with("xtask") => parent.to_path_buf(),
        _ => manifest_dir,
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> Utf8PathBuf {
    project_root().join("schemas")
}

/// Get the tests/fixtures directory path.
fn fixtures_dir() -> Utf8PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> anyhow::Result<serde_json::Value>,
}

fn generate_spectral_report_schema() -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(schema_for!(specguard_types::SpectralReport))
        .context("convert spectral report schema")
}

fn generate_summary_schema() -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(schema_for!(specguard_types::LintSummary))
        .context("convert summary schema")
}

fn generate_config_schema() -> anyhow::Result<serde_json::Value> {
    serde_json::to_value(schema_for!(specguard_settings::LintConfigV1))
        .context("convert config schema")
}

/// The ruleset schema is hand-written; it is published as-is.
fn ruleset_schema() -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(specguard_settings::RULESET_SCHEMA).context("parse ruleset schema")
}

/// List of schemas to emit.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "specguard.spectral-report.v1.json",
            generate: generate_spectral_report_schema,
        },
        SchemaSpec {
            filename: "specguard.summary.v1.json",
            generate: generate_summary_schema,
        },
        SchemaSpec {
            filename: "specguard.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "specguard.ruleset.v1.json",
            generate: ruleset_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &serde_json::Value) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)()?)?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("Failed to write schema to {path}"))?;
        println!("Wrote {path}");
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)()?)?;
        let actual = fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn json_and_yaml_files(dir: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    for entry in dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to read {dir}"))?
    {
        let path = entry?.into_path();
        if matches!(path.extension(), Some("json" | "yaml" | "yml")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Check ruleset fixtures: `valid/` ones must load, `invalid/` ones must be rejected.
fn check_rulesets() -> anyhow::Result<()> {
    let root = fixtures_dir().join("rulesets");
    let catalog =
        specguard_settings::RulesetCatalog::builtin().context("load built-in rulesets")?;
    let mut errors = Vec::new();
    let mut count = 0;

    for path in json_and_yaml_files(&root.join("valid"))? {
        let text = fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
        match specguard_settings::load_rule_set(&text)
            .and_then(|rs| specguard_settings::resolve_extends(&rs, &catalog))
        {
            Ok(rs) => println!("  ✓ {} loads ({} rules)", path, rs.len()),
            Err(err) => errors.push(format!("{path}: {err}")),
        }
        count += 1;
    }

    for path in json_and_yaml_files(&root.join("invalid"))? {
        let text = fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
        match specguard_settings::load_rule_set(&text) {
            Ok(_) => errors.push(format!("{path}: expected rejection, but it loaded")),
            Err(err) => println!("  ✓ {} rejected: {}", path, err),
        }
        count += 1;
    }

    if count == 0 {
        bail!("No ruleset fixtures found in {root}");
    }
    if !errors.is_empty() {
        eprintln!("\nRuleset fixture errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Ruleset fixture check failed with {} errors", errors.len());
    }

    println!("\n✓ All {} ruleset fixtures behave as expected!", count);
    Ok(())
}

/// Lint every document fixture and validate the spectral report against its schema.
fn conform() -> anyhow::Result<()> {
    let schema = generate_spectral_report_schema()?;
    let compiled = jsonschema::draft7::new(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;
    println!("✓ spectral report schema compiles");

    let mut errors = Vec::new();
    let documents = json_and_yaml_files(&fixtures_dir().join("documents"))?;
    if documents.is_empty() {
        bail!("No document fixtures found");
    }

    for path in &documents {
        let text = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
        let output = specguard_app::run_lint(specguard_app::LintInput {
            source: path.strip_prefix(project_root()).unwrap_or(path.as_path()),
            document_text: &text,
            ruleset_text: None,
            config_text: "",
            overrides: Default::default(),
        })
        .with_context(|| format!("Failed to lint {path}"))?;

        let report = specguard_app::serialize_spectral_report(&output.results, &output.source)?;
        let value: serde_json::Value = serde_json::from_str(&report)
            .with_context(|| format!("Failed to parse report for {path}"))?;
        for err in compiled.iter_errors(&value) {
            errors.push(format!("{path}: schema validation: {err}"));
        }
        if !output.failures.is_empty() {
            errors.push(format!("{path}: {} rule(s) failed", output.failures.len()));
        }
        println!("  ✓ {} ({} results)", path, output.results.len());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} documents produce conforming reports!", documents.len());
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  check-rulesets    Load valid ruleset fixtures, reject invalid ones");
    eprintln!("  conform           Lint document fixtures and validate the spectral reports");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "check-rulesets" => check_rulesets(),
        "conform" => conform(),
        "print-schema-ids" => {
            println!("{}", specguard_types::SCHEMA_SPECTRAL_REPORT_V1);
            println!("{}", specguard_types::SCHEMA_LINT_SUMMARY_V1);
            println!("{}", specguard_settings::SCHEMA_CONFIG_V1);
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
