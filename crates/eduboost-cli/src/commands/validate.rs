//! The `eduboost validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use eduboost_core::model::ModulePerformanceRecord;
use eduboost_core::rulebook::{load_rulebook, validate_rulebook};
use eduboost_providers::catalog::{load_catalog, unknown_catalog_modules};
use eduboost_providers::file::parse_records_csv;

pub fn execute(
    rules_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
    records_path: Option<PathBuf>,
) -> Result<()> {
    let mut total_warnings = 0;

    let book = load_rulebook(rules_path.as_deref())?;
    let source = rules_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    println!(
        "Rule book: {source} ({} failing templates, {} suggestions)",
        book.failing_goals.len(),
        book.suggestions.len()
    );
    let warnings = validate_rulebook(&book);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.subject, w.message);
    }
    total_warnings += warnings.len();

    if let Some(path) = &catalog_path {
        let catalog = load_catalog(Some(path))?;
        println!("Catalog: {} ({} resources)", path.display(), catalog.len());
        for module in unknown_catalog_modules(&catalog) {
            println!("  [{module}] WARNING: not in the module directory");
            total_warnings += 1;
        }
    }

    if let Some(path) = &records_path {
        let records = read_records(path)?;
        println!("Records: {} ({} modules)", path.display(), records.len());
        let mut invalid = 0;
        for record in &records {
            if let Err(e) = record.validate() {
                println!("  [{}] ERROR: {e}", record.module_name);
                invalid += 1;
            }
        }
        anyhow::ensure!(invalid == 0, "{invalid} invalid record(s) in {}", path.display());
    }

    if total_warnings == 0 {
        println!("All inputs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<ModulePerformanceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let name = path.display().to_string();

    if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("csv")) {
        Ok(parse_records_csv(&content, &name)?)
    } else {
        serde_json::from_str(&content).with_context(|| format!("failed to parse {name}"))
    }
}
