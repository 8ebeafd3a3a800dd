//! Setup and output plumbing shared by the commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use eduboost_core::report::JsonReport;
use eduboost_core::rulebook::load_rulebook;
use eduboost_core::traits::ResourceCatalog;
use eduboost_core::{AdvisorConfig, AdvisorService, Engine};
use eduboost_providers::config::{create_stores, load_config_from, EduboostConfig};
use eduboost_providers::load_catalog;

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Markdown,
    Html,
}

impl Format {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "markdown" | "md" => Ok(Format::Markdown),
            "html" => Ok(Format::Html),
            other => anyhow::bail!("unknown format '{other}' (expected text, json, markdown or html)"),
        }
    }

    /// Parse, allowing only text and JSON.
    pub fn parse_plain(s: &str) -> Result<Self> {
        match Self::parse(s)? {
            f @ (Format::Text | Format::Json) => Ok(f),
            _ => anyhow::bail!("format '{s}' is not supported here (expected text or json)"),
        }
    }
}

/// Load the config and wire the advisor service from it.
pub fn service(
    config_path: Option<&Path>,
    plan_seed: Option<u64>,
    parallelism: Option<usize>,
) -> Result<(EduboostConfig, AdvisorService)> {
    let config = load_config_from(config_path)?;
    tracing::debug!(?config, "resolved configuration");

    let rules = load_rulebook(config.rules.as_deref())?;
    let engine = Engine::new(rules).with_plan_seed(plan_seed.or(config.plan_seed));

    let stores = create_stores(&config)?;
    let catalog: Arc<dyn ResourceCatalog> = Arc::new(load_catalog(config.catalog.as_deref())?);

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let service = AdvisorService::new(
        engine,
        stores.records,
        stores.feedback,
        catalog,
        AdvisorConfig { parallelism },
    );
    Ok((config, service))
}

/// Print to stdout, or write to `output` when given.
pub fn emit(rendered: &str, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

/// Keep the JSON report as `<output_dir>/<stem>.json`.
pub fn save_report<R: JsonReport>(report: &R, output_dir: &Path, stem: &str) -> Result<PathBuf> {
    let path = output_dir.join(format!("{stem}.json"));
    report.save_json(&path)?;
    eprintln!("Results saved to: {}", path.display());
    Ok(path)
}
