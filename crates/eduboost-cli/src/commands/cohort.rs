//! The `eduboost cohort` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use eduboost_core::report::{CohortReport, GoalsReport};
use eduboost_core::ProgressReporter;
use eduboost_providers::FileStore;
use eduboost_report::{html, markdown};

use super::common::{emit, save_report, service, Format};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_student_start(&self, student_id: &str) {
        eprintln!("  Starting: {student_id}");
    }

    fn on_student_complete(&self, report: &GoalsReport) {
        eprintln!(
            "  Done: {} [{}] {} goals",
            report.student_id,
            report.overall_risk_level,
            report.goals.len()
        );
    }

    fn on_student_error(&self, student_id: &str, error: &str) {
        eprintln!("  ERROR: {student_id}: {error}");
    }

    fn on_cohort_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} succeeded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    students: Option<String>,
    parallelism: Option<usize>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format = Format::parse(&format)?;
    let (config, service) = service(config_path.as_deref(), None, parallelism)?;

    let student_ids: Vec<String> = match &students {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => {
            anyhow::ensure!(
                config.api.is_none(),
                "--students is required when reading from the records API"
            );
            FileStore::new(&config.data_dir).list_students()?
        }
    };
    anyhow::ensure!(!student_ids.is_empty(), "no students to analyze");

    eprintln!("eduboost: analyzing {} students", student_ids.len());
    let report = service.cohort(&student_ids, &ConsoleReporter).await?;

    if output.is_none() {
        save_report(&report, &config.output_dir, "cohort")?;
    }

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&report)?,
        Format::Markdown => markdown::render_cohort(&report),
        Format::Html => html::generate_cohort_html(&report),
        Format::Text => render_text(&report),
    };
    emit(&rendered, output.as_ref())
}

fn render_text(report: &CohortReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Student", "Risk", "Goals", "High", "Focus"]);
    for r in &report.reports {
        table.add_row(vec![
            Cell::new(&r.student_id),
            Cell::new(r.overall_risk_level),
            Cell::new(r.completion_stats.total_goals),
            Cell::new(r.completion_stats.high_priority_goals),
            Cell::new(r.recommendations.focus_areas.join(", ")),
        ]);
    }

    let (low, medium, high) = report.risk_distribution();
    let mut out = format!("{table}\nRisk mix: {high} high, {medium} medium, {low} low\n");
    for f in &report.failures {
        out.push_str(&format!("  failed: {}: {}\n", f.student_id, f.error));
    }
    out
}
