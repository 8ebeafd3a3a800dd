//! The `eduboost analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use eduboost_core::report::PerformanceReport;
use eduboost_report::{html, markdown};

use super::common::{emit, save_report, service, Format};

pub async fn execute(
    student: String,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format = Format::parse(&format)?;
    let (config, service) = service(config_path.as_deref(), None, None)?;

    let report = service.performance_report(&student).await?;

    if output.is_none() {
        save_report(&report, &config.output_dir, &format!("{student}-performance"))?;
    }

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&report)?,
        Format::Markdown => markdown::render_performance(&report),
        Format::Html => html::generate_performance_html(&report),
        Format::Text => render_text(&report),
    };
    emit(&rendered, output.as_ref())
}

fn render_text(report: &PerformanceReport) -> String {
    let analysis = &report.analysis;

    let mut table = Table::new();
    table.set_header(vec!["Module", "Risk", "Level", "Factors"]);
    for a in &analysis.assessments {
        let factors: Vec<&str> = a.risk_factors.iter().map(|f| f.label()).collect();
        table.add_row(vec![
            Cell::new(&a.module_name),
            Cell::new(format!("{:.2}", a.risk_score)),
            Cell::new(a.risk_level),
            Cell::new(factors.join(", ")),
        ]);
    }

    let mut out = format!(
        "Student {}: overall risk {} (average {:.2}, {}/{} modules weak)\n{table}\n",
        report.student_id,
        analysis.overall_risk_level,
        analysis.average_risk_score,
        analysis.weak_module_count(),
        analysis.assessments.len()
    );
    if !analysis.lecturer_attention_needed.is_empty() {
        out.push_str(&format!(
            "Lecturer attention needed: {}\n",
            analysis.lecturer_attention_needed.join(", ")
        ));
    }
    for s in &analysis.improvement_suggestions {
        out.push_str(&format!("  - {}: {} ({})\n", s.area, s.action, s.timeline));
    }
    out
}
