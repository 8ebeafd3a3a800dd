//! The `eduboost goals` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use eduboost_core::report::GoalsReport;
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

    let report = service.goals_report(&student).await?;

    if output.is_none() {
        save_report(&report, &config.output_dir, &format!("{student}-goals"))?;
    }

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&report)?,
        Format::Markdown => markdown::render_goals(&report),
        Format::Html => html::generate_goals_html(&report),
        Format::Text => render_text(&report),
    };
    emit(&rendered, output.as_ref())
}

pub(super) fn render_text(report: &GoalsReport) -> String {
    if report.goals.is_empty() {
        return format!(
            "Student {}: overall risk {}, no goals needed.",
            report.student_id, report.overall_risk_level
        );
    }

    let mut table = Table::new();
    table.set_header(vec!["Id", "Priority", "Module", "Goal", "Due", "Progress"]);
    for view in &report.goals {
        let g = &view.goal;
        table.add_row(vec![
            Cell::new(g.goal_id),
            Cell::new(g.priority_level),
            Cell::new(&g.module_name),
            Cell::new(&g.title),
            Cell::new(format!("{} ({}d)", g.target_completion_date, view.days_remaining)),
            Cell::new(format!("{}%", g.current_progress)),
        ]);
    }

    let stats = &report.completion_stats;
    let recs = &report.recommendations;
    format!(
        "Student {}: overall risk {}\n{table}\n{} goals, {:.1}% complete. Study {:.1} h/day for about {} weeks.",
        report.student_id,
        report.overall_risk_level,
        stats.total_goals,
        stats.completion_rate,
        recs.suggested_daily_study_hours,
        recs.estimated_completion_weeks
    )
}
