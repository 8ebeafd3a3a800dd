//! The `eduboost plan` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use eduboost_core::report::PlannerReport;
use eduboost_report::{html, markdown};

use super::common::{emit, save_report, service, Format};

pub async fn execute(
    student: String,
    seed: Option<u64>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format = Format::parse(&format)?;
    let (config, service) = service(config_path.as_deref(), seed, None)?;

    let report = service.planner_report(&student).await?;

    if output.is_none() {
        save_report(&report, &config.output_dir, &format!("{student}-plan"))?;
    }

    let rendered = match format {
        Format::Json => serde_json::to_string_pretty(&report)?,
        Format::Markdown => markdown::render_planner(&report),
        Format::Html => html::generate_planner_html(&report),
        Format::Text => render_text(&report),
    };
    emit(&rendered, output.as_ref())
}

fn render_text(report: &PlannerReport) -> String {
    let plan = &report.study_plan;
    let mut out = format!(
        "Student {}: {} hours/week ({} intensity)\n",
        report.student_id, plan.recommended_hours, plan.personalization.study_intensity
    );

    if plan.weekly_schedule.is_empty() {
        out.push_str("No weak modules; no extra sessions scheduled.\n");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Day", "Time", "Subject", "Duration"]);
        for s in &plan.weekly_schedule {
            table.add_row(vec![
                Cell::new(&s.day),
                Cell::new(&s.time),
                Cell::new(&s.subject),
                Cell::new(s.duration()),
            ]);
        }
        out.push_str(&format!("{table}\n"));
    }

    for (category, items) in report.resources.categories() {
        for r in items {
            out.push_str(&format!("  [{category}] {} ({:.1}/5) {}\n", r.title, r.rating, r.url));
        }
    }
    out
}
