//! The `eduboost progress` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use uuid::Uuid;

use eduboost_core::model::Goal;
use eduboost_core::report::{GoalsReport, JsonReport};
use eduboost_core::statistics::goal_statistics;

pub fn execute(
    report_path: PathBuf,
    goal_id: String,
    progress: i64,
    notes: Option<String>,
) -> Result<()> {
    let goal_id: Uuid = goal_id
        .trim()
        .parse()
        .with_context(|| format!("invalid goal id '{goal_id}'"))?;

    let mut report = GoalsReport::load_json(&report_path)?;

    let view = report
        .goals
        .iter_mut()
        .find(|v| v.goal.goal_id == goal_id)
        .with_context(|| {
            format!(
                "goal {goal_id} not found in {}",
                report_path.display()
            )
        })?;
    view.record_progress(progress, notes)?;
    let updates = view.history.len();
    let title = view.goal.title.clone();
    let completed = view.goal.is_completed();

    let goals: Vec<Goal> = report.goals.iter().map(|v| v.goal.clone()).collect();
    report.completion_stats = goal_statistics(&goals);
    report.save_json(&report_path)?;

    tracing::info!(%goal_id, progress, updates, "updated goal progress");
    println!(
        "{title}: {progress}%{} ({updates} update{})",
        if completed { " (completed)" } else { "" },
        if updates == 1 { "" } else { "s" }
    );
    println!(
        "{}/{} goals complete ({:.1}%)",
        report.completion_stats.completed_goals,
        report.completion_stats.total_goals,
        report.completion_stats.completion_rate
    );
    Ok(())
}
