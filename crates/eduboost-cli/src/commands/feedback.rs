//! The `eduboost feedback` command.

use std::path::PathBuf;

use anyhow::Result;

use eduboost_core::model::LecturerFeedback;
use eduboost_providers::{load_config_from, FileStore};

/// Split a comma-separated flag value, dropping blanks.
fn list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    student: String,
    module: String,
    lecturer: String,
    text: String,
    weak_areas: Option<String>,
    strengths: Option<String>,
    actions: Option<String>,
    urgency: u8,
    timeline: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    anyhow::ensure!(
        config.api.is_none(),
        "feedback is submitted to the data directory; unset the records API to use this command"
    );

    let feedback = LecturerFeedback {
        student_id: student.trim().to_string(),
        module_name: module.trim().to_string(),
        lecturer_id: lecturer.trim().to_string(),
        feedback_text: text,
        weak_areas: list(weak_areas),
        strength_areas: list(strengths),
        recommended_actions: list(actions),
        urgency_level: urgency,
        improvement_timeline: timeline,
    };
    feedback.validate_submission()?;

    let store = FileStore::new(&config.data_dir);
    let (path, count) = store.save_feedback(&feedback)?;

    tracing::info!(
        student_id = %feedback.student_id,
        module = %feedback.module_name,
        urgency = feedback.urgency_level,
        "recorded lecturer feedback"
    );
    println!(
        "Feedback recorded for {} on {} ({} entries in {})",
        feedback.student_id,
        feedback.module_name,
        count,
        path.display()
    );
    Ok(())
}
