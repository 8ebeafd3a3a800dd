//! Report payloads assembled by the advisor service.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::analysis::StudentAnalysis;
use crate::error::EngineError;
use crate::model::{Goal, LecturerFeedback, ModulePerformanceRecord, RiskLevel};
use crate::planner::StudyPlan;
use crate::resources::ResourceRecommendations;
use crate::statistics::{GoalRecommendations, GoalStatistics, PerformanceSummary};

/// JSON persistence shared by every report type.
pub trait JsonReport: Serialize + DeserializeOwned {
    /// Write the report as pretty JSON, creating parent directories.
    fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        serde_json::from_str(&content).context("failed to parse report JSON")
    }
}

/// A student's records, their analysis and lecturer feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub student_id: String,
    pub performance_data: Vec<ModulePerformanceRecord>,
    pub analysis: StudentAnalysis,
    pub lecturer_feedback: Vec<LecturerFeedback>,
    pub summary: PerformanceSummary,
    pub last_updated: DateTime<Utc>,
}

/// One recorded progress update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A goal with its remaining time and progress history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    #[serde(flatten)]
    pub goal: Goal,
    pub days_remaining: i64,
    /// Oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ProgressEntry>,
}

impl GoalView {
    pub fn new(goal: Goal, today: NaiveDate) -> Self {
        let days_remaining = goal.days_remaining(today);
        Self {
            goal,
            days_remaining,
            history: Vec::new(),
        }
    }

    /// Set the goal's progress and append the update to the history. A
    /// rejected value leaves both untouched.
    pub fn record_progress(
        &mut self,
        progress: i64,
        notes: Option<String>,
    ) -> Result<(), EngineError> {
        self.goal.set_progress(progress)?;
        self.history.push(ProgressEntry {
            progress: self.goal.current_progress,
            notes: notes.filter(|n| !n.trim().is_empty()),
            recorded_at: Utc::now(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsReport {
    pub student_id: String,
    pub overall_risk_level: RiskLevel,
    pub goals: Vec<GoalView>,
    pub completion_stats: GoalStatistics,
    pub recommendations: GoalRecommendations,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerReport {
    pub student_id: String,
    pub study_plan: StudyPlan,
    pub resources: ResourceRecommendations,
    pub generated_at: DateTime<Utc>,
}

/// A student the cohort run could not report on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortFailure {
    pub student_id: String,
    pub error: String,
}

/// Goal reports for many students.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortReport {
    /// Ordered as the students were requested.
    pub reports: Vec<GoalsReport>,
    pub failures: Vec<CohortFailure>,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
}

impl CohortReport {
    /// Students per overall risk level: (low, medium, high).
    pub fn risk_distribution(&self) -> (usize, usize, usize) {
        let count = |level: RiskLevel| {
            self.reports
                .iter()
                .filter(|r| r.overall_risk_level == level)
                .count()
        };
        (
            count(RiskLevel::Low),
            count(RiskLevel::Medium),
            count(RiskLevel::High),
        )
    }
}

impl JsonReport for PerformanceReport {}
impl JsonReport for GoalsReport {}
impl JsonReport for PlannerReport {}
impl JsonReport for CohortReport {}
