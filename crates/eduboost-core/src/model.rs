//! Core data model types for eduboost.
//!
//! These are the records the engine reads (performance records, lecturer
//! feedback, catalog resources) and the entities it produces (goals).

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{check_range, EngineError};

/// Module name used for goals that are not tied to a specific module.
pub const GENERAL_MODULE: &str = "General";

/// One student's metrics for one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulePerformanceRecord {
    /// Module name; also the key into the resource catalog.
    pub module_name: String,
    /// Module difficulty, 1.0-5.0.
    pub module_difficulty: f64,
    /// Current GPA, 0.0-4.0.
    pub current_gpa: f64,
    /// Average assessment score, 0-100.
    pub avg_assessment_score: f64,
    /// Number of assignments handed in late.
    pub assignments_late: u32,
    /// Number of submission attempts (at least one).
    pub num_submission_attempts: u32,
    /// Logins to the learning platform over the period.
    pub login_frequency: u32,
    /// Attendance, 0-100.
    pub attendance_rate: f64,
    /// Lab completion, 0-100.
    pub lab_completion_rate: f64,
    /// Participation, 0-100.
    pub participation_score: f64,
    /// Whether the student has previously failed this module.
    #[serde(deserialize_with = "deserialize_flag")]
    pub failed_module: bool,
    /// Semester label (e.g. "Spring2025").
    #[serde(default)]
    pub semester: String,
}

impl ModulePerformanceRecord {
    /// Check every raw field against its documented range.
    ///
    /// Raw inputs are never clamped; anything out of range is rejected
    /// before it reaches the scorer.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.module_name.trim().is_empty() {
            return Err(EngineError::validation(
                "module_name",
                "must not be empty",
            ));
        }
        check_range("module_difficulty", self.module_difficulty, 1.0, 5.0)?;
        check_range("current_gpa", self.current_gpa, 0.0, 4.0)?;
        check_range("avg_assessment_score", self.avg_assessment_score, 0.0, 100.0)?;
        check_range("attendance_rate", self.attendance_rate, 0.0, 100.0)?;
        check_range("lab_completion_rate", self.lab_completion_rate, 0.0, 100.0)?;
        check_range("participation_score", self.participation_score, 0.0, 100.0)?;
        if self.num_submission_attempts == 0 {
            return Err(EngineError::validation(
                "num_submission_attempts",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Accept `true`/`false` as well as the `0`/`1` integers older exports use.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!(
            "expected 0 or 1 for a flag, got {other}"
        ))),
        Flag::Text(s) => match s.trim().to_lowercase().as_str() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "expected 0/1 or true/false for a flag, got {other:?}"
            ))),
        },
    }
}

/// Categorical risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a score: above 0.6 is high, above 0.3 is medium.
    pub fn from_score(score: f64) -> Self {
        if score > 0.6 {
            RiskLevel::High
        } else if score > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Medium and high modules count as weak.
    pub fn is_elevated(self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// A triggered scoring rule. Serialized as its human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    #[serde(rename = "Very Low Assessment Scores", alias = "very_low_assessment_scores")]
    VeryLowAssessmentScores,
    #[serde(rename = "Low Assessment Scores", alias = "low_assessment_scores")]
    LowAssessmentScores,
    #[serde(
        rename = "Below Average Assessment Scores",
        alias = "below_average_assessment_scores"
    )]
    BelowAverageAssessmentScores,
    #[serde(rename = "Very Low GPA", alias = "very_low_gpa")]
    VeryLowGpa,
    #[serde(rename = "Low GPA", alias = "low_gpa")]
    LowGpa,
    #[serde(rename = "Poor Attendance", alias = "poor_attendance")]
    PoorAttendance,
    #[serde(rename = "Low Attendance", alias = "low_attendance")]
    LowAttendance,
    #[serde(rename = "Poor Lab Completion", alias = "poor_lab_completion")]
    PoorLabCompletion,
    #[serde(rename = "Incomplete Lab Work", alias = "incomplete_lab_work")]
    IncompleteLabWork,
    #[serde(rename = "Low Participation", alias = "low_participation")]
    LowParticipation,
    #[serde(rename = "Frequent Late Submissions", alias = "frequent_late_submissions")]
    FrequentLateSubmissions,
    #[serde(rename = "Some Late Submissions", alias = "some_late_submissions")]
    SomeLateSubmissions,
    #[serde(rename = "Very Low Engagement", alias = "very_low_engagement")]
    VeryLowEngagement,
    #[serde(rename = "Low Engagement", alias = "low_engagement")]
    LowEngagement,
    #[serde(rename = "Previous Module Failure", alias = "previous_module_failure")]
    PreviousModuleFailure,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 15] = [
        RiskFactor::VeryLowAssessmentScores,
        RiskFactor::LowAssessmentScores,
        RiskFactor::BelowAverageAssessmentScores,
        RiskFactor::VeryLowGpa,
        RiskFactor::LowGpa,
        RiskFactor::PoorAttendance,
        RiskFactor::LowAttendance,
        RiskFactor::PoorLabCompletion,
        RiskFactor::IncompleteLabWork,
        RiskFactor::LowParticipation,
        RiskFactor::FrequentLateSubmissions,
        RiskFactor::SomeLateSubmissions,
        RiskFactor::VeryLowEngagement,
        RiskFactor::LowEngagement,
        RiskFactor::PreviousModuleFailure,
    ];

    /// Human-readable label reported in `risk_factors`.
    pub fn label(self) -> &'static str {
        match self {
            RiskFactor::VeryLowAssessmentScores => "Very Low Assessment Scores",
            RiskFactor::LowAssessmentScores => "Low Assessment Scores",
            RiskFactor::BelowAverageAssessmentScores => "Below Average Assessment Scores",
            RiskFactor::VeryLowGpa => "Very Low GPA",
            RiskFactor::LowGpa => "Low GPA",
            RiskFactor::PoorAttendance => "Poor Attendance",
            RiskFactor::LowAttendance => "Low Attendance",
            RiskFactor::PoorLabCompletion => "Poor Lab Completion",
            RiskFactor::IncompleteLabWork => "Incomplete Lab Work",
            RiskFactor::LowParticipation => "Low Participation",
            RiskFactor::FrequentLateSubmissions => "Frequent Late Submissions",
            RiskFactor::SomeLateSubmissions => "Some Late Submissions",
            RiskFactor::VeryLowEngagement => "Very Low Engagement",
            RiskFactor::LowEngagement => "Low Engagement",
            RiskFactor::PreviousModuleFailure => "Previous Module Failure",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskFactor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        let snake = wanted.to_lowercase().replace(' ', "_");
        RiskFactor::ALL
            .into_iter()
            .find(|factor| {
                factor.label().eq_ignore_ascii_case(wanted)
                    || factor.label().to_lowercase().replace(' ', "_") == snake
            })
            .ok_or_else(|| format!("unknown risk factor: {wanted}"))
    }
}

/// Goal priority. Orders high first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// What kind of improvement a goal targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    SkillImprovement,
    ConceptMastery,
    PerformanceImprovement,
    HabitImprovement,
    LecturerRecommended,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalType::SkillImprovement => "skill_improvement",
            GoalType::ConceptMastery => "concept_mastery",
            GoalType::PerformanceImprovement => "performance_improvement",
            GoalType::HabitImprovement => "habit_improvement",
            GoalType::LecturerRecommended => "lecturer_recommended",
        };
        f.write_str(s)
    }
}

/// Who produced a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalSource {
    Ai,
    Lecturer,
}

/// A prioritized, dated learning objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub goal_id: Uuid,
    pub student_id: String,
    /// Target module, or [`GENERAL_MODULE`].
    pub module_name: String,
    pub title: String,
    pub description: String,
    pub goal_type: GoalType,
    pub priority_level: Priority,
    pub target_completion_date: NaiveDate,
    /// Progress percentage, 0-100.
    pub current_progress: u8,
    pub success_criteria: Vec<String>,
    pub generated_by: GoalSource,
}

impl Goal {
    pub fn is_completed(&self) -> bool {
        self.current_progress >= 100
    }

    /// Whole days until the target date, never negative.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_completion_date - today).num_days().max(0)
    }

    /// Record new progress. Values outside 0-100 are rejected, not clamped.
    pub fn set_progress(&mut self, progress: i64) -> Result<(), EngineError> {
        if !(0..=100).contains(&progress) {
            return Err(EngineError::validation(
                "current_progress",
                format!("{progress} is outside 0..=100"),
            ));
        }
        self.current_progress = progress as u8;
        Ok(())
    }
}

/// Feedback a lecturer left for a student on one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LecturerFeedback {
    #[serde(default)]
    pub student_id: String,
    pub module_name: String,
    #[serde(default)]
    pub lecturer_id: String,
    #[serde(default)]
    pub feedback_text: String,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    #[serde(default)]
    pub strength_areas: Vec<String>,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    /// Urgency, 1-5.
    #[serde(default = "default_urgency")]
    pub urgency_level: u8,
    #[serde(default = "default_timeline")]
    pub improvement_timeline: String,
}

fn default_urgency() -> u8 {
    3
}

fn default_timeline() -> String {
    "2 weeks".to_string()
}

impl LecturerFeedback {
    /// Range checks applied before feedback is turned into goals.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.module_name.trim().is_empty() {
            return Err(EngineError::validation("module_name", "must not be empty"));
        }
        if !(1..=5).contains(&self.urgency_level) {
            return Err(EngineError::validation(
                "urgency_level",
                format!("{} is outside 1..=5", self.urgency_level),
            ));
        }
        Ok(())
    }

    /// Stricter checks for newly submitted feedback: identity fields and
    /// the feedback text itself are mandatory.
    pub fn validate_submission(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("student_id", &self.student_id),
            ("lecturer_id", &self.lecturer_id),
            ("feedback_text", &self.feedback_text),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::validation(field, "is required"));
            }
        }
        self.validate()
    }
}

/// Kind of learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Book,
    Online,
    Practice,
    Video,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::Book => write!(f, "book"),
            ResourceType::Online => write!(f, "online"),
            ResourceType::Practice => write!(f, "practice"),
            ResourceType::Video => write!(f, "video"),
        }
    }
}

/// A resource catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub module_name: String,
    pub resource_type: ResourceType,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: String,
    /// Difficulty, 1-5.
    pub difficulty_level: u8,
    #[serde(default)]
    pub topic_tags: BTreeSet<String>,
    /// Rating, 0-5.
    pub rating: f64,
    #[serde(default)]
    pub estimated_hours: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_free: bool,
}

fn default_true() -> bool {
    true
}

/// Where a module sits in the programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleLevel {
    Foundational,
    Intermediate,
    Advanced,
}

impl fmt::Display for ModuleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleLevel::Foundational => write!(f, "foundational"),
            ModuleLevel::Intermediate => write!(f, "intermediate"),
            ModuleLevel::Advanced => write!(f, "advanced"),
        }
    }
}

/// A module directory entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub module_name: String,
    pub module_code: String,
    pub description: String,
    pub level: ModuleLevel,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record that triggers no rule at all.
    pub fn healthy(module: &str) -> ModulePerformanceRecord {
        ModulePerformanceRecord {
            module_name: module.to_string(),
            module_difficulty: 3.0,
            current_gpa: 3.4,
            avg_assessment_score: 78.0,
            assignments_late: 0,
            num_submission_attempts: 1,
            login_frequency: 20,
            attendance_rate: 92.0,
            lab_completion_rate: 88.0,
            participation_score: 75.0,
            failed_module: false,
            semester: "Spring2025".to_string(),
        }
    }

    /// A record that fires every tightest tier (sum exceeds 1.0).
    pub fn failing(module: &str) -> ModulePerformanceRecord {
        ModulePerformanceRecord {
            module_name: module.to_string(),
            module_difficulty: 4.0,
            current_gpa: 1.8,
            avg_assessment_score: 35.0,
            assignments_late: 4,
            num_submission_attempts: 3,
            login_frequency: 3,
            attendance_rate: 50.0,
            lab_completion_rate: 40.0,
            participation_score: 30.0,
            failed_module: true,
            semester: "Spring2025".to_string(),
        }
    }

    /// A record scoring 0.45: assessment <50, GPA <2.5, attendance <75,
    /// lab <70, one late submission.
    pub fn at_risk(module: &str) -> ModulePerformanceRecord {
        ModulePerformanceRecord {
            module_name: module.to_string(),
            module_difficulty: 3.0,
            current_gpa: 2.3,
            avg_assessment_score: 45.0,
            assignments_late: 1,
            num_submission_attempts: 2,
            login_frequency: 15,
            attendance_rate: 70.0,
            lab_completion_rate: 65.0,
            participation_score: 55.0,
            failed_module: false,
            semester: "Spring2025".to_string(),
        }
    }
}
