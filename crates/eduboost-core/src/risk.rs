//! Per-module risk scoring.
//!
//! A weighted additive rule table: each metric contributes the increment of
//! the tightest tier it falls into, the increments are summed and clamped to
//! 1.0. Increments are kept in hundredths so tier boundaries compare exactly.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{ModulePerformanceRecord, RiskFactor, RiskLevel};

/// The risk derived from one performance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub module_name: String,
    /// Clamped to `0.0..=1.0`.
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Triggered rules, in evaluation order.
    pub risk_factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Copy)]
enum Metric {
    AssessmentScore,
    Gpa,
    Attendance,
    LabCompletion,
    Participation,
    LateAssignments,
    LoginFrequency,
    PriorFailure,
}

impl Metric {
    fn value(self, record: &ModulePerformanceRecord) -> f64 {
        match self {
            Metric::AssessmentScore => record.avg_assessment_score,
            Metric::Gpa => record.current_gpa,
            Metric::Attendance => record.attendance_rate,
            Metric::LabCompletion => record.lab_completion_rate,
            Metric::Participation => record.participation_score,
            Metric::LateAssignments => f64::from(record.assignments_late),
            Metric::LoginFrequency => f64::from(record.login_frequency),
            Metric::PriorFailure => {
                if record.failed_module {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Fires when the value is strictly below the threshold.
    Below,
    /// Fires when the value is at or above the threshold.
    AtLeast,
}

#[derive(Debug, Clone, Copy)]
struct Tier {
    threshold: f64,
    factor: RiskFactor,
    /// Increment in hundredths of a risk point.
    points: u32,
}

/// One metric and its mutually exclusive tiers, tightest first.
#[derive(Debug, Clone, Copy)]
struct RuleGroup {
    metric: Metric,
    direction: Direction,
    tiers: &'static [Tier],
}

impl RuleGroup {
    fn evaluate(&self, record: &ModulePerformanceRecord) -> Option<&Tier> {
        let value = self.metric.value(record);
        self.tiers.iter().find(|tier| match self.direction {
            Direction::Below => value < tier.threshold,
            Direction::AtLeast => value >= tier.threshold,
        })
    }
}

const fn tier(threshold: f64, factor: RiskFactor, points: u32) -> Tier {
    Tier {
        threshold,
        factor,
        points,
    }
}

const RULE_TABLE: &[RuleGroup] = &[
    RuleGroup {
        metric: Metric::AssessmentScore,
        direction: Direction::Below,
        tiers: &[
            tier(40.0, RiskFactor::VeryLowAssessmentScores, 25),
            tier(50.0, RiskFactor::LowAssessmentScores, 15),
            tier(60.0, RiskFactor::BelowAverageAssessmentScores, 10),
        ],
    },
    RuleGroup {
        metric: Metric::Gpa,
        direction: Direction::Below,
        tiers: &[
            tier(2.0, RiskFactor::VeryLowGpa, 15),
            tier(2.5, RiskFactor::LowGpa, 10),
        ],
    },
    RuleGroup {
        metric: Metric::Attendance,
        direction: Direction::Below,
        tiers: &[
            tier(60.0, RiskFactor::PoorAttendance, 15),
            tier(75.0, RiskFactor::LowAttendance, 10),
        ],
    },
    RuleGroup {
        metric: Metric::LabCompletion,
        direction: Direction::Below,
        tiers: &[
            tier(50.0, RiskFactor::PoorLabCompletion, 10),
            tier(70.0, RiskFactor::IncompleteLabWork, 5),
        ],
    },
    RuleGroup {
        metric: Metric::Participation,
        direction: Direction::Below,
        tiers: &[tier(40.0, RiskFactor::LowParticipation, 10)],
    },
    RuleGroup {
        metric: Metric::LateAssignments,
        direction: Direction::AtLeast,
        tiers: &[
            tier(3.0, RiskFactor::FrequentLateSubmissions, 10),
            tier(1.0, RiskFactor::SomeLateSubmissions, 5),
        ],
    },
    RuleGroup {
        metric: Metric::LoginFrequency,
        direction: Direction::Below,
        tiers: &[
            tier(5.0, RiskFactor::VeryLowEngagement, 10),
            tier(10.0, RiskFactor::LowEngagement, 5),
        ],
    },
    RuleGroup {
        metric: Metric::PriorFailure,
        direction: Direction::AtLeast,
        tiers: &[tier(1.0, RiskFactor::PreviousModuleFailure, 15)],
    },
];

const MAX_POINTS: u32 = 100;

/// Score a record that is already known to be valid.
pub(crate) fn score_unchecked(record: &ModulePerformanceRecord) -> RiskAssessment {
    let mut points = 0u32;
    let mut risk_factors = Vec::new();

    for group in RULE_TABLE {
        if let Some(tier) = group.evaluate(record) {
            points += tier.points;
            risk_factors.push(tier.factor);
        }
    }

    let risk_score = f64::from(points.min(MAX_POINTS)) / 100.0;
    tracing::debug!(
        module = %record.module_name,
        risk_score,
        factors = risk_factors.len(),
        "scored module"
    );

    RiskAssessment {
        module_name: record.module_name.clone(),
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
        risk_factors,
    }
}

/// Score one module record.
///
/// Deterministic and pure: identical records always yield identical
/// assessments, with factors in the fixed table order.
pub fn score_module(record: &ModulePerformanceRecord) -> Result<RiskAssessment, EngineError> {
    record.validate()?;
    Ok(score_unchecked(record))
}

/// Score every record, rejecting an empty list.
pub fn score_modules(
    records: &[ModulePerformanceRecord],
) -> Result<Vec<RiskAssessment>, EngineError> {
    if records.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one performance record is required".into(),
        ));
    }
    records.iter().map(score_module).collect()
}

impl RiskAssessment {
    /// The score in hundredths of a risk point.
    pub fn points(&self) -> u32 {
        (self.risk_score * 100.0).round() as u32
    }
}

/// Risk summed across modules in hundredths, so that mean comparisons
/// against the level thresholds stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRisk {
    total_points: u64,
    modules: u64,
}

impl AggregateRisk {
    /// `None` for an empty slice.
    pub fn of(assessments: &[RiskAssessment]) -> Option<Self> {
        if assessments.is_empty() {
            return None;
        }
        Some(Self {
            total_points: assessments.iter().map(|a| u64::from(a.points())).sum(),
            modules: assessments.len() as u64,
        })
    }

    /// Mean risk score, for display.
    pub fn mean(&self) -> f64 {
        self.total_points as f64 / (100 * self.modules) as f64
    }

    /// Level of the mean: above 0.6 is high, above 0.3 medium.
    pub fn level(&self) -> RiskLevel {
        if self.total_points > 60 * self.modules {
            RiskLevel::High
        } else if self.total_points > 30 * self.modules {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// `floor(mean * 10)`.
    pub fn tenths(&self) -> u32 {
        let tenths = (self.total_points * 10) / (100 * self.modules);
        u32::try_from(tenths).unwrap_or(u32::MAX)
    }
}
