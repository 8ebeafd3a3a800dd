//! Per-student performance analysis.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{ModulePerformanceRecord, RiskFactor, RiskLevel};
use crate::risk::{score_modules, AggregateRisk, RiskAssessment};
use crate::rulebook::{ImprovementSuggestion, RuleBook};

/// Modules scoring above this are flagged for lecturer attention.
pub const LECTURER_ATTENTION_THRESHOLD: f64 = 0.8;

/// A high-risk module and the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailingModule {
    pub module: String,
    pub risk_factors: Vec<RiskFactor>,
    /// Average assessment score.
    pub current_grade: f64,
    pub attendance: f64,
    pub risk_score: f64,
}

/// Aggregate view of a student's risk across modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAnalysis {
    pub overall_risk_level: RiskLevel,
    pub average_risk_score: f64,
    pub failing_modules: Vec<FailingModule>,
    pub at_risk_modules: Vec<String>,
    pub strong_modules: Vec<String>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub lecturer_attention_needed: Vec<String>,
    /// Per-module assessments, in input order.
    pub assessments: Vec<RiskAssessment>,
}

impl StudentAnalysis {
    /// Number of medium or high risk modules.
    pub fn weak_module_count(&self) -> usize {
        self.failing_modules.len() + self.at_risk_modules.len()
    }
}

/// Buckets modules by risk and looks up improvement suggestions.
#[derive(Debug, Clone)]
pub struct PerformanceAnalyzer<'a> {
    rules: &'a RuleBook,
}

impl<'a> PerformanceAnalyzer<'a> {
    pub fn new(rules: &'a RuleBook) -> Self {
        Self { rules }
    }

    /// Score every record and aggregate the results.
    ///
    /// Fails with [`EngineError::InvalidInput`] for an empty slice and with
    /// [`EngineError::Validation`] if any record is out of range.
    pub fn analyze(&self, records: &[ModulePerformanceRecord]) -> Result<StudentAnalysis, EngineError> {
        let assessments = score_modules(records)?;
        Ok(self.analyze_assessments(records, assessments))
    }

    /// Aggregate assessments already produced for `records` (same order).
    pub(crate) fn analyze_assessments(
        &self,
        records: &[ModulePerformanceRecord],
        assessments: Vec<RiskAssessment>,
    ) -> StudentAnalysis {
        let mut failing_modules = Vec::new();
        let mut at_risk_modules = Vec::new();
        let mut strong_modules = Vec::new();
        let mut improvement_suggestions = Vec::new();
        let mut lecturer_attention_needed = Vec::new();

        for (record, assessment) in records.iter().zip(&assessments) {
            match assessment.risk_level {
                RiskLevel::High => {
                    failing_modules.push(FailingModule {
                        module: record.module_name.clone(),
                        risk_factors: assessment.risk_factors.clone(),
                        current_grade: record.avg_assessment_score,
                        attendance: record.attendance_rate,
                        risk_score: assessment.risk_score,
                    });
                    if assessment.risk_score > LECTURER_ATTENTION_THRESHOLD {
                        lecturer_attention_needed.push(record.module_name.clone());
                    }
                }
                RiskLevel::Medium => at_risk_modules.push(record.module_name.clone()),
                RiskLevel::Low => strong_modules.push(record.module_name.clone()),
            }

            improvement_suggestions.extend(
                self.rules
                    .suggestions_for(&record.module_name, &assessment.risk_factors),
            );
        }

        let (average_risk_score, overall_risk_level) = match AggregateRisk::of(&assessments) {
            Some(aggregate) => (aggregate.mean(), aggregate.level()),
            None => (0.0, RiskLevel::Low),
        };

        tracing::debug!(
            modules = assessments.len(),
            average_risk_score,
            %overall_risk_level,
            failing = failing_modules.len(),
            at_risk = at_risk_modules.len(),
            "analyzed student"
        );

        StudentAnalysis {
            overall_risk_level,
            average_risk_score,
            failing_modules,
            at_risk_modules,
            strong_modules,
            improvement_suggestions,
            lecturer_attention_needed,
            assessments,
        }
    }
}
