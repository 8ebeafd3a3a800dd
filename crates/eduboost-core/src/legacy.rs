//! Legacy `/predict` scoring.
//!
//! Older clients send only six metrics. The remaining inputs are estimated
//! from the assessment score and the result is scored with the standard rule
//! table, then reported in the legacy response shape.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{check_range, EngineError};
use crate::model::{ModulePerformanceRecord, RiskLevel};
use crate::risk::score_unchecked;

/// Risk at or above which the legacy prediction is positive.
pub const PREDICTION_THRESHOLD: f64 = 0.4;

/// Module name given to the synthesized record.
const LEGACY_MODULE: &str = "Legacy";

/// Assumed attendance when none is supplied.
const ASSUMED_ATTENDANCE: f64 = 85.0;

/// The six legacy request fields. Each may be a scalar or a one-element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPredictRequest {
    #[serde(rename = "Module_Difficulty", deserialize_with = "scalar_or_list")]
    pub module_difficulty: f64,
    #[serde(rename = "Current_GPA", deserialize_with = "scalar_or_list")]
    pub current_gpa: f64,
    #[serde(rename = "Avg_Assessment_Score", deserialize_with = "scalar_or_list")]
    pub avg_assessment_score: f64,
    #[serde(rename = "Assignments_Late", deserialize_with = "scalar_or_list")]
    pub assignments_late: f64,
    #[serde(rename = "Num_Submission_Attempts", deserialize_with = "scalar_or_list")]
    pub num_submission_attempts: f64,
    #[serde(rename = "Login_Frequency", deserialize_with = "scalar_or_list")]
    pub login_frequency: f64,
}

fn scalar_or_list<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(f64),
        Many(Vec<f64>),
    }

    match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(v) => Ok(v),
        OneOrMany::Many(values) => values
            .first()
            .copied()
            .ok_or_else(|| serde::de::Error::custom("expected a value, got an empty list")),
    }
}

/// Coarse per-area risk in the legacy response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFactorAnalysis {
    pub academic_risk: RiskLevel,
    pub behavioral_risk: RiskLevel,
    pub engagement_risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyPrediction {
    /// 1 when the student is predicted to be at risk.
    pub prediction: u8,
    /// Rounded to three decimals.
    pub risk_score: f64,
    /// `min(1.5 * risk, 1)`, rounded to three decimals.
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub factors_analysis: LegacyFactorAnalysis,
    pub recommendations: Vec<String>,
}

impl LegacyPredictRequest {
    fn validate(&self) -> Result<(), EngineError> {
        check_range("Module_Difficulty", self.module_difficulty, 1.0, 5.0)?;
        check_range("Current_GPA", self.current_gpa, 0.0, 4.0)?;
        check_range("Avg_Assessment_Score", self.avg_assessment_score, 0.0, 100.0)?;
        count("Assignments_Late", self.assignments_late)?;
        count("Login_Frequency", self.login_frequency)?;
        if count("Num_Submission_Attempts", self.num_submission_attempts)? == 0 {
            return Err(EngineError::validation(
                "Num_Submission_Attempts",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// The full record the legacy fields stand for, with estimated metrics.
    fn to_record(&self) -> Result<ModulePerformanceRecord, EngineError> {
        let score = self.avg_assessment_score;
        Ok(ModulePerformanceRecord {
            module_name: LEGACY_MODULE.to_string(),
            module_difficulty: self.module_difficulty,
            current_gpa: self.current_gpa,
            avg_assessment_score: score,
            assignments_late: count("Assignments_Late", self.assignments_late)?,
            num_submission_attempts: count("Num_Submission_Attempts", self.num_submission_attempts)?,
            login_frequency: count("Login_Frequency", self.login_frequency)?,
            attendance_rate: ASSUMED_ATTENDANCE,
            lab_completion_rate: (score - 10.0).max(0.0),
            participation_score: (score - 5.0).max(0.0),
            failed_module: score < 40.0,
            semester: String::new(),
        })
    }
}

/// A non-negative whole number.
fn count(field: &str, value: f64) -> Result<u32, EngineError> {
    check_range(field, value, 0.0, f64::from(u32::MAX))?;
    if value.fract() != 0.0 {
        return Err(EngineError::validation(field, "must be a whole number"));
    }
    Ok(value as u32)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Score a legacy request.
pub fn legacy_predict(request: &LegacyPredictRequest) -> Result<LegacyPrediction, EngineError> {
    request.validate()?;
    let record = request.to_record()?;
    let assessment = score_unchecked(&record);
    let risk = assessment.risk_score;

    let factors_analysis = LegacyFactorAnalysis {
        academic_risk: below(request.avg_assessment_score, 50.0, 70.0),
        behavioral_risk: if record.assignments_late >= 3 {
            RiskLevel::High
        } else if record.assignments_late >= 1 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        },
        engagement_risk: below(request.login_frequency, 10.0, 20.0),
    };

    Ok(LegacyPrediction {
        prediction: u8::from(risk >= PREDICTION_THRESHOLD),
        risk_score: round3(risk),
        confidence: round3((risk * 1.5).min(1.0)),
        risk_level: assessment.risk_level,
        factors_analysis,
        recommendations: quick_recommendations(&record),
    })
}

/// High below `high`, medium below `medium`, else low.
fn below(value: f64, high: f64, medium: f64) -> RiskLevel {
    if value < high {
        RiskLevel::High
    } else if value < medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

fn quick_recommendations(record: &ModulePerformanceRecord) -> Vec<String> {
    let mut recommendations = Vec::new();
    if record.avg_assessment_score < 60.0 {
        recommendations.push("Focus on improving assessment scores through practice tests".into());
    }
    if record.current_gpa < 2.5 {
        recommendations.push("Schedule meeting with academic advisor".into());
    }
    if record.assignments_late >= 2 {
        recommendations.push("Improve time management and assignment planning".into());
    }
    if record.login_frequency < 10 {
        recommendations.push("Increase engagement with online learning materials".into());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LegacyPredictRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn accepts_scalars_and_single_element_lists() {
        let request = parse(
            r#"{
                "Module_Difficulty": [3],
                "Current_GPA": 2.8,
                "Avg_Assessment_Score": [72.5],
                "Assignments_Late": 0,
                "Num_Submission_Attempts": [1],
                "Login_Frequency": 25
            }"#,
        );
        assert_eq!(request.module_difficulty, 3.0);
        assert_eq!(request.avg_assessment_score, 72.5);
    }

    #[test]
    fn missing_field_or_empty_list_fails_to_parse() {
        assert!(serde_json::from_str::<LegacyPredictRequest>(r#"{"Current_GPA": 3.0}"#).is_err());
        let empty = r#"{
            "Module_Difficulty": [], "Current_GPA": 2.8, "Avg_Assessment_Score": 70,
            "Assignments_Late": 0, "Num_Submission_Attempts": 1, "Login_Frequency": 25
        }"#;
        assert!(serde_json::from_str::<LegacyPredictRequest>(empty).is_err());
    }

    #[test]
    fn healthy_request_is_negative() {
        let prediction = legacy_predict(&LegacyPredictRequest {
            module_difficulty: 3.0,
            current_gpa: 3.2,
            avg_assessment_score: 82.0,
            assignments_late: 0.0,
            num_submission_attempts: 1.0,
            login_frequency: 25.0,
        })
        .unwrap();
        assert_eq!(prediction.prediction, 0);
        assert_eq!(prediction.risk_score, 0.0);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert_eq!(prediction.factors_analysis.academic_risk, RiskLevel::Low);
        assert!(prediction.recommendations.is_empty());
    }

    #[test]
    fn struggling_request_uses_estimated_metrics() {
        // score 35: <40 (+0.25), lab 25 (+0.10), participation 30 (+0.10),
        // failure estimated (+0.15); GPA 1.9 (+0.15); late 2 (+0.05);
        // logins 8 (+0.05). 0.85 total.
        let prediction = legacy_predict(&LegacyPredictRequest {
            module_difficulty: 4.0,
            current_gpa: 1.9,
            avg_assessment_score: 35.0,
            assignments_late: 2.0,
            num_submission_attempts: 3.0,
            login_frequency: 8.0,
        })
        .unwrap();
        assert_eq!(prediction.prediction, 1);
        assert_eq!(prediction.risk_score, 0.85);
        assert_eq!(prediction.confidence, 1.0);
        assert_eq!(prediction.risk_level, RiskLevel::High);
        assert_eq!(
            prediction.factors_analysis,
            LegacyFactorAnalysis {
                academic_risk: RiskLevel::High,
                behavioral_risk: RiskLevel::Medium,
                engagement_risk: RiskLevel::High,
            }
        );
        assert_eq!(prediction.recommendations.len(), 4);
    }

    #[test]
    fn prediction_threshold_is_inclusive() {
        // score 55: +0.10, lab 45 (+0.10), GPA 2.4 (+0.10), late 1 (+0.05),
        // logins 9 (+0.05) = 0.40.
        let prediction = legacy_predict(&LegacyPredictRequest {
            module_difficulty: 2.0,
            current_gpa: 2.4,
            avg_assessment_score: 55.0,
            assignments_late: 1.0,
            num_submission_attempts: 1.0,
            login_frequency: 9.0,
        })
        .unwrap();
        assert_eq!(prediction.risk_score, 0.4);
        assert_eq!(prediction.prediction, 1);
        assert_eq!(prediction.confidence, 0.6);
        assert_eq!(prediction.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        let base = LegacyPredictRequest {
            module_difficulty: 3.0,
            current_gpa: 3.0,
            avg_assessment_score: 70.0,
            assignments_late: 0.0,
            num_submission_attempts: 1.0,
            login_frequency: 20.0,
        };

        let mut bad = base.clone();
        bad.current_gpa = 5.0;
        assert!(legacy_predict(&bad).is_err());

        let mut bad = base.clone();
        bad.assignments_late = -1.0;
        assert!(legacy_predict(&bad).is_err());

        let mut bad = base.clone();
        bad.login_frequency = 2.5;
        assert!(legacy_predict(&bad).is_err());

        let mut bad = base;
        bad.num_submission_attempts = 0.0;
        let err = legacy_predict(&bad).unwrap_err();
        assert!(err.to_string().contains("Num_Submission_Attempts"));
    }
}
