//! Summary statistics over records, analyses and goals.

use serde::{Deserialize, Serialize};

use crate::analysis::StudentAnalysis;
use crate::model::{Goal, ModulePerformanceRecord, Priority, RiskLevel};

/// Daily study hours never exceed this.
const MAX_DAILY_HOURS: f64 = 8.0;
const HOURS_PER_GOAL: f64 = 1.5;
const MIN_COMPLETION_WEEKS: usize = 2;
const WEEKS_PER_HIGH_GOAL: usize = 2;

/// Headline numbers for a performance report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub total_modules: usize,
    pub failing_modules: usize,
    pub at_risk_modules: usize,
    pub strong_modules: usize,
    /// Mean GPA, two decimals.
    pub overall_gpa: f64,
    pub average_attendance: f64,
    pub average_lab_completion: f64,
    pub risk_level: RiskLevel,
}

/// Goal completion counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalStatistics {
    pub total_goals: usize,
    pub completed_goals: usize,
    pub in_progress_goals: usize,
    /// Percent complete, one decimal. Zero when there are no goals.
    pub completion_rate: f64,
    pub high_priority_goals: usize,
    pub medium_priority_goals: usize,
    pub low_priority_goals: usize,
}

/// Workload guidance derived from the goal list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecommendations {
    /// Modules of the high-priority goals, in goal order.
    pub focus_areas: Vec<String>,
    pub suggested_daily_study_hours: f64,
    pub estimated_completion_weeks: usize,
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

pub fn summarize_performance(
    records: &[ModulePerformanceRecord],
    analysis: &StudentAnalysis,
) -> PerformanceSummary {
    PerformanceSummary {
        total_modules: records.len(),
        failing_modules: analysis.failing_modules.len(),
        at_risk_modules: analysis.at_risk_modules.len(),
        strong_modules: analysis.strong_modules.len(),
        overall_gpa: round_to(mean(records.iter().map(|r| r.current_gpa)), 2),
        average_attendance: round_to(mean(records.iter().map(|r| r.attendance_rate)), 2),
        average_lab_completion: round_to(mean(records.iter().map(|r| r.lab_completion_rate)), 2),
        risk_level: analysis.overall_risk_level,
    }
}

pub fn goal_statistics(goals: &[Goal]) -> GoalStatistics {
    let total_goals = goals.len();
    let completed_goals = goals.iter().filter(|g| g.is_completed()).count();
    let with_priority = |p: Priority| goals.iter().filter(|g| g.priority_level == p).count();

    let completion_rate = if total_goals == 0 {
        0.0
    } else {
        round_to(completed_goals as f64 / total_goals as f64 * 100.0, 1)
    };

    GoalStatistics {
        total_goals,
        completed_goals,
        in_progress_goals: total_goals - completed_goals,
        completion_rate,
        high_priority_goals: with_priority(Priority::High),
        medium_priority_goals: with_priority(Priority::Medium),
        low_priority_goals: with_priority(Priority::Low),
    }
}

pub fn goal_recommendations(goals: &[Goal]) -> GoalRecommendations {
    let focus_areas: Vec<String> = goals
        .iter()
        .filter(|g| g.priority_level == Priority::High)
        .map(|g| g.module_name.clone())
        .collect();

    GoalRecommendations {
        suggested_daily_study_hours: (goals.len() as f64 * HOURS_PER_GOAL).min(MAX_DAILY_HOURS),
        estimated_completion_weeks: (focus_areas.len() * WEEKS_PER_HIGH_GOAL)
            .max(MIN_COMPLETION_WEEKS),
        focus_areas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PerformanceAnalyzer;
    use crate::model::{fixtures, GoalSource, GoalType};
    use crate::rulebook::RuleBook;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn goal(module: &str, priority: Priority, progress: u8) -> Goal {
        Goal {
            goal_id: Uuid::new_v4(),
            student_id: "STU001".into(),
            module_name: module.into(),
            title: "t".into(),
            description: String::new(),
            goal_type: GoalType::SkillImprovement,
            priority_level: priority,
            target_completion_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            current_progress: progress,
            success_criteria: vec![],
            generated_by: GoalSource::Ai,
        }
    }

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(2.456, 2), 2.46);
        assert_eq!(round_to(33.333, 1), 33.3);
    }

    #[test]
    fn performance_summary_means() {
        let records = [
            fixtures::healthy("Web Development"),
            fixtures::failing("Database Management"),
        ];
        let rules = RuleBook::builtin().unwrap();
        let analysis = PerformanceAnalyzer::new(&rules).analyze(&records).unwrap();
        let summary = summarize_performance(&records, &analysis);

        assert_eq!(summary.total_modules, 2);
        assert_eq!(summary.failing_modules, 1);
        assert_eq!(summary.strong_modules, 1);
        assert_eq!(summary.overall_gpa, 2.6);
        assert_eq!(summary.average_attendance, 71.0);
        assert_eq!(summary.average_lab_completion, 64.0);
        assert_eq!(summary.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn empty_goal_list_statistics() {
        let stats = goal_statistics(&[]);
        assert_eq!(stats, GoalStatistics::default());

        let recs = goal_recommendations(&[]);
        assert!(recs.focus_areas.is_empty());
        assert_eq!(recs.suggested_daily_study_hours, 0.0);
        assert_eq!(recs.estimated_completion_weeks, 2);
    }

    #[test]
    fn goal_statistics_count_priorities_and_completion() {
        let goals = [
            goal("Database Management", Priority::High, 100),
            goal("Database Management", Priority::High, 40),
            goal("Operating System", Priority::Medium, 0),
        ];
        let stats = goal_statistics(&goals);
        assert_eq!(stats.total_goals, 3);
        assert_eq!(stats.completed_goals, 1);
        assert_eq!(stats.in_progress_goals, 2);
        assert_eq!(stats.completion_rate, 33.3);
        assert_eq!(stats.high_priority_goals, 2);
        assert_eq!(stats.medium_priority_goals, 1);
        assert_eq!(stats.low_priority_goals, 0);
    }

    #[test]
    fn recommendations_scale_with_goals() {
        let goals: Vec<_> = (0..6)
            .map(|i| goal(&format!("Module {i}"), Priority::High, 0))
            .collect();
        let recs = goal_recommendations(&goals);
        assert_eq!(recs.suggested_daily_study_hours, 8.0);
        assert_eq!(recs.estimated_completion_weeks, 12);
        assert_eq!(recs.focus_areas.len(), 6);

        let recs = goal_recommendations(&goals[..1]);
        assert_eq!(recs.suggested_daily_study_hours, 1.5);
        assert_eq!(recs.estimated_completion_weeks, 2);
    }
}
