//! Goal generation from an analysis and lecturer feedback.

use chrono::{Days, NaiveDate, Utc};
use uuid::Uuid;

use crate::analysis::{PerformanceAnalyzer, StudentAnalysis};
use crate::error::EngineError;
use crate::model::{
    Goal, GoalSource, GoalType, LecturerFeedback, ModulePerformanceRecord, Priority,
    GENERAL_MODULE,
};
use crate::rulebook::{GoalTemplate, RuleBook};

/// Upper bound on goals produced per invocation.
pub const MAX_GOALS: usize = 6;

/// Days until a lecturer-recommended goal is due.
pub const LECTURER_GOAL_DAYS: u64 = 14;

/// Lecturer urgency at or above which the goal is high priority.
const URGENT_FEEDBACK: u8 = 4;

/// Turns analyses into prioritized, dated goals.
#[derive(Debug, Clone)]
pub struct GoalGenerator<'a> {
    rules: &'a RuleBook,
    today: NaiveDate,
}

impl<'a> GoalGenerator<'a> {
    /// A generator dated today (UTC).
    pub fn new(rules: &'a RuleBook) -> Self {
        Self {
            rules,
            today: Utc::now().date_naive(),
        }
    }

    /// Compute deadlines from `today` instead of the current date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Analyze the records and generate goals.
    pub fn generate(
        &self,
        student_id: &str,
        records: &[ModulePerformanceRecord],
        feedback: &[LecturerFeedback],
    ) -> Result<Vec<Goal>, EngineError> {
        let analysis = PerformanceAnalyzer::new(self.rules).analyze(records)?;
        self.generate_from_analysis(student_id, &analysis, feedback)
    }

    /// Generate goals for an existing analysis.
    ///
    /// Goals are produced failing, at-risk, general, lecturer; only the first
    /// [`MAX_GOALS`] survive, and those are then stably ordered by priority.
    pub fn generate_from_analysis(
        &self,
        student_id: &str,
        analysis: &StudentAnalysis,
        feedback: &[LecturerFeedback],
    ) -> Result<Vec<Goal>, EngineError> {
        for entry in feedback {
            entry.validate()?;
        }

        let mut goals = Vec::new();

        for failing in &analysis.failing_modules {
            let mut matched = false;
            for template in self
                .rules
                .failing_templates(&failing.module, &failing.risk_factors)
            {
                goals.push(self.from_template(student_id, &failing.module, template, Priority::High));
                matched = true;
            }
            if !matched {
                match &self.rules.fallback_goal {
                    Some(fallback) => goals.push(self.from_template(
                        student_id,
                        &failing.module,
                        fallback,
                        Priority::High,
                    )),
                    None => tracing::debug!(
                        module = %failing.module,
                        "no goal template for failing module"
                    ),
                }
            }
        }

        for module in &analysis.at_risk_modules {
            goals.push(self.from_template(
                student_id,
                module,
                &self.rules.at_risk_goal,
                Priority::Medium,
            ));
        }

        if analysis.overall_risk_level.is_elevated() {
            goals.push(self.from_template(
                student_id,
                GENERAL_MODULE,
                &self.rules.general_goal,
                Priority::Low,
            ));
        }

        for entry in feedback {
            for area in &entry.weak_areas {
                goals.push(self.from_feedback(student_id, entry, area));
            }
        }

        let generated = goals.len();
        goals.truncate(MAX_GOALS);
        goals.sort_by_key(|goal| goal.priority_level);

        tracing::debug!(
            student_id,
            generated,
            kept = goals.len(),
            "generated goals"
        );

        Ok(goals)
    }

    fn from_template(
        &self,
        student_id: &str,
        module: &str,
        template: &GoalTemplate,
        priority: Priority,
    ) -> Goal {
        Goal {
            goal_id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            module_name: module.to_string(),
            title: template.title_for(module),
            description: template.description_for(module),
            goal_type: template.goal_type,
            priority_level: priority,
            target_completion_date: self.due_in(template.deadline_days.unsigned_abs()),
            current_progress: 0,
            success_criteria: template.success_criteria.clone(),
            generated_by: GoalSource::Ai,
        }
    }

    fn from_feedback(&self, student_id: &str, feedback: &LecturerFeedback, area: &str) -> Goal {
        let priority_level = if feedback.urgency_level >= URGENT_FEEDBACK {
            Priority::High
        } else {
            Priority::Medium
        };

        Goal {
            goal_id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            module_name: feedback.module_name.clone(),
            title: format!("Improve {area}"),
            description: feedback.feedback_text.clone(),
            goal_type: GoalType::LecturerRecommended,
            priority_level,
            target_completion_date: self.due_in(LECTURER_GOAL_DAYS),
            current_progress: 0,
            success_criteria: feedback.recommended_actions.clone(),
            generated_by: GoalSource::Lecturer,
        }
    }

    fn due_in(&self, days: u64) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX)
    }
}
