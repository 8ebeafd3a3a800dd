//! Weekly study plan construction.
//!
//! The plan is derived from aggregate risk: weekly hours grow with the number
//! of weak modules, every day of the week gets one session on a weak module,
//! and the wellness guidance tightens as average risk rises.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::model::{ModulePerformanceRecord, RiskLevel, GENERAL_MODULE};
use crate::risk::{score_modules, AggregateRisk, RiskAssessment};

pub const MIN_WEEKLY_HOURS: u32 = 15;
pub const MAX_WEEKLY_HOURS: u32 = 40;

/// Hours contributed by each weak module.
const HOURS_PER_WEAK_MODULE: u32 = 4;

const WEEKDAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const WEEKEND: [&str; 2] = ["Saturday", "Sunday"];

/// Number of weak modules the plan focuses on.
const FOCUS_LIMIT: usize = 3;

const STUDY_TECHNIQUES: [&str; 5] = [
    "Pomodoro Technique (25 min study, 5 min break)",
    "Active recall and spaced repetition",
    "Practice problems before theory review",
    "Form study groups for difficult concepts",
    "Use flashcards for memorization topics",
];

/// Chooses the subject of each day's session.
pub trait SubjectSelector {
    /// Pick one of `candidates` for `day`. `candidates` is never empty.
    fn select(&mut self, day: &str, candidates: &[String]) -> String;
}

/// Uniform random choice from a seedable generator.
#[derive(Debug, Clone)]
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible selection.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl SubjectSelector for RandomSelector {
    fn select(&mut self, _day: &str, candidates: &[String]) -> String {
        candidates
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| GENERAL_MODULE.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    IntensiveStudy,
    RegularStudy,
}

/// One scheduled study session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySession {
    pub day: String,
    /// Clock range, e.g. "19:00-21:00".
    pub time: String,
    pub subject: String,
    /// Session length, rounded to one decimal.
    pub hours: f64,
    pub session_type: SessionType,
}

impl DaySession {
    /// Human-readable length, e.g. "2.1 hours".
    pub fn duration(&self) -> String {
        format!("{:.1} hours", self.hours)
    }
}

/// A small daily or weekly target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiniGoal {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub module: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyIntensity {
    High,
    Medium,
    Normal,
}

impl StudyIntensity {
    pub fn from_hours(hours: u32) -> Self {
        if hours > 30 {
            StudyIntensity::High
        } else if hours > 20 {
            StudyIntensity::Medium
        } else {
            StudyIntensity::Normal
        }
    }
}

impl fmt::Display for StudyIntensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudyIntensity::High => write!(f, "high"),
            StudyIntensity::Medium => write!(f, "medium"),
            StudyIntensity::Normal => write!(f, "normal"),
        }
    }
}

/// What the plan was tailored to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizationFactors {
    pub risk_level: RiskLevel,
    pub weak_module_count: usize,
    pub study_intensity: StudyIntensity,
}

/// A week of study guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub recommended_hours: u32,
    pub average_risk: f64,
    /// Monday to Sunday. Empty when there are no weak modules.
    pub weekly_schedule: Vec<DaySession>,
    pub focus_modules: Vec<String>,
    pub study_techniques: Vec<String>,
    pub physical_plan: String,
    pub emotional_plan: String,
    pub mini_goals: Vec<MiniGoal>,
    pub personalization: PersonalizationFactors,
}

/// Builds study plans, drawing session subjects from `S`.
pub struct StudyPlanBuilder<S = RandomSelector> {
    selector: S,
}

impl StudyPlanBuilder<RandomSelector> {
    /// A builder with an entropy-seeded random selector.
    pub fn new() -> Self {
        Self::with_selector(RandomSelector::from_entropy())
    }

    /// A builder whose schedule is reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_selector(RandomSelector::seeded(seed))
    }
}

impl Default for StudyPlanBuilder<RandomSelector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SubjectSelector> StudyPlanBuilder<S> {
    pub fn with_selector(selector: S) -> Self {
        Self { selector }
    }

    /// Score the records and build a plan from them.
    pub fn build(&mut self, records: &[ModulePerformanceRecord]) -> Result<StudyPlan, EngineError> {
        let assessments = score_modules(records)?;
        self.build_from_assessments(&assessments)
    }

    /// Build a plan from assessments already computed.
    pub fn build_from_assessments(
        &mut self,
        assessments: &[RiskAssessment],
    ) -> Result<StudyPlan, EngineError> {
        let aggregate = AggregateRisk::of(assessments).ok_or_else(|| {
            EngineError::InvalidInput("at least one module assessment is required".into())
        })?;
        let risk_level = aggregate.level();

        let weak_modules: Vec<String> = assessments
            .iter()
            .filter(|a| a.risk_level.is_elevated())
            .map(|a| a.module_name.clone())
            .collect();

        let recommended_hours = recommended_hours(weak_modules.len(), aggregate.tenths());
        let weekly_schedule = self.weekly_schedule(&weak_modules, recommended_hours);

        tracing::debug!(
            recommended_hours,
            weak = weak_modules.len(),
            sessions = weekly_schedule.len(),
            "built study plan"
        );

        Ok(StudyPlan {
            recommended_hours,
            average_risk: aggregate.mean(),
            weekly_schedule,
            focus_modules: weak_modules.iter().take(FOCUS_LIMIT).cloned().collect(),
            study_techniques: STUDY_TECHNIQUES.iter().map(|t| t.to_string()).collect(),
            physical_plan: physical_plan(risk_level).to_string(),
            emotional_plan: emotional_plan(risk_level).to_string(),
            mini_goals: mini_goals(&weak_modules),
            personalization: PersonalizationFactors {
                risk_level,
                weak_module_count: weak_modules.len(),
                study_intensity: StudyIntensity::from_hours(recommended_hours),
            },
        })
    }

    fn weekly_schedule(&mut self, weak_modules: &[String], total_hours: u32) -> Vec<DaySession> {
        if weak_modules.is_empty() {
            return Vec::new();
        }

        let daily = f64::from(total_hours) / 7.0;
        let mut schedule = Vec::with_capacity(7);

        for day in WEEKDAYS {
            let hours = daily.min(3.0);
            let time = if hours >= 2.0 { "19:00-21:00" } else { "19:00-20:00" };
            schedule.push(DaySession {
                day: day.to_string(),
                time: time.to_string(),
                subject: self.selector.select(day, weak_modules),
                hours: round1(hours),
                session_type: SessionType::RegularStudy,
            });
        }

        for day in WEEKEND {
            let hours = (daily * 1.5).min(6.0);
            let time = if hours >= 3.0 { "09:00-12:00" } else { "10:00-12:00" };
            schedule.push(DaySession {
                day: day.to_string(),
                time: time.to_string(),
                subject: self.selector.select(day, weak_modules),
                hours: round1(hours),
                session_type: SessionType::IntensiveStudy,
            });
        }

        schedule
    }
}

/// `weak * 4 + floor(avg_risk * 10)`, clamped to 15..=40. `risk_tenths` is
/// the floored term, see [`AggregateRisk::tenths`].
pub fn recommended_hours(weak_modules: usize, risk_tenths: u32) -> u32 {
    let weak = u32::try_from(weak_modules).unwrap_or(u32::MAX);
    let risk_hours = risk_tenths.min(10);
    weak.saturating_mul(HOURS_PER_WEAK_MODULE)
        .saturating_add(risk_hours)
        .clamp(MIN_WEEKLY_HOURS, MAX_WEEKLY_HOURS)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn physical_plan(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::High => "High stress detected. Take 10-minute breaks every hour. Exercise 30 minutes daily. Ensure 7-8 hours sleep. Practice deep breathing before study sessions.",
        RiskLevel::Medium => "Moderate stress level. Take regular breaks during study. Light exercise 3-4 times per week. Maintain consistent sleep schedule.",
        RiskLevel::Low => "Good stress management. Continue current routine. Regular exercise and adequate sleep will maintain performance.",
    }
}

fn emotional_plan(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::High => "High academic pressure detected. Consider talking to a counselor. Practice mindfulness and relaxation techniques. Join study groups for motivation and support.",
        RiskLevel::Medium => "Some academic stress present. Practice positive self-talk. Set realistic daily goals. Reward yourself for completing tasks.",
        RiskLevel::Low => "Good emotional balance. Continue building confidence. Help peers when possible, since teaching others reinforces your own learning.",
    }
}

fn mini_goals(weak_modules: &[String]) -> Vec<MiniGoal> {
    let mini = |id: String, title: String, module: &str| MiniGoal {
        id,
        title,
        completed: false,
        module: module.to_string(),
    };

    let mut goals = Vec::new();
    for (i, module) in weak_modules.iter().take(FOCUS_LIMIT).enumerate() {
        goals.push(mini(
            format!("mini_{i}_1"),
            format!("Complete 1 hour of {module} practice daily"),
            module,
        ));
        goals.push(mini(
            format!("mini_{i}_2"),
            format!("Review {module} lecture notes weekly"),
            module,
        ));
    }
    goals.push(mini(
        "general_1".into(),
        "Attend all scheduled classes this week".into(),
        GENERAL_MODULE,
    ));
    goals.push(mini(
        "general_2".into(),
        "Complete all assignments on time".into(),
        GENERAL_MODULE,
    ));
    goals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    /// Always picks the first candidate.
    struct FirstSelector;

    impl SubjectSelector for FirstSelector {
        fn select(&mut self, _day: &str, candidates: &[String]) -> String {
            candidates[0].clone()
        }
    }

    #[test]
    fn hours_formula_is_clamped() {
        assert_eq!(recommended_hours(0, 0), 15);
        assert_eq!(recommended_hours(3, 4), 16);
        assert_eq!(recommended_hours(4, 4), 20);
        assert_eq!(recommended_hours(5, 9), 29);
        assert_eq!(recommended_hours(12, 10), 40);
        for weak in 0..20 {
            for tenths in 0..=10 {
                let hours = recommended_hours(weak, tenths);
                assert!((MIN_WEEKLY_HOURS..=MAX_WEEKLY_HOURS).contains(&hours));
            }
        }
    }

    #[test]
    fn no_weak_modules_means_no_schedule() {
        let plan = StudyPlanBuilder::with_selector(FirstSelector)
            .build(&[fixtures::healthy("Web Development")])
            .unwrap();
        assert_eq!(plan.recommended_hours, 15);
        assert!(plan.weekly_schedule.is_empty());
        assert!(plan.focus_modules.is_empty());
        assert_eq!(plan.mini_goals.len(), 2);
        assert_eq!(plan.personalization.risk_level, RiskLevel::Low);
        assert_eq!(plan.personalization.study_intensity, StudyIntensity::Normal);
        assert!(plan.physical_plan.starts_with("Good stress management"));
    }

    #[test]
    fn schedule_covers_the_week_with_session_shapes() {
        let plan = StudyPlanBuilder::with_selector(FirstSelector)
            .build(&[
                fixtures::failing("Database Management"),
                fixtures::healthy("Web Development"),
            ])
            .unwrap();

        // 1 weak module, avg risk 0.5 -> 4 + 5 = 9 -> clamped to 15.
        assert_eq!(plan.recommended_hours, 15);
        let days: Vec<_> = plan.weekly_schedule.iter().map(|s| s.day.as_str()).collect();
        assert_eq!(
            days,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );

        let monday = &plan.weekly_schedule[0];
        assert_eq!(monday.time, "19:00-21:00");
        assert_eq!(monday.hours, 2.1);
        assert_eq!(monday.duration(), "2.1 hours");
        assert_eq!(monday.session_type, SessionType::RegularStudy);
        assert_eq!(monday.subject, "Database Management");

        let sunday = &plan.weekly_schedule[6];
        assert_eq!(sunday.time, "09:00-12:00");
        assert_eq!(sunday.hours, 3.2);
        assert_eq!(sunday.session_type, SessionType::IntensiveStudy);
    }

    #[test]
    fn plan_level_and_hours_use_exact_mean() {
        // Scores 0.40 and 0.80: mean exactly 0.6.
        let mut first = fixtures::healthy("Operating System");
        first.avg_assessment_score = 35.0;
        first.current_gpa = 1.8;
        let mut second = first.clone();
        second.module_name = "Database Management".into();
        second.attendance_rate = 50.0;
        second.participation_score = 30.0;
        second.failed_module = true;

        let plan = StudyPlanBuilder::with_selector(FirstSelector)
            .build(&[first, second])
            .unwrap();
        assert_eq!(plan.personalization.risk_level, RiskLevel::Medium);
        assert!(plan.physical_plan.starts_with("Moderate stress"));
        // 2 * 4 + 6 = 14, clamped to 15.
        assert_eq!(plan.recommended_hours, 15);
    }

    #[test]
    fn heavy_load_caps_session_lengths() {
        let records: Vec<_> = (0..10)
            .map(|i| fixtures::failing(&format!("Module {i}")))
            .collect();
        let plan = StudyPlanBuilder::seeded(7).build(&records).unwrap();
        assert_eq!(plan.recommended_hours, 40);
        assert!(plan.weekly_schedule[..5].iter().all(|s| s.hours == 3.0));
        assert!(plan.weekly_schedule[5..].iter().all(|s| s.hours == 6.0));
        assert_eq!(plan.focus_modules.len(), 3);
        assert_eq!(plan.mini_goals.len(), 8);
        assert_eq!(plan.personalization.study_intensity, StudyIntensity::High);
        assert!(plan.emotional_plan.starts_with("High academic pressure"));
    }

    #[test]
    fn seeded_selection_is_reproducible_and_draws_from_weak_modules() {
        let records = [
            fixtures::failing("Database Management"),
            fixtures::at_risk("Operating System"),
            fixtures::at_risk("Web Development"),
            fixtures::healthy("Computer Networks"),
        ];
        let first = StudyPlanBuilder::seeded(42).build(&records).unwrap();
        let second = StudyPlanBuilder::seeded(42).build(&records).unwrap();
        assert_eq!(first.weekly_schedule, second.weekly_schedule);
        assert!(first
            .weekly_schedule
            .iter()
            .all(|s| s.subject != "Computer Networks"));
    }

    #[test]
    fn mini_goal_ids_follow_module_index() {
        let plan = StudyPlanBuilder::with_selector(FirstSelector)
            .build(&[fixtures::at_risk("Operating System")])
            .unwrap();
        let ids: Vec<_> = plan.mini_goals.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["mini_0_1", "mini_0_2", "general_1", "general_2"]);
        assert_eq!(
            plan.mini_goals[0].title,
            "Complete 1 hour of Operating System practice daily"
        );
        assert_eq!(plan.study_techniques.len(), 5);
    }

    #[test]
    fn empty_assessments_are_rejected() {
        let err = StudyPlanBuilder::with_selector(FirstSelector)
            .build_from_assessments(&[])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
