//! Engine facade and the async advisor service.
//!
//! [`Engine`] bundles a rule book with the pure analysis, goal, resource and
//! planning steps. [`AdvisorService`] pulls inputs from injected providers,
//! runs the engine and assembles report payloads, one student at a time or
//! for a whole cohort with bounded parallelism.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::analysis::{PerformanceAnalyzer, StudentAnalysis};
use crate::error::EngineError;
use crate::goals::GoalGenerator;
use crate::legacy::{self, LegacyPredictRequest, LegacyPrediction};
use crate::model::{Goal, LecturerFeedback, ModulePerformanceRecord};
use crate::planner::{StudyPlan, StudyPlanBuilder};
use crate::report::{
    CohortFailure, CohortReport, GoalView, GoalsReport, PerformanceReport, PlannerReport,
};
use crate::resources::{ResourceRecommendations, ResourceRecommender};
use crate::rulebook::RuleBook;
use crate::statistics::{goal_recommendations, goal_statistics, summarize_performance};
use crate::traits::{FeedbackProvider, RecordProvider, ResourceCatalog};

/// The synchronous scoring and recommendation engine.
///
/// No I/O happens here; every input is passed in.
#[derive(Debug, Clone)]
pub struct Engine {
    rules: Arc<RuleBook>,
    today: Option<NaiveDate>,
    plan_seed: Option<u64>,
}

impl Engine {
    pub fn new(rules: RuleBook) -> Self {
        Self {
            rules: Arc::new(rules),
            today: None,
            plan_seed: None,
        }
    }

    /// An engine over the built-in rule book.
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(RuleBook::builtin()?))
    }

    /// Fix the date goal deadlines are computed from.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Make schedule subject selection reproducible.
    pub fn with_plan_seed(mut self, seed: Option<u64>) -> Self {
        self.plan_seed = seed;
        self
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    fn goal_generator(&self) -> GoalGenerator<'_> {
        GoalGenerator::new(&self.rules).with_today(self.today())
    }

    pub fn analyze(&self, records: &[ModulePerformanceRecord]) -> Result<StudentAnalysis, EngineError> {
        PerformanceAnalyzer::new(&self.rules).analyze(records)
    }

    pub fn generate_goals(
        &self,
        student_id: &str,
        records: &[ModulePerformanceRecord],
        feedback: &[LecturerFeedback],
    ) -> Result<Vec<Goal>, EngineError> {
        self.goal_generator().generate(student_id, records, feedback)
    }

    pub fn recommend_resources(
        &self,
        goals: &[Goal],
        catalog: &dyn ResourceCatalog,
    ) -> Result<ResourceRecommendations, EngineError> {
        ResourceRecommender::new(catalog).recommend(goals)
    }

    pub fn build_plan(&self, records: &[ModulePerformanceRecord]) -> Result<StudyPlan, EngineError> {
        match self.plan_seed {
            Some(seed) => StudyPlanBuilder::seeded(seed).build(records),
            None => StudyPlanBuilder::new().build(records),
        }
    }

    /// The legacy single-record prediction. Independent of the rule book.
    pub fn legacy_predict(&self, request: &LegacyPredictRequest) -> Result<LegacyPrediction, EngineError> {
        legacy::legacy_predict(request)
    }

    /// Goals report for records and feedback already in hand.
    pub fn goals_report(
        &self,
        student_id: &str,
        records: &[ModulePerformanceRecord],
        feedback: &[LecturerFeedback],
    ) -> Result<GoalsReport, EngineError> {
        let generator = self.goal_generator();
        let analysis = PerformanceAnalyzer::new(&self.rules).analyze(records)?;
        let goals = generator.generate_from_analysis(student_id, &analysis, feedback)?;
        let today = generator.today();

        Ok(GoalsReport {
            student_id: student_id.to_string(),
            overall_risk_level: analysis.overall_risk_level,
            completion_stats: goal_statistics(&goals),
            recommendations: goal_recommendations(&goals),
            goals: goals.into_iter().map(|g| GoalView::new(g, today)).collect(),
            generated_at: Utc::now(),
        })
    }
}

/// Configuration for the advisor service.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Maximum students processed at once in a cohort run.
    pub parallelism: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting for cohort runs.
pub trait ProgressReporter: Send + Sync {
    fn on_student_start(&self, student_id: &str);
    fn on_student_complete(&self, report: &GoalsReport);
    fn on_student_error(&self, student_id: &str, error: &str);
    fn on_cohort_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_student_start(&self, _: &str) {}
    fn on_student_complete(&self, _: &GoalsReport) {}
    fn on_student_error(&self, _: &str, _: &str) {}
    fn on_cohort_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Pulls student data from providers and produces reports.
pub struct AdvisorService {
    engine: Engine,
    records: Arc<dyn RecordProvider>,
    feedback: Arc<dyn FeedbackProvider>,
    catalog: Arc<dyn ResourceCatalog>,
    config: AdvisorConfig,
}

impl AdvisorService {
    pub fn new(
        engine: Engine,
        records: Arc<dyn RecordProvider>,
        feedback: Arc<dyn FeedbackProvider>,
        catalog: Arc<dyn ResourceCatalog>,
        config: AdvisorConfig,
    ) -> Self {
        Self {
            engine,
            records,
            feedback,
            catalog,
            config,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    async fn fetch_records(&self, student_id: &str) -> Result<Vec<ModulePerformanceRecord>> {
        self.records
            .fetch_records(student_id)
            .await
            .with_context(|| format!("failed to fetch records for {student_id}"))
    }

    async fn fetch_feedback(&self, student_id: &str) -> Result<Vec<LecturerFeedback>> {
        self.feedback
            .fetch_feedback(student_id)
            .await
            .with_context(|| format!("failed to fetch feedback for {student_id}"))
    }

    /// Records, analysis, feedback and summary for one student.
    pub async fn performance_report(&self, student_id: &str) -> Result<PerformanceReport> {
        let (records, feedback) = futures::try_join!(
            self.fetch_records(student_id),
            self.fetch_feedback(student_id)
        )?;

        let analysis = self.engine.analyze(&records)?;
        let summary = summarize_performance(&records, &analysis);

        tracing::info!(
            student_id,
            modules = records.len(),
            risk = %analysis.overall_risk_level,
            "assembled performance report"
        );

        Ok(PerformanceReport {
            student_id: student_id.to_string(),
            performance_data: records,
            analysis,
            lecturer_feedback: feedback,
            summary,
            last_updated: Utc::now(),
        })
    }

    /// Goals (lecturer feedback included), statistics and recommendations.
    pub async fn goals_report(&self, student_id: &str) -> Result<GoalsReport> {
        let (records, feedback) = futures::try_join!(
            self.fetch_records(student_id),
            self.fetch_feedback(student_id)
        )?;

        let report = self.engine.goals_report(student_id, &records, &feedback)?;

        tracing::info!(
            student_id,
            goals = report.goals.len(),
            "assembled goals report"
        );

        Ok(report)
    }

    /// Study plan and resources. Resource goals ignore lecturer feedback.
    pub async fn planner_report(&self, student_id: &str) -> Result<PlannerReport> {
        let records = self.fetch_records(student_id).await?;

        let goals = self.engine.generate_goals(student_id, &records, &[])?;
        let resources = self
            .engine
            .recommend_resources(&goals, self.catalog.as_ref())?;
        let study_plan = self.engine.build_plan(&records)?;

        tracing::info!(
            student_id,
            hours = study_plan.recommended_hours,
            resources = resources.total(),
            "assembled planner report"
        );

        Ok(PlannerReport {
            student_id: student_id.to_string(),
            study_plan,
            resources,
            generated_at: Utc::now(),
        })
    }

    /// Goals reports for many students, at most `parallelism` at a time.
    ///
    /// A student whose report fails is recorded in `failures` and skipped.
    pub async fn cohort(
        &self,
        student_ids: &[String],
        progress: &dyn ProgressReporter,
    ) -> Result<CohortReport> {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut futures = FuturesUnordered::new();
        for (index, student_id) in student_ids.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                let result = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_student_start(student_id);
                    self.goals_report(student_id).await
                }
                .await;
                (index, student_id, result)
            });
        }

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        let total = futures.len();

        while let Some((index, student_id, result)) = futures.next().await {
            match result {
                Ok(report) => {
                    progress.on_student_complete(&report);
                    reports.push((index, report));
                }
                Err(e) => {
                    tracing::error!("report failed for {student_id}: {e:#}");
                    progress.on_student_error(student_id, &format!("{e:#}"));
                    failures.push((
                        index,
                        CohortFailure {
                            student_id: student_id.clone(),
                            error: format!("{e:#}"),
                        },
                    ));
                }
            }
        }

        reports.sort_by_key(|(index, _)| *index);
        failures.sort_by_key(|(index, _)| *index);

        let elapsed = start.elapsed();
        progress.on_cohort_complete(total, reports.len(), failures.len(), elapsed);

        Ok(CohortReport {
            reports: reports.into_iter().map(|(_, r)| r).collect(),
            failures: failures.into_iter().map(|(_, f)| f).collect(),
            duration_ms: elapsed.as_millis() as u64,
            generated_at: Utc::now(),
        })
    }
}
