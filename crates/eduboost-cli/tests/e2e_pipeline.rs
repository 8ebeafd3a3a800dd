//! End-to-end pipeline tests: data directory -> advisor service -> reports.
//!
//! These exercise the real file store, built-in rule book and catalog with
//! no mocks.

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use eduboost_core::model::{Priority, RiskLevel};
use eduboost_core::report::{GoalsReport, JsonReport};
use eduboost_core::traits::ResourceCatalog;
use eduboost_core::{AdvisorConfig, AdvisorService, Engine, NoopReporter};
use eduboost_providers::{builtin_catalog, FileStore};
use eduboost_report::{html, markdown};

const FAILING_DB: &str = r#"[
  {"module_name": "Database Management", "module_difficulty": 4.0, "current_gpa": 1.8,
   "avg_assessment_score": 35.0, "assignments_late": 4, "num_submission_attempts": 3,
   "login_frequency": 3, "attendance_rate": 50.0, "lab_completion_rate": 40.0,
   "participation_score": 30.0, "failed_module": 1, "semester": "Spring2025"},
  {"module_name": "Web Development", "module_difficulty": 2.0, "current_gpa": 3.4,
   "avg_assessment_score": 78.0, "assignments_late": 0, "num_submission_attempts": 1,
   "login_frequency": 20, "attendance_rate": 92.0, "lab_completion_rate": 88.0,
   "participation_score": 75.0, "failed_module": 0, "semester": "Spring2025"}
]"#;

const HEALTHY_CSV: &str = "\
module_name,module_difficulty,current_gpa,avg_assessment_score,assignments_late,num_submission_attempts,login_frequency,attendance_rate,lab_completion_rate,participation_score,failed_module,semester
Programming Fundamentals,2.0,3.6,82,0,1,22,95,90,80,0,Spring2025
Computer Networks,3.0,3.2,74,0,1,18,88,85,70,0,Spring2025
Operating System,3.0,3.0,70,0,1,16,85,80,65,0,Spring2025
";

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("STU001.json"), FAILING_DB).unwrap();
    std::fs::write(
        dir.path().join("STU001.feedback.json"),
        r#"[{"module_name": "Database Management", "lecturer_id": "LEC01",
             "feedback_text": "Joins need work", "weak_areas": ["SQL Joins"],
             "urgency_level": 5}]"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("STU002.csv"), HEALTHY_CSV).unwrap();
    dir
}

fn service(dir: &TempDir) -> AdvisorService {
    let store = Arc::new(FileStore::new(dir.path()));
    let catalog: Arc<dyn ResourceCatalog> = Arc::new(builtin_catalog());
    let engine = Engine::builtin()
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        .with_plan_seed(Some(11));
    AdvisorService::new(
        engine,
        store.clone(),
        store,
        catalog,
        AdvisorConfig { parallelism: 2 },
    )
}

#[tokio::test]
async fn e2e_failing_student_full_pipeline() {
    let dir = data_dir();
    let service = service(&dir);

    let performance = service.performance_report("STU001").await.unwrap();
    assert_eq!(performance.analysis.assessments[0].risk_score, 1.0);
    assert_eq!(performance.analysis.failing_modules.len(), 1);
    assert_eq!(performance.summary.strong_modules, 1);
    assert_eq!(performance.lecturer_feedback[0].student_id, "STU001");

    let goals = service.goals_report("STU001").await.unwrap();
    assert!(goals.goals.len() <= 6);
    assert!(goals
        .goals
        .windows(2)
        .all(|w| w[0].goal.priority_level <= w[1].goal.priority_level));
    assert!(goals
        .goals
        .iter()
        .any(|g| g.goal.title == "Improve SQL Joins" && g.goal.priority_level == Priority::High));
    assert_eq!(
        goals.recommendations.focus_areas[0],
        "Database Management"
    );

    let planner = service.planner_report("STU001").await.unwrap();
    let plan = &planner.study_plan;
    assert!((15..=40).contains(&plan.recommended_hours));
    assert_eq!(plan.weekly_schedule.len(), 7);
    assert_eq!(planner.resources.books[0].title, "Database System Concepts");
    assert!(planner.resources.practice_platforms.len() <= 5);
}

#[tokio::test]
async fn e2e_healthy_csv_student_has_no_goals() {
    let dir = data_dir();
    let service = service(&dir);

    let report = service.goals_report("STU002").await.unwrap();
    assert_eq!(report.overall_risk_level, RiskLevel::Low);
    assert!(report.goals.is_empty());
    assert_eq!(report.completion_stats.completion_rate, 0.0);

    let performance = service.performance_report("STU002").await.unwrap();
    assert_eq!(performance.analysis.strong_modules.len(), 3);
    assert!(performance.analysis.improvement_suggestions.is_empty());
}

#[tokio::test]
async fn e2e_cohort_over_data_directory() {
    let dir = data_dir();
    let service = service(&dir);

    let mut students = FileStore::new(dir.path()).list_students().unwrap();
    students.push("GHOST".to_string());

    let cohort = service.cohort(&students, &NoopReporter).await.unwrap();
    let ids: Vec<&str> = cohort.reports.iter().map(|r| r.student_id.as_str()).collect();
    assert_eq!(ids, vec!["STU001", "STU002"]);
    assert_eq!(cohort.failures.len(), 1);
    assert_eq!(cohort.failures[0].student_id, "GHOST");

    let (low, medium, high) = cohort.risk_distribution();
    assert_eq!(low + medium + high, 2);
    assert_eq!(low, 1);

    let md = markdown::render_cohort(&cohort);
    assert!(md.contains("| STU002 | low |"));
    let page = html::generate_cohort_html(&cohort);
    assert!(page.contains("GHOST"));
}

#[tokio::test]
async fn e2e_goals_report_round_trips_through_json() {
    let dir = data_dir();
    let service = service(&dir);
    let out = TempDir::new().unwrap();
    let path = out.path().join("reports").join("STU001-goals.json");

    let report = service.goals_report("STU001").await.unwrap();
    report.save_json(&path).unwrap();

    let mut loaded = GoalsReport::load_json(&path).unwrap();
    assert_eq!(loaded, report);

    loaded.goals[0].goal.set_progress(100).unwrap();
    assert!(loaded.goals[0].goal.is_completed());
    assert!(loaded.goals[0].goal.set_progress(101).is_err());
}
