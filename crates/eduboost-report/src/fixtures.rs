//! Reports built through the engine, for rendering tests.

use chrono::{NaiveDate, Utc};

use eduboost_core::model::{
    LearningResource, LecturerFeedback, ModulePerformanceRecord, ResourceType,
};
use eduboost_core::report::{
    CohortFailure, CohortReport, GoalsReport, PerformanceReport, PlannerReport,
};
use eduboost_core::resources::InMemoryCatalog;
use eduboost_core::statistics::summarize_performance;
use eduboost_core::Engine;

pub fn record(module: &str, score: f64, failed: bool) -> ModulePerformanceRecord {
    let weak = score < 50.0;
    ModulePerformanceRecord {
        module_name: module.to_string(),
        module_difficulty: 3.0,
        current_gpa: if weak { 1.8 } else { 3.4 },
        avg_assessment_score: score,
        assignments_late: if weak { 4 } else { 0 },
        num_submission_attempts: 1,
        login_frequency: if weak { 3 } else { 20 },
        attendance_rate: if weak { 50.0 } else { 92.0 },
        lab_completion_rate: if weak { 40.0 } else { 88.0 },
        participation_score: 70.0,
        failed_module: failed,
        semester: "Spring2025".to_string(),
    }
}

pub fn records() -> Vec<ModulePerformanceRecord> {
    vec![
        record("Database Management", 35.0, true),
        record("Web Development", 80.0, false),
    ]
}

pub fn feedback() -> Vec<LecturerFeedback> {
    vec![LecturerFeedback {
        student_id: "STU001".into(),
        module_name: "Database Management".into(),
        lecturer_id: "LEC01".into(),
        feedback_text: "Needs work on <joins> & keys".into(),
        weak_areas: vec!["SQL Joins".into()],
        strength_areas: vec![],
        recommended_actions: vec!["Practice joins daily".into()],
        urgency_level: 4,
        improvement_timeline: "2 weeks".into(),
    }]
}

fn engine() -> Engine {
    Engine::builtin()
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        .with_plan_seed(Some(7))
}

pub fn performance_report() -> PerformanceReport {
    let records = records();
    let analysis = engine().analyze(&records).unwrap();
    PerformanceReport {
        student_id: "STU001".into(),
        summary: summarize_performance(&records, &analysis),
        performance_data: records,
        analysis,
        lecturer_feedback: feedback(),
        last_updated: Utc::now(),
    }
}

pub fn goals_report() -> GoalsReport {
    engine()
        .goals_report("STU001", &records(), &feedback())
        .unwrap()
}

pub fn planner_report() -> PlannerReport {
    let engine = engine();
    let records = records();
    let goals = engine.generate_goals("STU001", &records, &[]).unwrap();
    let catalog = InMemoryCatalog::new(vec![LearningResource {
        module_name: "Database Management".into(),
        resource_type: ResourceType::Practice,
        title: "SQLBolt Interactive Lessons".into(),
        url: "https://sqlbolt.com/".into(),
        author: "SQLBolt".into(),
        difficulty_level: 2,
        topic_tags: ["SQL Practice".to_string()].into_iter().collect(),
        rating: 4.6,
        estimated_hours: 8,
        description: "Interactive SQL practice".into(),
        is_free: true,
    }]);

    PlannerReport {
        student_id: "STU001".into(),
        study_plan: engine.build_plan(&records).unwrap(),
        resources: engine.recommend_resources(&goals, &catalog).unwrap(),
        generated_at: Utc::now(),
    }
}

pub fn cohort_report() -> CohortReport {
    let healthy = engine()
        .goals_report("STU002", &[record("Web Development", 85.0, false)], &[])
        .unwrap();
    CohortReport {
        reports: vec![goals_report(), healthy],
        failures: vec![CohortFailure {
            student_id: "STU404".into(),
            error: "student not found: STU404".into(),
        }],
        duration_ms: 42,
        generated_at: Utc::now(),
    }
}
