use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use eduboost_core::legacy::LegacyPredictRequest;
use eduboost_core::model::ModulePerformanceRecord;
use eduboost_core::rulebook::{parse_rulebook_str, BUILTIN_RULES};

fn bench_rulebook(c: &mut Criterion) {
    let mut group = c.benchmark_group("rulebook");

    group.bench_function("parse_builtin", |b| {
        b.iter(|| parse_rulebook_str(black_box(BUILTIN_RULES), Path::new("<bench>")))
    });

    group.finish();
}

fn bench_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("records");

    let record = r#"{
        "module_name": "Database Management",
        "module_difficulty": 4.0,
        "current_gpa": 2.1,
        "avg_assessment_score": 48.5,
        "assignments_late": 2,
        "num_submission_attempts": 3,
        "login_frequency": 9,
        "attendance_rate": 68.0,
        "lab_completion_rate": 55.0,
        "participation_score": 42.0,
        "failed_module": 1,
        "semester": "Spring2025"
    }"#;
    let many = format!("[{}]", vec![record; 10].join(","));

    let legacy = r#"{
        "Module_Difficulty": [3],
        "Current_GPA": [2.4],
        "Avg_Assessment_Score": [55.0],
        "Assignments_Late": [1],
        "Num_Submission_Attempts": [2],
        "Login_Frequency": [9]
    }"#;

    group.bench_function("record_json", |b| {
        b.iter(|| serde_json::from_str::<ModulePerformanceRecord>(black_box(record)))
    });

    group.bench_function("ten_records_json", |b| {
        b.iter(|| serde_json::from_str::<Vec<ModulePerformanceRecord>>(black_box(&many)))
    });

    group.bench_function("legacy_request_json", |b| {
        b.iter(|| serde_json::from_str::<LegacyPredictRequest>(black_box(legacy)))
    });

    group.finish();
}

criterion_group!(benches, bench_rulebook, bench_records);
criterion_main!(benches);
