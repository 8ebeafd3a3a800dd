//! The `eduboost init` command.

use std::path::Path;

use anyhow::Result;

use eduboost_core::rulebook::BUILTIN_RULES;

fn write_once(path: &str, content: &str) -> Result<()> {
    let path = Path::new(path);
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

pub fn execute() -> Result<()> {
    write_once("eduboost.toml", SAMPLE_CONFIG)?;
    write_once("rules.toml", BUILTIN_RULES)?;
    write_once("data/STU001.json", SAMPLE_RECORDS_JSON)?;
    write_once("data/STU001.feedback.json", SAMPLE_FEEDBACK)?;
    write_once("data/STU002.csv", SAMPLE_RECORDS_CSV)?;

    println!("\nNext steps:");
    println!("  1. Run: eduboost validate --rules rules.toml --records data/STU001.json");
    println!("  2. Run: eduboost analyze --student STU001");
    println!("  3. Run: eduboost cohort --format markdown");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# eduboost configuration

# Student record files: <id>.json or <id>.csv, plus optional <id>.feedback.json
data_dir = "./data"

# Goal templates and suggestions (built-in rule book when unset)
rules = "rules.toml"

# Resource catalog TOML with [[resources]] entries (built-in catalog when unset)
# catalog = "catalog.toml"

# Read students from a records API instead of data_dir
# [api]
# base_url = "https://records.example.edu"
# api_token = "${EDUBOOST_API_TOKEN}"

parallelism = 4
output_dir = "./eduboost-reports"
"#;

const SAMPLE_RECORDS_JSON: &str = r#"[
  {
    "module_name": "Database Management",
    "module_difficulty": 4.0,
    "current_gpa": 1.8,
    "avg_assessment_score": 35.0,
    "assignments_late": 4,
    "num_submission_attempts": 3,
    "login_frequency": 3,
    "attendance_rate": 50.0,
    "lab_completion_rate": 40.0,
    "participation_score": 30.0,
    "failed_module": true,
    "semester": "Spring2025"
  },
  {
    "module_name": "Operating System",
    "module_difficulty": 3.0,
    "current_gpa": 2.3,
    "avg_assessment_score": 45.0,
    "assignments_late": 1,
    "num_submission_attempts": 2,
    "login_frequency": 15,
    "attendance_rate": 70.0,
    "lab_completion_rate": 65.0,
    "participation_score": 55.0,
    "failed_module": false,
    "semester": "Spring2025"
  },
  {
    "module_name": "Web Development",
    "module_difficulty": 2.0,
    "current_gpa": 3.4,
    "avg_assessment_score": 78.0,
    "assignments_late": 0,
    "num_submission_attempts": 1,
    "login_frequency": 20,
    "attendance_rate": 92.0,
    "lab_completion_rate": 88.0,
    "participation_score": 75.0,
    "failed_module": false,
    "semester": "Spring2025"
  }
]
"#;

const SAMPLE_FEEDBACK: &str = r#"[
  {
    "module_name": "Database Management",
    "lecturer_id": "LEC01",
    "feedback_text": "Struggling with joins and normalization.",
    "weak_areas": ["SQL Joins", "Normalization"],
    "recommended_actions": ["Complete the SQLBolt join lessons"],
    "urgency_level": 4,
    "improvement_timeline": "2 weeks"
  }
]
"#;

const SAMPLE_RECORDS_CSV: &str = "\
module_name,module_difficulty,current_gpa,avg_assessment_score,assignments_late,num_submission_attempts,login_frequency,attendance_rate,lab_completion_rate,participation_score,failed_module,semester
Programming Fundamentals,2.0,3.6,82,0,1,22,95,90,80,0,Spring2025
Computer Networks,3.0,3.2,74,0,1,18,88,85,70,0,Spring2025
";
