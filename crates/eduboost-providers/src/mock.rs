//! Mock store for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use eduboost_core::model::{LecturerFeedback, ModulePerformanceRecord};
use eduboost_core::traits::{FeedbackProvider, RecordProvider};

use crate::error::ProviderError;

/// An in-memory record and feedback store for exercising the advisor
/// service without files or a server.
#[derive(Default)]
pub struct MockStore {
    records: HashMap<String, Vec<ModulePerformanceRecord>>,
    feedback: HashMap<String, Vec<LecturerFeedback>>,
    /// Students whose fetches fail with a network error.
    unavailable: Vec<String>,
    call_count: AtomicU32,
    last_student: Mutex<Option<String>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut self, student_id: &str, records: Vec<ModulePerformanceRecord>) -> Self {
        self.records.insert(student_id.to_string(), records);
        self
    }

    pub fn with_feedback(mut self, student_id: &str, feedback: Vec<LecturerFeedback>) -> Self {
        self.feedback.insert(student_id.to_string(), feedback);
        self
    }

    /// Make every fetch for `student_id` fail.
    pub fn with_unavailable(mut self, student_id: &str) -> Self {
        self.unavailable.push(student_id.to_string());
        self
    }

    /// Number of record fetches made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The student of the most recent record fetch.
    pub fn last_student(&self) -> Option<String> {
        self.last_student.lock().unwrap().clone()
    }

    fn check_available(&self, student_id: &str) -> Result<(), ProviderError> {
        if self.unavailable.iter().any(|s| s == student_id) {
            return Err(ProviderError::NetworkError(format!(
                "mock outage for {student_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordProvider for MockStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_records(
        &self,
        student_id: &str,
    ) -> anyhow::Result<Vec<ModulePerformanceRecord>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_student.lock().unwrap() = Some(student_id.to_string());
        self.check_available(student_id)?;

        self.records
            .get(student_id)
            .cloned()
            .ok_or_else(|| ProviderError::StudentNotFound(student_id.to_string()).into())
    }
}

#[async_trait]
impl FeedbackProvider for MockStore {
    async fn fetch_feedback(&self, student_id: &str) -> anyhow::Result<Vec<LecturerFeedback>> {
        self.check_available(student_id)?;
        Ok(self.feedback.get(student_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(module: &str) -> ModulePerformanceRecord {
        ModulePerformanceRecord {
            module_name: module.into(),
            module_difficulty: 3.0,
            current_gpa: 3.0,
            avg_assessment_score: 70.0,
            assignments_late: 0,
            num_submission_attempts: 1,
            login_frequency: 20,
            attendance_rate: 90.0,
            lab_completion_rate: 85.0,
            participation_score: 70.0,
            failed_module: false,
            semester: "Spring2025".into(),
        }
    }

    #[tokio::test]
    async fn returns_configured_records() {
        let store = MockStore::new().with_records("STU001", vec![record("Web Development")]);
        let records = store.fetch_records("STU001").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(store.call_count(), 1);
        assert_eq!(store.last_student().as_deref(), Some("STU001"));
        assert!(store.fetch_feedback("STU001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_and_unavailable_students_fail() {
        let store = MockStore::new()
            .with_records("STU001", vec![record("Web Development")])
            .with_unavailable("STU001");
        assert!(store.fetch_records("STU001").await.is_err());
        assert!(store.fetch_feedback("STU001").await.is_err());

        let err = store.fetch_records("STU404").await.unwrap_err();
        assert!(err.to_string().contains("student not found"));
        assert_eq!(store.call_count(), 2);
    }
}
