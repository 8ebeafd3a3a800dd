//! Collaborator traits the advisor depends on.
//!
//! Record and feedback stores are async because the real implementations
//! read files or call an HTTP API; the catalog is a synchronous read-only
//! lookup. Implementations live in `eduboost-providers`.

use async_trait::async_trait;

use crate::model::{LearningResource, LecturerFeedback, ModulePerformanceRecord};

/// Source of per-module performance records.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Human-readable provider name (e.g. "file").
    fn name(&self) -> &str;

    /// All module records for a student.
    async fn fetch_records(&self, student_id: &str) -> anyhow::Result<Vec<ModulePerformanceRecord>>;
}

/// Source of lecturer feedback.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// All feedback left for a student. No feedback is an empty list.
    async fn fetch_feedback(&self, student_id: &str) -> anyhow::Result<Vec<LecturerFeedback>>;
}

/// Read-only learning resource catalog.
pub trait ResourceCatalog: Send + Sync {
    /// Resources for a module, in catalog order. Unknown modules yield an
    /// empty list.
    fn resources_for_module(&self, module: &str) -> anyhow::Result<Vec<LearningResource>>;
}
