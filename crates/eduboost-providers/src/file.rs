//! File-backed student store.
//!
//! Layout under the data directory:
//!
//! - `<student>.json`: a JSON array of module records
//! - `<student>.csv`: the same records, one row per module, headed by the
//!   record field names
//! - `<student>.feedback.json`: a JSON array of lecturer feedback (optional)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use eduboost_core::model::{LecturerFeedback, ModulePerformanceRecord};
use eduboost_core::traits::{FeedbackProvider, RecordProvider};

use crate::error::{check_student_id, ProviderError};

const FEEDBACK_SUFFIX: &str = ".feedback.json";

/// Reads student records and feedback from a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every student with a record file, sorted.
    pub fn list_students(&self) -> anyhow::Result<Vec<String>> {
        let mut students = BTreeSet::new();
        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            anyhow::anyhow!("failed to read data directory {}: {e}", self.dir.display())
        })?;

        for entry in entries {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.ends_with(FEEDBACK_SUFFIX) {
                continue;
            }
            if let Some(id) = name
                .strip_suffix(".json")
                .or_else(|| name.strip_suffix(".csv"))
            {
                students.insert(id.to_string());
            }
        }

        Ok(students.into_iter().collect())
    }

    /// Write a student's records as JSON.
    pub fn save_records(
        &self,
        student_id: &str,
        records: &[ModulePerformanceRecord],
    ) -> anyhow::Result<PathBuf> {
        check_student_id(student_id)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{student_id}.json"));
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
        Ok(path)
    }

    /// Append one feedback entry to `<student>.feedback.json`, returning the
    /// file and how many entries it now holds.
    pub fn save_feedback(&self, feedback: &LecturerFeedback) -> anyhow::Result<(PathBuf, usize)> {
        check_student_id(&feedback.student_id)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.feedback_path(&feedback.student_id);

        let mut entries: Vec<LecturerFeedback> = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ProviderError::malformed(path.display().to_string(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => anyhow::bail!("failed to read {}: {e}", path.display()),
        };
        entries.push(feedback.clone());

        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&path, json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
        tracing::debug!(student_id = %feedback.student_id, count = entries.len(), "saved feedback");
        Ok((path, entries.len()))
    }

    fn feedback_path(&self, student_id: &str) -> PathBuf {
        self.dir.join(format!("{student_id}{FEEDBACK_SUFFIX}"))
    }
}

/// Parse a CSV record file.
pub fn parse_records_csv(
    content: &str,
    source_name: &str,
) -> Result<Vec<ModulePerformanceRecord>, ProviderError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| ProviderError::malformed(source_name, format!("row {}: {e}", i + 1)))
        })
        .collect()
}

fn parse_records_json(
    content: &str,
    source_name: &str,
) -> Result<Vec<ModulePerformanceRecord>, ProviderError> {
    serde_json::from_str(content).map_err(|e| ProviderError::malformed(source_name, e))
}

async fn read_if_exists(path: &Path) -> anyhow::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(anyhow::anyhow!("failed to read {}: {e}", path.display())),
    }
}

#[async_trait]
impl RecordProvider for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn fetch_records(
        &self,
        student_id: &str,
    ) -> anyhow::Result<Vec<ModulePerformanceRecord>> {
        check_student_id(student_id)?;

        let json_path = self.dir.join(format!("{student_id}.json"));
        if let Some(content) = read_if_exists(&json_path).await? {
            let records = parse_records_json(&content, &json_path.display().to_string())?;
            tracing::debug!(student_id, count = records.len(), "loaded JSON records");
            return Ok(records);
        }

        let csv_path = self.dir.join(format!("{student_id}.csv"));
        if let Some(content) = read_if_exists(&csv_path).await? {
            let records = parse_records_csv(&content, &csv_path.display().to_string())?;
            tracing::debug!(student_id, count = records.len(), "loaded CSV records");
            return Ok(records);
        }

        Err(ProviderError::StudentNotFound(student_id.to_string()).into())
    }
}

#[async_trait]
impl FeedbackProvider for FileStore {
    async fn fetch_feedback(&self, student_id: &str) -> anyhow::Result<Vec<LecturerFeedback>> {
        check_student_id(student_id)?;

        let path = self.feedback_path(student_id);
        let Some(content) = read_if_exists(&path).await? else {
            return Ok(Vec::new());
        };

        let mut feedback: Vec<LecturerFeedback> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::malformed(path.display().to_string(), e))?;

        for entry in &mut feedback {
            if entry.student_id.is_empty() {
                entry.student_id = student_id.to_string();
            }
        }
        Ok(feedback)
    }
}
