//! HTTP client for a remote student records API.
//!
//! Endpoints, relative to the base URL:
//!
//! - `GET /api/students/{id}/records` returns a JSON array of module records
//! - `GET /api/students/{id}/feedback` returns a JSON array of feedback

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::instrument;

use eduboost_core::model::{LecturerFeedback, ModulePerformanceRecord};
use eduboost_core::traits::{FeedbackProvider, RecordProvider};

use crate::error::{check_student_id, ProviderError};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Student records served over HTTP.
pub struct HttpStore {
    base_url: String,
    api_token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str, api_token: Option<String>) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, api_token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        api_token: Option<String>,
        timeout_secs: u64,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            timeout_secs,
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        student_id: &str,
        resource: &str,
    ) -> Result<T, ProviderError> {
        check_student_id(student_id)?;

        let url = format!("{}/api/students/{student_id}/{resource}", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout_secs)
            } else if e.is_connect() {
                ProviderError::NetworkError(format!("records API not reachable at {}", self.base_url))
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        match status {
            404 => return Err(ProviderError::StudentNotFound(student_id.to_string())),
            401 | 403 => {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::AuthenticationFailed(body));
            }
            s if s >= 400 => {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::ApiError {
                    status,
                    message: body,
                });
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(url, format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl RecordProvider for HttpStore {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_records(
        &self,
        student_id: &str,
    ) -> anyhow::Result<Vec<ModulePerformanceRecord>> {
        let records: Vec<ModulePerformanceRecord> = self.get_json(student_id, "records").await?;
        tracing::debug!(student_id, count = records.len(), "fetched records");
        Ok(records)
    }
}

#[async_trait]
impl FeedbackProvider for HttpStore {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_feedback(&self, student_id: &str) -> anyhow::Result<Vec<LecturerFeedback>> {
        Ok(self.get_json(student_id, "feedback").await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record_json() -> serde_json::Value {
        serde_json::json!([{
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
        }])
    }

    #[tokio::test]
    async fn fetches_records_with_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/STU001/records"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), Some("secret".into())).unwrap();
        let records = store.fetch_records("STU001").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].failed_module);
    }

    #[tokio::test]
    async fn not_found_maps_to_student_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/GHOST/records"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), None).unwrap();
        let err = store.fetch_records("GHOST").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::StudentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/STU001/feedback"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), Some("wrong".into())).unwrap();
        let err = store.fetch_feedback("STU001").await.unwrap_err();
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/STU001/records"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let store = HttpStore::new(&format!("{}/", server.uri()), None).unwrap();
        let err = store.fetch_records("STU001").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::ApiError { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/STU001/records"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), None).unwrap();
        let err = store.fetch_records("STU001").await.unwrap_err();
        assert!(err.to_string().contains("malformed data"));
    }

    #[tokio::test]
    async fn feedback_defaults_apply() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/students/STU001/feedback"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"module_name": "Web Development", "weak_areas": ["Flexbox"]}
            ])))
            .mount(&server)
            .await;

        let store = HttpStore::new(&server.uri(), None).unwrap();
        let feedback = store.fetch_feedback("STU001").await.unwrap();
        assert_eq!(feedback[0].improvement_timeline, "2 weeks");
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let store = HttpStore::with_timeout("http://127.0.0.1:1", None, 2).unwrap();
        let err = store.fetch_records("STU001").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::NetworkError(_)) | Some(ProviderError::Timeout(_))
        ));
    }
}
