//! HTTP client for the quote search backend.
//!
//! The backend exposes two endpoints: `POST /query` submits a question
//! and either answers synchronously or returns a job id, and
//! `GET /status/{job_id}` reports the state of a queued job.

pub mod poller;

pub use poller::{wait_for_completion, PollConfig};

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{QueryError, QueryResult};
use crate::models::{parse_query_result, Quote};

/// Opaque identifier for a queued search job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of submitting a question.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The backend computed the answer synchronously.
    Immediate(Vec<Quote>),
    /// The backend queued the question; poll the job for the result.
    Queued(JobId),
}

/// State of a queued job as reported by the status endpoint.
#[derive(Debug)]
pub enum JobStatus {
    /// Still in the backend's queue or being computed.
    Pending,
    /// Finished with a result payload.
    Complete(Vec<Quote>),
    /// Finished with a backend-reported error.
    Failed(String),
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    /// Index name some backend revisions expect; omitted unless configured.
    #[serde(rename = "selectedIndex", skip_serializing_if = "Option::is_none")]
    selected_index: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    response_text: Option<Value>,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    response_text: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the quote search backend.
#[derive(Clone)]
pub struct QuoteClient {
    client: Client,
    endpoint: String,
    search_index: Option<String>,
}

impl QuoteClient {
    /// Create a client for the backend at `endpoint`.
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            search_index: None,
        }
    }

    /// Send `selectedIndex` with queries (older backend revisions need it).
    pub fn with_search_index(mut self, index: &str) -> Self {
        self.search_index = Some(index.to_string());
        self
    }

    /// Get the configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit a question.
    ///
    /// Exactly one request is issued for a non-empty question; an empty
    /// question fails without touching the network.
    pub async fn submit(&self, question: &str) -> QueryResult<SubmitOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        let request = QueryRequest {
            question,
            selected_index: self.search_index.as_deref(),
        };

        debug!("Submitting question: {}", question);
        let url = format!("{}/query", self.endpoint);
        let resp = self.client.post(&url).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(decode_http_error(status, resp.text().await.ok()));
        }

        let body: QueryResponse = resp
            .json()
            .await
            .map_err(|e| QueryError::RequestFailed(format!("undecodable response: {e}")))?;

        if let Some(message) = body.error {
            return Err(QueryError::Backend(message));
        }
        if let Some(job_id) = body.job_id {
            info!("Question queued as job {}", job_id);
            return Ok(SubmitOutcome::Queued(JobId::new(job_id)));
        }
        match body.response_text {
            Some(payload) => Ok(SubmitOutcome::Immediate(parse_query_result(&payload)?)),
            None => Err(QueryError::MalformedResponse(
                "query response carries neither a result, a job id, nor an error".to_string(),
            )),
        }
    }

    /// Fetch the current status of a queued job.
    pub async fn job_status(&self, job: &JobId) -> QueryResult<JobStatus> {
        let url = format!("{}/status/{}", self.endpoint, job);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(QueryError::JobNotFound(job.to_string()));
        }
        if !status.is_success() {
            return Err(decode_http_error(status, resp.text().await.ok()));
        }

        let body: StatusResponse = resp
            .json()
            .await
            .map_err(|e| QueryError::RequestFailed(format!("undecodable status response: {e}")))?;

        match body.status.as_str() {
            "pending" => Ok(JobStatus::Pending),
            "complete" => match body.response_text {
                Some(payload) => Ok(JobStatus::Complete(parse_query_result(&payload)?)),
                None => Err(QueryError::MalformedResponse(format!(
                    "job {job} reported complete without a result payload"
                ))),
            },
            "error" => Ok(JobStatus::Failed(
                body.error.unwrap_or_else(|| "search job failed".to_string()),
            )),
            other => Err(QueryError::MalformedResponse(format!(
                "unknown job status {other:?}"
            ))),
        }
    }
}

/// Build a `RequestFailed` from a non-2xx response, preferring the
/// backend's decoded `error` field over a generic status message.
fn decode_http_error(status: StatusCode, body: Option<String>) -> QueryError {
    let message = body
        .as_deref()
        .and_then(|text| serde_json::from_str::<QueryResponse>(text).ok())
        .and_then(|decoded| decoded.error);

    match message {
        Some(message) => QueryError::RequestFailed(message),
        None => QueryError::RequestFailed(format!("backend returned HTTP {}", status.as_u16())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_http_error_prefers_backend_message() {
        let err = decode_http_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(r#"{"error": "index unavailable"}"#.to_string()),
        );
        assert!(matches!(err, QueryError::RequestFailed(m) if m == "index unavailable"));
    }

    #[test]
    fn test_decode_http_error_falls_back_to_status() {
        let err = decode_http_error(StatusCode::BAD_GATEWAY, Some("<html>".to_string()));
        assert!(matches!(err, QueryError::RequestFailed(m) if m.contains("502")));

        let err = decode_http_error(StatusCode::INTERNAL_SERVER_ERROR, None);
        assert!(matches!(err, QueryError::RequestFailed(m) if m.contains("500")));
    }

    #[test]
    fn test_job_id_display() {
        let job = JobId::new("abc-123");
        assert_eq!(job.to_string(), "abc-123");
        assert_eq!(job.as_str(), "abc-123");
    }

    #[test]
    fn test_query_request_omits_index_when_unset() {
        let body = serde_json::to_value(QueryRequest {
            question: "why",
            selected_index: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"question": "why"}));

        let body = serde_json::to_value(QueryRequest {
            question: "why",
            selected_index: Some("embed3"),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"question": "why", "selectedIndex": "embed3"})
        );
    }
}
