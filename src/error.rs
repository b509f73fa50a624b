//! Error types for query submission and job polling.

use thiserror::Error;

/// Result alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while submitting a question or polling a job.
///
/// Every variant is terminal for the current query; the caller may always
/// submit a new question afterwards.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The question was empty after trimming. No request is sent.
    #[error("question cannot be empty")]
    EmptyQuestion,

    /// Transport failure, an undecodable body, or a non-2xx response.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Decodable JSON that is missing an expected field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The backend no longer knows the job id (HTTP 404 on the status poll).
    #[error("job {0} not found")]
    JobNotFound(String),

    /// Poll attempts were exhausted while the job was still pending.
    #[error("job {job_id} still pending after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },

    /// The backend explicitly reported an application error.
    #[error("{0}")]
    Backend(String),

    /// A newer submission superseded this query before it finished.
    #[error("query superseded by a newer submission")]
    Superseded,
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        QueryError::RequestFailed(err.to_string())
    }
}
