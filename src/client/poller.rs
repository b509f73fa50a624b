//! Bounded polling loop for queued search jobs.
//!
//! Attempts are strictly sequential: the next status request is not
//! issued until the previous response has been processed and the
//! configured interval has elapsed. A query token invalidated by a newer
//! submission stops the loop before its next request.

use std::time::Duration;

use tracing::{debug, warn};

use super::{JobId, JobStatus, QuoteClient};
use crate::error::{QueryError, QueryResult};
use crate::models::Quote;
use crate::session::QueryToken;

/// Default delay between status checks.
const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);
/// Default number of status checks before giving up.
const DEFAULT_MAX_ATTEMPTS: u32 = 45;

/// Polling parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// Status checks before the job is declared timed out.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Poll `job` until it completes, fails, or the attempt budget runs out.
///
/// Issues at most `config.max_attempts` status requests. Completion with
/// a payload resolves to the quotes; a backend error, an unknown job id,
/// and an exhausted budget are each terminal.
pub async fn wait_for_completion(
    client: &QuoteClient,
    job: &JobId,
    config: &PollConfig,
    token: &QueryToken,
) -> QueryResult<Vec<Quote>> {
    for attempt in 1..=config.max_attempts {
        if token.is_stale() {
            debug!("Job {}: superseded before attempt {}, stopping", job, attempt);
            return Err(QueryError::Superseded);
        }

        match client.job_status(job).await? {
            JobStatus::Complete(quotes) => {
                debug!(
                    "Job {}: complete after {} status checks ({} quotes)",
                    job,
                    attempt,
                    quotes.len()
                );
                return Ok(quotes);
            }
            JobStatus::Failed(message) => {
                warn!("Job {}: backend reported failure: {}", job, message);
                return Err(QueryError::Backend(message));
            }
            JobStatus::Pending => {
                debug!(
                    "Job {}: still pending (attempt {}/{})",
                    job, attempt, config.max_attempts
                );
                if attempt < config.max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }

    warn!(
        "Job {}: giving up after {} status checks",
        job, config.max_attempts
    );
    Err(QueryError::Timeout {
        job_id: job.to_string(),
        attempts: config.max_attempts,
    })
}
