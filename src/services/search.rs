//! Search pipeline: submit a question, follow the job if the backend
//! queued one, and hand the quotes to the session.

use tracing::info;

use crate::client::{poller, PollConfig, QuoteClient, SubmitOutcome};
use crate::error::{QueryError, QueryResult};
use crate::models::Quote;
use crate::session::{QueryToken, SearchSession};

/// Lifecycle events for one query, in order.
///
/// `Started` and `Finished` bracket every query that passes input
/// validation, and `Finished` fires exactly once regardless of outcome,
/// so a caller can tie a loading indicator to the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The question was accepted and the request is in flight.
    Started,
    /// The backend queued the question as an asynchronous job.
    Queued { job_id: String },
    /// The query reached a terminal state, successful or not.
    Finished,
}

/// Outcome of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Total quotes the backend returned.
    pub total: usize,
    /// False when a newer submission superseded this query and the
    /// session dropped its results.
    pub accepted: bool,
}

/// Drives the submit, poll, and session pipeline for one backend.
pub struct SearchService {
    client: QuoteClient,
    poll: PollConfig,
}

impl SearchService {
    pub fn new(client: QuoteClient, poll: PollConfig) -> Self {
        Self { client, poll }
    }

    pub fn client(&self) -> &QuoteClient {
        &self.client
    }

    /// Run one query to completion.
    ///
    /// An empty question fails before `Started` and issues no request.
    pub async fn search(
        &self,
        session: &mut SearchSession,
        question: &str,
        mut on_event: impl FnMut(SearchEvent),
    ) -> QueryResult<SearchOutcome> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QueryError::EmptyQuestion);
        }

        let token = session.begin_query();
        on_event(SearchEvent::Started);
        let result = self.run(question, &token, &mut on_event).await;
        on_event(SearchEvent::Finished);

        let quotes = result?;
        let total = quotes.len();
        let accepted = session.complete(&token, quotes);
        if accepted {
            info!("Query answered with {} quotes", total);
        } else {
            info!("Query superseded; dropping {} late quotes", total);
        }
        Ok(SearchOutcome { total, accepted })
    }

    async fn run(
        &self,
        question: &str,
        token: &QueryToken,
        on_event: &mut impl FnMut(SearchEvent),
    ) -> QueryResult<Vec<Quote>> {
        match self.client.submit(question).await? {
            SubmitOutcome::Immediate(quotes) => Ok(quotes),
            SubmitOutcome::Queued(job) => {
                on_event(SearchEvent::Queued {
                    job_id: job.to_string(),
                });
                poller::wait_for_completion(&self.client, &job, &self.poll, token).await
            }
        }
    }
}
