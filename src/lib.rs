//! Conference talk quote search client.
//!
//! Submits free-text questions to a quote search backend, follows
//! asynchronous jobs to completion, and hands the returned quote records
//! to a display or export layer. The backend may answer a query
//! synchronously or queue it as a job to be polled via a status endpoint.

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod session;

pub use client::{JobId, PollConfig, QuoteClient, SubmitOutcome};
pub use error::{QueryError, QueryResult};
pub use models::Quote;
pub use services::{SearchEvent, SearchOutcome, SearchService};
pub use session::{QueryToken, SearchSession};
