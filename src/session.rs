//! Search session state.
//!
//! Owns the current result list, the number of quotes currently shown,
//! and the query generation counter. Each new submission bumps the
//! generation; results and poll loops carrying an older generation are
//! discarded, so at most one query is ever live per session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::Quote;

/// Number of quotes shown before "load more".
pub const INITIAL_VISIBLE: usize = 5;

/// Ties a query and its poll loop to the session generation it was
/// started under.
#[derive(Debug, Clone)]
pub struct QueryToken {
    current: Arc<AtomicU64>,
    generation: u64,
}

impl QueryToken {
    /// Whether a newer query has been started since this token was issued.
    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::SeqCst) != self.generation
    }

    /// Generation this token was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result state for one search surface.
#[derive(Debug, Default)]
pub struct SearchSession {
    quotes: Vec<Quote>,
    visible: usize,
    current: Arc<AtomicU64>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new query: clears held results and invalidates tokens from
    /// earlier submissions.
    pub fn begin_query(&mut self) -> QueryToken {
        self.quotes.clear();
        self.visible = 0;
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        QueryToken {
            current: Arc::clone(&self.current),
            generation,
        }
    }

    /// Install results for the query identified by `token`.
    ///
    /// Results from a superseded query are dropped. Returns whether the
    /// session accepted them.
    pub fn complete(&mut self, token: &QueryToken, quotes: Vec<Quote>) -> bool {
        if token.is_stale() {
            return false;
        }
        self.visible = quotes.len().min(INITIAL_VISIBLE);
        self.quotes = quotes;
        true
    }

    /// The quotes currently shown.
    pub fn visible_quotes(&self) -> &[Quote] {
        &self.quotes[..self.visible]
    }

    /// All quotes held for the current query.
    pub fn all_quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Reveal the remaining quotes.
    pub fn show_all(&mut self) {
        self.visible = self.quotes.len();
    }

    /// Whether more quotes exist than are currently shown.
    pub fn has_more(&self) -> bool {
        self.quotes.len() > self.visible
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}
