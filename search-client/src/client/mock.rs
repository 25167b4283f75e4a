//! Scripted transport for testing
//!
//! Answers each query from a table of canned responses, optionally after an
//! artificial delay, so ordering and deadline behavior can be reproduced
//! without a network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

use super::SearchTransport;
use crate::error::QueryError;
use crate::model::SearchResult;
use crate::outcome::QueryOutcome;

/// One canned answer
#[derive(Debug, Clone)]
pub struct MockResponse {
    result: Result<Vec<SearchResult>, QueryError>,
    delay: Duration,
}

impl MockResponse {
    pub fn results(results: Vec<SearchResult>) -> Self {
        Self {
            result: Ok(results),
            delay: Duration::ZERO,
        }
    }

    pub fn error(error: QueryError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Mock transport implementation for testing
pub struct MockTransport {
    responses: HashMap<String, MockResponse>,
    fallback: MockResponse,
    calls: AtomicUsize,
}

impl MockTransport {
    /// Every query matches nothing until responses are added
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fallback: MockResponse::results(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Answer `query` (matched verbatim) with `response`
    pub fn with_response(mut self, query: impl Into<String>, response: MockResponse) -> Self {
        self.responses.insert(query.into(), response);
        self
    }

    /// Answer any unscripted query with `response`
    pub fn with_fallback(mut self, response: MockResponse) -> Self {
        self.fallback = response;
        self
    }

    /// Number of searches performed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SearchTransport for MockTransport {
    async fn search(&self, query: &str, deadline: Duration) -> QueryOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let response = self.responses.get(query).unwrap_or(&self.fallback);
        debug!("MockTransport: answering {:?} after {:?}", query, response.delay);

        if response.delay > deadline {
            tokio::time::sleep(deadline).await;
            return QueryOutcome::Failed(QueryError::Timeout(deadline));
        }
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }

        QueryOutcome::from(response.result.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}
