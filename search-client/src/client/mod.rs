//! Query transport abstraction

use std::time::Duration;

use crate::outcome::QueryOutcome;

pub mod http;
pub mod mock;

pub use http::HttpSearchClient;
pub use mock::{MockResponse, MockTransport};

/// Sends one query to a ranking backend.
///
/// Implementations perform exactly one exchange per call, never retry, and
/// report every failure through [`QueryOutcome::Failed`] instead of an error.
#[async_trait::async_trait]
pub trait SearchTransport: Send + Sync {
    /// Run `query` verbatim, giving up once `deadline` has elapsed
    async fn search(&self, query: &str, deadline: Duration) -> QueryOutcome;

    /// Human-readable name of the backend, used in logs
    fn backend_name(&self) -> &str;
}
