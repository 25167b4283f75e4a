//! HTTP search transport
//!
//! Posts the query term to the configured endpoint and validates the JSON
//! array it answers with.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::SearchTransport;
use crate::config::ClientConfig;
use crate::error::{QueryError, Result};
use crate::model::{parse_results, SearchResult};
use crate::outcome::QueryOutcome;

/// HTTP implementation of [`SearchTransport`]
pub struct HttpSearchClient {
    endpoint: String,
    client: reqwest::Client,
}

/// Search request body
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    word: &'a str,
}

impl HttpSearchClient {
    /// Create a client for `endpoint` with default settings
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("search-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.endpoint.user_agent.clone())
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.url.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// One request/response exchange, without the deadline
    async fn exchange(&self, query: &str) -> std::result::Result<Vec<SearchResult>, QueryError> {
        debug!("Sending query {:?} to {}", query, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("word", query)])
            .json(&SearchRequest { word: query })
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Server {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| QueryError::Transport(format!("Failed to read body: {}", e)))?;

        debug!("Received {} bytes from {}", body.len(), self.endpoint);

        parse_results(&body)
    }
}

#[async_trait::async_trait]
impl SearchTransport for HttpSearchClient {
    async fn search(&self, query: &str, deadline: Duration) -> QueryOutcome {
        let outcome = match tokio::time::timeout(deadline, self.exchange(query)).await {
            Ok(result) => QueryOutcome::from(result),
            Err(_) => QueryOutcome::Failed(QueryError::Timeout(deadline)),
        };

        match &outcome {
            QueryOutcome::Failed(err) => {
                warn!("Query {:?} against {} failed: {}", query, self.endpoint, err)
            }
            QueryOutcome::Empty => debug!("Query {:?} matched nothing", query),
            QueryOutcome::Success(results) => {
                debug!("Query {:?} returned {} results", query, results.len())
            }
        }

        outcome
    }

    fn backend_name(&self) -> &str {
        &self.endpoint
    }
}
