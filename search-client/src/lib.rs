//! search-client: query coordinator for a remote ranked search service
//!
//! Sends free-text queries to a ranking backend over HTTP and turns the
//! answers into a bounded, ordered list of rows annotated with the backend's
//! scoring signals (content, location, PageRank and their total).
//!
//! # Features
//!
//! - Strict all-or-nothing validation of response payloads
//! - Per-request deadlines with uniform failure mapping
//! - Last-submitted-wins sequencing of concurrent queries
//! - Top-K projection with fixed display precision
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! url = "http://localhost:8080/search"
//! timeout_seconds = 10
//!
//! [display]
//! top_k = 5
//! link_base = "https://wikipedia.org/wiki/"
//!
//! [session]
//! resubmit = "always_query"
//! ```

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod outcome;
pub mod output;
pub mod projector;

pub use client::{HttpSearchClient, MockTransport, SearchTransport};
pub use crate::config::{ClientConfig, ResubmitPolicy};
pub use coordinator::{QueryCoordinator, QuerySession, SessionState, Submission};
pub use error::{ClientError, ErrorKind, QueryError, Result};
pub use model::SearchResult;
pub use outcome::QueryOutcome;
pub use projector::{DisplayRow, Projector, Summary, DEFAULT_TOP_K};
