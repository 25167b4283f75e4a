//! Presentation projector
//!
//! Pure mapping from a stored outcome to the rows a view should render.
//! Scores are formatted to two decimals for display only; the stored values
//! are never touched.

use serde::Serialize;
use std::fmt;

use crate::config::ClientConfig;
use crate::coordinator::QuerySession;
use crate::model::SearchResult;
use crate::outcome::QueryOutcome;

/// Rows shown when no truncation policy is configured
pub const DEFAULT_TOP_K: usize = 5;

/// Prefix used to turn a result url into a link
pub const DEFAULT_LINK_BASE: &str = "https://wikipedia.org/wiki/";

/// One renderable result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub url: String,
    pub link: String,
    pub content_score: String,
    pub location_score: String,
    pub page_rank_score: String,
    pub total_score: String,
}

impl DisplayRow {
    fn from_result(result: &SearchResult, link_base: &str) -> Self {
        Self {
            url: result.url().to_string(),
            link: format!("{}{}", link_base, result.url()),
            content_score: format_score(result.content_score()),
            location_score: format_score(result.location_score()),
            page_rank_score: format_score(result.page_rank_score()),
            total_score: format_score(result.total_score()),
        }
    }
}

/// Count and timing line shown under the rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Results received, before truncation
    pub total_results: usize,
    pub elapsed_seconds: f64,
}

impl Summary {
    /// Elapsed time with millisecond precision
    pub fn elapsed_display(&self) -> String {
        format!("{:.3}", self.elapsed_seconds)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} results in {}s",
            self.total_results,
            self.elapsed_display()
        )
    }
}

pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// First `top_k` results of a successful outcome, in received order.
///
/// `Empty` and `Failed` outcomes project to no rows; choosing the message
/// for those is left to the caller.
pub fn project(outcome: &QueryOutcome, top_k: usize) -> Vec<DisplayRow> {
    project_with_link_base(outcome, top_k, DEFAULT_LINK_BASE)
}

pub fn project_with_link_base(
    outcome: &QueryOutcome,
    top_k: usize,
    link_base: &str,
) -> Vec<DisplayRow> {
    outcome
        .results()
        .iter()
        .take(top_k)
        .map(|result| DisplayRow::from_result(result, link_base))
        .collect()
}

/// Summary of the session's last outcome, `None` before the first query
pub fn summarize(session: &QuerySession) -> Option<Summary> {
    session.last_outcome().map(|outcome| Summary {
        total_results: outcome.result_count(),
        elapsed_seconds: session.elapsed_seconds(),
    })
}

/// Truncation and link policy bundled for a view
#[derive(Debug, Clone)]
pub struct Projector {
    top_k: usize,
    link_base: String,
}

impl Projector {
    pub fn new(top_k: usize, link_base: impl Into<String>) -> Self {
        Self {
            top_k,
            link_base: link_base.into(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.display.top_k, config.display.link_base.clone())
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn project(&self, outcome: &QueryOutcome) -> Vec<DisplayRow> {
        project_with_link_base(outcome, self.top_k, &self.link_base)
    }

    /// Rows for the session's last outcome (none before the first query)
    pub fn rows(&self, session: &QuerySession) -> Vec<DisplayRow> {
        session
            .last_outcome()
            .map(|outcome| self.project(outcome))
            .unwrap_or_default()
    }

    pub fn summary(&self, session: &QuerySession) -> Option<Summary> {
        summarize(session)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_K, DEFAULT_LINK_BASE)
    }
}
