//! Ranked result records and response validation
//!
//! A response is accepted whole or not at all: one bad record rejects the
//! entire batch with [`QueryError::MalformedResponse`].

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// One ranked document reference as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    url: String,
    content_score: f64,
    location_score: f64,
    page_rank_score: f64,
    total_score: f64,
}

/// Wire shape of a record before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    url: String,
    content_score: f64,
    location_score: f64,
    page_rank_score: f64,
    total_score: f64,
}

impl SearchResult {
    /// Build a validated result
    pub fn try_new(
        url: impl Into<String>,
        content_score: f64,
        location_score: f64,
        page_rank_score: f64,
        total_score: f64,
    ) -> Result<Self, QueryError> {
        let url = url.into();
        if url.is_empty() {
            return Err(QueryError::MalformedResponse("empty url".to_string()));
        }

        let scores = [
            ("contentScore", content_score),
            ("locationScore", location_score),
            ("pageRankScore", page_rank_score),
            ("totalScore", total_score),
        ];
        for (name, value) in scores {
            if !value.is_finite() {
                return Err(QueryError::MalformedResponse(format!(
                    "non-finite {} for '{}'",
                    name, url
                )));
            }
        }

        Ok(Self {
            url,
            content_score,
            location_score,
            page_rank_score,
            total_score,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn content_score(&self) -> f64 {
        self.content_score
    }

    pub fn location_score(&self) -> f64 {
        self.location_score
    }

    pub fn page_rank_score(&self) -> f64 {
        self.page_rank_score
    }

    /// Combined score exactly as the backend computed it
    pub fn total_score(&self) -> f64 {
        self.total_score
    }
}

impl TryFrom<RawRecord> for SearchResult {
    type Error = QueryError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        SearchResult::try_new(
            raw.url,
            raw.content_score,
            raw.location_score,
            raw.page_rank_score,
            raw.total_score,
        )
    }
}

/// Validate a raw response body into an ordered result list.
///
/// An empty array and a JSON `null` both yield an empty list. Order is kept
/// exactly as received.
pub fn parse_results(body: &[u8]) -> Result<Vec<SearchResult>, QueryError> {
    let records: Option<Vec<RawRecord>> = serde_json::from_slice(body)
        .map_err(|e| QueryError::MalformedResponse(e.to_string()))?;

    records
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            SearchResult::try_from(raw).map_err(|e| match e {
                QueryError::MalformedResponse(detail) => {
                    QueryError::MalformedResponse(format!("record {}: {}", index, detail))
                }
                other => other,
            })
        })
        .collect()
}
