//! Output formatting for search results.
//!
//! Supports both a human-readable table and JSON for scripting.

use serde::Serialize;

use crate::coordinator::QuerySession;
use crate::outcome::QueryOutcome;
use crate::projector::{DisplayRow, Projector, Summary};

/// JSON output structure for one query
#[derive(Serialize)]
pub struct JsonOutput<'a> {
    pub query: &'a str,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub total_results: usize,
    pub elapsed_seconds: f64,
    pub results: Vec<DisplayRow>,
}

/// Formats the session's last outcome as JSON.
pub fn format_json(session: &QuerySession, projector: &Projector) -> String {
    let outcome = session.last_outcome();
    let output = JsonOutput {
        query: session.last_submitted().unwrap_or_default(),
        status: match outcome {
            Some(QueryOutcome::Success(_)) => "success",
            Some(QueryOutcome::Empty) => "empty",
            Some(QueryOutcome::Failed(_)) => "failed",
            None => "idle",
        },
        error: outcome.and_then(QueryOutcome::error).map(|e| e.to_string()),
        total_results: outcome.map(QueryOutcome::result_count).unwrap_or(0),
        elapsed_seconds: session.elapsed_seconds(),
        results: projector.rows(session),
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

/// Formats result rows and the summary line as a terminal table.
///
/// The link column goes last and is printed in full.
pub fn format_table(rows: &[DisplayRow], summary: &Summary) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{:>9} {:>9} {:>9} {:>9}  {}\n",
        "Content", "Location", "PageRank", "Score", "Link"
    ));

    for row in rows {
        output.push_str(&format!(
            "{:>9} {:>9} {:>9} {:>9}  {}\n",
            row.content_score, row.location_score, row.page_rank_score, row.total_score, row.link
        ));
    }

    output.push('\n');
    output.push_str(&summary.to_string());
    output
}

/// Formats whatever the session currently holds for a human reader.
///
/// Empty and failed outcomes get a one-line message instead of a table.
pub fn format_human(session: &QuerySession, projector: &Projector) -> String {
    let query = session.last_submitted().unwrap_or_default();
    match (session.last_outcome(), projector.summary(session)) {
        (Some(QueryOutcome::Success(_)), Some(summary)) => {
            format_table(&projector.rows(session), &summary)
        }
        (Some(QueryOutcome::Failed(err)), _) => format!("Search failed: {}", err),
        (Some(_), _) => format!("No results for \"{}\"", query),
        (None, _) => String::new(),
    }
}
