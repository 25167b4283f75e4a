//! Query coordinator
//!
//! Owns the query session and sequences submissions so that the stored
//! outcome always belongs to the most recently *submitted* query. Each
//! submission takes a new generation token; a completion whose token is no
//! longer current is dropped without touching the session.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::SearchTransport;
use crate::config::{ClientConfig, ResubmitPolicy};
use crate::error::QueryError;
use crate::outcome::QueryOutcome;

/// Whether the authoritative submission is still running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Submitting,
}

/// State of "the current search"
#[derive(Debug, Clone, Default)]
pub struct QuerySession {
    query_text: String,
    last_submitted: Option<String>,
    last_outcome: Option<QueryOutcome>,
    elapsed: Option<Duration>,
    in_flight_token: u64,
    state: SessionState,
}

impl QuerySession {
    /// Current input buffer
    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    /// Text of the authoritative submission, if any
    pub fn last_submitted(&self) -> Option<&str> {
        self.last_submitted.as_deref()
    }

    /// Outcome of the last non-stale submission (`None` before the first)
    pub fn last_outcome(&self) -> Option<&QueryOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    /// Duration of the last recorded request, 0.0 before the first
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }

    pub fn in_flight_token(&self) -> u64 {
        self.in_flight_token
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

/// How a call to [`QueryCoordinator::submit`] ended
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The outcome was recorded in the session
    Applied {
        outcome: QueryOutcome,
        elapsed: Duration,
    },
    /// A newer submission was issued first; the response was discarded
    Superseded,
    /// Identical resubmission answered from the session without a round trip
    Reused { outcome: QueryOutcome },
}

impl Submission {
    pub fn outcome(&self) -> Option<&QueryOutcome> {
        match self {
            Submission::Applied { outcome, .. } | Submission::Reused { outcome } => Some(outcome),
            Submission::Superseded => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, Submission::Superseded)
    }
}

/// Sequences query submissions against one session.
///
/// Cloning is cheap and every clone drives the same session, so concurrent
/// submissions can run on separate tasks.
pub struct QueryCoordinator<T: SearchTransport> {
    transport: Arc<T>,
    session: Arc<Mutex<QuerySession>>,
    deadline: Duration,
    policy: ResubmitPolicy,
}

impl<T: SearchTransport> Clone for QueryCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
            deadline: self.deadline,
            policy: self.policy,
        }
    }
}

impl<T: SearchTransport> QueryCoordinator<T> {
    /// Create a coordinator with an empty session
    pub fn new(transport: T, deadline: Duration) -> Self {
        Self {
            transport: Arc::new(transport),
            session: Arc::new(Mutex::new(QuerySession::default())),
            deadline,
            policy: ResubmitPolicy::default(),
        }
    }

    /// Create a coordinator using the configured deadline and resubmit policy
    pub fn from_config(transport: T, config: &ClientConfig) -> Self {
        Self::new(transport, config.timeout()).with_policy(config.session.resubmit)
    }

    pub fn with_policy(mut self, policy: ResubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Snapshot of the session
    pub async fn session(&self) -> QuerySession {
        self.session.lock().await.clone()
    }

    /// Replace the input buffer without submitting
    pub async fn set_query_text(&self, text: impl Into<String>) {
        self.session.lock().await.query_text = text.into();
    }

    fn reusable_outcome(&self, session: &QuerySession, text: &str) -> Option<QueryOutcome> {
        if self.policy != ResubmitPolicy::ReuseLastOutcome
            || session.state != SessionState::Idle
            || session.last_submitted.as_deref() != Some(text)
        {
            return None;
        }

        // Failures are always retried
        session
            .last_outcome
            .as_ref()
            .filter(|outcome| !outcome.is_failed())
            .cloned()
    }
}

impl<T: SearchTransport + 'static> QueryCoordinator<T> {
    /// Submit whatever is in the input buffer
    pub async fn submit_current(&self) -> Submission {
        let text = self.session.lock().await.query_text.clone();
        self.submit(text).await
    }

    /// Submit `text` with the default deadline
    pub async fn submit(&self, text: impl Into<String>) -> Submission {
        self.submit_with_deadline(text, self.deadline).await
    }

    /// Submit `text`, giving the request at most `deadline` to answer.
    ///
    /// The request runs on its own task, so dropping the returned future
    /// does not cancel it: the response is still recorded (or discarded as
    /// stale) and the session returns to [`SessionState::Idle`].
    pub async fn submit_with_deadline(
        &self,
        text: impl Into<String>,
        deadline: Duration,
    ) -> Submission {
        let text = text.into();

        let (token, started) = {
            let mut session = self.session.lock().await;
            session.query_text = text.clone();

            if let Some(outcome) = self.reusable_outcome(&session, &text) {
                debug!("Reusing stored outcome for {:?}", text);
                return Submission::Reused { outcome };
            }

            session.in_flight_token += 1;
            session.last_submitted = Some(text.clone());
            session.state = SessionState::Submitting;
            (session.in_flight_token, Instant::now())
        };

        debug!(
            "Submitting {:?} to {} (token {})",
            text,
            self.transport.backend_name(),
            token
        );

        let transport = Arc::clone(&self.transport);
        let session = Arc::clone(&self.session);
        let query = text.clone();
        let task = tokio::spawn(async move {
            let outcome = transport.search(&query, deadline).await;
            complete(&session, token, started, &query, outcome).await
        });

        match task.await {
            Ok(submission) => submission,
            Err(err) => {
                warn!("Search task for {:?} (token {}) failed: {}", text, token, err);
                let outcome = QueryOutcome::Failed(QueryError::Transport(format!(
                    "search task failed: {}",
                    err
                )));
                complete(&self.session, token, started, &text, outcome).await
            }
        }
    }
}

/// Store `outcome` if `token` is still current, otherwise drop it
async fn complete(
    session: &Mutex<QuerySession>,
    token: u64,
    started: Instant,
    text: &str,
    outcome: QueryOutcome,
) -> Submission {
    let outcome = match outcome {
        QueryOutcome::Success(results) => QueryOutcome::from_results(results),
        other => other,
    };

    // Token compare and store happen under one lock acquisition
    let mut session = session.lock().await;
    if session.in_flight_token != token {
        debug!(
            "Discarding stale response for {:?} (token {}, current {})",
            text, token, session.in_flight_token
        );
        return Submission::Superseded;
    }

    let elapsed = started.elapsed();
    session.last_outcome = Some(outcome.clone());
    session.elapsed = Some(elapsed);
    session.state = SessionState::Idle;

    info!(
        "Query {:?}: {} results in {:.3}s{}",
        text,
        outcome.result_count(),
        elapsed.as_secs_f64(),
        if outcome.is_failed() { " (failed)" } else { "" }
    );

    Submission::Applied { outcome, elapsed }
}
