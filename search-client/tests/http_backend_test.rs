use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use search_client::projector::{project, summarize, DEFAULT_TOP_K};
use search_client::{
    ErrorKind, HttpSearchClient, QueryCoordinator, QueryOutcome, SearchTransport, Submission,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Query terms the fake backend received: (URL parameter, JSON body field)
#[derive(Default)]
struct Received {
    terms: Mutex<Vec<(Option<String>, Option<String>)>>,
}

fn record(url: &str, content: f64, location: f64, page_rank: f64) -> Value {
    json!({
        "url": url,
        "contentScore": content,
        "locationScore": location,
        "pageRankScore": page_rank,
        "totalScore": content + location + page_rank,
    })
}

/// Fake ranking backend that picks its answer from the query term
async fn search_handler(
    State(received): State<Arc<Received>>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let word = body["word"].as_str().map(str::to_string);
    received
        .terms
        .lock()
        .unwrap()
        .push((params.get("word").cloned(), word.clone()));

    match word.as_deref().unwrap_or_default() {
        "java programming" => Json(json!([{
            "url": "Java_(programming_language)",
            "contentScore": 0.91,
            "locationScore": 0.4,
            "pageRankScore": 0.7,
            "totalScore": 2.01,
        }]))
        .into_response(),
        "nothing" => Json(Value::Null).into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "ranking failed").into_response(),
        "teapot" => StatusCode::IM_A_TEAPOT.into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(400)).await;
            Json(json!([record("Slow_page", 1.0, 1.0, 1.0)])).into_response()
        }
        "partial" => Json(json!([
            record("Good_page", 1.0, 0.5, 0.2),
            { "url": "Bad_page", "contentScore": 1.0, "locationScore": 0.5 },
        ]))
        .into_response(),
        "nan" => (
            [(header::CONTENT_TYPE, "application/json")],
            r#"[{"url":"X","contentScore":NaN,"locationScore":0,"pageRankScore":0,"totalScore":0}]"#,
        )
            .into_response(),
        "many" => {
            let records: Vec<Value> = (0..12)
                .map(|i| record(&format!("Page_{}", i), 1.0 - i as f64 * 0.05, 0.5, 0.1))
                .collect();
            Json(Value::Array(records)).into_response()
        }
        _ => Json(json!([])).into_response(),
    }
}

/// Start the fake backend on an ephemeral port
async fn spawn_backend() -> (String, Arc<Received>) {
    let received = Arc::new(Received::default());
    let app = Router::new()
        .route("/search", post(search_handler))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/search", addr), received)
}

fn coordinator(endpoint: &str) -> QueryCoordinator<HttpSearchClient> {
    let client = HttpSearchClient::new(endpoint).unwrap();
    QueryCoordinator::new(client, Duration::from_secs(5))
}

#[tokio::test]
async fn test_java_programming_scenario() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    let submission = coordinator.submit("java programming").await;
    assert!(matches!(submission, Submission::Applied { .. }));

    let session = coordinator.session().await;
    let rows = project(session.last_outcome().unwrap(), DEFAULT_TOP_K);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, "Java_(programming_language)");
    assert_eq!(rows[0].content_score, "0.91");
    assert_eq!(rows[0].location_score, "0.40");
    assert_eq!(rows[0].page_rank_score, "0.70");
    assert_eq!(rows[0].total_score, "2.01");
    assert_eq!(
        rows[0].link,
        "https://wikipedia.org/wiki/Java_(programming_language)"
    );

    let summary = summarize(&session).unwrap();
    assert_eq!(summary.total_results, 1);
    assert!(summary.elapsed_seconds >= 0.0);
}

#[tokio::test]
async fn test_query_text_forwarded_verbatim() {
    let (endpoint, received) = spawn_backend().await;
    let client = HttpSearchClient::new(endpoint).unwrap();

    client
        .search("  java  programming ", Duration::from_secs(5))
        .await;
    client.search("", Duration::from_secs(5)).await;

    let terms = received.terms.lock().unwrap().clone();
    assert_eq!(terms.len(), 2);
    assert_eq!(
        terms[0],
        (
            Some("  java  programming ".to_string()),
            Some("  java  programming ".to_string())
        )
    );
    assert_eq!(terms[1], (Some(String::new()), Some(String::new())));
}

#[tokio::test]
async fn test_empty_array_and_null_are_empty_outcomes() {
    let (endpoint, _) = spawn_backend().await;
    let client = HttpSearchClient::new(endpoint).unwrap();

    let outcome = client.search("unknown", Duration::from_secs(5)).await;
    assert_eq!(outcome, QueryOutcome::Empty);

    let outcome = client.search("nothing", Duration::from_secs(5)).await;
    assert_eq!(outcome, QueryOutcome::Empty);
    assert!(project(&outcome, DEFAULT_TOP_K).is_empty());
}

#[tokio::test]
async fn test_server_error_preserves_status() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    coordinator.submit("boom").await;
    let session = coordinator.session().await;
    let outcome = session.last_outcome().unwrap();
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Server(500)));
    assert!(project(outcome, DEFAULT_TOP_K).is_empty());

    coordinator.submit("teapot").await;
    let session = coordinator.session().await;
    assert_eq!(
        session.last_outcome().unwrap().error_kind(),
        Some(ErrorKind::Server(418))
    );
}

#[tokio::test]
async fn test_deadline_exceeded_is_timeout() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    let submission = coordinator
        .submit_with_deadline("slow", Duration::from_millis(50))
        .await;
    assert_eq!(
        submission.outcome().unwrap().error_kind(),
        Some(ErrorKind::Timeout)
    );
}

#[tokio::test]
async fn test_partially_invalid_batch_rejected_whole() {
    let (endpoint, _) = spawn_backend().await;
    let client = HttpSearchClient::new(endpoint).unwrap();

    for query in ["partial", "nan"] {
        let outcome = client.search(query, Duration::from_secs(5)).await;
        assert_eq!(outcome.error_kind(), Some(ErrorKind::MalformedResponse));
        assert!(project(&outcome, DEFAULT_TOP_K).is_empty());
    }
}

#[tokio::test]
async fn test_connection_refused_does_not_propagate() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let coordinator = coordinator(&format!("http://{}/search", addr));
    let submission = coordinator.submit("java programming").await;

    let outcome = submission.outcome().unwrap();
    assert_eq!(outcome.error_kind(), Some(ErrorKind::Transport));
    assert!(project(outcome, DEFAULT_TOP_K).is_empty());
}

#[tokio::test]
async fn test_truncation_keeps_total_count() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    coordinator.submit("many").await;
    let session = coordinator.session().await;
    let rows = project(session.last_outcome().unwrap(), DEFAULT_TOP_K);

    assert_eq!(rows.len(), 5);
    let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, ["Page_0", "Page_1", "Page_2", "Page_3", "Page_4"]);
    assert_eq!(summarize(&session).unwrap().total_results, 12);
}

#[tokio::test]
async fn test_slow_earlier_request_does_not_overwrite_later_one() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    let (slow, fast) = tokio::join!(coordinator.submit("slow"), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        coordinator.submit("java programming").await
    });

    assert!(slow.is_superseded());
    assert!(matches!(fast, Submission::Applied { .. }));

    let session = coordinator.session().await;
    assert_eq!(session.last_submitted(), Some("java programming"));
    assert_eq!(
        session.last_outcome().unwrap().results()[0].url(),
        "Java_(programming_language)"
    );
}

#[tokio::test]
async fn test_failure_then_success_rearms() {
    let (endpoint, _) = spawn_backend().await;
    let coordinator = coordinator(&endpoint);

    coordinator.submit("boom").await;
    coordinator.submit("java programming").await;

    let session = coordinator.session().await;
    assert_eq!(session.last_outcome().unwrap().result_count(), 1);
    assert_eq!(session.in_flight_token(), 2);
}
