//! Integration tests for concurrent requests against the same program.
//!
//! Every request runs on its own tokio task over a clone of the router, so
//! the store sees truly parallel calls from the blocking pool.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use bounty_server::router::build_router;
use bounty_server::state::AppState;

const RACERS: usize = 16;

async fn request_json(
    app: Router,
    method: Method,
    path: String,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(json!(null));
    (status, json)
}

fn payload(name: &str) -> Value {
    json!({
        "name": name,
        "startDate": "2024-06-01",
        "type": "mobile",
        "identifier": "com.example.app",
    })
}

async fn create_program(app: &Router, name: &str) -> String {
    let (status, body) =
        request_json(app.clone(), Method::POST, "/programs".into(), Some(payload(name))).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body:?}");
    body["program"]["id"].as_str().unwrap().to_string()
}

/// Fires `RACERS` DELETEs at one id and returns their status codes.
async fn race_deletes(app: &Router, id: &str) -> Vec<StatusCode> {
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let app = app.clone();
            let path = format!("/programs/{id}");
            tokio::spawn(async move { request_json(app, Method::DELETE, path, None).await })
        })
        .collect();

    let mut statuses = Vec::with_capacity(RACERS);
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        match status {
            StatusCode::OK => assert_eq!(body["message"], json!("Program deleted successfully")),
            StatusCode::NOT_FOUND => assert_eq!(body["error"], json!("Program not found")),
            other => panic!("unexpected status {other}: {body:?}"),
        }
        statuses.push(status);
    }
    statuses
}

fn assert_single_winner(statuses: &[StatusCode]) {
    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let not_found = statuses.iter().filter(|s| **s == StatusCode::NOT_FOUND).count();
    assert_eq!(ok, 1, "exactly one delete must win: {statuses:?}");
    assert_eq!(not_found, RACERS - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_have_one_winner_on_sqlite() {
    let dir = TempDir::new().unwrap();
    let app = build_router(AppState::new(dir.path().join("race.db")).unwrap());
    let id = create_program(&app, "Contested").await;

    let statuses = race_deletes(&app, &id).await;
    assert_single_winner(&statuses);

    let (status, _) = request_json(app, Method::GET, format!("/programs/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_have_one_winner_in_memory() {
    let app = build_router(AppState::in_memory());
    let id = create_program(&app, "Contested").await;

    let statuses = race_deletes(&app, &id).await;
    assert_single_winner(&statuses);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn deletes_of_different_programs_do_not_interfere() {
    let dir = TempDir::new().unwrap();
    let app = build_router(AppState::new(dir.path().join("many.db")).unwrap());

    let mut ids = Vec::new();
    for i in 0..8 {
        ids.push(create_program(&app, &format!("Program {i}")).await);
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|id| {
            let app = app.clone();
            let path = format!("/programs/{id}");
            tokio::spawn(async move { request_json(app, Method::DELETE, path, None).await })
        })
        .collect();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK, "{body:?}");
    }

    let (_, list) = request_json(app, Method::GET, "/programs".into(), None).await;
    assert_eq!(list["pagination"]["totalCount"], json!(0));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listing_while_creating_stays_consistent() {
    let dir = TempDir::new().unwrap();
    let app = build_router(AppState::new(dir.path().join("mixed.db")).unwrap());

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                request_json(
                    app,
                    Method::POST,
                    "/programs".into(),
                    Some(payload(&format!("Writer {i}"))),
                )
                .await
            })
        })
        .collect();
    let readers: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                request_json(app, Method::GET, "/programs?limit=100".into(), None).await
            })
        })
        .collect();

    for handle in writers {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
    for handle in readers {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert!(body["programs"].as_array().unwrap().len() <= 8);
    }

    let (_, list) = request_json(app, Method::GET, "/programs".into(), None).await;
    assert_eq!(list["pagination"]["totalCount"], json!(8));
}
