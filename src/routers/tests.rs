use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::app;
use crate::db::Database;
use crate::models::Song;

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn count(app: &Router) -> i64 {
    let (_, body) = send(app, "GET", "/count", None).await;
    body["count"].as_i64().unwrap()
}

async fn seeded(songs: Value) -> Router {
    let database = Database::memory();
    let songs = songs
        .as_array()
        .unwrap()
        .iter()
        .cloned()
        .map(|v| Song::from_value(v).unwrap())
        .collect();
    database.replace_all(songs).await.unwrap();
    app(database)
}

#[tokio::test]
async fn health_is_always_ok() {
    let app = app(Database::memory());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": 200}));
}

#[tokio::test]
async fn count_of_empty_collection_is_zero() {
    let app = app(Database::memory());
    let (status, body) = send(&app, "GET", "/count", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 0, "status": 200}));
}

#[tokio::test]
async fn list_returns_every_song() {
    let app = seeded(json!([{"id": 2, "title": "B"}, {"id": 1, "title": "A"}])).await;
    let (status, body) = send(&app, "GET", "/song", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"songs": [{"id": 2, "title": "B"}, {"id": 1, "title": "A"}], "status": 200})
    );
    assert_eq!(count(&app).await, 2);
}

#[tokio::test]
async fn crud_round_trip() {
    let app = app(Database::memory());

    let (status, body) = send(&app, "POST", "/song", Some(json!({"id": 1, "title": "A"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"message": "Song created successfully", "song": {"id": 1, "title": "A"}})
    );

    let (status, body) = send(&app, "GET", "/song/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"song": {"id": 1, "title": "A"}, "status": 200}));

    let (status, body) = send(&app, "PUT", "/song/1", Some(json!({"title": "B"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"updated_song": {"id": 1, "title": "B"}, "status": 200}));

    let (status, body) = send(&app, "DELETE", "/song/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "GET", "/song/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Song with the given ID not found"}));
}

#[tokio::test]
async fn duplicate_create_is_a_conflict() {
    let app = app(Database::memory());
    let original = json!({"id": 42, "title": "first"});

    let (status, _) = send(&app, "POST", "/song", Some(original.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/song", Some(json!({"id": 42, "title": "second"}))).await;
    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(body, json!({"message": "Song with id 42 already exists"}));

    assert_eq!(count(&app).await, 1);
    let (_, body) = send(&app, "GET", "/song/42", None).await;
    assert_eq!(body["song"], original);
}

#[tokio::test]
async fn create_without_integer_id_fails() {
    let app = app(Database::memory());

    let (status, body) = send(&app, "POST", "/song", Some(json!({"title": "no id"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("id"));

    let (status, _) = send(&app, "POST", "/song", Some(json!(["not", "an", "object"]))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn update_merges_only_given_fields() {
    let app = seeded(json!([{"id": 7, "title": "A", "lyrics": "la la"}])).await;

    let (status, body) = send(
        &app,
        "PUT",
        "/song/7",
        Some(json!({"title": "B", "id": 8, "year": 2001})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["updated_song"],
        json!({"id": 7, "title": "B", "lyrics": "la la", "year": 2001})
    );

    let (status, _) = send(&app, "GET", "/song/8", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_missing_song_is_not_found() {
    let app = app(Database::memory());
    let (status, body) = send(&app, "PUT", "/song/3", Some(json!({"title": "B"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Song with the given ID not found"}));
    assert_eq!(count(&app).await, 0);
}

#[tokio::test]
async fn delete_missing_song_leaves_count() {
    let app = seeded(json!([{"id": 1}])).await;
    let (status, body) = send(&app, "DELETE", "/song/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "song not found"}));
    assert_eq!(count(&app).await, 1);
}

#[tokio::test]
async fn non_integer_id_is_not_found() {
    let app = seeded(json!([{"id": 1}])).await;
    for (method, body) in [("GET", None), ("PUT", Some(json!({"a": 1}))), ("DELETE", None)] {
        let (status, _) = send(&app, method, "/song/abc", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    assert_eq!(count(&app).await, 1);
}

#[tokio::test]
async fn negative_ids_are_addressable() {
    let app = app(Database::memory());
    let (status, _) = send(&app, "POST", "/song", Some(json!({"id": -5}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send(&app, "GET", "/song/-5", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unreadable_bodies_are_generic_failures() {
    let app = seeded(json!([{"id": 1, "title": "A"}])).await;
    let json = Some("application/json");

    let cases = [
        ("POST", "/song", json, "{not json"),
        ("POST", "/song", None, r#"{"id": 2}"#),
        ("POST", "/song", Some("text/plain"), r#"{"id": 2}"#),
        ("PUT", "/song/1", json, "{not json"),
        ("PUT", "/song/1", json, ""),
        ("PUT", "/song/1", None, r#"{"title": "B"}"#),
    ];
    for (method, uri, content_type, body) in cases {
        let (status, body) = send_raw(&app, method, uri, content_type, body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{} {}", method, uri);
        assert!(body["error"].is_string(), "{} {}: {}", method, uri, body);
    }

    assert_eq!(count(&app).await, 1);
    let (_, body) = send(&app, "GET", "/song/1", None).await;
    assert_eq!(body["song"], json!({"id": 1, "title": "A"}));
}

#[tokio::test]
async fn plus_signed_id_is_not_found() {
    let app = seeded(json!([{"id": 5}])).await;
    let (status, body) = send(&app, "GET", "/song/+5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"message": "Song with the given ID not found"}));

    let (status, _) = send(&app, "DELETE", "/song/+5", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(count(&app).await, 1);
}
