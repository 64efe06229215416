use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use chrono::{Local, NaiveDate};
use http_body_util::BodyExt;
use lovenest_store::{JsonFileStore, PhotoCatalog, stats};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{AppStateInner, router};

const BOUNDARY: &str = "lovenest-test-boundary";

struct TestApp {
    app: Router,
    dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let messages = JsonFileStore::open(dir.path().join("messages.json")).unwrap();
        let photos = PhotoCatalog::new(dir.path().join("uploads")).await.unwrap();
        let state = Arc::new(AppStateInner {
            messages: Box::new(messages),
            photos,
            start_date: start_date(),
        });
        Self {
            app: router(state),
            dir,
        }
    }

    fn uploads(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    fn messages_file(&self) -> PathBuf {
        self.dir.path().join("messages.json")
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }
}

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn upload_request(field: &str, filename: Option<&str>, data: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/upload-photo")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn messages_come_back_in_order_with_positional_ids() {
    let app = TestApp::new().await;

    let sent = [
        json!({"text": "good morning", "type": "love"}),
        json!({"text": "miss you", "type": "note"}),
        json!({"text": "\u{2764} always"}),
    ];
    let mut created = Vec::new();
    for body in &sent {
        let (status, msg) = app.post_json("/api/messages", &body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        created.push(msg);
    }

    let (status, listed) = app.get("/api/messages").await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 3);

    for (pos, msg) in listed.iter().enumerate() {
        assert_eq!(msg["id"], pos as u64 + 1);
        assert_eq!(msg, &created[pos]);
        assert_eq!(msg["text"], sent[pos]["text"]);
    }
    assert_eq!(listed[0]["type"], "love");
    assert_eq!(listed[1]["type"], "note");
    assert_eq!(listed[2]["type"], "love");
}

#[tokio::test]
async fn add_message_fills_in_defaults() {
    let app = TestApp::new().await;

    let (status, msg) = app.post_json("/api/messages", "{}").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(msg["id"], 1);
    assert_eq!(msg["text"], "");
    assert_eq!(msg["type"], "love");
    assert!(msg["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn malformed_message_body_is_a_client_error() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/messages", "{oops").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    let (_, listed) = app.get("/api/messages").await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn corrupt_message_file_returns_generic_500() {
    let app = TestApp::new().await;
    std::fs::write(app.messages_file(), "not json").unwrap();

    let (status, body) = app.get("/api/messages").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Something went wrong"}));

    let (status, _) = app.get("/api/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn upload_stores_photo_under_timestamped_name() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(upload_request("photo", Some("cat.png"), b"\x89PNG fake"))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let filename = body["filename"].as_str().unwrap().to_string();
    assert!(filename.ends_with("_cat.png"), "got {filename}");
    // YYYYMMDD_HHMMSS_
    assert_eq!(filename.len(), "20240601_100000_cat.png".len());
    assert_eq!(body["url"], format!("/static/uploads/{filename}"));

    let stored = std::fs::read(app.uploads().join(&filename)).unwrap();
    assert_eq!(stored, b"\x89PNG fake");

    let (_, photos) = app.get("/api/photos").await;
    assert_eq!(
        photos,
        json!([{"filename": filename, "url": format!("/static/uploads/{filename}")}])
    );
}

#[tokio::test]
async fn upload_without_photo_field_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(upload_request("avatar", Some("cat.png"), b"data"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No photo provided");
    assert_eq!(std::fs::read_dir(app.uploads()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_with_empty_filename_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.send(upload_request("photo", Some(""), b"")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(std::fs::read_dir(app.uploads()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_that_is_not_multipart_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.post_json("/api/upload-photo", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No photo provided");
}

#[tokio::test]
async fn photo_list_ignores_non_images() {
    let app = TestApp::new().await;
    for name in ["notes.txt", "beach.JPG", "sunset.webp"] {
        std::fs::write(app.uploads().join(name), b"x").unwrap();
    }

    let (status, photos) = app.get("/api/photos").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        photos,
        json!([
            {"filename": "beach.JPG", "url": "/static/uploads/beach.JPG"},
            {"filename": "sunset.webp", "url": "/static/uploads/sunset.webp"},
        ])
    );
}

#[tokio::test]
async fn stats_reflect_messages_and_photos() {
    let app = TestApp::new().await;
    for text in ["a", "b", "c"] {
        app.post_json("/api/messages", &json!({ "text": text }).to_string())
            .await;
    }
    for name in ["one.png", "two.gif", "skip.txt"] {
        std::fs::write(app.uploads().join(name), b"x").unwrap();
    }

    let before = stats::days_since(start_date(), Local::now().naive_local());
    let (status, body) = app.get("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages_sent"], 3);
    assert_eq!(body["photos_shared"], 2);
    let days = body["days_together"].as_i64().unwrap();
    assert!(days >= before && days <= before + 1);
    assert_eq!(
        body["love_level"].as_i64().unwrap(),
        stats::love_level(days, 2, 3)
    );
    assert!(body["love_level"].as_i64().unwrap() <= stats::MAX_LOVE_LEVEL);
}

#[tokio::test]
async fn health_check_responds() {
    let app = TestApp::new().await;
    let resp = app
        .app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
