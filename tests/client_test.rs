//! マッチングサービスクライアントのテスト
//!
//! ローカルに起動したaxumサーバーに対して送信し、
//! multipartのフィールド名とステータスの扱いを検証

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use furniture_match::client::{ApiContract, MatchClient};
use furniture_match::config::Config;
use furniture_match::error::SubmissionError;
use furniture_match::workflow::WorkflowController;
use furniture_match_common::{normalize, CandidateFile, ViewState};
use serde_json::{json, Value};

/// 受け取ったパートの情報
async fn read_parts(mut multipart: Multipart) -> Value {
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let size = field.bytes().await.unwrap().len();
        parts.push(json!({
            "field": name,
            "fileName": file_name,
            "contentType": content_type,
            "size": size,
        }));
    }
    Value::Array(parts)
}

async fn match_handler(multipart: Multipart) -> Json<Value> {
    let received = read_parts(multipart).await;
    Json(json!({
        "status": "success",
        "received": received,
        "results": [{
            "label": "chair",
            "conf": 0.9,
            "box": [0, 0, 10, 10],
            "matches": [{"score": 0.9, "meta": {"style": "modern", "image_url": "http://x/a.jpg"}}]
        }]
    }))
}

async fn legacy_handler(multipart: Multipart) -> Json<Value> {
    let received = read_parts(multipart).await;
    Json(json!({
        "received": received,
        "results": [{"imageUrl": "http://x/legacy.jpg", "price": "$10", "buyLink": "http://shop/1"}]
    }))
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn image_file() -> CandidateFile {
    CandidateFile::new("sofa.png", "image/png", vec![0x89u8, 0x50, 0x4E, 0x47, 0x0D])
}

#[tokio::test]
async fn test_submit_match_contract() {
    let base = spawn_server(Router::new().route("/match", post(match_handler))).await;
    let client = MatchClient::new(base, ApiContract::Match);

    let body = client.submit_file(&image_file()).await.unwrap();

    let received = body["received"].as_array().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["field"], "file");
    assert_eq!(received[0]["fileName"], "sofa.png");
    assert_eq!(received[0]["contentType"], "image/png");
    assert_eq!(received[0]["size"], 5);

    let items = normalize(&body);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title(), "modern");
}

#[tokio::test]
async fn test_submit_legacy_contract() {
    let base = spawn_server(Router::new().route("/api/upload/", post(legacy_handler))).await;
    let client = MatchClient::new(base, ApiContract::Legacy);

    let body = client.submit_file(&image_file()).await.unwrap();

    assert_eq!(body["received"][0]["field"], "image");
    let items = normalize(&body);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].link(), Some("http://shop/1"));
    assert_eq!(items[0].image_url(), Some("http://x/legacy.jpg"));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let base = spawn_server(Router::new().route("/match", post(match_handler))).await;
    let client = MatchClient::new(format!("{}/", base), ApiContract::Match);

    assert_eq!(client.endpoint(), format!("{}/match", base));
    assert!(client.submit_file(&image_file()).await.is_ok());
}

#[tokio::test]
async fn test_non_success_status() {
    async fn failing() -> impl IntoResponse {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": "boom"})),
        )
    }

    let base = spawn_server(Router::new().route("/match", post(failing))).await;
    let client = MatchClient::new(base, ApiContract::Match);

    let result = client.submit_file(&image_file()).await;
    assert_eq!(result, Err(SubmissionError::HttpStatus(500)));
}

#[tokio::test]
async fn test_not_found_status() {
    let base = spawn_server(Router::new()).await;
    let client = MatchClient::new(base, ApiContract::Match);

    let result = client.submit_file(&image_file()).await;
    assert_eq!(result, Err(SubmissionError::HttpStatus(404)));
}

#[tokio::test]
async fn test_non_json_body_is_network_failure() {
    async fn plain() -> &'static str {
        "Internal hiccup"
    }

    let base = spawn_server(Router::new().route("/match", post(plain))).await;
    let client = MatchClient::new(base, ApiContract::Match);

    let result = client.submit_file(&image_file()).await;
    assert!(matches!(result, Err(SubmissionError::NetworkFailure(_))));
}

#[tokio::test]
async fn test_service_error_in_success_body() {
    async fn service_error() -> Json<Value> {
        Json(json!({"status": "error", "message": "FAISS index not loaded."}))
    }

    let base = spawn_server(Router::new().route("/match", post(service_error))).await;
    let client = MatchClient::new(base, ApiContract::Match);

    let result = client.submit_file(&image_file()).await;
    assert_eq!(
        result,
        Err(SubmissionError::Service("FAISS index not loaded.".to_string()))
    );
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MatchClient::new(format!("http://{}", addr), ApiContract::Match);
    let result = client.submit_file(&image_file()).await;
    assert!(matches!(result, Err(SubmissionError::NetworkFailure(_))));
}

#[tokio::test]
async fn test_malformed_mime_type_is_not_a_network_failure() {
    // 接続先がなくても送信前に失敗する
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = MatchClient::new(format!("http://{}", addr), ApiContract::Match);
    let file = CandidateFile::new("odd.png", "image/@@", vec![1u8, 2, 3]);

    let result = client.submit_file(&file).await;
    assert!(matches!(result, Err(SubmissionError::InvalidRequest(ref msg)) if msg.contains("image/@@")));
}

#[tokio::test]
async fn test_health() {
    async fn healthy() -> Json<Value> {
        Json(json!({"status": "ok"}))
    }
    async fn degraded() -> Json<Value> {
        Json(json!({"status": "starting"}))
    }

    let base = spawn_server(Router::new().route("/health", get(healthy))).await;
    assert!(MatchClient::new(base, ApiContract::Match).health().await.is_ok());

    let base = spawn_server(Router::new().route("/health", get(degraded))).await;
    let result = MatchClient::new(base, ApiContract::Match).health().await;
    assert!(matches!(result, Err(SubmissionError::Service(_))));
}

#[tokio::test]
async fn test_from_config() {
    let base = spawn_server(Router::new().route("/match", post(match_handler))).await;
    let config = Config {
        base_url: base.clone(),
        contract: ApiContract::Match,
        timeout_seconds: 5,
    };

    let client = MatchClient::from_config(&config)
        .unwrap()
        .with_base_url(config.resolve_base_url(None));
    assert_eq!(client.base_url(), base);
    assert_eq!(client.contract(), ApiContract::Match);
}

/// 実クライアントでワークフローを一巡
#[tokio::test]
async fn test_workflow_end_to_end() {
    let base = spawn_server(Router::new().route("/match", post(match_handler))).await;
    let mut controller = WorkflowController::new(MatchClient::new(base, ApiContract::Match));

    controller.get_started();
    let preview_task = controller.select_file(image_file()).unwrap();
    let (preview, submitted) = tokio::join!(preview_task.run(), controller.submit());
    controller.apply_preview(preview);

    assert!(submitted.is_ok());
    let session = controller.session();
    assert_eq!(session.view_state, ViewState::Results);
    assert_eq!(session.results.len(), 1);
    assert_eq!(session.results[0].image_url(), Some("http://x/a.jpg"));
    assert_eq!(session.results[0].score(), Some(0.9));
    assert!(session.preview.is_some());
    assert!(!session.is_loading);
}
