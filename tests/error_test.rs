//! エラーケーステスト
//!
//! 各種エラーの表示とエラー変換を検証

use furniture_match::error::{FurnitureMatchError, SubmissionError, WorkflowError};
use furniture_match::loader;
use furniture_match_common::ValidationError;
use std::path::Path;

/// 存在しない画像を読み込んだ場合
#[tokio::test]
async fn test_load_nonexistent_image() {
    let result = loader::load_candidate(Path::new("/nonexistent/path/12345.jpg")).await;
    assert!(matches!(result, Err(FurnitureMatchError::FileNotFound(_))));
}

/// FurnitureMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        FurnitureMatchError::Config("テスト設定エラー".to_string()),
        FurnitureMatchError::FileNotFound("chair.jpg".to_string()),
        FurnitureMatchError::Unhealthy("http://127.0.0.1:8000".to_string()),
        FurnitureMatchError::Workflow(WorkflowError::NoFile),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 送信エラーはユーザー向けメッセージになる
#[test]
fn test_submission_error_messages() {
    assert_eq!(
        SubmissionError::HttpStatus(500).to_string(),
        "Matching service returned HTTP 500"
    );
    assert!(SubmissionError::NetworkFailure("timeout".into())
        .to_string()
        .contains("timeout"));
    assert!(SubmissionError::Service("index missing".into())
        .to_string()
        .contains("index missing"));
    assert!(SubmissionError::InvalidRequest("image/@@".into())
        .to_string()
        .contains("image/@@"));
}

/// WorkflowErrorは内側のメッセージをそのまま表示する
#[test]
fn test_workflow_error_is_transparent() {
    let err: WorkflowError = ValidationError::InvalidType("text/plain".into()).into();
    assert_eq!(err.to_string(), "Please upload a valid image file");

    let err: WorkflowError = SubmissionError::HttpStatus(502).into();
    assert_eq!(err.to_string(), "Matching service returned HTTP 502");

    assert_eq!(WorkflowError::NoFile.to_string(), "Please upload an image first");
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: FurnitureMatchError = io_err.into();

    assert!(matches!(err, FurnitureMatchError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: FurnitureMatchError = json_err.into();

    assert!(matches!(err, FurnitureMatchError::JsonParse(_)));
}

/// WorkflowErrorからの変換
#[test]
fn test_workflow_error_conversion() {
    let err: FurnitureMatchError = WorkflowError::SubmissionInFlight.into();
    assert!(matches!(err, FurnitureMatchError::Workflow(WorkflowError::SubmissionInFlight)));
}
