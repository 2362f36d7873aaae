use furniture_match_common::ValidationError;
use thiserror::Error;

/// 送信エラー
///
/// 表示文字列はセッションのエラーメッセージとしてそのまま使われる
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Could not reach the matching service: {0}")]
    NetworkFailure(String),

    #[error("Matching service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Matching service error: {0}")]
    Service(String),

    /// 送信前に組み立てに失敗（通信は発生していない）
    #[error("Could not build the upload request: {0}")]
    InvalidRequest(String),
}

/// ワークフロー操作のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Please upload an image first")]
    NoFile,

    #[error("A search is already in progress")]
    SubmissionInFlight,

    /// 結果表示中はアップロードを受け付けない（UploadAnother で戻る）
    #[error("Start a new upload to search with another image")]
    ResultsShown,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

#[derive(Error, Debug)]
pub enum FurnitureMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("サービスに接続できません: {0}")]
    Unhealthy(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

pub type Result<T> = std::result::Result<T, FurnitureMatchError>;

impl From<reqwest::Error> for SubmissionError {
    fn from(err: reqwest::Error) -> Self {
        SubmissionError::NetworkFailure(err.to_string())
    }
}
