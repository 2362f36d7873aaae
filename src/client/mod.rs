//! マッチングサービスクライアント
//!
//! 画像を1パートのmultipartで送信し、デコード済みの応答JSONを返す。
//! 応答の形の解釈は `furniture_match_common::normalizer` に任せる

mod contract;

pub use contract::ApiContract;

use async_trait::async_trait;
use furniture_match_common::{CandidateFile, RawMatchResponse};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::error::{FurnitureMatchError, Result, SubmissionError};

/// 照合リクエストの送信先
///
/// `WorkflowController` はこのトレイト越しにサービスを呼ぶ
#[async_trait]
pub trait MatchBackend: Send + Sync {
    /// 画像を送信し、2xxの応答本文を返す
    async fn submit(&self, file: &CandidateFile) -> std::result::Result<Value, SubmissionError>;
}

pub struct MatchClient {
    http: reqwest::Client,
    base_url: String,
    contract: ApiContract,
}

impl MatchClient {
    pub fn new(base_url: impl Into<String>, contract: ApiContract) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, contract)
    }

    /// 設定からクライアントを作成（タイムアウト付き）
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FurnitureMatchError::Config(format!("HTTPクライアント初期化失敗: {}", e)))?;

        Ok(Self::with_http(http, config.base_url(), config.contract))
    }

    fn with_http(http: reqwest::Client, base_url: impl Into<String>, contract: ApiContract) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            contract,
        }
    }

    /// ベースURLを差し替える（コマンドライン指定など、環境変数より優先する場合）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contract(&self) -> ApiContract {
        self.contract
    }

    /// 送信先URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.contract.path())
    }

    /// 画像を送信
    ///
    /// # Returns
    /// * `Ok(Value)` - 2xxの応答本文（未解釈）
    /// * `Err(HttpStatus)` - 2xx以外
    /// * `Err(NetworkFailure)` - 通信失敗、またはJSONとして読めない本文
    /// * `Err(Service)` - 2xxだが `{status: "error"}` が返った
    /// * `Err(InvalidRequest)` - MIMEタイプが不正でリクエストを組み立てられない
    pub async fn submit_file(&self, file: &CandidateFile) -> std::result::Result<Value, SubmissionError> {
        let url = self.endpoint();

        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| SubmissionError::InvalidRequest(format!("{}: {}", file.mime_type, e)))?;
        let form = Form::new().part(self.contract.field_name(), part);

        tracing::info!(
            url = %url,
            file = %file.name,
            bytes = file.byte_size,
            field = self.contract.field_name(),
            "Submitting image for matching"
        );

        let resp = self.http.post(&url).multipart(form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Matching service returned an error status");
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        let body: Value = resp.json().await?;

        if let RawMatchResponse::ServiceError { message } = RawMatchResponse::classify(&body) {
            tracing::warn!(url = %url, message = %message, "Matching service reported a failure");
            return Err(SubmissionError::Service(message));
        }

        tracing::debug!(url = %url, "Matching service responded");
        Ok(body)
    }

    /// 死活確認（`GET /health` が `{status: "ok"}` を返すこと）
    pub async fn health(&self) -> std::result::Result<(), SubmissionError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        match body.get("status").and_then(Value::as_str) {
            Some("ok") => Ok(()),
            other => Err(SubmissionError::Service(format!(
                "unexpected health status: {}",
                other.unwrap_or("missing")
            ))),
        }
    }
}

#[async_trait]
impl MatchBackend for MatchClient {
    async fn submit(&self, file: &CandidateFile) -> std::result::Result<Value, SubmissionError> {
        self.submit_file(file).await
    }
}
