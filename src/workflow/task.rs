//! セッションに触れずに実行できる非同期タスク
//!
//! タスクは発行時の世代番号を持ち、結果はコントローラが世代を確認してから反映する

use furniture_match_common::{encode_preview, CandidateFile, Preview, PreviewError};
use serde_json::Value;
use std::sync::Arc;

use crate::client::MatchBackend;
use crate::error::SubmissionError;

/// プレビュー生成タスク
#[derive(Debug)]
pub struct PreviewTask {
    generation: u64,
    file: CandidateFile,
}

impl PreviewTask {
    pub(crate) fn new(generation: u64, file: CandidateFile) -> Self {
        Self { generation, file }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run(self) -> PreviewOutcome {
        PreviewOutcome {
            generation: self.generation,
            result: encode_preview(&self.file),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOutcome {
    pub(crate) generation: u64,
    pub(crate) result: Result<Preview, PreviewError>,
}

impl PreviewOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<Preview, PreviewError> {
        &self.result
    }
}

/// 送信タスク
pub struct SubmitTask<B> {
    generation: u64,
    file: CandidateFile,
    backend: Arc<B>,
}

impl<B: MatchBackend> SubmitTask<B> {
    pub(crate) fn new(generation: u64, file: CandidateFile, backend: Arc<B>) -> Self {
        Self {
            generation,
            file,
            backend,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run(self) -> SubmitOutcome {
        let result = self.backend.submit(&self.file).await;
        SubmitOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub(crate) generation: u64,
    pub(crate) result: Result<Value, SubmissionError>,
}

impl SubmitOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<Value, SubmissionError> {
        &self.result
    }
}
