//! アップロード・照合ワークフロー
//!
//! 状態: Home → Upload → Results → (UploadAnother) → Home
//!
//! ## 並行性の方針
//! - 送信中の再送信は拒否する（`WorkflowError::SubmissionInFlight`）
//! - 新しいファイルを選ぶと世代が進み、送信中のリクエストは取り消し扱いになる。
//!   その結果は届いても破棄される
//! - プレビューと送信は独立しており、どちらが先に終わってもよい

mod session;
mod task;

pub use session::{ScrollTarget, UiCommand, WorkflowSession};
pub use task::{PreviewOutcome, PreviewTask, SubmitOutcome, SubmitTask};

use furniture_match_common::{normalize, validate_file, CandidateFile, ViewState};
use std::sync::Arc;

use crate::client::MatchBackend;
use crate::error::WorkflowError;

pub struct WorkflowController<B> {
    session: WorkflowSession,
    backend: Arc<B>,
    /// ファイル選択・リセットのたびに進む
    generation: u64,
    /// 送信中のリクエストの世代
    pending_submit: Option<u64>,
    commands: Vec<UiCommand>,
}

impl<B: MatchBackend> WorkflowController<B> {
    pub fn new(backend: B) -> Self {
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<B>) -> Self {
        Self {
            session: WorkflowSession::default(),
            backend,
            generation: 0,
            pending_submit: None,
            commands: Vec::new(),
        }
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 溜まった表示層への指示を取り出す
    pub fn take_commands(&mut self) -> Vec<UiCommand> {
        std::mem::take(&mut self.commands)
    }

    /// GetStarted: Home → Upload
    pub fn get_started(&mut self) -> bool {
        if self.session.view_state != ViewState::Home {
            tracing::debug!(state = self.session.view_state.as_str(), "GetStarted ignored");
            return false;
        }

        self.session.view_state = ViewState::Upload;
        self.commands.push(UiCommand::ScrollTo(ScrollTarget::Upload));
        true
    }

    /// FileSelected: 検証してファイルを保持し、プレビュー生成タスクを返す
    ///
    /// 検証に失敗した場合はエラーメッセージだけを設定し、他の状態は変えない。
    /// Results 表示中は受け付けない。
    /// 返したタスクの結果は `apply_preview` で反映する
    pub fn select_file(&mut self, file: CandidateFile) -> Result<PreviewTask, WorkflowError> {
        if self.session.view_state == ViewState::Results {
            tracing::debug!(file = %file.name, "FileSelected ignored while showing results");
            return Err(WorkflowError::ResultsShown);
        }

        if let Err(err) = validate_file(&file) {
            tracing::warn!(file = %file.name, mime = %file.mime_type, size = file.byte_size, error = %err, "File rejected");
            self.session.error_message = Some(err.to_string());
            return Err(err.into());
        }

        self.generation += 1;

        if let Some(cancelled) = self.pending_submit.take() {
            tracing::info!(cancelled, generation = self.generation, "New file selected; cancelling in-flight submission");
            self.session.is_loading = false;
        }

        tracing::debug!(file = %file.name, generation = self.generation, "File selected");
        self.session.candidate_file = Some(file.clone());
        self.session.preview = None;
        self.session.error_message = None;

        Ok(PreviewTask::new(self.generation, file))
    }

    /// プレビュー結果を反映（古い世代なら破棄して false）
    ///
    /// 生成失敗は致命的ではなく、プレビューがないだけになる
    pub fn apply_preview(&mut self, outcome: PreviewOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(stale = outcome.generation, current = self.generation, "Discarding stale preview");
            return false;
        }

        match outcome.result {
            Ok(preview) => self.session.preview = Some(preview),
            Err(err) => {
                tracing::warn!(error = %err, "Preview generation failed");
                self.session.preview = None;
            }
        }
        true
    }

    /// Submit開始: ローディング状態にして送信タスクを返す
    ///
    /// 送信中・結果表示中なら拒否し、セッションは変更しない
    pub fn begin_submit(&mut self) -> Result<SubmitTask<B>, WorkflowError> {
        if self.session.view_state == ViewState::Results {
            tracing::debug!("Submit ignored while showing results");
            return Err(WorkflowError::ResultsShown);
        }

        if self.pending_submit.is_some() {
            tracing::debug!(generation = self.generation, "Submit rejected; a submission is already in flight");
            return Err(WorkflowError::SubmissionInFlight);
        }

        let Some(file) = self.session.candidate_file.clone() else {
            self.session.error_message = Some(WorkflowError::NoFile.to_string());
            return Err(WorkflowError::NoFile);
        };

        tracing::info!(file = %file.name, generation = self.generation, "Submitting for matching");
        self.pending_submit = Some(self.generation);
        self.session.is_loading = true;
        self.session.error_message = None;
        self.session.results.clear();

        Ok(SubmitTask::new(self.generation, file, Arc::clone(&self.backend)))
    }

    /// 送信結果を反映（取り消し済み・古い世代なら破棄して false）
    pub fn complete_submit(&mut self, outcome: SubmitOutcome) -> bool {
        if self.pending_submit != Some(outcome.generation) || outcome.generation != self.generation {
            tracing::debug!(stale = outcome.generation, current = self.generation, "Discarding stale submission result");
            return false;
        }

        self.pending_submit = None;
        self.session.is_loading = false;

        match outcome.result {
            Ok(raw) => {
                self.session.results = normalize(&raw);
                self.session.view_state = ViewState::Results;
                self.commands.push(UiCommand::ScrollTo(ScrollTarget::Top));
                tracing::info!(matches = self.session.results.len(), "Matching finished");
            }
            Err(err) => {
                tracing::warn!(error = %err, "Submission failed");
                self.session.error_message = Some(err.to_string());
            }
        }
        true
    }

    /// 送信中のリクエストを取り消す（結果は届いても破棄される）
    pub fn cancel_submit(&mut self) -> bool {
        let Some(cancelled) = self.pending_submit.take() else {
            return false;
        };

        tracing::debug!(cancelled, "Submission cancelled");
        self.session.is_loading = false;
        true
    }

    /// Submit: 開始・送信・反映をまとめて行う
    ///
    /// このフューチャーが途中で破棄されても `is_loading` は必ず解除される
    pub async fn submit(&mut self) -> Result<(), WorkflowError> {
        let task = self.begin_submit()?;
        let guard = PendingSubmit { controller: self, armed: true };

        let outcome = task.run().await;
        guard.finish(outcome)
    }

    /// UploadAnother: Results → Home、セッションを初期状態に戻す
    pub fn upload_another(&mut self) -> bool {
        if self.session.view_state != ViewState::Results {
            tracing::debug!(state = self.session.view_state.as_str(), "UploadAnother ignored");
            return false;
        }

        self.generation += 1;
        self.pending_submit = None;
        self.session = WorkflowSession::default();
        self.commands.push(UiCommand::ScrollTo(ScrollTarget::Top));
        true
    }
}

/// 送信中にフューチャーが破棄された場合にローディングを解除する
struct PendingSubmit<'a, B: MatchBackend> {
    controller: &'a mut WorkflowController<B>,
    armed: bool,
}

impl<B: MatchBackend> PendingSubmit<'_, B> {
    fn finish(mut self, outcome: SubmitOutcome) -> Result<(), WorkflowError> {
        self.armed = false;

        let failure = outcome.result.as_ref().err().cloned();
        let applied = self.controller.complete_submit(outcome);

        match failure {
            Some(err) if applied => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl<B: MatchBackend> Drop for PendingSubmit<'_, B> {
    fn drop(&mut self) {
        if self.armed {
            self.controller.cancel_submit();
        }
    }
}
