use furniture_match_common::{CandidateFile, Preview, ResultItem, ViewState};

/// ワークフローのセッション状態
///
/// 書き込めるのは `WorkflowController` だけ（外部には `&WorkflowSession` のみ渡す）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowSession {
    pub view_state: ViewState,
    pub candidate_file: Option<CandidateFile>,
    pub preview: Option<Preview>,
    pub results: Vec<ResultItem>,
    /// 送信開始から結果確定までの間だけ true
    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl WorkflowSession {
    /// 結果画面だがマッチが0件（「見つかりませんでした」表示）
    pub fn has_no_matches(&self) -> bool {
        self.view_state == ViewState::Results && self.results.is_empty()
    }
}

/// スクロール先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Upload,
    Top,
}

/// 表示層への指示（実行するかは表示層が決める）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    ScrollTo(ScrollTarget),
}
