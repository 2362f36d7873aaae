//! ワークフローで扱う型の定義
//!
//! - CandidateFile: ユーザーが選択した画像（検証・送信待ち）
//! - Preview: ローカル表示用のData URL
//! - ViewState: 画面状態
//! - ResultItem: 正規化済みのマッチ結果（normalizerのみが生成する）

use serde::Serialize;
use std::sync::Arc;

use crate::preview::{extract_base64_from_data_url, extract_mime_type_from_data_url};

/// 送信候補のファイル
///
/// `bytes` は共有参照なので、プレビュー生成と送信の両方へ安価に渡せる
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    /// ファイル名（multipartのfilenameとして送信）
    pub name: String,
    pub mime_type: String,
    /// 申告サイズ（ブラウザのFile.sizeに相当）
    pub byte_size: u64,
    pub bytes: Arc<[u8]>,
}

impl CandidateFile {
    /// バイト列からファイルを作成（サイズはバイト長）
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size: bytes.len() as u64,
            bytes,
        }
    }

    /// 申告サイズを指定して作成
    pub fn with_declared_size(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        byte_size: u64,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            byte_size,
            bytes: bytes.into(),
        }
    }
}

/// ローカルプレビュー（"data:image/jpeg;base64,..." 形式）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub data_url: String,
}

impl Preview {
    pub fn mime_type(&self) -> &str {
        extract_mime_type_from_data_url(&self.data_url)
    }

    pub fn base64_data(&self) -> Option<&str> {
        extract_base64_from_data_url(&self.data_url)
    }
}

/// 画面状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Home,
    Upload,
    Results,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Home => "home",
            ViewState::Upload => "upload",
            ViewState::Results => "results",
        }
    }
}

/// 正規化済みマッチ結果
///
/// フィールドは読み取り専用。生成は `normalizer` モジュールに限られる
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultItem {
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) score: Option<f64>,
}

impl ResultItem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }
}
