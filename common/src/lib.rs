//! Furniture Match Common Library
//!
//! ネイティブとWeb(WASM)のフロントエンドで共有される型と純粋関数:
//! - ファイル検証（型・サイズ）
//! - プレビュー（Data URL）生成
//! - マッチングサービス応答の正規化

pub mod types;
pub mod error;
pub mod validation;
pub mod preview;
pub mod normalizer;

pub use types::{CandidateFile, Preview, ResultItem, ViewState};
pub use error::{PreviewError, ValidationError};
pub use validation::{mime_type_from_extension, validate_file, MAX_UPLOAD_BYTES};
pub use preview::{encode_preview, extract_base64_from_data_url, extract_mime_type_from_data_url};
pub use normalizer::{normalize, Detection, MatchEntry, MatchMeta, RawMatchResponse};
