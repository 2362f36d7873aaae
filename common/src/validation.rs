//! ファイル検証
//!
//! プレビュー生成や送信より前に実行する。副作用なし

use crate::error::ValidationError;
use crate::types::CandidateFile;
use std::path::Path;

/// アップロード上限（10 MiB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// 拡張子 → MIMEタイプ
const IMAGE_MIME_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("bmp", "image/bmp"),
];

/// 候補ファイルを検証
///
/// 型チェックを先に行い、次にサイズをチェックする
///
/// # Arguments
/// * `file` - 検証対象のファイル
///
/// # Returns
/// * `Ok(())` - 送信可能
/// * `Err(InvalidType)` - MIMEタイプが "image/" で始まらない
/// * `Err(TooLarge)` - 10 MiB を超える
pub fn validate_file(file: &CandidateFile) -> Result<(), ValidationError> {
    if !file.mime_type.starts_with("image/") {
        return Err(ValidationError::InvalidType(file.mime_type.clone()));
    }

    if file.byte_size > MAX_UPLOAD_BYTES {
        return Err(ValidationError::TooLarge {
            size: file.byte_size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    Ok(())
}

/// パスの拡張子からMIMEタイプを推定
///
/// 未知の拡張子は "application/octet-stream"（検証で弾かれる）
pub fn mime_type_from_extension(path: &Path) -> &'static str {
    let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
        return "application/octet-stream";
    };

    IMAGE_MIME_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}
