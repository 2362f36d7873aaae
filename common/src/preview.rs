//! プレビュー生成（Data URL）

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::PreviewError;
use crate::types::{CandidateFile, Preview};

/// 候補ファイルからData URLプレビューを生成
///
/// 申告サイズと実際に読めたバイト数が一致しない場合は失敗とする
pub fn encode_preview(file: &CandidateFile) -> Result<Preview, PreviewError> {
    if file.bytes.is_empty() {
        return Err(PreviewError::Empty);
    }

    let actual = file.bytes.len() as u64;
    if actual != file.byte_size {
        return Err(PreviewError::SizeMismatch {
            expected: file.byte_size,
            actual,
        });
    }

    let data_url = format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.bytes[..]));
    Ok(Preview { data_url })
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
///
/// # Returns
/// Base64エンコードされたデータ部分、または抽出失敗時はNone
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split(',').nth(1)
}

/// Data URLからMIMEタイプを抽出
///
/// 抽出失敗時は"image/jpeg"をデフォルトとして返す
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .split(':')
        .nth(1)
        .and_then(|s| s.split(';').next())
        .unwrap_or("image/jpeg")
}
