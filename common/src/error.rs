//! エラー型定義

use thiserror::Error;

/// ファイル検証エラー
///
/// 表示文字列はそのままUIのエラーメッセージとして使われる
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a valid image file")]
    InvalidType(String),

    #[error("File size must be less than 10MB")]
    TooLarge { size: u64, limit: u64 },
}

/// プレビュー生成エラー（ワークフロー全体には致命的ではない）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreviewError {
    #[error("image data is empty")]
    Empty,

    #[error("image size mismatch: declared {expected} bytes, read {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_user_facing() {
        let invalid = ValidationError::InvalidType("text/plain".to_string());
        assert_eq!(invalid.to_string(), "Please upload a valid image file");

        let too_large = ValidationError::TooLarge { size: 11, limit: 10 };
        assert_eq!(too_large.to_string(), "File size must be less than 10MB");
    }

    #[test]
    fn test_preview_size_mismatch_display() {
        let error = PreviewError::SizeMismatch { expected: 10, actual: 4 };
        let display = error.to_string();
        assert!(display.contains("10"));
        assert!(display.contains("4"));
    }
}
