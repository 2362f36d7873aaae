//! ディスク上の画像から送信候補ファイルを作成

use crate::error::{FurnitureMatchError, Result, WorkflowError};
use furniture_match_common::{mime_type_from_extension, validate_file, CandidateFile};
use std::path::Path;

/// 画像ファイルを読み込み `CandidateFile` を作成
///
/// MIMEタイプは拡張子から推定する。型・サイズはメタデータで先に検証し、
/// 受け付けられないファイルは読み込まない
pub async fn load_candidate(path: &Path) -> Result<CandidateFile> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(FurnitureMatchError::FileNotFound(path.display().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FurnitureMatchError::FileNotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = mime_type_from_extension(path);

    let header = CandidateFile::with_declared_size(name.clone(), mime_type, metadata.len(), Vec::<u8>::new());
    validate_file(&header).map_err(WorkflowError::from)?;

    let bytes = tokio::fs::read(path).await?;
    Ok(CandidateFile::new(name, mime_type, bytes))
}
