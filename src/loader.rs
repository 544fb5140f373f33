use crate::error::{PhotoVerdictError, Result};
use photo_verdict_common::{mime_type_from_extension, SelectedFile};
use std::path::Path;

/// 画像ファイルを読み込み、申告MIMEタイプ付きの SelectedFile にする
///
/// MIMEタイプは拡張子から推定し、分からなければ未申告（送信時に image/jpeg）とする
pub fn load_image(path: &Path) -> Result<SelectedFile> {
    if !path.is_file() {
        return Err(PhotoVerdictError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mime_type = path
        .extension()
        .and_then(|ext| mime_type_from_extension(&ext.to_string_lossy()))
        .map(str::to_string);

    Ok(SelectedFile::new(name, mime_type, bytes))
}
