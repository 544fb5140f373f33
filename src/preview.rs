//! 端末向けプレビュー
//!
//! 選択された画像のサムネイルを一時フォルダに書き出し、そのパスをプレビューとして渡す。
//! 解放時にファイルを削除する。

use photo_verdict_common::{PreviewHost, SelectedFile};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// サムネイルの長辺
pub const THUMBNAIL_SIZE: u32 = 320;

pub struct ThumbnailPreviews {
    dir: PathBuf,
    next_id: u64,
}

impl ThumbnailPreviews {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_id: 0,
        }
    }

    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join("photo-verdict-previews"))
    }

    fn write_original(&mut self, file: &SelectedFile) -> Result<PathBuf, String> {
        let ext = Path::new(&file.name)
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| "bin".to_string());
        let path = self.next_path(&ext);
        std::fs::write(&path, &file.bytes).map_err(|e| e.to_string())?;
        Ok(path)
    }

    fn next_path(&mut self, ext: &str) -> PathBuf {
        self.next_id += 1;
        self.dir
            .join(format!("preview-{}-{}.{}", std::process::id(), self.next_id, ext))
    }
}

impl PreviewHost for ThumbnailPreviews {
    fn acquire(&mut self, file: &SelectedFile) -> Result<String, String> {
        std::fs::create_dir_all(&self.dir).map_err(|e| e.to_string())?;

        let path = match image::load_from_memory(&file.bytes) {
            Ok(img) => {
                let path = self.next_path("png");
                // HDR/EXR の f32 バッファは PNG に書けないので 8bit RGBA にそろえる
                match img
                    .thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE)
                    .to_rgba8()
                    .save(&path)
                {
                    Ok(()) => path,
                    Err(e) => {
                        debug!(file = %file.name, error = %e, "thumbnail encode failed, keeping original bytes");
                        let _ = std::fs::remove_file(&path);
                        self.write_original(file)?
                    }
                }
            }
            Err(e) => {
                // HEIC など image クレートで読めない形式は元データをそのまま置く
                debug!(file = %file.name, error = %e, "thumbnail decode failed, keeping original bytes");
                self.write_original(file)?
            }
        };

        Ok(path.display().to_string())
    }

    fn release(&mut self, locator: &str) {
        if let Err(e) = std::fs::remove_file(locator) {
            warn!(path = locator, error = %e, "failed to remove preview");
        }
    }
}
