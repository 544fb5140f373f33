//! アップロードされた画像の受け渡し
//!
//! - SelectedFile: フロントエンドが選んだファイル（名前・申告MIME・バイト列）
//! - ImagePayload: API送信用（Base64、`data:` 接頭辞なし）

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// アップロード上限（10 MiB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIMEタイプ未申告時のデフォルト
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// 選択されたファイル
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// ブラウザやOSが申告したMIMEタイプ（空文字は未申告扱い）
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// 申告MIMEタイプ。無ければ image/jpeg
    pub fn effective_mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
    }

    pub fn to_payload(&self) -> ImagePayload {
        ImagePayload {
            data: encode_base64(&self.bytes),
            mime_type: self.effective_mime_type().to_string(),
        }
    }
}

/// API送信用の画像データ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64（接頭辞なし）
    pub data: String,
    pub mime_type: String,
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 拡張子からMIMEタイプを推定
pub fn mime_type_from_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_mime_type_default() {
        let file = SelectedFile::new("a", None, vec![1, 2, 3]);
        assert_eq!(file.effective_mime_type(), "image/jpeg");

        let file = SelectedFile::new("a", Some(String::new()), vec![]);
        assert_eq!(file.effective_mime_type(), "image/jpeg");

        let file = SelectedFile::new("a.png", Some("image/png".into()), vec![]);
        assert_eq!(file.effective_mime_type(), "image/png");
    }

    #[test]
    fn test_payload_has_no_data_url_prefix() {
        let file = SelectedFile::new("hello.png", Some("image/png".into()), b"hello".to_vec());
        let payload = file.to_payload();
        assert_eq!(payload.data, "aGVsbG8=");
        assert!(!payload.data.starts_with("data:"));
        assert_eq!(payload.mime_type, "image/png");
    }

    #[test]
    fn test_size() {
        let file = SelectedFile::new("x", None, vec![0; 2048]);
        assert_eq!(file.size(), 2048);
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_from_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_type_from_extension("png"), Some("image/png"));
        assert_eq!(mime_type_from_extension("HEIC"), Some("image/heic"));
        assert_eq!(mime_type_from_extension("txt"), None);
    }
}
