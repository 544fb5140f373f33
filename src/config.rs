use crate::error::{PhotoVerdictError, Result};
use photo_verdict_common::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use photo_verdict_common::MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーを読む環境変数
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_upload_bytes: u64,
    pub timeout_seconds: u64,
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            timeout_seconds: 120,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoVerdictError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-verdict").join("config.json"))
    }

    /// 呼び出し時にAPIキーを解決するソース（環境変数優先、次に設定ファイル）
    pub fn api_key_source(&self) -> ApiKeySource {
        ApiKeySource::Env {
            var: API_KEY_ENV.to_string(),
            fallback: self.api_key.clone(),
        }
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }
}

/// APIキーの取得元
///
/// 解決は解析のたびに行う（起動後に環境変数を設定しても拾える）
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    Env {
        var: String,
        fallback: Option<String>,
    },
    Fixed(Option<String>),
}

impl ApiKeySource {
    /// 空白のみのキーは未設定扱い
    pub fn resolve(&self) -> Option<String> {
        let candidate = match self {
            ApiKeySource::Env { var, fallback } => std::env::var(var)
                .ok()
                .filter(|k| !k.trim().is_empty())
                .or_else(|| fallback.clone()),
            ApiKeySource::Fixed(key) => key.clone(),
        };
        candidate
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash-exp");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": "gemini-1.5-pro"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert!((config.temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(config.timeout_seconds, 120);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            api_key: Some("k".into()),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(PhotoVerdictError::JsonParse(_))
        ));
    }

    #[test]
    fn test_fixed_source_blank_is_none() {
        assert_eq!(ApiKeySource::Fixed(None).resolve(), None);
        assert_eq!(ApiKeySource::Fixed(Some("   ".into())).resolve(), None);
        assert_eq!(
            ApiKeySource::Fixed(Some(" key ".into())).resolve().as_deref(),
            Some("key")
        );
    }

    #[test]
    fn test_env_source_falls_back_to_config() {
        let source = ApiKeySource::Env {
            var: "PHOTO_VERDICT_TEST_UNSET_VAR".into(),
            fallback: Some("from-config".into()),
        };
        assert_eq!(source.resolve().as_deref(), Some("from-config"));

        let source = ApiKeySource::Env {
            var: "PHOTO_VERDICT_TEST_UNSET_VAR".into(),
            fallback: None,
        };
        assert_eq!(source.resolve(), None);
    }
}
