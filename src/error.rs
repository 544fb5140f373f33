use photo_verdict_common::AnalysisError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoVerdictError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("鉴别失败: {0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, PhotoVerdictError>;
