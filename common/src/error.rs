//! エラー型定義

use thiserror::Error;

/// 解析失敗時の汎用メッセージ
pub const GENERIC_FAILURE_MESSAGE: &str = "鉴别失败，请检查网络或更换图片重试。";

/// エラー分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 送信前の入力チェックで弾かれた
    Validation,
    /// APIキー未設定
    Configuration,
    /// 通信・サービス側の失敗
    Transport,
    /// レスポンスが空、またはスキーマ不一致
    Schema,
}

/// 入力チェックエラー（API呼び出し前に検出）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("请先选择一张图片")]
    MissingFile,

    #[error("图片太大，请上传{}以内的图片", format_limit(.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("无法读取文件")]
    Unreadable(String),
}

/// 上限サイズの表示（MB単位、1MB未満はKB）
fn format_limit(bytes: &u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if *bytes >= MIB {
        if bytes % MIB == 0 {
            format!("{}MB", bytes / MIB)
        } else {
            format!("{:.1}MB", *bytes as f64 / MIB as f64)
        }
    } else if bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{:.1}KB", *bytes as f64 / KIB as f64)
    }
}

/// レスポンスのスキーマ検証エラー
///
/// `field` はパス表記（例: `risks[2].severity`）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("无法解析为 JSON: {0}")]
    InvalidJson(String),

    #[error("缺少字段 {field}")]
    MissingField { field: String },

    #[error("字段 {field} 类型错误（应为 {expected}）")]
    WrongType { field: String, expected: &'static str },

    #[error("字段 {field} 的取值 \"{value}\" 不在 high/medium/low 之内")]
    InvalidSeverity { field: String, value: String },
}

/// 解析エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("未配置 API Key，请设置环境变量 GEMINI_API_KEY 后重试")]
    MissingApiKey,

    #[error("服务调用失败: {0}")]
    Transport(String),

    #[error("服务未返回任何内容")]
    EmptyResponse,

    #[error("返回结果不符合格式要求: {0}")]
    Schema(#[from] SchemaError),
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation(_) => ErrorKind::Validation,
            AnalysisError::MissingApiKey => ErrorKind::Configuration,
            AnalysisError::Transport(_) => ErrorKind::Transport,
            AnalysisError::EmptyResponse | AnalysisError::Schema(_) => ErrorKind::Schema,
        }
    }

    /// 画面に出すメッセージ。通信エラーの詳細が空なら汎用メッセージ
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport(detail) if detail.trim().is_empty() => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, AnalysisError>;
