//! Gemini API のワイヤー形式
//!
//! CLI(reqwest)とWeb(fetch)で同じリクエスト/レスポンス型を使う。
//! 送信処理そのものは各フロントエンド側に置く。

use crate::error::{AnalysisError, Result};
use crate::prompts::{build_analysis_prompt, response_schema};
use crate::upload::ImagePayload;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
/// 客観的な判定に寄せるため低め
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// generateContent のURL（APIキーを除く）
pub fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    #[serde(rename = "responseSchema")]
    pub response_schema: serde_json::Value,
}

impl GeminiRequest {
    /// 画像1枚 + 固定プロンプト + 出力スキーマのリクエストを組み立てる
    pub fn for_image(image: &ImagePayload, temperature: f32) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                    Part::Text {
                        text: build_analysis_prompt(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

/// Gemini APIレスポンス
///
/// ブロックされた場合などは candidates が無いことがあるので全て省略可能にしておく
#[derive(Debug, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストを連結して返す。空なら EmptyResponse
    pub fn into_text(self) -> Result<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            Err(AnalysisError::EmptyResponse)
        } else {
            Ok(text)
        }
    }
}

/// エラーレスポンス `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    #[serde(default)]
    message: String,
}

/// 非2xxレスポンスを Transport エラーにする
pub fn status_error(status: u16, body: &str) -> AnalysisError {
    let message = serde_json::from_str::<GeminiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_default();

    if message.is_empty() {
        AnalysisError::Transport(format!("HTTP {}", status))
    } else {
        AnalysisError::Transport(format!("HTTP {}: {}", status, message))
    }
}
