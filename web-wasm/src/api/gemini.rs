//! Gemini API連携（fetch）
//!
//! リクエスト/レスポンスの形とスキーマ検証は共通ライブラリのものをそのまま使う。

use async_trait::async_trait;
use photo_verdict_common::gemini::{endpoint_url, status_error, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use photo_verdict_common::{
    parse_analysis_response, AnalysisError, AnalysisResult, Analyzer, GeminiRequest,
    GeminiResponse, ImagePayload, Result, SchemaError,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ビルド時に埋め込むAPIキー（`GEMINI_API_KEY=... trunk build`）
const BUILD_API_KEY: Option<&str> = option_env!("GEMINI_API_KEY");

/// ブラウザの fetch で Gemini を呼ぶ解析器
#[derive(Clone)]
pub struct FetchAnalyzer {
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl FetchAnalyzer {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// ビルド時に埋め込まれたキーを使う
    pub fn from_build_env() -> Self {
        Self::new(BUILD_API_KEY.map(str::to_string))
    }

    fn request_url(&self, api_key: &str) -> String {
        format!("{}?key={}", endpoint_url(&self.base_url, &self.model), api_key)
    }

    async fn post(&self, api_key: &str, body: &str) -> std::result::Result<(u16, String), JsValue> {
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(body));

        let request = Request::new_with_str_and_init(&self.request_url(api_key), &opts)?;
        request.headers().set("Content-Type", "application/json")?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        let text = JsFuture::from(resp.text()?).await?;
        Ok((resp.status(), text.as_string().unwrap_or_default()))
    }
}

#[async_trait(?Send)]
impl Analyzer for FetchAnalyzer {
    async fn analyze(&self, image: &ImagePayload) -> Result<AnalysisResult> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;

        let request = GeminiRequest::for_image(image, DEFAULT_TEMPERATURE);
        let body = serde_json::to_string(&request)
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        let (status, text) = self
            .post(api_key, &body)
            .await
            .map_err(|e| AnalysisError::Transport(js_error_message(&e)))?;

        decode_response(status, &text)
    }
}

/// HTTPステータスと本文から解析結果を得る
fn decode_response(status: u16, text: &str) -> Result<AnalysisResult> {
    if !(200..300).contains(&status) {
        return Err(status_error(status, text));
    }
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyResponse);
    }

    let response: GeminiResponse = serde_json::from_str(text)
        .map_err(|e| AnalysisError::Schema(SchemaError::InvalidJson(e.to_string())))?;
    parse_analysis_response(&response.into_text()?)
}

/// fetch の失敗は TypeError("Failed to fetch") などで来る。URLは含めない
fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_default()
}
