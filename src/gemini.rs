//! Gemini API クライアント（reqwest）
//!
//! 1回の `analyze` で generateContent を1回だけ呼ぶ。リトライ・ストリーミングは無し。

use crate::config::{ApiKeySource, Config};
use crate::error::{PhotoVerdictError, Result};
use async_trait::async_trait;
use photo_verdict_common::gemini::{
    endpoint_url, status_error, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use photo_verdict_common::{
    parse_analysis_response, AnalysisError, AnalysisResult, Analyzer, GeminiRequest,
    GeminiResponse, ImagePayload, SchemaError,
};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub struct GeminiClient {
    http: Client,
    api_key: ApiKeySource,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: ApiKeySource, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PhotoVerdictError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.api_key_source(),
            Duration::from_secs(config.timeout_seconds),
        )?
        .with_base_url(&config.base_url)
        .with_model(&config.model)
        .with_temperature(config.temperature))
    }

    /// テストやプロキシ用
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// reqwest のエラー文言にはURL（APIキー付き）が入るので外してから包む
fn transport_error(err: reqwest::Error) -> AnalysisError {
    AnalysisError::Transport(err.without_url().to_string())
}

#[async_trait(?Send)]
impl Analyzer for GeminiClient {
    async fn analyze(&self, image: &ImagePayload) -> photo_verdict_common::Result<AnalysisResult> {
        // キーが無ければ通信しない
        let api_key = self.api_key.resolve().ok_or(AnalysisError::MissingApiKey)?;

        let url = endpoint_url(&self.base_url, &self.model);
        let request = GeminiRequest::for_image(image, self.temperature);

        debug!(
            url = %url,
            mime_type = %image.mime_type,
            payload_len = image.data.len(),
            "sending analysis request"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), body_len = body.len(), "analysis response received");

        if !status.is_success() {
            warn!(status = status.as_u16(), "Gemini API error");
            return Err(status_error(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        let envelope: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
        let text = envelope.into_text()?;

        parse_analysis_response(&text)
    }
}
