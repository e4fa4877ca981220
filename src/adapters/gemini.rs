use crate::domain::ports::TextGenerator;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const SERVICE: &str = "Gemini";

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// 取第一個候選回覆，串接所有文字片段
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        (!text.is_empty()).then_some(text)
    }
}

/// Gemini `generateContent` REST 用戶端
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_api_key("AI"))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        tracing::debug!("🤖 Gemini POST {} ({} prompt chars, key=[REDACTED])", url, prompt.len());

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&json!({ "contents": [{ "parts": [{ "text": prompt }] }] }))
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Gemini request failed with status {}", status));
            tracing::warn!("⚠️ Gemini failed with {}: {}", status, message);
            return Err(AppError::upstream(SERVICE, Some(status.as_u16()), message));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))?;
        let text = body
            .text()
            .ok_or_else(|| AppError::upstream(SERVICE, None, "The model returned no content"))?;
        tracing::debug!("Gemini raw answer: {} chars", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_joins_parts_of_first_candidate() {
        let body: GenerateResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "* Nitrogen is Low\n"}, {"text": "* Use Urea"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("* Nitrogen is Low\n* Use Urea"));
    }

    #[test]
    fn test_empty_candidates_have_no_text() {
        let body: GenerateResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert!(body.text().is_none());
    }
}
