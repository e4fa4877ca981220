use crate::core::news::upstream_error_message;
use crate::domain::model::{NewsPage, NewsQuery};
use crate::domain::ports::NewsSource;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

const SERVICE: &str = "GNews";

/// GNews 搜尋 API，固定 `lang=en&country=in`
pub struct GNewsClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GNewsClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl NewsSource for GNewsClient {
    async fn search(&self, query: &NewsQuery) -> Result<NewsPage> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_api_key("News"))?;

        let url = format!("{}/search", self.base_url);
        let terms = query.search_terms();
        tracing::debug!(
            "📰 GNews GET {} q={:?} max={} page={} (apikey=[REDACTED])",
            url,
            terms,
            query.max,
            query.page
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lang", "en"),
                ("country", "in"),
                ("apikey", key),
                ("q", terms.as_str()),
            ])
            .query(&[("max", query.max), ("page", query.page)])
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message =
                upstream_error_message(&body, status.canonical_reason().unwrap_or("Unknown error"));
            tracing::warn!("⚠️ GNews failed with {}: {}", status, message);
            return Err(AppError::upstream(SERVICE, Some(status.as_u16()), message));
        }

        let page: NewsPage = response
            .json()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))?;
        tracing::debug!(
            "GNews returned {} of {} articles",
            page.articles.len(),
            page.total_articles
        );
        Ok(page)
    }
}
