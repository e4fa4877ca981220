#![allow(dead_code)]

use krishi_mitra::config::{AppConfig, KeysConfig};
use krishi_mitra::{build_router, AppState};

pub const WEATHER_KEY: &str = "test-openweather-key";
pub const NEWS_KEY: &str = "test-gnews-key";
pub const GEMINI_KEY: &str = "test-gemini-key";

/// 所有上游都指向同一個 mock server
pub fn config_for(upstream_base: &str, keys: KeysConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.upstream.openweather_url = upstream_base.to_string();
    config.upstream.gnews_url = upstream_base.to_string();
    config.upstream.gemini_url = upstream_base.to_string();
    config.upstream.timeout_seconds = 5;
    config.keys = keys;
    config
}

pub fn all_keys() -> KeysConfig {
    KeysConfig {
        openweather: Some(WEATHER_KEY.to_string()),
        gnews: Some(NEWS_KEY.to_string()),
        gemini: Some(GEMINI_KEY.to_string()),
        geocoding: None,
    }
}

/// 在隨機埠啟動路由，回傳 base URL
pub async fn spawn_app(config: AppConfig) -> anyhow::Result<String> {
    let state = AppState::from_config(&config)?;
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

/// 不需要上游的路由使用
pub async fn spawn_offline_app() -> anyhow::Result<String> {
    spawn_app(config_for("http://127.0.0.1:9", KeysConfig::default())).await
}
