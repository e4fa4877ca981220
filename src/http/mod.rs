pub mod handlers;
pub mod request_tracing;
pub mod response;

use crate::adapters::{http_client, GNewsClient, GeminiClient, OpenWeatherClient};
use crate::config::AppConfig;
use crate::domain::ports::{NewsSource, TextGenerator, WeatherSource};
use crate::utils::error::Result;
use axum::http::HeaderValue;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// 所有 handler 共用的唯讀狀態
#[derive(Clone)]
pub struct AppState {
    pub weather: Arc<dyn WeatherSource>,
    pub news: Arc<dyn NewsSource>,
    pub generator: Arc<dyn TextGenerator>,
    pub cors_origins: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        news: Arc<dyn NewsSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            weather,
            news,
            generator,
            cors_origins: Arc::new(Vec::new()),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = http_client(config)?;
        let upstream = &config.upstream;
        let keys = &config.keys;

        let weather = OpenWeatherClient::new(
            client.clone(),
            &upstream.openweather_url,
            keys.openweather.clone(),
            keys.geocoding_key().map(str::to_string),
        );
        let news = GNewsClient::new(client.clone(), &upstream.gnews_url, keys.gnews.clone());
        let generator = GeminiClient::new(
            client,
            &upstream.gemini_url,
            &upstream.gemini_model,
            keys.gemini.clone(),
        );

        Ok(Self {
            cors_origins: Arc::new(config.server.cors_origins.clone()),
            ..Self::new(Arc::new(weather), Arc::new(news), Arc::new(generator))
        })
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.trim_end_matches('/').parse().ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/api/crop-recommendation", post(handlers::crop::recommend_handler))
        .route("/api/disease-detection", post(handlers::disease::detect_handler))
        .route(
            "/api/fertilizer-recommendation",
            post(handlers::fertilizer::recommend_handler),
        )
        .route("/api/weather", get(handlers::weather::city_handler))
        .route("/api/weather/current", get(handlers::weather::current_handler))
        .route("/api/weather/forecast", get(handlers::weather::forecast_handler))
        .route("/api/weather/live", get(handlers::weather::live_handler))
        .route("/api/weather/test", get(handlers::weather::test_handler))
        .route("/api/news", get(handlers::news::search_handler))
        .route("/api/consumer/register", post(handlers::register::consumer_handler))
        .route("/api/register", post(handlers::register::farmer_handler))
        .route("/api/products", get(handlers::catalog::products_handler))
        .route("/api/cart/quote", post(handlers::catalog::quote_handler))
        .layer(from_fn(request_tracing::request_tracing_middleware))
        .layer(cors)
        .with_state(state)
}
