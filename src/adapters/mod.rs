// Adapters layer: concrete clients for the upstream HTTP APIs behind the domain ports.

pub mod gemini;
pub mod gnews;
pub mod openweather;

pub use gemini::GeminiClient;
pub use gnews::GNewsClient;
pub use openweather::OpenWeatherClient;

use crate::config::AppConfig;
use crate::utils::error::Result;
use reqwest::Client;

/// 所有上游共用的連線池
pub fn http_client(config: &AppConfig) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.upstream.timeout())
        .user_agent(concat!("krishi-mitra/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
