use crate::domain::model::{DailyOutlook, Forecast, NewsPage, NewsQuery, Place, WeatherReading};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 天氣資料來源（OpenWeather 或測試替身）
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current_by_city(&self, city: &str) -> Result<WeatherReading>;
    async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReading>;
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast>;
    async fn daily_forecast(&self, lat: f64, lon: f64, days: u8) -> Result<Vec<DailyOutlook>>;
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<Place>>;
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, query: &NewsQuery) -> Result<NewsPage>;
}

/// 生成式文字模型
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
