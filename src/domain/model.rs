use serde::{Deserialize, Serialize};

/// 閉區間 [min, max]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaterRequirement {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl WaterRequirement {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CropProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub nitrogen: Range,
    pub phosphorus: Range,
    pub potassium: Range,
    pub ph: Range,
    /// tons/hectare
    pub yield_range: Range,
    pub states: &'static [&'static str],
    pub seasons: &'static [&'static str],
    pub water: WaterRequirement,
    /// INR
    pub investment_per_acre: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilSample {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    /// mm/year
    pub rainfall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Profitability {
    High,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecommendation {
    pub name: String,
    pub confidence: u32,
    pub expected_yield: String,
    pub profitability: Profitability,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone)]
pub struct DiseaseProfile {
    pub crop: &'static str,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub pesticides: &'static [&'static str],
    pub severity: Severity,
    pub treatment_timeline: &'static str,
    pub preventive_measures: &'static [&'static str],
}

/// 前端分類器回報的一筆偵測結果
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub crop: String,
    pub disease: String,
    pub confidence: Option<f64>,
}

/// `diseases` 保留原始 JSON，格式不符的項目在對照時略過
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub diseases: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub primary_crop: Option<String>,
    #[serde(default)]
    pub primary_part: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiseaseDetails {
    pub name: &'static str,
    pub description: &'static str,
    pub pesticides: &'static [&'static str],
    pub severity: Severity,
    pub treatment_timeline: &'static str,
    pub preventive_measures: &'static [&'static str],
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectedDisease {
    pub name: &'static str,
    pub confidence: Option<f64>,
    pub details: DiseaseDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_crop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_part: Option<String>,
    pub has_disease: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diseases: Option<Vec<DetectedDisease>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 目前天氣（已從上游格式轉換）
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub location_name: String,
    pub country: Option<String>,
    pub dt: i64,
    /// 與 UTC 的秒數差
    pub timezone_offset: i32,
    pub lat: f64,
    pub lon: f64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// mm in the last hour
    pub precipitation: f64,
    pub description: String,
    pub icon: String,
}

/// 三小時一筆的預報
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    pub dt: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// mm in the 3h window
    pub precipitation: f64,
    /// probability of precipitation, 0..=1
    pub pop: Option<f64>,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub timezone_offset: i32,
    pub slots: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOutlook {
    pub dt: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pop: f64,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryLevel {
    Info,
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrigationStatus {
    pub status: &'static str,
    pub level: AdvisoryLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    HighTemperature,
    LowTemperature,
    HighHumidity,
    HighWind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherAlert {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: &'static str,
    pub recommendations: [&'static str; 3],
}

#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    pub query: String,
    pub category: Option<String>,
    pub max: u32,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    pub published_at: String,
    pub source: ArticleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: u32,
    pub name: &'static str,
    pub image: &'static str,
    /// INR per unit
    pub price: u64,
    pub unit: &'static str,
    pub description: &'static str,
    pub stock: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: u32,
    pub name: &'static str,
    pub unit: &'static str,
    pub price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuote {
    pub lines: Vec<CartLine>,
    pub subtotal: u64,
    pub delivery_charge: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_midpoint_and_contains() {
        let ph = Range::new(5.5, 7.5);
        assert_eq!(ph.midpoint(), 6.5);
        assert!(ph.contains(5.5));
        assert!(ph.contains(7.5));
        assert!(!ph.contains(7.6));
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_value(Profitability::MediumHigh).unwrap(),
            serde_json::json!("Medium-High")
        );
        assert_eq!(
            serde_json::to_value(WaterRequirement::VeryHigh).unwrap(),
            serde_json::json!("Very High")
        );
        assert_eq!(
            serde_json::to_value(AlertType::HighTemperature).unwrap(),
            serde_json::json!("high_temperature")
        );
        assert_eq!(serde_json::to_value(Severity::High).unwrap(), serde_json::json!("high"));
    }
}
