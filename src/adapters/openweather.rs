use crate::domain::model::{DailyOutlook, Forecast, ForecastSlot, Place, WeatherReading};
use crate::domain::ports::WeatherSource;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const SERVICE: &str = "OpenWeather";

#[derive(Debug, Deserialize)]
struct Coord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
    #[serde(default)]
    feels_like: f64,
    #[serde(default)]
    temp_min: f64,
    #[serde(default)]
    temp_max: f64,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Condition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct Rain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    coord: Coord,
    #[serde(default)]
    sys: Sys,
    main: MainBlock,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    weather: Vec<Condition>,
    rain: Option<Rain>,
}

#[derive(Debug, Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    wind: Wind,
    #[serde(default)]
    weather: Vec<Condition>,
    rain: Option<Rain>,
    pop: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastCity {
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
    #[serde(default)]
    city: ForecastCity,
}

#[derive(Debug, Deserialize)]
struct DailyTemp {
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct DailyItem {
    dt: i64,
    temp: DailyTemp,
    #[serde(default)]
    weather: Vec<Condition>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    list: Vec<DailyItem>,
}

#[derive(Debug, Deserialize)]
struct GeoPlace {
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: String,
}

fn first_condition(conditions: &[Condition]) -> Condition {
    conditions.first().cloned().unwrap_or_default()
}

impl From<CurrentResponse> for WeatherReading {
    fn from(raw: CurrentResponse) -> Self {
        let condition = first_condition(&raw.weather);
        Self {
            location_name: raw.name,
            country: raw.sys.country,
            dt: raw.dt,
            timezone_offset: raw.timezone,
            lat: raw.coord.lat,
            lon: raw.coord.lon,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            humidity: raw.main.humidity,
            wind_speed: raw.wind.speed,
            precipitation: raw.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            description: condition.description,
            icon: condition.icon,
        }
    }
}

impl From<ForecastItem> for ForecastSlot {
    fn from(raw: ForecastItem) -> Self {
        let condition = first_condition(&raw.weather);
        Self {
            dt: raw.dt,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            humidity: raw.main.humidity,
            wind_speed: raw.wind.speed,
            precipitation: raw.rain.and_then(|r| r.three_hours).unwrap_or(0.0),
            pop: raw.pop,
            description: condition.description,
            icon: condition.icon,
        }
    }
}

impl From<DailyItem> for DailyOutlook {
    fn from(raw: DailyItem) -> Self {
        let condition = first_condition(&raw.weather);
        Self {
            dt: raw.dt,
            temp_min: raw.temp.min,
            temp_max: raw.temp.max,
            pop: raw.pop,
            description: condition.description,
            icon: condition.icon,
        }
    }
}

/// OpenWeather REST 用戶端（metric 單位）
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    geocoding_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        geocoding_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            geocoding_key,
        }
    }

    fn key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::missing_api_key("Weather"))
    }

    /// 送出 GET；失敗時優先使用上游回傳的 `message`
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        key: &str,
        fallback_message: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("🌦️ OpenWeather GET {} {:?} (appid=[REDACTED])", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("appid", key)])
            .send()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))?;

        let status = response.status();
        tracing::debug!("OpenWeather response status: {}", status);

        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback_message);
            tracing::warn!("⚠️ OpenWeather {} failed with {}: {}", path, status, message);
            return Err(AppError::upstream(SERVICE, Some(status.as_u16()), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ApiError(e.without_url()))
    }

    fn coords(lat: f64, lon: f64) -> Vec<(&'static str, String)> {
        vec![("lat", lat.to_string()), ("lon", lon.to_string())]
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current_by_city(&self, city: &str) -> Result<WeatherReading> {
        let key = self.key()?;
        let params = [("q", city.to_string()), ("units", "metric".to_string())];
        let raw: CurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                &params,
                key,
                "Failed to fetch current weather data",
            )
            .await?;
        Ok(raw.into())
    }

    async fn current_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherReading> {
        let key = self.key()?;
        let mut params = Self::coords(lat, lon);
        params.push(("units", "metric".to_string()));
        let raw: CurrentResponse = self
            .get_json(
                "/data/2.5/weather",
                &params,
                key,
                "Failed to fetch current weather data",
            )
            .await?;
        Ok(raw.into())
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Forecast> {
        let key = self.key()?;
        let mut params = Self::coords(lat, lon);
        params.push(("units", "metric".to_string()));
        let raw: ForecastResponse = self
            .get_json("/data/2.5/forecast", &params, key, "Failed to fetch forecast data")
            .await?;
        Ok(Forecast {
            timezone_offset: raw.city.timezone,
            slots: raw.list.into_iter().map(ForecastSlot::from).collect(),
        })
    }

    async fn daily_forecast(&self, lat: f64, lon: f64, days: u8) -> Result<Vec<DailyOutlook>> {
        let key = self.key()?;
        let mut params = Self::coords(lat, lon);
        params.push(("cnt", days.to_string()));
        params.push(("units", "metric".to_string()));
        let raw: DailyResponse = self
            .get_json(
                "/data/2.5/forecast/daily",
                &params,
                key,
                "Failed to fetch forecast data",
            )
            .await?;
        Ok(raw.list.into_iter().map(DailyOutlook::from).collect())
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Option<Place>> {
        let key = self
            .geocoding_key
            .as_deref()
            .or(self.api_key.as_deref())
            .ok_or_else(|| AppError::missing_api_key("Weather"))?;
        let mut params = Self::coords(lat, lon);
        params.push(("limit", "1".to_string()));
        let places: Vec<GeoPlace> = self
            .get_json("/geo/1.0/reverse", &params, key, "Failed to resolve location")
            .await?;

        Ok(places
            .into_iter()
            .next()
            .filter(|place| !place.name.is_empty())
            .map(|place| Place {
                name: place.name,
                country: place.country,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_response_conversion() {
        let raw: CurrentResponse = serde_json::from_value(json!({
            "name": "Hyderabad",
            "dt": 1729468800,
            "timezone": 19800,
            "coord": {"lat": 17.385, "lon": 78.4867},
            "sys": {"country": "IN"},
            "main": {"temp": 31.2, "feels_like": 33.0, "temp_min": 30.0, "temp_max": 32.0, "humidity": 40},
            "wind": {"speed": 6.1},
            "weather": [{"description": "haze", "icon": "50d"}],
            "rain": {"1h": 0.4}
        }))
        .unwrap();

        let reading = WeatherReading::from(raw);
        assert_eq!(reading.location_name, "Hyderabad");
        assert_eq!(reading.country.as_deref(), Some("IN"));
        assert_eq!(reading.timezone_offset, 19_800);
        assert_eq!(reading.precipitation, 0.4);
        assert_eq!(reading.description, "haze");
    }

    #[test]
    fn test_forecast_item_without_rain_or_weather() {
        let raw: ForecastItem = serde_json::from_value(json!({
            "dt": 1729468800,
            "main": {"temp": 20.0},
            "weather": []
        }))
        .unwrap();

        let slot = ForecastSlot::from(raw);
        assert_eq!(slot.precipitation, 0.0);
        assert_eq!(slot.pop, None);
        assert!(slot.description.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_before_any_request() {
        let client = OpenWeatherClient::new(Client::new(), "http://127.0.0.1:9", None, None);
        let err = client.current_by_city("Pune").await.unwrap_err();
        assert_eq!(err.to_string(), "Weather API key not configured");
        assert_eq!(err.status_code(), 500);
    }
}
