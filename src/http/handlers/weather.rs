use crate::core::advisory::{
    city_profile, crop_advice, estimated_soil_temp, field_summary, irrigation_status, soil_temp_from_range,
    suitable_crops, weather_alerts, FieldSummary,
};
use crate::core::forecast::{
    daily_outlook, hourly_outlook, live_outlook, ms_to_kmh, week_outlook, DailyEntry, HourlyEntry,
    LiveEntry, WeekEntry,
};
use crate::domain::model::{IrrigationStatus, WeatherAlert};
use crate::http::AppState;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::require_param;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// `/api/weather/test` 使用的固定座標（海德拉巴）
pub const TEST_LAT: f64 = 17.3850;
pub const TEST_LON: f64 = 78.4867;

const WEEK_DAYS: u8 = 7;
const LOCATION_UNKNOWN: &str = "Location unknown";

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    city: Option<String>,
    lat: Option<String>,
    lon: Option<String>,
}

fn parse_coordinate(raw: &str, limit: f64) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && v.abs() <= limit)
        .ok_or_else(|| AppError::invalid_input("Invalid latitude or longitude"))
}

impl WeatherParams {
    fn coordinates(&self, message: &str) -> Result<(f64, f64)> {
        let lat = require_param(&self.lat, message)?;
        let lon = require_param(&self.lon, message)?;
        Ok((parse_coordinate(lat, 90.0)?, parse_coordinate(lon, 180.0)?))
    }

    /// 座標與城市名稱都是必填
    fn coordinates_and_city(&self) -> Result<(f64, f64, &str)> {
        const MESSAGE: &str = "Latitude, longitude, and city name are required";
        let (lat, lon) = self.coordinates(MESSAGE)?;
        let city = require_param(&self.city, MESSAGE)?;
        Ok((lat, lon, city))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityConditions {
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub precipitation: f64,
    pub estimated_soil_temp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    pub location: String,
    /// 已知城市所屬的邦
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    pub dt: i64,
    pub weather: CityConditions,
    pub suitable_crops: Vec<String>,
    pub irrigation_status: IrrigationStatus,
    pub crop_advice: Vec<String>,
    pub forecast: Vec<HourlyEntry>,
    pub alerts: Vec<WeatherAlert>,
}

/// GET /api/weather?city=
pub async fn city_handler(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<CityWeather>> {
    let city = require_param(&params.city, "City name is required")?;

    let current = state
        .weather
        .current_by_city(city)
        .await
        .map_err(|e| match e {
            AppError::UpstreamError { ref message, .. } if message == "city not found" => {
                AppError::upstream("OpenWeather", Some(404), format!("City not found: {}", city))
            }
            other => other.with_generic_upstream_message("Failed to fetch weather data"),
        })?;

    let forecast = state
        .weather
        .forecast(current.lat, current.lon)
        .await
        .map_err(|e| e.with_generic_upstream_message("Failed to fetch forecast data"))?;

    let temp = current.temperature;
    let crops = suitable_crops(city, temp);
    let irrigation = irrigation_status(temp, current.humidity, current.wind_speed, current.precipitation);
    let advice = crop_advice(temp, current.humidity, current.wind_speed, &crops);
    let alerts = weather_alerts(temp, current.humidity, current.wind_speed);

    let location = match &current.country {
        Some(country) => format!("{}, {}", current.location_name, country),
        None => current.location_name.clone(),
    };
    tracing::info!("🌤️ Weather for {}: {:.1}°C, {} alert(s)", location, temp, alerts.len());

    Ok(Json(CityWeather {
        location,
        state: city_profile(city).map(|profile| profile.state),
        dt: current.dt,
        weather: CityConditions {
            temperature: temp.round() as i64,
            feels_like: current.feels_like.round() as i64,
            humidity: current.humidity,
            wind_speed: current.wind_speed,
            description: current.description.clone(),
            icon: current.icon.clone(),
            precipitation: current.precipitation,
            estimated_soil_temp: estimated_soil_temp(temp),
        },
        suitable_crops: crops,
        irrigation_status: irrigation,
        crop_advice: advice,
        forecast: hourly_outlook(&forecast),
        alerts,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub location: String,
    pub temp: f64,
    #[serde(rename = "temp_min")]
    pub temp_min: f64,
    #[serde(rename = "temp_max")]
    pub temp_max: f64,
    pub humidity: f64,
    pub description: String,
    pub icon: String,
    /// km/h
    pub wind_speed: f64,
    pub precipitation: f64,
    pub soil_temp: i64,
    pub forecast: Vec<DailyEntry>,
    pub agricultural: FieldSummary,
}

/// GET /api/weather/current?lat=&lon=&city=
pub async fn current_handler(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<CurrentWeather>> {
    let (lat, lon, city) = params.coordinates_and_city()?;

    let current = state.weather.current_by_coords(lat, lon).await?;
    let forecast = state.weather.forecast(lat, lon).await?;

    let wind_kmh = ms_to_kmh(current.wind_speed);
    let agricultural = field_summary(
        current.temperature,
        current.humidity,
        wind_kmh,
        current.precipitation,
    );

    Ok(Json(CurrentWeather {
        location: city.to_string(),
        temp: current.temperature,
        temp_min: current.temp_min,
        temp_max: current.temp_max,
        humidity: current.humidity,
        description: current.description.clone(),
        icon: current.icon.clone(),
        wind_speed: wind_kmh,
        precipitation: current.precipitation,
        soil_temp: soil_temp_from_range(current.temperature, current.temp_min),
        forecast: daily_outlook(&forecast),
        agricultural,
    }))
}

#[derive(Debug, Serialize)]
pub struct WeekForecast {
    pub location: String,
    pub forecast: Vec<WeekEntry>,
}

/// GET /api/weather/forecast?lat=&lon=
pub async fn forecast_handler(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeekForecast>> {
    let (lat, lon) = params.coordinates("Latitude and longitude are required")?;

    // 地名查詢失敗不影響預報
    let location = match state.weather.reverse_geocode(lat, lon).await {
        Ok(Some(place)) => format!("{}, {}", place.name, place.country),
        Ok(None) => LOCATION_UNKNOWN.to_string(),
        Err(e) => {
            tracing::warn!("⚠️ Reverse geocoding failed: {}", e);
            LOCATION_UNKNOWN.to_string()
        }
    };

    let days = state
        .weather
        .daily_forecast(lat, lon, WEEK_DAYS)
        .await
        .map_err(|e| e.with_generic_upstream_message("Failed to fetch weather forecast"))?;

    Ok(Json(WeekForecast {
        location,
        forecast: week_outlook(&days),
    }))
}

#[derive(Debug, Serialize)]
pub struct LiveForecast {
    pub location: String,
    pub forecast: Vec<LiveEntry>,
}

/// GET /api/weather/live?lat=&lon=&city=
pub async fn live_handler(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<LiveForecast>> {
    let (lat, lon, city) = params.coordinates_and_city()?;
    let generic = |e: AppError| e.with_generic_upstream_message("Failed to fetch weather data");

    let current = state.weather.current_by_coords(lat, lon).await.map_err(generic)?;
    let forecast = state.weather.forecast(lat, lon).await.map_err(generic)?;

    Ok(Json(LiveForecast {
        location: city.to_string(),
        forecast: live_outlook(&current, &forecast),
    }))
}

/// GET /api/weather/test：以固定座標檢查 OpenWeather 金鑰是否可用
pub async fn test_handler(State(state): State<AppState>) -> Response {
    match state.weather.current_by_coords(TEST_LAT, TEST_LON).await {
        Ok(reading) => Json(json!({
            "status": "success",
            "message": "API key is working correctly",
            "data": {
                "city": reading.location_name,
                "temp": reading.temperature,
                "description": reading.description,
                "humidity": reading.humidity,
                "windSpeed": reading.wind_speed,
            }
        }))
        .into_response(),
        Err(AppError::MissingApiKey { .. }) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "error",
                "message": "OpenWeather API key is not configured in environment variables",
            })),
        )
            .into_response(),
        Err(AppError::UpstreamError {
            status: Some(code),
            message,
            ..
        }) => {
            tracing::warn!("⚠️ OpenWeather key check failed with {}: {}", code, message);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                Json(json!({
                    "status": "error",
                    "message": message,
                    "code": code,
                    "details": "Please ensure your API key is correct and activated",
                })),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("❌ OpenWeather key check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": e.user_friendly_message(),
                    "details": "An unexpected error occurred while testing the API key",
                })),
            )
                .into_response()
        }
    }
}
