use crate::domain::model::{DailyOutlook, Forecast, ForecastSlot, WeatherReading};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::Serialize;

const HOURLY_SLOTS: usize = 8;
const MAX_FORECAST_DAYS: usize = 5;
const MS_TO_KMH: f64 = 3.6;

fn local_time(dt: i64, offset_seconds: i32) -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(offset_seconds).unwrap_or_else(|| Utc.fix());
    DateTime::<Utc>::from_timestamp(dt, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

fn local_date(dt: i64, offset_seconds: i32) -> NaiveDate {
    local_time(dt, offset_seconds).date_naive()
}

/// `3 PM`
pub fn format_hour(dt: i64, offset_seconds: i32) -> String {
    local_time(dt, offset_seconds).format("%-I %p").to_string()
}

/// `Mon, Oct 19`
pub fn format_day(dt: i64, offset_seconds: i32) -> String {
    local_time(dt, offset_seconds).format("%a, %b %-d").to_string()
}

pub fn ms_to_kmh(speed: f64) -> f64 {
    speed * MS_TO_KMH
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEntry {
    pub time: String,
    pub temperature: i64,
    pub description: String,
    pub icon: String,
    pub precipitation: f64,
}

/// 城市查詢使用：前 8 筆（約 24 小時）三小時預報
pub fn hourly_outlook(forecast: &Forecast) -> Vec<HourlyEntry> {
    forecast
        .slots
        .iter()
        .take(HOURLY_SLOTS)
        .map(|slot| HourlyEntry {
            time: format_hour(slot.dt, forecast.timezone_offset),
            temperature: slot.temperature.round() as i64,
            description: slot.description.clone(),
            icon: slot.icon.clone(),
            precipitation: slot.precipitation,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: String,
    #[serde(rename = "temp_max")]
    pub temp_max: f64,
    #[serde(rename = "temp_min")]
    pub temp_min: f64,
    pub precipitation: f64,
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

/// 每個日期只保留第一筆預報，最多 5 天
pub fn daily_outlook(forecast: &Forecast) -> Vec<DailyEntry> {
    let mut seen: Vec<NaiveDate> = Vec::new();
    let mut days = Vec::new();

    for slot in &forecast.slots {
        let date = local_date(slot.dt, forecast.timezone_offset);
        if seen.contains(&date) {
            continue;
        }
        seen.push(date);
        days.push(DailyEntry {
            date: format_day(slot.dt, forecast.timezone_offset),
            temp_max: slot.temp_max,
            temp_min: slot.temp_min,
            precipitation: slot.precipitation,
            humidity: slot.humidity,
            wind_speed: ms_to_kmh(slot.wind_speed),
            description: slot.description.clone(),
            icon: slot.icon.clone(),
        });
        if days.len() >= MAX_FORECAST_DAYS {
            break;
        }
    }
    days
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveEntry {
    pub date: i64,
    pub temp: f64,
    #[serde(rename = "temp_min")]
    pub temp_min: f64,
    #[serde(rename = "temp_max")]
    pub temp_max: f64,
    pub humidity: f64,
    /// km/h
    pub wind_speed: f64,
    pub feels_like: f64,
    pub description: String,
    pub icon: String,
    #[serde(rename = "rain_chance")]
    pub rain_chance: u32,
}

fn rain_chance(pop: Option<f64>) -> u32 {
    pop.map(|p| (p * 100.0).round().max(0.0) as u32).unwrap_or(0)
}

/// 目前天氣作為第一天，其後每個新日期取第一筆，共最多 5 天
pub fn live_outlook(current: &WeatherReading, forecast: &Forecast) -> Vec<LiveEntry> {
    let offset = forecast.timezone_offset;
    let mut seen = vec![local_date(current.dt, offset)];
    let mut entries = vec![LiveEntry {
        date: current.dt,
        temp: current.temperature,
        temp_min: current.temp_min,
        temp_max: current.temp_max,
        humidity: current.humidity,
        wind_speed: ms_to_kmh(current.wind_speed),
        feels_like: current.feels_like,
        description: current.description.clone(),
        icon: current.icon.clone(),
        rain_chance: 0,
    }];

    for slot in &forecast.slots {
        if entries.len() >= MAX_FORECAST_DAYS {
            break;
        }
        let date = local_date(slot.dt, offset);
        if seen.contains(&date) {
            continue;
        }
        seen.push(date);
        entries.push(live_entry(slot));
    }
    entries
}

fn live_entry(slot: &ForecastSlot) -> LiveEntry {
    LiveEntry {
        date: slot.dt,
        temp: slot.temperature,
        temp_min: slot.temp_min,
        temp_max: slot.temp_max,
        humidity: slot.humidity,
        wind_speed: ms_to_kmh(slot.wind_speed),
        feels_like: slot.feels_like,
        description: slot.description.clone(),
        icon: slot.icon.clone(),
        rain_chance: rain_chance(slot.pop),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekEntry {
    pub date: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub description: String,
    pub icon: String,
    pub rain_chance: u32,
}

pub fn week_outlook(days: &[DailyOutlook]) -> Vec<WeekEntry> {
    days.iter()
        .map(|day| WeekEntry {
            date: DateTime::<Utc>::from_timestamp(day.dt, 0)
                .unwrap_or_default()
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            temp_max: day.temp_max,
            temp_min: day.temp_min,
            description: day.description.clone(),
            icon: day.icon.clone(),
            rain_chance: rain_chance(Some(day.pop)),
        })
        .collect()
}
