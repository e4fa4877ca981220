//! Rule-based agronomic advice derived from current weather.
//!
//! Thresholds are illustrative field heuristics. Temperatures are °C,
//! humidity is %, precipitation is mm and wind is m/s unless a function
//! says otherwise.

use crate::domain::model::{
    AdvisoryLevel, AlertType, IrrigationStatus, Severity, WeatherAlert,
};
use serde::Serialize;

const MAX_ADVICE_ITEMS: usize = 3;

pub struct CityProfile {
    pub city: &'static str,
    pub state: &'static str,
    pub crops: &'static [&'static str],
}

pub static CITY_CROPS: &[CityProfile] = &[
    CityProfile {
        city: "hyderabad",
        state: "Telangana",
        crops: &["Rice (Paddy)", "Cotton", "Maize", "Sorghum", "Groundnut"],
    },
    CityProfile {
        city: "mumbai",
        state: "Maharashtra",
        crops: &["Rice (Coastal)", "Sorghum", "Bajra", "Sugarcane", "Cotton"],
    },
    CityProfile {
        city: "chennai",
        state: "Tamil Nadu",
        crops: &["Rice", "Groundnut", "Sugarcane", "Cotton", "Coconut"],
    },
    CityProfile {
        city: "kolkata",
        state: "West Bengal",
        crops: &["Rice", "Jute", "Potatoes", "Mustard", "Vegetables"],
    },
    CityProfile {
        city: "delhi",
        state: "Delhi NCR",
        crops: &["Wheat", "Mustard", "Vegetables", "Bajra"],
    },
    CityProfile {
        city: "lucknow",
        state: "Uttar Pradesh",
        crops: &["Wheat", "Sugarcane", "Rice", "Potatoes", "Mustard"],
    },
    CityProfile {
        city: "jaipur",
        state: "Rajasthan",
        crops: &["Bajra", "Mustard", "Wheat", "Pulses", "Groundnut"],
    },
    CityProfile {
        city: "shimla",
        state: "Himachal Pradesh",
        crops: &["Apples", "Potatoes", "Maize", "Wheat", "Barley"],
    },
    CityProfile {
        city: "bhopal",
        state: "Madhya Pradesh",
        crops: &["Soybean", "Wheat", "Pulses", "Maize", "Cotton"],
    },
];

pub fn city_profile(city: &str) -> Option<&'static CityProfile> {
    let city = city.trim().to_lowercase();
    CITY_CROPS.iter().find(|profile| profile.city == city)
}

/// 灌溉建議：依優先順序取第一個符合的規則
pub fn irrigation_status(
    temp: f64,
    humidity: f64,
    wind_speed: f64,
    precipitation: f64,
) -> IrrigationStatus {
    use AdvisoryLevel::*;

    let status = |status: &'static str, level: AdvisoryLevel| IrrigationStatus { status, level };

    if precipitation > 1.0 {
        return status("Recent significant rain. Irrigation likely unnecessary.", Success);
    }
    if precipitation > 0.1 {
        return status(
            "Light recent rain detected. Check soil moisture before irrigating.",
            Success,
        );
    }

    let is_hot = temp > 32.0;
    let is_dry = humidity < 45.0;
    let is_windy = wind_speed > 5.0;

    if is_hot && is_dry && is_windy {
        return status(
            "Hot, dry, and windy. High evaporation likely. Monitor soil urgently.",
            Warning,
        );
    }
    if is_hot && is_dry {
        return status(
            "Hot and dry conditions. Increased evaporation likely. Check soil moisture.",
            Warning,
        );
    }
    if is_hot {
        return status(
            "High temperatures detected. Monitor soil moisture closely.",
            Warning,
        );
    }
    if is_dry && is_windy {
        return status(
            "Dry and windy. Increased evaporation likely. Check soil moisture.",
            Warning,
        );
    }

    if temp < 10.0 {
        return status(
            "Cool conditions reduce immediate need. Check soil before irrigating.",
            Info,
        );
    }
    if humidity > 80.0 {
        return status(
            "High humidity reduces evaporation. Check soil moisture if needed.",
            Info,
        );
    }

    status(
        "Conditions moderate. Monitor soil moisture and irrigate as needed.",
        Info,
    )
}

pub fn crop_advice(temp: f64, humidity: f64, wind_speed: f64, suitable_crops: &[String]) -> Vec<String> {
    match suitable_crops.first() {
        None => return vec!["Current conditions are not ideal for the primary listed crops.".to_string()],
        Some(first) if first.contains("Not suitable") => {
            return vec!["Current conditions are not ideal for the primary listed crops.".to_string()]
        }
        Some(_) => {}
    }

    let crops = suitable_crops.join(", ");
    let mut advice = Vec::new();

    if temp > 35.0 {
        advice.push(format!(
            "Extreme Heat: High stress likely for {crops}. Ensure adequate water, consider shade."
        ));
    } else if temp > 30.0 {
        advice.push(format!(
            "High Temperature: Increase watering frequency for {crops} if soil is dry."
        ));
    }

    if humidity > 85.0 {
        advice.push(format!(
            "High Humidity: Increases fungal risk for {crops}. Ensure good air circulation."
        ));
    }

    if wind_speed > 12.0 {
        advice.push(format!(
            "Strong Winds: Potential for physical damage or affecting spraying operations for {crops}."
        ));
    }

    if temp < 10.0 {
        advice.push(format!(
            "Low Temperatures: Growth may slow for {crops}. Protect sensitive plants if frost is forecast."
        ));
    }

    if advice.is_empty() {
        advice.push(format!(
            "Current conditions seem generally favorable for {crops}. Monitor forecasts."
        ));
    }

    advice.truncate(MAX_ADVICE_ITEMS);
    advice
}

pub fn weather_alerts(temperature: f64, humidity: f64, wind_speed: f64) -> Vec<WeatherAlert> {
    let mut alerts = Vec::new();

    if temperature > 35.0 {
        alerts.push(WeatherAlert {
            alert_type: AlertType::HighTemperature,
            severity: Severity::High,
            message: "Extreme heat conditions. Increase irrigation and provide shade for sensitive crops.",
            recommendations: [
                "Water plants early morning or evening",
                "Apply mulch to retain moisture",
                "Monitor for heat stress symptoms",
            ],
        });
    } else if temperature > 30.0 {
        alerts.push(WeatherAlert {
            alert_type: AlertType::HighTemperature,
            severity: Severity::Medium,
            message: "High temperature conditions. Consider adjusting irrigation schedule.",
            recommendations: [
                "Maintain regular watering schedule",
                "Check soil before watering",
                "Protect sensitive crops",
            ],
        });
    }

    if temperature < 5.0 {
        alerts.push(WeatherAlert {
            alert_type: AlertType::LowTemperature,
            severity: Severity::High,
            message: "Potential frost conditions. Protect sensitive crops.",
            recommendations: [
                "Cover vulnerable plants",
                "Ensure soil is moist (helps retain heat)",
                "Monitor forecasts closely",
            ],
        });
    }

    if humidity > 85.0 {
        alerts.push(WeatherAlert {
            alert_type: AlertType::HighHumidity,
            severity: Severity::High,
            message: "High humidity levels increase risk of fungal diseases.",
            recommendations: [
                "Monitor for disease symptoms",
                "Ensure proper ventilation/spacing",
                "Consider preventative fungicide application if necessary",
            ],
        });
    }

    if wind_speed > 15.0 {
        alerts.push(WeatherAlert {
            alert_type: AlertType::HighWind,
            severity: Severity::Medium,
            message: "Strong winds may damage crops and affect spraying operations.",
            recommendations: [
                "Delay pesticide/fertilizer application if possible",
                "Secure row covers or tunnels",
                "Check for physical damage to plants/structures",
            ],
        });
    }

    alerts
}

/// 先查城市表，查不到時依氣溫分段
pub fn suitable_crops(city: &str, temp: f64) -> Vec<String> {
    if let Some(profile) = city_profile(city) {
        return profile.crops.iter().map(|c| c.to_string()).collect();
    }

    let crops: &[&str] = if temp < 5.0 {
        &["Conditions too cold for most common crops"]
    } else if temp < 15.0 {
        &["Wheat", "Barley", "Mustard", "Potatoes", "Carrots"]
    } else if temp < 25.0 {
        &["Maize", "Rice (Paddy)", "Soybean", "Tomatoes", "Beans"]
    } else if temp < 35.0 {
        &["Cotton", "Sorghum", "Groundnut", "Millet", "Sugarcane"]
    } else {
        &["Heat tolerant varieties (e.g., certain Millets, Dates)"]
    };
    crops.iter().map(|c| c.to_string()).collect()
}

/// 座標查詢路徑使用的農業摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub irrigation_status: &'static str,
    pub risks: Vec<&'static str>,
    pub suitable_crops: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
}

/// `wind_kmh` 為 km/h
pub fn field_summary(temp: f64, humidity: f64, wind_kmh: f64, precipitation: f64) -> FieldSummary {
    let mut irrigation_status = "Suitable for irrigation";
    let mut risks = Vec::new();
    let mut recommendations = Vec::new();

    if precipitation > 0.0 {
        irrigation_status = "Not suitable for irrigation";
        risks.push("Rainfall may affect dry-field operations");
        recommendations.push("Delay fertilizer application to prevent runoff");
        recommendations.push("Hold off on pesticide application as rain may wash it away");
    }

    if humidity > 80.0 {
        risks.push("High humidity may increase disease risk");
        recommendations.push("Monitor crops for fungal diseases");
        recommendations.push("Ensure proper ventilation in greenhouses");
    }

    if temp > 35.0 {
        risks.push("High temperature stress on crops");
        recommendations.push("Consider additional irrigation");
        recommendations.push("Apply mulch to retain soil moisture");
    }

    if wind_kmh > 20.0 {
        risks.push("High wind speeds may damage crops");
        recommendations.push("Consider wind barriers if persistent");
        recommendations.push("Monitor for physical damage to plants");
    }

    FieldSummary {
        irrigation_status,
        risks,
        suitable_crops: crops_for_conditions(temp, humidity, precipitation),
        recommendations,
    }
}

pub fn crops_for_conditions(temp: f64, humidity: f64, precipitation: f64) -> Vec<&'static str> {
    let mut crops: Vec<&'static str> = Vec::new();

    if (25.0..=35.0).contains(&temp) {
        crops.extend(["Cotton", "Sugarcane", "Rice"]);
    }
    if (20.0..=30.0).contains(&temp) {
        crops.extend(["Wheat", "Maize", "Soybean"]);
    }
    if (15.0..=25.0).contains(&temp) {
        crops.extend(["Potato", "Peas", "Tomato"]);
    }
    if (60.0..=80.0).contains(&humidity) {
        crops.extend(["Mushroom", "Tea", "Coffee"]);
    }
    if precipitation > 0.0 {
        crops.extend(["Rice", "Jute", "Tea"]);
    } else {
        crops.extend(["Millet", "Sorghum", "Chickpea"]);
    }

    let mut unique = Vec::with_capacity(crops.len());
    for crop in crops {
        if !unique.contains(&crop) {
            unique.push(crop);
        }
    }
    unique
}

/// 以氣溫粗估土壤溫度
pub fn estimated_soil_temp(air_temp: f64) -> i64 {
    (air_temp - 2.0).round() as i64
}

pub fn soil_temp_from_range(temp: f64, temp_min: f64) -> i64 {
    ((temp + temp_min) / 2.0).round() as i64
}
