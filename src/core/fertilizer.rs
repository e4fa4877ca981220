use crate::utils::error::{AppError, Result};
use crate::utils::validation::{is_blank, parse_number};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// 已驗證的土壤檢測結果與目標作物
#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerRequest {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub ph: f64,
    pub crop_name: String,
}

/// 作物名稱接受字串或數字，空字串視為缺少
fn crop_name_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

impl FertilizerRequest {
    pub fn from_json(body: &Value) -> Result<Self> {
        let fields = ["nitrogen", "phosphorus", "potassium", "ph"].map(|f| body.get(f));
        let crop_name = crop_name_text(body.get("cropName"));

        if fields.iter().any(|v| is_blank_value(*v)) || crop_name.is_none() {
            return Err(AppError::invalid_input(
                "Missing required fields: N, P, K, pH, and Crop Name are required.",
            ));
        }

        let numbers: Vec<f64> = fields.iter().filter_map(|v| parse_number(*v)).collect();
        let &[nitrogen, phosphorus, potassium, ph] = numbers.as_slice() else {
            return Err(AppError::invalid_input(
                "Invalid input: N, P, K, and pH values must be numbers.",
            ));
        };
        if !(0.0..=14.0).contains(&ph) {
            return Err(AppError::invalid_input(
                "Invalid input: pH value must be between 0 and 14.",
            ));
        }

        Ok(Self {
            nitrogen,
            phosphorus,
            potassium,
            ph,
            crop_name: crop_name.unwrap_or_default(),
        })
    }

    pub fn prompt(&self) -> String {
        let crop = &self.crop_name;
        format!(
            "You are an agricultural expert providing fertilizer recommendations.
Given the following soil test results and the intended crop, provide practical fertilizer advice.

Soil Nitrogen (N): {n} ppm (or kg/ha, assume standard units)
Soil Phosphorus (P): {p} ppm (or kg/ha)
Soil Potassium (K): {k} ppm (or kg/ha)
Soil pH: {ph}
Intended Crop: {crop}

Based on general nutrient requirements for {crop} and the provided soil data:
1. State whether N, P, and K levels appear Low, Adequate, or High for this crop.
2. Suggest specific actions to correct deficiencies (e.g., \"Increase Nitrogen application\").
3. Recommend common fertilizer types suitable for correcting these deficiencies (e.g., Urea for N, DAP for P, MOP for K). Mention balanced NPK fertilizers if appropriate.
4. Briefly mention any potential issues related to the pH level for {crop}.

Keep the recommendations concise and practical for a farmer. Format the output as a simple list of suggestions (e.g., using bullet points or numbered list). Do not include greetings or conversational filler.",
            n = self.nitrogen,
            p = self.phosphorus,
            k = self.potassium,
            ph = self.ph,
        )
    }
}

// `0` 與 `false` 在這裡視為有值，只有缺少、null 或空字串算缺漏
fn is_blank_value(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Number(_)) | Some(Value::Bool(_)) => false,
        other => is_blank(other),
    }
}

fn bullet_prefix() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| Regex::new(r"^[*-]\s*").expect("bullet pattern is valid"))
}

/// 將模型回覆拆成逐行建議，去除項目符號與空行
pub fn parse_suggestions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| bullet_prefix().replace(line.trim(), "").into_owned())
        .filter(|line| !line.is_empty())
        .collect()
}
