use crate::domain::model::{
    CropProfile, CropRecommendation, Profitability, Range, SoilSample, WaterRequirement,
};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::parse_number;
use serde_json::Value;

/// 只推薦分數高於此值的作物
pub const MIN_RECOMMEND_SCORE: u32 = 50;
pub const MAX_RECOMMENDATIONS: usize = 3;

const SUB_SCORE_WEIGHT: f64 = 0.2;

pub static CROPS: &[CropProfile] = &[
    CropProfile {
        key: "rice",
        name: "Rice",
        nitrogen: Range::new(60.0, 120.0),
        phosphorus: Range::new(30.0, 60.0),
        potassium: Range::new(30.0, 60.0),
        ph: Range::new(5.5, 7.5),
        yield_range: Range::new(3.5, 6.5),
        states: &[
            "andhra-pradesh",
            "telangana",
            "tamil-nadu",
            "kerala",
            "karnataka",
            "punjab",
            "haryana",
            "bihar",
            "west-bengal",
        ],
        seasons: &["kharif", "rabi"],
        water: WaterRequirement::High,
        investment_per_acre: 25_000,
    },
    CropProfile {
        key: "wheat",
        name: "Wheat",
        nitrogen: Range::new(100.0, 150.0),
        phosphorus: Range::new(50.0, 80.0),
        potassium: Range::new(40.0, 70.0),
        ph: Range::new(6.0, 7.5),
        yield_range: Range::new(3.0, 5.5),
        states: &[
            "punjab",
            "haryana",
            "uttar-pradesh",
            "madhya-pradesh",
            "rajasthan",
            "bihar",
        ],
        seasons: &["rabi"],
        water: WaterRequirement::Medium,
        investment_per_acre: 20_000,
    },
    CropProfile {
        key: "cotton",
        name: "Cotton",
        nitrogen: Range::new(80.0, 120.0),
        phosphorus: Range::new(40.0, 60.0),
        potassium: Range::new(40.0, 80.0),
        ph: Range::new(6.0, 8.0),
        yield_range: Range::new(1.5, 2.5),
        states: &[
            "gujarat",
            "maharashtra",
            "telangana",
            "andhra-pradesh",
            "punjab",
            "haryana",
        ],
        seasons: &["kharif"],
        water: WaterRequirement::Medium,
        investment_per_acre: 35_000,
    },
    CropProfile {
        key: "sugarcane",
        name: "Sugarcane",
        nitrogen: Range::new(150.0, 200.0),
        phosphorus: Range::new(60.0, 100.0),
        potassium: Range::new(50.0, 90.0),
        ph: Range::new(6.0, 7.5),
        yield_range: Range::new(60.0, 100.0),
        states: &[
            "uttar-pradesh",
            "maharashtra",
            "karnataka",
            "tamil-nadu",
            "bihar",
        ],
        seasons: &["spring", "autumn"],
        water: WaterRequirement::VeryHigh,
        investment_per_acre: 45_000,
    },
    CropProfile {
        key: "maize",
        name: "Maize",
        nitrogen: Range::new(120.0, 160.0),
        phosphorus: Range::new(50.0, 80.0),
        potassium: Range::new(40.0, 80.0),
        ph: Range::new(5.5, 7.5),
        yield_range: Range::new(4.0, 8.0),
        states: &[
            "karnataka",
            "andhra-pradesh",
            "telangana",
            "rajasthan",
            "madhya-pradesh",
        ],
        seasons: &["kharif", "rabi"],
        water: WaterRequirement::Medium,
        investment_per_acre: 22_000,
    },
];

/// 年雨量需求 (mm)：min / optimal / max
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainfallBand {
    pub min: f64,
    pub optimal: f64,
    pub max: f64,
}

impl WaterRequirement {
    pub fn rainfall_band(&self) -> RainfallBand {
        match self {
            Self::VeryHigh => RainfallBand { min: 1500.0, optimal: 2000.0, max: 3000.0 },
            Self::High => RainfallBand { min: 1000.0, optimal: 1500.0, max: 2000.0 },
            Self::Medium => RainfallBand { min: 700.0, optimal: 1000.0, max: 1500.0 },
            Self::Low => RainfallBand { min: 350.0, optimal: 700.0, max: 1000.0 },
        }
    }
}

impl SoilSample {
    /// 從請求 JSON 解析並驗證土壤數據
    pub fn from_json(body: &Value) -> Result<Self> {
        let fields = ["nitrogen", "phosphorus", "potassium", "ph", "rainfall"];
        let mut values = [0.0_f64; 5];
        for (slot, field) in values.iter_mut().zip(fields) {
            *slot = parse_number(body.get(field)).ok_or_else(|| {
                AppError::invalid_input("Invalid input: All values must be numbers.")
            })?;
        }

        let [nitrogen, phosphorus, potassium, ph, rainfall] = values;
        let sample = Self {
            nitrogen,
            phosphorus,
            potassium,
            ph,
            rainfall,
        };
        sample.validate()?;
        Ok(sample)
    }

    pub fn validate(&self) -> Result<()> {
        let all = [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.ph,
            self.rainfall,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(AppError::invalid_input(
                "Invalid input: All values must be numbers.",
            ));
        }
        if all.iter().all(|v| *v == 0.0) {
            return Err(AppError::invalid_input(
                "Invalid input: Cannot generate recommendations with all zero values.",
            ));
        }
        if !(0.0..=14.0).contains(&self.ph) {
            return Err(AppError::invalid_input(
                "Invalid input: pH value must be between 0 and 14.",
            ));
        }
        Ok(())
    }
}

/// 各子分數皆落在 [0, 1]，負值輸入得 0
pub fn nutrient_score(value: f64, requirement: Range) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    let score = if value < requirement.min {
        value / requirement.min
    } else if value > requirement.max {
        requirement.max / value
    } else {
        1.0
    };
    score.clamp(0.0, 1.0)
}

pub fn ph_score(ph: f64, requirement: Range) -> f64 {
    if ph.is_nan() {
        return 0.0;
    }
    if requirement.contains(ph) {
        return 1.0;
    }
    let mid = requirement.midpoint();
    let distance = (ph - mid).abs();
    let max_distance = (requirement.max - mid).abs().max((requirement.min - mid).abs());
    (1.0 - distance / max_distance).max(0.0)
}

pub fn rainfall_score(rainfall: f64, water: WaterRequirement) -> f64 {
    if rainfall.is_nan() {
        return 0.0;
    }
    let band = water.rainfall_band();
    let score = if rainfall < band.min {
        rainfall / band.min
    } else if rainfall > band.max {
        band.max / rainfall
    } else if rainfall <= band.optimal {
        rainfall / band.optimal
    } else {
        band.optimal / rainfall
    };
    score.clamp(0.0, 1.0)
}

/// 0-100 的適宜度分數
pub fn crop_score(soil: &SoilSample, crop: &CropProfile) -> u32 {
    let sum = nutrient_score(soil.nitrogen, crop.nitrogen)
        + nutrient_score(soil.phosphorus, crop.phosphorus)
        + nutrient_score(soil.potassium, crop.potassium)
        + ph_score(soil.ph, crop.ph)
        + rainfall_score(soil.rainfall, crop.water);
    (sum * SUB_SCORE_WEIGHT * 100.0).round().max(0.0) as u32
}

impl Profitability {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Self::High
        } else if score >= 70 {
            Self::MediumHigh
        } else if score >= 60 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

pub fn expected_yield(crop: &CropProfile, score: u32) -> f64 {
    let spread = crop.yield_range.max - crop.yield_range.min;
    crop.yield_range.min + spread * (score as f64 / 100.0)
}

pub fn recommendation_details(crop: &CropProfile, score: u32, soil: &SoilSample) -> String {
    let mut details = format!("{} is ", crop.name);

    if score >= 80 {
        details.push_str("highly suitable for your soil conditions. ");
    } else if score >= 60 {
        details.push_str("moderately suitable for your soil conditions. ");
    } else {
        details.push_str("marginally suitable but can be grown with proper management. ");
    }

    if soil.nitrogen < crop.nitrogen.min {
        details.push_str("Consider increasing nitrogen application. ");
    }
    if soil.phosphorus < crop.phosphorus.min {
        details.push_str("Phosphorus supplementation recommended. ");
    }
    if soil.potassium < crop.potassium.min {
        details.push_str("Additional potassium may be needed. ");
    }

    details.push_str(&format!(
        "Water requirement is {}. ",
        crop.water.label().to_lowercase()
    ));
    details.push_str(&format!(
        "Typical investment needed is ₹{} per acre.",
        format_inr(crop.investment_per_acre)
    ));
    details
}

/// 印度數字分組：最後三位一組，之後每兩位一組 (1,00,000)
pub fn format_inr(amount: u64) -> String {
    let digits = amount.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

pub fn recommend_crops(soil: &SoilSample) -> Vec<CropRecommendation> {
    recommend_from(CROPS, soil)
}

pub fn recommend_from(crops: &[CropProfile], soil: &SoilSample) -> Vec<CropRecommendation> {
    let mut recommendations: Vec<CropRecommendation> = crops
        .iter()
        .filter_map(|crop| {
            let score = crop_score(soil, crop);
            tracing::debug!("🌾 {} scored {}", crop.name, score);
            (score > MIN_RECOMMEND_SCORE).then(|| CropRecommendation {
                name: crop.name.to_string(),
                confidence: score,
                expected_yield: format!("{:.1} tons/hectare", expected_yield(crop, score)),
                profitability: Profitability::from_score(score),
                details: recommendation_details(crop, score, soil),
            })
        })
        .collect();

    // sort_by 為穩定排序，同分時保留表格順序
    recommendations.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn find_crop(key: &str) -> Option<&'static CropProfile> {
        CROPS.iter().find(|crop| crop.key == key)
    }

    fn sample(n: f64, p: f64, k: f64, ph: f64, rain: f64) -> SoilSample {
        SoilSample {
            nitrogen: n,
            phosphorus: p,
            potassium: k,
            ph,
            rainfall: rain,
        }
    }

    #[test]
    fn test_nutrient_inside_band_scores_one() {
        let band = Range::new(60.0, 120.0);
        for value in [60.0, 75.5, 90.0, 120.0] {
            assert_eq!(nutrient_score(value, band), 1.0);
        }
        assert_eq!(nutrient_score(30.0, band), 0.5);
        assert_eq!(nutrient_score(240.0, band), 0.5);
    }

    #[test]
    fn test_ph_score_is_bounded_and_non_increasing() {
        let band = Range::new(5.5, 7.5);
        assert_eq!(ph_score(6.5, band), 1.0);

        let mut previous = ph_score(6.5, band);
        for step in 1..=80 {
            let ph = 6.5 + step as f64 * 0.1;
            let score = ph_score(ph, band);
            assert!(score <= previous, "score rose at pH {}", ph);
            assert!(score >= 0.0);
            previous = score;
        }
        assert_eq!(ph_score(14.0, band), 0.0);
    }

    #[test]
    fn test_negative_inputs_score_zero() {
        let band = Range::new(60.0, 120.0);
        assert_eq!(nutrient_score(-60.0, band), 0.0);
        assert_eq!(rainfall_score(-1200.0, WaterRequirement::High), 0.0);

        let soil = SoilSample {
            nitrogen: -60.0,
            phosphorus: -40.0,
            potassium: -40.0,
            ph: 6.5,
            rainfall: -1200.0,
        };
        for crop in CROPS {
            let score = crop_score(&soil, crop);
            // 只剩 pH 子分數
            assert!(score <= 20, "{} scored {}", crop.name, score);
        }
    }

    #[test]
    fn test_rainfall_score_rises_then_falls() {
        let w = WaterRequirement::High;
        assert_eq!(rainfall_score(500.0, w), 0.5);
        assert_eq!(rainfall_score(1500.0, w), 1.0);
        assert!((rainfall_score(1200.0, w) - 0.8).abs() < 1e-9);
        assert_eq!(rainfall_score(1875.0, w), 0.8);
        assert_eq!(rainfall_score(4000.0, w), 0.5);
    }

    #[test]
    fn test_reference_sample_recommends_rice() {
        let soil = sample(80.0, 40.0, 40.0, 6.5, 1200.0);
        let recs = recommend_crops(&soil);

        assert!(recs.len() <= 3);
        let rice = recs.iter().find(|r| r.name == "Rice").expect("rice in top 3");
        assert!(rice.confidence > 50);
        assert_eq!(rice.confidence, 96);
        assert_eq!(rice.expected_yield, "6.4 tons/hectare");
        assert_eq!(rice.profitability, Profitability::High);
        assert_eq!(
            rice.details,
            "Rice is highly suitable for your soil conditions. Water requirement is high. \
             Typical investment needed is ₹25,000 per acre."
        );

        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cotton", "Rice", "Wheat"]);
    }

    #[test]
    fn test_details_list_deficient_nutrients() {
        let soil = sample(80.0, 40.0, 40.0, 6.5, 1200.0);
        let wheat = find_crop("wheat").unwrap();
        let details = recommendation_details(wheat, crop_score(&soil, wheat), &soil);
        assert!(details.contains("Consider increasing nitrogen application."));
        assert!(details.contains("Phosphorus supplementation recommended."));
        assert!(!details.contains("potassium"));
        assert!(details.contains("₹20,000 per acre"));
    }

    #[test]
    fn test_profitability_tiers() {
        assert_eq!(Profitability::from_score(85), Profitability::High);
        assert_eq!(Profitability::from_score(80), Profitability::High);
        assert_eq!(Profitability::from_score(72), Profitability::MediumHigh);
        assert_eq!(Profitability::from_score(65), Profitability::Medium);
        assert_eq!(Profitability::from_score(40), Profitability::Low);
    }

    #[test]
    fn test_scores_at_or_below_cutoff_are_excluded() {
        // 極端值讓所有作物分數都偏低
        let soil = sample(1.0, 1.0, 1.0, 1.0, 10.0);
        for crop in CROPS {
            assert!(crop_score(&soil, crop) <= MIN_RECOMMEND_SCORE);
        }
        assert!(recommend_crops(&soil).is_empty());
    }

    #[test]
    fn test_from_json_validation() {
        let ok = json!({"nitrogen": "80", "phosphorus": 40, "potassium": 40, "ph": 6.5, "rainfall": 1200});
        assert_eq!(SoilSample::from_json(&ok).unwrap().nitrogen, 80.0);

        let zeros = json!({"nitrogen": 0, "phosphorus": 0, "potassium": 0, "ph": 0, "rainfall": 0});
        let err = SoilSample::from_json(&zeros).unwrap_err();
        assert!(err.to_string().contains("all zero values"));

        let bad_ph = json!({"nitrogen": 10, "phosphorus": 10, "potassium": 10, "ph": 14.5, "rainfall": 100});
        let err = SoilSample::from_json(&bad_ph).unwrap_err();
        assert!(err.to_string().contains("pH value must be between 0 and 14"));
        assert_eq!(err.status_code(), 400);

        let missing = json!({"nitrogen": 10, "phosphorus": 10, "potassium": 10, "ph": 6});
        let err = SoilSample::from_json(&missing).unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: All values must be numbers.");
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(950), "950");
        assert_eq!(format_inr(25_000), "25,000");
        assert_eq!(format_inr(100_000), "1,00,000");
        assert_eq!(format_inr(12_345_678), "1,23,45,678");
    }
}
