use crate::domain::model::{
    AnalysisRequest, DetectedDisease, Detection, DiseaseDetails, DiseaseProfile, DiseaseReport,
    Severity,
};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::parse_number;
use serde_json::Value;

pub static DISEASES: &[DiseaseProfile] = &[
    DiseaseProfile {
        crop: "tomato",
        key: "early_blight",
        name: "Early Blight",
        description: "Brown spots with concentric rings that enlarge over time.",
        pesticides: &["Mancozeb", "Chlorothalonil", "Copper-based fungicides"],
        severity: Severity::Medium,
        treatment_timeline: "Apply fungicides every 7-10 days until symptoms resolve",
        preventive_measures: &[
            "Maintain proper plant spacing for air circulation",
            "Water at the base of plants",
            "Remove infected leaves promptly",
        ],
    },
    DiseaseProfile {
        crop: "tomato",
        key: "late_blight",
        name: "Late Blight",
        description: "Dark brown spots with fuzzy white growth on undersides.",
        pesticides: &["Metalaxyl", "Cymoxanil", "Azoxystrobin"],
        severity: Severity::High,
        treatment_timeline: "Begin treatment immediately, apply fungicides every 5-7 days",
        preventive_measures: &[
            "Plant resistant varieties",
            "Avoid overhead irrigation",
            "Monitor weather conditions",
        ],
    },
    DiseaseProfile {
        crop: "potato",
        key: "early_blight",
        name: "Early Blight",
        description: "Dark brown to black lesions with concentric rings.",
        pesticides: &["Mancozeb", "Chlorothalonil", "Copper-based fungicides"],
        severity: Severity::Medium,
        treatment_timeline: "Apply fungicides every 7-10 days in favorable conditions",
        preventive_measures: &[
            "Rotate crops",
            "Remove volunteer plants",
            "Maintain proper plant spacing",
        ],
    },
    DiseaseProfile {
        crop: "potato",
        key: "late_blight",
        name: "Late Blight",
        description: "Dark water-soaked spots turning brown with white edges.",
        pesticides: &["Mancozeb", "Chlorothalonil", "Metalaxyl"],
        severity: Severity::High,
        treatment_timeline: "Apply fungicides every 7 days during favorable conditions",
        preventive_measures: &[
            "Plant resistant varieties",
            "Destroy volunteer plants",
            "Improve field drainage",
        ],
    },
    DiseaseProfile {
        crop: "rice",
        key: "bacterial_blight",
        name: "Bacterial Blight",
        description:
            "Yellow to white lesions along leaf veins, which can merge and cause leaf death.",
        pesticides: &["Streptomycin", "Copper oxychloride", "Kasugamycin"],
        severity: Severity::High,
        treatment_timeline: "Apply bactericides immediately upon detection, repeat weekly",
        preventive_measures: &[
            "Use certified disease-free seeds",
            "Practice crop rotation",
            "Maintain field sanitation",
        ],
    },
    DiseaseProfile {
        crop: "rice",
        key: "blast",
        name: "Rice Blast",
        description: "Diamond-shaped lesions with gray centers on leaves.",
        pesticides: &["Tricyclazole", "Isoprothiolane", "Carbendazim"],
        severity: Severity::High,
        treatment_timeline: "Apply fungicides at first sign of disease, repeat every 10-14 days",
        preventive_measures: &[
            "Use resistant varieties",
            "Maintain proper water management",
            "Avoid excessive nitrogen",
        ],
    },
    DiseaseProfile {
        crop: "wheat",
        key: "powdery_mildew",
        name: "Powdery Mildew",
        description: "White powdery growth on leaves and stems",
        pesticides: &["Sulfur", "Triadimefon", "Propiconazole"],
        severity: Severity::Medium,
        treatment_timeline: "Apply fungicides when disease first appears, repeat as needed",
        preventive_measures: &[
            "Maintain proper spacing",
            "Avoid excess nitrogen",
            "Remove infected plant debris",
        ],
    },
    DiseaseProfile {
        crop: "wheat",
        key: "leaf_rust",
        name: "Leaf Rust",
        description: "Orange-brown pustules scattered on leaves",
        pesticides: &["Tebuconazole", "Propiconazole", "Azoxystrobin"],
        severity: Severity::High,
        treatment_timeline: "Apply fungicides at first sign of disease, repeat every 14 days",
        preventive_measures: &[
            "Plant resistant varieties",
            "Early planting",
            "Monitor regularly for symptoms",
        ],
    },
];

pub const HEALTHY_MESSAGE: &str =
    "The plant appears healthy. Continue with regular care and monitoring.";

pub fn lookup(crop: &str, disease: &str) -> Option<&'static DiseaseProfile> {
    DISEASES
        .iter()
        .find(|profile| profile.crop == crop && profile.key == disease)
}

/// 讀取一筆偵測；缺少 crop 或 disease 字串時回傳 None
pub fn parse_detection(value: &Value) -> Option<Detection> {
    let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
    Some(Detection {
        crop: text("crop")?,
        disease: text("disease")?,
        confidence: parse_number(value.get("confidence")),
    })
}

fn describe(detection: &Detection) -> Option<DetectedDisease> {
    let profile = lookup(&detection.crop, &detection.disease)?;
    Some(DetectedDisease {
        name: profile.name,
        confidence: detection.confidence,
        details: DiseaseDetails {
            name: profile.name,
            description: profile.description,
            pesticides: profile.pesticides,
            severity: profile.severity,
            treatment_timeline: profile.treatment_timeline,
            preventive_measures: profile.preventive_measures,
            confidence: detection.confidence,
        },
    })
}

/// 將分類結果對應到病害資料；查不到的項目直接略過
pub fn analyze(request: AnalysisRequest) -> Result<DiseaseReport> {
    let detections = request
        .diseases
        .ok_or_else(|| AppError::invalid_input("Invalid analysis data received"))?;

    let found: Vec<DetectedDisease> = detections
        .iter()
        .filter_map(parse_detection)
        .filter_map(|detection| describe(&detection))
        .collect();
    tracing::debug!(
        "🔬 {} of {} detections matched the disease table",
        found.len(),
        detections.len()
    );

    let has_disease = !found.is_empty();
    Ok(DiseaseReport {
        status: "success",
        detected_crop: request.primary_crop,
        detected_part: request.primary_part,
        has_disease,
        diseases: has_disease.then_some(found),
        message: (!has_disease).then(|| HEALTHY_MESSAGE.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detection(crop: &str, disease: &str, confidence: f64) -> Value {
        json!({ "crop": crop, "disease": disease, "confidence": confidence })
    }

    #[test]
    fn test_rice_blast_lookup() {
        let profile = lookup("rice", "blast").unwrap();
        assert_eq!(profile.name, "Rice Blast");
        assert_eq!(profile.severity, Severity::High);
        assert!(lookup("rice", "early_blight").is_none());
    }

    #[test]
    fn test_unmatched_detections_are_dropped() {
        let report = analyze(AnalysisRequest {
            diseases: Some(vec![
                detection("rice", "blast", 0.91),
                detection("mango", "anthracnose", 0.7),
            ]),
            primary_crop: Some("rice".to_string()),
            primary_part: Some("leaf".to_string()),
        })
        .unwrap();

        assert!(report.has_disease);
        let diseases = report.diseases.unwrap();
        assert_eq!(diseases.len(), 1);
        assert_eq!(diseases[0].name, "Rice Blast");
        assert_eq!(diseases[0].details.confidence, Some(0.91));
        assert!(report.message.is_none());
    }

    #[test]
    fn test_malformed_detections_do_not_hide_valid_ones() {
        let report = analyze(AnalysisRequest {
            diseases: Some(vec![
                json!({"crop": "rice", "disease": "blast", "confidence": 0.9}),
                json!({"crop": "rice", "disease": "blast", "confidence": "0.8"}),
                json!({"disease": "unknown"}),
                json!("rice blast"),
                json!({"crop": 7, "disease": "blast"}),
            ]),
            primary_crop: None,
            primary_part: None,
        })
        .unwrap();

        let diseases = report.diseases.unwrap();
        assert_eq!(diseases.len(), 2);
        assert_eq!(diseases[0].confidence, Some(0.9));
        assert_eq!(diseases[1].confidence, Some(0.8));
    }

    #[test]
    fn test_parse_detection_without_confidence() {
        let detection = parse_detection(&json!({"crop": "potato", "disease": "late_blight"})).unwrap();
        assert_eq!(detection.crop, "potato");
        assert_eq!(detection.confidence, None);
        assert!(parse_detection(&json!({"crop": "potato"})).is_none());
    }

    #[test]
    fn test_no_match_reports_healthy() {
        let report = analyze(AnalysisRequest {
            diseases: Some(vec![detection("tomato", "mosaic", 0.4)]),
            primary_crop: Some("tomato".to_string()),
            primary_part: None,
        })
        .unwrap();

        assert!(!report.has_disease);
        assert!(report.diseases.is_none());
        assert_eq!(report.message.as_deref(), Some(HEALTHY_MESSAGE));
    }

    #[test]
    fn test_missing_diseases_is_rejected() {
        let err = analyze(AnalysisRequest {
            diseases: None,
            primary_crop: None,
            primary_part: None,
        })
        .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "Invalid analysis data received");
    }
}
