use super::parse_json_body;
use crate::core::disease::analyze;
use crate::domain::model::{AnalysisRequest, DiseaseReport};
use crate::utils::error::{AppError, Result};
use axum::body::{Body, Bytes};
use axum::extract::{FromRequest, Multipart};
use axum::http::{header, Request};
use axum::response::Json;
use axum::Form;
use serde_json::Value;
use std::collections::HashMap;

const PREDICTIONS_FIELD: &str = "predictions";

fn missing_predictions() -> AppError {
    AppError::invalid_input("Missing 'predictions' field in form data.")
}

async fn predictions_from_multipart(request: Request<Body>) -> Result<String> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| AppError::invalid_input(e.to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(e.to_string()))?
    {
        if field.name() == Some(PREDICTIONS_FIELD) {
            return field
                .text()
                .await
                .map_err(|e| AppError::invalid_input(e.to_string()));
        }
    }
    Err(missing_predictions())
}

async fn predictions_from_urlencoded(request: Request<Body>) -> Result<String> {
    let Form(mut fields) = Form::<HashMap<String, String>>::from_request(request, &())
        .await
        .map_err(|e| AppError::invalid_input(e.to_string()))?;
    fields.remove(PREDICTIONS_FIELD).ok_or_else(missing_predictions)
}

/// 依 Content-Type 取出分析資料：JSON 本文，或表單中的 `predictions` 欄位
async fn analysis_payload(request: Request<Body>) -> Result<Value> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let predictions = if content_type.contains("multipart/form-data") {
        predictions_from_multipart(request).await?
    } else if content_type.contains("application/x-www-form-urlencoded") {
        predictions_from_urlencoded(request).await?
    } else if content_type.contains("application/json") {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| AppError::invalid_input(e.to_string()))?;
        return parse_json_body(&body);
    } else {
        return Err(AppError::UnsupportedMediaType { content_type });
    };

    if predictions.is_empty() {
        return Err(missing_predictions());
    }
    serde_json::from_str(&predictions)
        .map_err(|_| AppError::invalid_input("Invalid analysis data received"))
}

pub async fn detect_handler(request: Request<Body>) -> Result<Json<DiseaseReport>> {
    let payload = analysis_payload(request).await?;
    let analysis: AnalysisRequest = serde_json::from_value(payload)
        .map_err(|_| AppError::invalid_input("Invalid analysis data received"))?;

    let report = analyze(analysis)?;
    tracing::info!(
        "🔬 Disease analysis for {:?}: has_disease={}",
        report.detected_crop,
        report.has_disease
    );
    Ok(Json(report))
}
