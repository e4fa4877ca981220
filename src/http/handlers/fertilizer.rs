use super::parse_json_body;
use crate::core::fertilizer::{parse_suggestions, FertilizerRequest};
use crate::http::AppState;
use crate::utils::error::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FertilizerAdvice {
    pub suggestions: Vec<String>,
}

pub async fn recommend_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FertilizerAdvice>> {
    let body = parse_json_body(&body)?;
    let request = FertilizerRequest::from_json(&body)?;
    tracing::debug!("🧪 Fertilizer request: {:?}", request);

    let answer = state.generator.generate(&request.prompt()).await?;
    let suggestions = parse_suggestions(&answer);
    tracing::info!(
        "🧪 {} fertilizer suggestion(s) for {}",
        suggestions.len(),
        request.crop_name
    );
    Ok(Json(FertilizerAdvice { suggestions }))
}
