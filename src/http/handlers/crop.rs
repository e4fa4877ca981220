use super::parse_json_body;
use crate::core::crop_scoring::recommend_crops;
use crate::domain::model::{CropRecommendation, SoilSample};
use crate::utils::error::Result;
use axum::body::Bytes;
use axum::response::Json;

pub async fn recommend_handler(body: Bytes) -> Result<Json<Vec<CropRecommendation>>> {
    let body = parse_json_body(&body)?;
    let soil = SoilSample::from_json(&body)?;
    tracing::debug!("🌱 Scoring soil sample {:?}", soil);

    let recommendations = recommend_crops(&soil);
    tracing::info!(
        "🌾 {} crop recommendation(s): {:?}",
        recommendations.len(),
        recommendations.iter().map(|r| r.name.as_str()).collect::<Vec<_>>()
    );
    Ok(Json(recommendations))
}
