pub mod catalog;
pub mod crop;
pub mod disease;
pub mod fertilizer;
pub mod news;
pub mod register;
pub mod weather;

use crate::utils::error::{AppError, Result};
use axum::body::Bytes;
use axum::response::Json;
use serde_json::{json, Value};

pub async fn healthz_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// 解析 JSON 請求內容；格式錯誤一律回 400
pub(crate) fn parse_json_body(body: &Bytes) -> Result<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_input(format!("Invalid JSON in request body: {}", e)))
}
