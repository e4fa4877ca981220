use super::parse_json_body;
use crate::core::registration::{register, Registration, Role};
use crate::utils::error::Result;
use axum::body::Bytes;
use axum::response::Json;

async fn handle(role: Role, body: Bytes) -> Result<Json<Registration>> {
    let body = parse_json_body(&body)?;
    Ok(Json(register(role, body)?))
}

pub async fn consumer_handler(body: Bytes) -> Result<Json<Registration>> {
    handle(Role::Consumer, body).await
}

pub async fn farmer_handler(body: Bytes) -> Result<Json<Registration>> {
    handle(Role::Farmer, body).await
}
