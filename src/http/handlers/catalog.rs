use super::parse_json_body;
use crate::core::catalog::{quote_cart, CartRequest, PRODUCTS};
use crate::domain::model::{CartQuote, Product};
use crate::utils::error::{AppError, Result};
use axum::body::Bytes;
use axum::response::Json;

pub async fn products_handler() -> Json<&'static [Product]> {
    Json(PRODUCTS)
}

pub async fn quote_handler(body: Bytes) -> Result<Json<CartQuote>> {
    let body = parse_json_body(&body)?;
    let cart: CartRequest = serde_json::from_value(body)
        .map_err(|e| AppError::invalid_input(format!("Invalid cart: {}", e)))?;

    let quote = quote_cart(&cart)?;
    tracing::info!(
        "🛒 Quoted {} line(s): subtotal ₹{}, delivery ₹{}",
        quote.lines.len(),
        quote.subtotal,
        quote.delivery_charge
    );
    Ok(Json(quote))
}
