use crate::utils::error::{AppError, ErrorCategory};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.category() {
            ErrorCategory::Input => {
                tracing::debug!("↩️ Rejected request: {}", self);
            }
            category => {
                tracing::error!(
                    "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                    self,
                    category,
                    self.severity()
                );
                tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());
            }
        }

        let body = Json(json!({ "error": self.user_friendly_message() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let response = AppError::missing_field("email").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::UnsupportedMediaType {
            content_type: "text/plain".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let response = AppError::missing_api_key("News").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
