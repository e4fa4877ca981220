use crate::utils::error::{AppError, Result};
use serde_json::Value;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 取出必填的查詢參數，空字串視為缺少
pub fn require_param<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::invalid_input(message)),
    }
}

/// 將 JSON 值解析成數字：接受數字或可解析的字串
pub fn parse_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// JSON 值是否為「空」：缺少、null、空字串、false 或 0
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("upstream.openweather_base_url", "https://example.com").is_ok());
        assert!(validate_url("upstream.openweather_base_url", "http://example.com").is_ok());
        assert!(validate_url("upstream.openweather_base_url", "").is_err());
        assert!(validate_url("upstream.openweather_base_url", "invalid-url").is_err());
        assert!(validate_url("upstream.openweather_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("upstream.timeout_seconds", 5, 1).is_ok());
        assert!(validate_positive_number("upstream.timeout_seconds", 0, 1).is_err());
    }

    #[test]
    fn test_parse_number_accepts_numeric_strings() {
        assert_eq!(parse_number(Some(&json!(42))), Some(42.0));
        assert_eq!(parse_number(Some(&json!(" 6.5 "))), Some(6.5));
        assert_eq!(parse_number(Some(&json!("abc"))), None);
        assert_eq!(parse_number(Some(&json!(null))), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(""))));
        assert!(is_blank(Some(&json!(0))));
        assert!(!is_blank(Some(&json!("x"))));
        assert!(!is_blank(Some(&json!(["x"]))));
    }

    #[test]
    fn test_require_param() {
        let present = Some("Delhi".to_string());
        let empty = Some("  ".to_string());
        assert_eq!(require_param(&present, "City name is required").unwrap(), "Delhi");
        assert!(require_param(&empty, "City name is required").is_err());
        assert!(require_param(&None, "City name is required").is_err());
    }
}
