use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    InvalidInput { message: String },

    #[error("{} is required", capitalize(.field))]
    MissingField { field: String },

    #[error("Unsupported Content-Type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("{service} API key not configured")]
    MissingApiKey { service: String },

    #[error("{message}")]
    UpstreamError {
        service: String,
        status: Option<u16>,
        message: String,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// 錯誤分類，用於決定 HTTP 狀態碼與日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Upstream,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn missing_api_key(service: impl Into<String>) -> Self {
        Self::MissingApiKey {
            service: service.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::UpstreamError {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. }
            | Self::MissingField { .. }
            | Self::UnsupportedMediaType { .. } => ErrorCategory::Input,
            Self::MissingApiKey { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::UpstreamError { .. } | Self::ApiError(_) => ErrorCategory::Upstream,
            Self::SerializationError(_) | Self::IoError(_) => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 對應的 HTTP 狀態碼
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnsupportedMediaType { .. } => 415,
            Self::InvalidInput { .. } | Self::MissingField { .. } => 400,
            _ => 500,
        }
    }

    /// 回傳給呼叫端的訊息，不包含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) => "Failed to reach upstream service".to_string(),
            Self::SerializationError(_) | Self::IoError(_) => {
                "An error occurred while processing your request.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the request fields and try again",
            ErrorCategory::Configuration => {
                "Set the missing environment variable or fix the config file"
            }
            ErrorCategory::Upstream => "The upstream service failed; retry later",
            ErrorCategory::Internal => "Inspect the server logs for details",
        }
    }

    /// 將上游錯誤訊息換成固定的通用訊息，其他錯誤原樣返回
    pub fn with_generic_upstream_message(self, message: &str) -> Self {
        match self {
            Self::UpstreamError { service, status, .. } => Self::UpstreamError {
                service,
                status,
                message: message.to_string(),
            },
            Self::ApiError(_) | Self::SerializationError(_) => {
                Self::upstream("upstream", None, message)
            }
            other => other,
        }
    }
}

pub(crate) fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
