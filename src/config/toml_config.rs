use crate::utils::error::{AppError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const OPENWEATHER_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const GNEWS_KEY_ENV: &str = "GNEWS_API_KEY";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const GEOCODING_KEY_ENV: &str = "GEOCODING_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub keys: KeysConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// 空陣列代表允許任何來源
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub openweather_url: String,
    pub gnews_url: String,
    pub gemini_url: String,
    pub gemini_model: String,
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            openweather_url: "https://api.openweathermap.org".to_string(),
            gnews_url: "https://gnews.io/api/v4".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-pro".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// 第三方 API 金鑰；只存在伺服器端
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    pub openweather: Option<String>,
    pub gnews: Option<String>,
    pub gemini: Option<String>,
    pub geocoding: Option<String>,
}

impl std::fmt::Debug for KeysConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |key: &Option<String>| key.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("KeysConfig")
            .field("openweather", &mask(&self.openweather))
            .field("gnews", &mask(&self.gnews))
            .field("gemini", &mask(&self.gemini))
            .field("geocoding", &mask(&self.geocoding))
            .finish()
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| usable_key(Some(v)))
}

// 未被替換的 `${VAR}` 與空字串都視為未設定
fn usable_key(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !(v.starts_with("${") && v.ends_with('}')))
}

impl KeysConfig {
    pub fn from_env() -> Self {
        Self {
            openweather: env_key(OPENWEATHER_KEY_ENV),
            gnews: env_key(GNEWS_KEY_ENV),
            gemini: env_key(GEMINI_KEY_ENV),
            geocoding: env_key(GEOCODING_KEY_ENV),
        }
    }

    /// 檔案中沒有給的金鑰改從環境變數補上
    fn merge_env(self) -> Self {
        let env = Self::from_env();
        Self {
            openweather: usable_key(self.openweather).or(env.openweather),
            gnews: usable_key(self.gnews).or(env.gnews),
            gemini: usable_key(self.gemini).or(env.gemini),
            geocoding: usable_key(self.geocoding).or(env.geocoding),
        }
    }

    /// 反查地名用的金鑰，未設定時沿用 OpenWeather 金鑰
    pub fn geocoding_key(&self) -> Option<&str> {
        self.geocoding.as_deref().or(self.openweather.as_deref())
    }
}

impl AppConfig {
    /// 沒有設定檔時：預設值加上環境變數中的金鑰
    pub fn from_env() -> Self {
        Self {
            keys: KeysConfig::from_env(),
            ..Self::default()
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: Self =
            toml::from_str(&processed_content).map_err(|e| AppError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;
        config.keys = config.keys.merge_env();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${API_KEY})；找不到的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| AppError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("Invalid socket address: {}", e),
            })
    }

    /// 啟動時提示哪些上游服務沒有金鑰
    pub fn missing_keys(&self) -> Vec<&'static str> {
        [
            (OPENWEATHER_KEY_ENV, self.keys.openweather.is_some()),
            (GNEWS_KEY_ENV, self.keys.gnews.is_some()),
            (GEMINI_KEY_ENV, self.keys.gemini.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        validate_url("upstream.openweather_url", &self.upstream.openweather_url)?;
        validate_url("upstream.gnews_url", &self.upstream.gnews_url)?;
        validate_url("upstream.gemini_url", &self.upstream.gemini_url)?;
        validate_non_empty_string("upstream.gemini_model", &self.upstream.gemini_model)?;
        validate_positive_number("upstream.timeout_seconds", self.upstream.timeout_seconds, 1)?;

        for origin in &self.server.cors_origins {
            validate_url("server.cors_origins", origin)?;
        }
        Ok(())
    }
}
