use crate::utils::error::{AppError, Result};
use crate::utils::validation::{is_blank, parse_number};
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use uuid::Uuid;

pub const REQUIRED_FIELDS: [&str; 8] = [
    "firstName",
    "lastName",
    "email",
    "phone",
    "address",
    "city",
    "state",
    "pincode",
];

const ID_SUFFIX_LEN: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Consumer,
    Farmer,
}

impl Role {
    fn id_prefix(&self) -> &'static str {
        match self {
            Self::Consumer => "CONSUMER_",
            Self::Farmer => "FARMER_",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub message: &'static str,
    pub data: Map<String, Value>,
}

struct Patterns {
    email: Regex,
    phone: Regex,
    pincode: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"),
        phone: Regex::new(r"^[0-9]{10}$").expect("phone pattern is valid"),
        pincode: Regex::new(r"^[0-9]{6}$").expect("pincode pattern is valid"),
    })
}

/// 數字也接受（例如 JSON 中未加引號的電話）
fn as_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn validate(role: Role, data: &Map<String, Value>) -> Result<()> {
    if let Some(field) = REQUIRED_FIELDS.iter().find(|f| is_blank(data.get(**f))) {
        return Err(AppError::missing_field(*field));
    }

    let patterns = patterns();
    if !patterns.email.is_match(&as_text(data.get("email"))) {
        return Err(AppError::invalid_input("Please enter a valid email address"));
    }
    if !patterns.phone.is_match(&as_text(data.get("phone"))) {
        return Err(AppError::invalid_input(
            "Please enter a valid 10-digit phone number",
        ));
    }
    if !patterns.pincode.is_match(&as_text(data.get("pincode"))) {
        return Err(AppError::invalid_input("Please enter a valid 6-digit PIN code"));
    }

    if role == Role::Farmer {
        let farm_size = data.get("farmSize");
        let blank = matches!(farm_size, None | Some(Value::Null))
            || farm_size.and_then(Value::as_str) == Some("");
        if !blank && !parse_number(farm_size).is_some_and(|acres| acres > 0.0) {
            return Err(AppError::invalid_input("Please enter a valid farm size"));
        }
    }
    Ok(())
}

fn generate_id(role: Role) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ID_SUFFIX_LEN)
        .collect();
    format!("{}{}", role.id_prefix(), suffix)
}

/// 驗證註冊資料並回傳模擬的成功結果；不做任何儲存
pub fn register(role: Role, body: Value) -> Result<Registration> {
    let Value::Object(submitted) = body else {
        return Err(AppError::invalid_input("Registration data must be a JSON object"));
    };
    validate(role, &submitted)?;

    let id = generate_id(role);
    tracing::info!("📝 Registered {:?} {}", role, id);

    let mut data = Map::with_capacity(submitted.len() + 2);
    data.insert("id".to_string(), Value::String(id));
    data.extend(submitted);
    data.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    Ok(Registration {
        message: "Registration successful",
        data,
    })
}
