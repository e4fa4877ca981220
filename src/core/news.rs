use crate::domain::model::{Article, NewsQuery};
use crate::utils::error::{AppError, Result};
use serde_json::Value;

pub const DEFAULT_QUERY: &str = "agriculture";
pub const DEFAULT_MAX: u32 = 9;
pub const DEFAULT_PAGE: u32 = 1;
const MAX_PER_PAGE: u32 = 100;

const IMAGE_SUFFIX: &str = "?auto=compress&cs=tinysrgb&w=600";

/// 依 pexels 相片 id 組出圖片網址
fn pexels(photo_id: u32) -> String {
    format!("https://images.pexels.com/photos/{photo_id}/pexels-photo-{photo_id}.jpeg{IMAGE_SUFFIX}")
}

const DEFAULT_PHOTO: u32 = 2_668_314;

/// (分類, 查詢關鍵字, 圖片)
const FALLBACK_IMAGES: &[(&str, &[&str], u32)] = &[
    ("policy", &["policy", "subsidy", "government"], 6_077_326),
    ("technology", &["technology", "tractor", "drone"], 145_685),
    ("climate", &["climate", "weather", "monsoon"], 414_498),
    ("market", &["market", "prices", "msp"], 7_567_230),
    ("crops", &["crops", "harvest", "pests"], 4_033_148),
];

/// (分類, 內文關鍵字, 查詢關鍵字)
const CATEGORY_RULES: &[(&str, &[&str], &str)] = &[
    ("Policy", &["policy", "subsidy", "government", "msp"], "policy"),
    ("Technology", &["technology", "innovation", "tractor", "drone"], "technology"),
    ("Climate", &["climate", "weather", "monsoon", "rainfall"], "climate"),
    ("Market", &["market", "price", "export", "import"], "market"),
    ("Crops", &["crop", "harvest", "pests", "soil"], "crops"),
];

fn explicit_category(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.is_empty() && *c != "all")
}

impl NewsQuery {
    /// 由查詢參數建立；缺少的參數使用預設值
    pub fn from_params(
        q: Option<&str>,
        category: Option<&str>,
        max: Option<&str>,
        page: Option<&str>,
    ) -> Result<Self> {
        let query = q.filter(|q| !q.is_empty()).unwrap_or(DEFAULT_QUERY);
        let max = parse_count("max", max, DEFAULT_MAX)?;
        if max > MAX_PER_PAGE {
            return Err(AppError::invalid_input(format!(
                "max must be between 1 and {MAX_PER_PAGE}"
            )));
        }
        let page = parse_count("page", page, DEFAULT_PAGE)?;

        Ok(Self {
            query: query.to_string(),
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
            max,
            page,
        })
    }

    /// 送往上游的 q 參數；指定分類時以 AND 附加
    pub fn search_terms(&self) -> String {
        match explicit_category(self.category.as_deref()) {
            Some(category) => format!("{} AND {}", self.query, category),
            None => self.query.clone(),
        }
    }
}

fn parse_count(field: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(AppError::invalid_input(format!(
            "{field} must be a positive integer"
        ))),
    }
}

pub fn fallback_image(query: &str, category: Option<&str>) -> String {
    let query = query.to_lowercase();
    let category = category.map(str::to_lowercase);

    FALLBACK_IMAGES
        .iter()
        .find(|(name, keywords, _)| {
            category.as_deref() == Some(*name) || keywords.iter().any(|k| query.contains(k))
        })
        .map(|(_, _, photo)| pexels(*photo))
        .unwrap_or_else(|| pexels(DEFAULT_PHOTO))
}

pub fn detect_category(
    title: &str,
    description: Option<&str>,
    query: &str,
    category: Option<&str>,
) -> String {
    if let Some(category) = explicit_category(category) {
        return category.to_string();
    }

    let text = format!("{} {}", title, description.unwrap_or_default()).to_lowercase();
    let query = query.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords, query_keyword)| {
            keywords.iter().any(|k| text.contains(k)) || query.contains(query_keyword)
        })
        .map(|(name, _, _)| name.to_string())
        .unwrap_or_else(|| "General".to_string())
}

/// 補上備用圖片與分類
pub fn enrich(mut article: Article, query: &NewsQuery) -> Article {
    let category = query.category.as_deref();
    if article.image.as_deref().map_or(true, str::is_empty) {
        article.image = Some(fallback_image(&query.query, category));
    }
    article.category = Some(detect_category(
        &article.title,
        article.description.as_deref(),
        &query.query,
        category,
    ));
    article
}

/// GNews 錯誤內容：`errors` 可能是陣列或物件
pub fn upstream_error_message(body: &Value, status_text: &str) -> String {
    let detail = match body.get("errors") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Object(map)) => map
            .values()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(", "),
        _ => status_text.to_string(),
    };
    format!("Failed to fetch news: {detail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ArticleSource;
    use serde_json::json;

    fn article(title: &str, description: Option<&str>, image: Option<&str>) -> Article {
        Article {
            title: title.to_string(),
            description: description.map(str::to_string),
            content: None,
            url: "https://example.com/a".to_string(),
            image: image.map(str::to_string),
            published_at: "2024-10-21T06:00:00Z".to_string(),
            source: ArticleSource {
                name: "Krishi Jagran".to_string(),
                url: None,
            },
            category: None,
        }
    }

    #[test]
    fn test_query_defaults() {
        let query = NewsQuery::from_params(None, None, None, None).unwrap();
        assert_eq!(query.query, "agriculture");
        assert_eq!(query.max, 9);
        assert_eq!(query.page, 1);
        assert_eq!(query.search_terms(), "agriculture");
    }

    #[test]
    fn test_category_appended_unless_all() {
        let query = NewsQuery::from_params(Some("wheat"), Some("Market"), Some("3"), Some("2")).unwrap();
        assert_eq!(query.search_terms(), "wheat AND Market");

        let all = NewsQuery::from_params(Some("wheat"), Some("all"), None, None).unwrap();
        assert_eq!(all.search_terms(), "wheat");
    }

    #[test]
    fn test_invalid_paging_is_rejected() {
        assert!(NewsQuery::from_params(None, None, Some("zero"), None).is_err());
        assert!(NewsQuery::from_params(None, None, None, Some("0")).is_err());
        assert!(NewsQuery::from_params(None, None, Some("500"), None).is_err());
    }

    #[test]
    fn test_fallback_image_rules() {
        assert!(fallback_image("agriculture", Some("policy")).contains("6077326"));
        assert!(fallback_image("drone spraying", None).contains("145685"));
        assert!(fallback_image("MSP hike", None).contains("7567230"));
        assert_eq!(
            fallback_image("agriculture", None),
            "https://images.pexels.com/photos/2668314/pexels-photo-2668314.jpeg?auto=compress&cs=tinysrgb&w=600"
        );
    }

    #[test]
    fn test_detect_category_order() {
        // Policy 規則優先於 Market
        assert_eq!(
            detect_category("Government revises MSP", Some("price support"), "agriculture", None),
            "Policy"
        );
        assert_eq!(
            detect_category("Monsoon arrives early", None, "agriculture", None),
            "Climate"
        );
        assert_eq!(
            detect_category("Soil health cards", None, "agriculture", None),
            "Crops"
        );
        assert_eq!(detect_category("Farm fair", None, "agriculture", None), "General");
        assert_eq!(
            detect_category("Farm fair", None, "agriculture", Some("Technology")),
            "Technology"
        );
    }

    #[test]
    fn test_enrich_keeps_existing_image() {
        let query = NewsQuery::from_params(None, None, None, None).unwrap();
        let kept = enrich(article("Tractor sales", None, Some("https://img/1.jpg")), &query);
        assert_eq!(kept.image.as_deref(), Some("https://img/1.jpg"));
        assert_eq!(kept.category.as_deref(), Some("Technology"));

        let filled = enrich(article("Farm fair", None, None), &query);
        assert!(filled.image.unwrap().contains("2668314"));
    }

    #[test]
    fn test_upstream_error_message() {
        let body = json!({"errors": ["You did not provide an API key."]});
        assert_eq!(
            upstream_error_message(&body, "Unauthorized"),
            "Failed to fetch news: You did not provide an API key."
        );
        assert_eq!(
            upstream_error_message(&json!({}), "Forbidden"),
            "Failed to fetch news: Forbidden"
        );
    }
}
