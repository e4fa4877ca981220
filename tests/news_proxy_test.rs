mod common;

use anyhow::Result;
use common::{all_keys, config_for, spawn_app, NEWS_KEY};
use httpmock::prelude::*;
use krishi_mitra::config::KeysConfig;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn article(title: &str, image: Option<&str>) -> Value {
    json!({
        "title": title,
        "description": "Latest update for Indian farmers",
        "content": "Full story",
        "url": "https://example.com/story",
        "image": image,
        "publishedAt": "2024-10-21T06:00:00Z",
        "source": {"name": "Krishi Jagran", "url": "https://krishijagran.com"}
    })
}

#[tokio::test]
async fn test_news_defaults_and_enrichment() -> Result<()> {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "agriculture")
                .query_param("lang", "en")
                .query_param("country", "in")
                .query_param("max", "9")
                .query_param("page", "1")
                .query_param("apikey", NEWS_KEY);
            then.status(200).json_body(json!({
                "totalArticles": 2,
                "articles": [
                    article("Government raises MSP for wheat", None),
                    article("Farmers welcome early rains", Some("https://cdn.example.com/rain.jpg"))
                ]
            }));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::get(format!("{}/api/news", base)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;

    search.assert_async().await;
    assert_eq!(body["totalArticles"], 2);
    let articles = body["articles"].as_array().unwrap();
    assert_eq!(articles[0]["category"], "Policy");
    assert!(articles[0]["image"]
        .as_str()
        .unwrap()
        .starts_with("https://images.pexels.com/photos/"));
    assert_eq!(articles[1]["image"], "https://cdn.example.com/rain.jpg");
    assert_eq!(articles[1]["publishedAt"], "2024-10-21T06:00:00Z");
    Ok(())
}

#[tokio::test]
async fn test_news_category_is_joined_into_query() -> Result<()> {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "onion AND market")
                .query_param("max", "3")
                .query_param("page", "2");
            then.status(200).json_body(json!({
                "totalArticles": 1,
                "articles": [article("Onion arrivals at Lasalgaon", None)]
            }));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let body: Value = reqwest::get(format!(
        "{}/api/news?q=onion&category=market&max=3&page=2",
        base
    ))
    .await?
    .json()
    .await?;

    search.assert_async().await;
    assert_eq!(body["articles"][0]["category"], "market");
    Ok(())
}

#[tokio::test]
async fn test_news_upstream_errors_are_reported() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(403).json_body(json!({
                "errors": ["You did not provide an API key."]
            }));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::get(format!("{}/api/news", base)).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"],
        "Failed to fetch news: You did not provide an API key."
    );
    Ok(())
}

#[tokio::test]
async fn test_news_rejects_bad_paging_and_missing_key() -> Result<()> {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!({"totalArticles": 0, "articles": []}));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::get(format!("{}/api/news?max=0", base)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "max must be a positive integer");

    let response = reqwest::get(format!("{}/api/news?max=500", base)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(search.hits_async().await, 0);

    let keyless = spawn_app(config_for(&server.base_url(), KeysConfig::default())).await?;
    let response = reqwest::get(format!("{}/api/news", keyless)).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "News API key not configured");
    Ok(())
}
