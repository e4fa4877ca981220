mod common;

use anyhow::Result;
use common::{all_keys, config_for, spawn_app, GEMINI_KEY};
use httpmock::prelude::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

const GENERATE_PATH: &str = "/models/gemini-pro:generateContent";

fn soil_sample() -> Value {
    json!({
        "nitrogen": "35", "phosphorus": 18, "potassium": 22, "ph": 5.4, "cropName": "Groundnut"
    })
}

#[tokio::test]
async fn test_fertilizer_suggestions_from_model_answer() -> Result<()> {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE_PATH)
                .query_param("key", GEMINI_KEY)
                .body_contains("Intended Crop: Groundnut");
            then.status(200).json_body(json!({
                "candidates": [{
                    "content": {"parts": [{
                        "text": "* Nitrogen is Low\n\n- Apply 20 kg/ha of Urea\n  * Lime the soil to raise pH"
                    }]}
                }]
            }));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/api/fertilizer-recommendation", base))
        .json(&soil_sample())
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await?;
    generate.assert_async().await;
    assert_eq!(
        body["suggestions"],
        json!([
            "Nitrogen is Low",
            "Apply 20 kg/ha of Urea",
            "Lime the soil to raise pH"
        ])
    );
    Ok(())
}

#[tokio::test]
async fn test_fertilizer_model_error_is_surfaced() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(400).json_body(json!({
                "error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}
            }));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/api/fertilizer-recommendation", base))
        .json(&soil_sample())
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(
        body["error"],
        "API key not valid. Please pass a valid API key."
    );
    Ok(())
}

#[tokio::test]
async fn test_fertilizer_validation_skips_model() -> Result<()> {
    let server = MockServer::start_async().await;
    let generate = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({"candidates": []}));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/fertilizer-recommendation", base);

    let mut missing_crop = soil_sample();
    missing_crop["cropName"] = json!("");
    let mut bad_ph = soil_sample();
    bad_ph["ph"] = json!(14.5);

    for (payload, message) in [
        (
            missing_crop,
            "Missing required fields: N, P, K, pH, and Crop Name are required.",
        ),
        (bad_ph, "Invalid input: pH value must be between 0 and 14."),
    ] {
        let response = client.post(&url).json(&payload).send().await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await?;
        assert_eq!(body["error"], message);
    }

    assert_eq!(generate.hits_async().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_fertilizer_empty_model_answer() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE_PATH);
            then.status(200).json_body(json!({"candidates": []}));
        })
        .await;

    let base = spawn_app(config_for(&server.base_url(), all_keys())).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/api/fertilizer-recommendation", base))
        .json(&soil_sample())
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "The model returned no content");
    Ok(())
}
