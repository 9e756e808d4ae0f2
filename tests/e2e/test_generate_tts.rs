use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::mock_provider::mock_audio_bytes;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

fn body(text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "voiceId": "21m00Tcm4TlvDq8ikWAM",
        "userId": "user-123"
    })
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_audio_and_record_usage(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(100, 10000).await.unwrap();

    let response = ctx
        .client
        .post("/api/generate-tts", &body("Hello, this is a test."))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let json = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["charactersUsed"], 22);
    let audio = STANDARD
        .decode(json["audioBase64"].as_str().unwrap())
        .unwrap();
    assert_eq!(audio, mock_audio_bytes());

    let after = ctx.fixtures.get_key(key.id).await.unwrap();
    assert_eq!(after.usage_count, 122);
    assert!(after.last_used_at.is_some());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_the_least_used_key(ctx: &TestContext) {
    let busy = ctx.fixtures.create_key(9999, 10000).await.unwrap();
    let idle = ctx.fixtures.create_key(500, 10000).await.unwrap();

    ctx.client
        .post("/api/generate-tts", &body("Hi"))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let calls = ctx.provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].api_key, idle.secret);
    assert_eq!(ctx.fixtures.get_key(busy.id).await.unwrap().usage_count, 9999);
    assert_eq!(ctx.fixtures.get_key(idle.id).await.unwrap().usage_count, 502);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_default_voice_settings(ctx: &TestContext) {
    ctx.fixtures.create_key(0, 10000).await.unwrap();

    ctx.client
        .post("/api/generate-tts", &body("Hello"))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let settings = &ctx.provider.calls()[0].settings;
    assert_eq!(settings.stability, 0.5);
    assert_eq!(settings.similarity_boost, 0.75);
    assert!(settings.use_speaker_boost);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_custom_voice_settings(ctx: &TestContext) {
    ctx.fixtures.create_key(0, 10000).await.unwrap();

    ctx.client
        .post(
            "/api/generate-tts",
            &json!({
                "text": "Hello",
                "voiceId": "voice-42",
                "userId": "user-123",
                "settings": { "stability": 0.2, "similarity_boost": 0.9 }
            }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let call = &ctx.provider.calls()[0];
    assert_eq!(call.voice_id, "voice-42");
    assert_eq!(call.settings.stability, 0.2);
    assert_eq!(call.settings.similarity_boost, 0.9);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_exhaustion_as_service_unavailable(ctx: &TestContext) {
    ctx.fixtures.create_key(10000, 10000).await.unwrap();
    ctx.fixtures.create_inactive_key(0).await.unwrap();

    let response = ctx
        .client
        .post("/api/generate-tts", &body("Hello"))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::SERVICE_UNAVAILABLE)
        .assert_error_message("All API keys exhausted");
    assert!(ctx.provider.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stop_using_a_key_once_overshoot_exhausts_it(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(9900, 10000).await.unwrap();

    ctx.client
        .post("/api/generate-tts", &body(&"a".repeat(250)))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(ctx.fixtures.get_key(key.id).await.unwrap().usage_count, 10150);

    ctx.client
        .post("/api/generate-tts", &body("Hello"))
        .await
        .unwrap()
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_charge_usage_when_provider_fails(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(100, 10000).await.unwrap();
    ctx.provider.fail_requests();

    let response = ctx
        .client
        .post("/api/generate-tts", &body("Hello"))
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_GATEWAY);
    let after = ctx.fixtures.get_key(key.id).await.unwrap();
    assert_eq!(after.usage_count, 100);
    assert!(after.last_used_at.is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_fields(ctx: &TestContext) {
    ctx.fixtures.create_key(0, 10000).await.unwrap();

    for payload in [
        json!({ "voiceId": "v", "userId": "u" }),
        json!({ "text": "Hello", "userId": "u" }),
        json!({ "text": "Hello", "voiceId": "v" }),
        json!({ "text": "", "voiceId": "v", "userId": "u" }),
    ] {
        ctx.client
            .post("/api/generate-tts", &payload)
            .await
            .unwrap()
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("Missing required fields");
    }
    assert!(ctx.provider.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_text_over_5000_characters(ctx: &TestContext) {
    ctx.fixtures.create_key(0, 100000).await.unwrap();

    ctx.client
        .post("/api/generate-tts", &body(&"a".repeat(5001)))
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text too long");

    ctx.client
        .post("/api/generate-tts", &body(&"a".repeat(5000)))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_json(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/api/generate-tts", "{not json")
        .await
        .unwrap();

    assert!(response.status.is_client_error());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_account_every_concurrent_request(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(0, 1_000_000).await.unwrap();

    let mut futures = Vec::new();
    for i in 1..=20 {
        let client = ctx.client.clone();
        let text = "x".repeat(i);
        futures.push(async move { client.post("/api/generate-tts", &body(&text)).await });
    }

    for result in futures::future::join_all(futures).await {
        result.unwrap().assert_status(StatusCode::OK);
    }

    let expected: i64 = (1..=20).sum();
    assert_eq!(ctx.fixtures.get_key(key.id).await.unwrap().usage_count, expected);
}
