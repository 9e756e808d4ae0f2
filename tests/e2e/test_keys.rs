use crate::e2e::helpers;

use helpers::{TestContext, ADMIN_TOKEN};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_add_a_key(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth("/api/keys", &json!({ "key": "sk_live_1234567890abcd" }), ADMIN_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    let json = response.json();
    assert_eq!(json["usage"], 0);
    assert_eq!(json["limit"], 10000);
    assert_eq!(json["active"], true);
    assert_eq!(json["maskedKey"], "sk_...abcd");
    assert!(json["lastUsed"].is_null());
    assert_eq!(ctx.fixtures.key_count().await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_add_a_key_with_custom_quota(ctx: &TestContext) {
    let response = ctx
        .client
        .post_with_auth(
            "/api/keys",
            &json!({ "key": "sk_live_1234567890abcd", "quotaLimit": 50000 }),
            ADMIN_TOKEN,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json()["limit"], 50000);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_keys_with_wrong_prefix(ctx: &TestContext) {
    ctx.client
        .post_with_auth("/api/keys", &json!({ "key": "pk_1234567890" }), ADMIN_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Must start with");

    assert_eq!(ctx.fixtures.key_count().await.unwrap(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_admin_token(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(0, 10000).await.unwrap();

    ctx.client
        .post("/api/keys", &json!({ "key": "sk_live_1234567890abcd" }))
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);

    ctx.client
        .delete_with_auth(&format!("/api/keys/{}", key.id), "wrong-token")
        .await
        .unwrap()
        .assert_status(StatusCode::UNAUTHORIZED);

    assert_eq!(ctx.fixtures.key_count().await.unwrap(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_delete_a_key(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(0, 10000).await.unwrap();

    ctx.client
        .delete_with_auth(&format!("/api/keys/{}", key.id), ADMIN_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::NO_CONTENT);

    assert_eq!(ctx.fixtures.key_count().await.unwrap(), 0);

    ctx.client
        .delete_with_auth(&format!("/api/keys/{}", key.id), ADMIN_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_toggle_a_key_without_touching_usage(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(700, 10000).await.unwrap();

    let response = ctx
        .client
        .patch_with_auth(
            &format!("/api/keys/{}", key.id),
            &json!({ "active": false }),
            ADMIN_TOKEN,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["active"], false);
    assert_eq!(response.json()["usage"], 700);

    ctx.client
        .post(
            "/api/generate-tts",
            &json!({ "text": "Hello", "voiceId": "v", "userId": "u" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_or_invalid_updates(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(0, 10000).await.unwrap();
    let path = format!("/api/keys/{}", key.id);

    ctx.client
        .patch_with_auth(&path, &json!({}), ADMIN_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .patch_with_auth(&path, &json!({ "quotaLimit": -1 }), ADMIN_TOKEN)
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    ctx.client
        .patch_with_auth(
            &format!("/api/keys/{}", Uuid::new_v4()),
            &json!({ "active": true }),
            ADMIN_TOKEN,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reset_usage(ctx: &TestContext) {
    let key = ctx.fixtures.create_key(10000, 10000).await.unwrap();

    let response = ctx
        .client
        .post_with_auth(&format!("/api/keys/{}/reset", key.id), &json!({}), ADMIN_TOKEN)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["usage"], 0);

    ctx.client
        .post(
            "/api/generate-tts",
            &json!({ "text": "Hello", "voiceId": "v", "userId": "u" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}
