use serde_json::Value;

/// Shape of one `stats` entry of GET /api/usage-stats
pub fn assert_key_stats(entry: &Value) {
    assert!(entry.get("id").and_then(|v| v.as_str()).is_some(), "Missing id");
    assert!(entry.get("usage").and_then(|v| v.as_i64()).is_some(), "Missing usage");
    assert!(entry.get("limit").and_then(|v| v.as_i64()).is_some(), "Missing limit");
    assert!(entry.get("active").and_then(|v| v.as_bool()).is_some(), "Missing active");
    assert!(entry.get("lastUsed").is_some(), "Missing lastUsed");
    assert!(
        entry
            .get("maskedKey")
            .and_then(|v| v.as_str())
            .is_some_and(|k| k.starts_with("sk_...")),
        "Missing or unmasked maskedKey"
    );
}

/// No field anywhere in the body carries the full secret
pub fn assert_secret_not_exposed(body: &Value, secret: &str) {
    let raw = body.to_string();
    assert!(
        !raw.contains(secret),
        "Response exposes a full API key: {}",
        raw
    );
}
