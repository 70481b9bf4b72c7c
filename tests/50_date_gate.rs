mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

const PAST: &str = "2020-01-01";
const FUTURE: &str = "2099-12-31";

#[tokio::test]
async fn mutations_are_rejected_for_other_days() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    for date in [PAST, FUTURE] {
        let (status, body) = common::request(
            &app,
            Method::POST,
            &format!("/api/users/{}/notes/{}/", slug, date),
            Some(&token),
            Some(json!({ "content": "backdated" })),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "date {}: {}", date, body);
        assert_eq!(
            body["error"],
            "You are not allowed to change notes for past or future dates.",
            "date {}",
            date
        );
    }

    // Nothing slipped through the gate
    let (status, body) = common::request(
        &app,
        Method::GET,
        &format!("/api/users/{}/notes/", slug),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body.as_array().map(Vec::len), Some(0), "persisted rows: {}", body);
    Ok(())
}

#[tokio::test]
async fn gate_messages_use_the_category_noun() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let cases = [
        ("appointments", "You are not allowed to change appointments for past or future dates."),
        ("ideas", "You are not allowed to change ideas for past or future dates."),
        ("knowledge", "You are not allowed to change knowledge entries for past or future dates."),
    ];
    for (category, message) in cases {
        let (status, body) = common::request(
            &app,
            Method::POST,
            &format!("/api/users/{}/{}/{}/", slug, category, PAST),
            Some(&token),
            Some(json!({})),
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "category {}: {}", category, body);
        assert_eq!(body["error"], message, "category {}", category);
    }
    Ok(())
}

#[tokio::test]
async fn existing_entries_cannot_be_touched_through_old_dates() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let (status, note) = common::request(
        &app,
        Method::POST,
        &format!("/api/users/{}/notes/{}/", slug, common::today()),
        Some(&token),
        Some(json!({ "content": "original" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "setup failed: {}", note);
    let id = note["id"].as_i64().unwrap_or_default();

    let stale_uri = format!("/api/users/{}/notes/{}/{}/", slug, PAST, id);
    let (status, body) = common::request(
        &app,
        Method::PUT,
        &stale_uri,
        Some(&token),
        Some(json!({ "content": "rewritten history" })),
    )
    .await?;
    assert_eq!(status, StatusCode::FORBIDDEN, "unexpected status: {}", body);

    let (status, body) = common::request(&app, Method::DELETE, &stale_uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN, "unexpected status: {}", body);

    // Reads through an old date segment still work
    let (status, body) = common::request(&app, Method::GET, &stale_uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body["content"], "original");
    Ok(())
}

#[tokio::test]
async fn malformed_date_segments_are_bad_requests() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let uris = [
        format!("/api/users/{}/notes/01-02-2026/", slug),
        format!("/api/users/{}/notes/2026-13-40/", slug),
        format!("/api/users/{}/notes/yesterday/1/", slug),
    ];
    for uri in &uris {
        let (status, body) = common::request(&app, Method::GET, uri, Some(&token), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}: {}", uri, body);
        assert_eq!(body["error"], "Invalid date format. Please use YYYY-MM-DD.", "uri {}", uri);
    }
    Ok(())
}

#[tokio::test]
async fn ownership_is_checked_before_the_date() -> Result<()> {
    let app = common::test_app().await?;
    let (jane_slug, _) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let (_, ken_token) = common::signup_and_login(&app, "ken@example.com", "Ken", "Adams").await?;

    // Even a garbage date reports the ownership problem first
    let (status, body) = common::request(
        &app,
        Method::POST,
        &format!("/api/users/{}/notes/not-a-date/", jane_slug),
        Some(&ken_token),
        Some(json!({ "content": "intrusion" })),
    )
    .await?;

    assert_eq!(status, StatusCode::FORBIDDEN, "unexpected status: {}", body);
    assert_eq!(body["error"], "You are not allowed to access notes of other users.");
    Ok(())
}
