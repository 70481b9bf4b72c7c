mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

fn list_uri(slug: &str, category: &str) -> String {
    format!("/api/users/{}/{}/", slug, category)
}

fn date_uri(slug: &str, category: &str, date: &str) -> String {
    format!("/api/users/{}/{}/{}/", slug, category, date)
}

fn detail_uri(slug: &str, category: &str, date: &str, id: i64) -> String {
    format!("/api/users/{}/{}/{}/{}/", slug, category, date, id)
}

async fn create_entry(
    app: &axum::Router,
    slug: &str,
    token: &str,
    category: &str,
    body: Value,
) -> Result<Value> {
    let (status, created) = common::request(
        app,
        Method::POST,
        &date_uri(slug, category, &common::today()),
        Some(token),
        Some(body),
    )
    .await?;
    anyhow::ensure!(
        status == StatusCode::CREATED,
        "create {} failed: {} {}",
        category,
        status,
        created
    );
    Ok(created)
}

#[tokio::test]
async fn note_crud_lifecycle() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let today = common::today();

    let note =
        create_entry(&app, &slug, &token, "notes", json!({ "content": "Buy more tea" })).await?;
    assert_eq!(note["content"], "Buy more tea");
    assert_eq!(note["created_on"], json!(today), "created_on is date-only: {}", note);
    assert!(note["id"].is_i64() && note["user"].is_i64(), "missing ids: {}", note);
    assert!(note.get("updated_on").is_none(), "updated_on leaked: {}", note);
    let id = note["id"].as_i64().unwrap_or_default();

    // Appears in the plain list and in today's list
    let (status, body) =
        common::request(&app, Method::GET, &list_uri(&slug, "notes"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body.as_array().map(Vec::len), Some(1), "unexpected list: {}", body);

    let (status, body) = common::request(
        &app,
        Method::GET,
        &date_uri(&slug, "notes", &today),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body.as_array().map(Vec::len), Some(1), "unexpected list: {}", body);

    // Detail, replace, delete
    let uri = detail_uri(&slug, "notes", &today, id);
    let (status, body) = common::request(&app, Method::GET, &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body["content"], "Buy more tea");

    let (status, body) = common::request(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "content": "Buy loose-leaf tea" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body["content"], "Buy loose-leaf tea");
    assert_eq!(body["created_on"], json!(today), "created_on survives updates: {}", body);

    let (status, _) = common::request(&app, Method::DELETE, &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = common::request(&app, Method::GET, &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status: {}", body);
    assert_eq!(body["error"], "Not found.");
    Ok(())
}

#[tokio::test]
async fn freeform_categories_share_the_content_shape() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    for category in ["gratitude", "ideas", "improvement", "knowledge"] {
        let entry = create_entry(
            &app,
            &slug,
            &token,
            category,
            json!({ "content": format!("{} text", category) }),
        )
        .await?;
        assert_eq!(entry["content"], format!("{} text", category), "category {}", category);

        let (status, body) = common::request(
            &app,
            Method::POST,
            &date_uri(&slug, category, &common::today()),
            Some(&token),
            Some(json!({})),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "category {}: {}", category, body);
        assert_eq!(body["content"][0], "This field is required.", "category {}", category);
    }
    Ok(())
}

#[tokio::test]
async fn appointments_carry_their_full_shape() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let appointment = create_entry(
        &app,
        &slug,
        &token,
        "appointments",
        json!({
            "title": "Dentist",
            "date": "2026-09-01",
            "time_from": "9:30",
            "time_until": "10:00",
        }),
    )
    .await?;

    assert_eq!(appointment["title"], "Dentist");
    assert_eq!(appointment["date"], "2026-09-01");
    // Times normalize to hh:mm:ss on the way in
    assert_eq!(appointment["time_from"], "09:30:00");
    assert_eq!(appointment["time_until"], "10:00:00");
    Ok(())
}

#[tokio::test]
async fn appointments_reject_inverted_or_equal_times() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let uri = date_uri(&slug, "appointments", &common::today());

    for (from, until) in [("10:00:00", "09:00:00"), ("10:00:00", "10:00:00")] {
        let (status, body) = common::request(
            &app,
            Method::POST,
            &uri,
            Some(&token),
            Some(json!({
                "title": "Dentist",
                "date": "2026-09-01",
                "time_from": from,
                "time_until": until,
            })),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} vs {}: {}", from, until, body);
        assert_eq!(
            body["non_field_errors"][0],
            "'From' must start before the time set on 'Until'.",
            "{} vs {}",
            from,
            until
        );
    }
    Ok(())
}

#[tokio::test]
async fn appointments_report_field_format_errors() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "appointments", &common::today()),
        Some(&token),
        Some(json!({
            "title": "Dentist",
            "date": "01.09.2026",
            "time_from": "late morning",
            "time_until": "10:00",
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status: {}", body);
    assert_eq!(
        body["date"][0],
        "Date has wrong format. Use one of these formats instead: YYYY-MM-DD."
    );
    assert_eq!(
        body["time_from"][0],
        "Time has wrong format. Use one of these formats instead: hh:mm[:ss]."
    );
    Ok(())
}

#[tokio::test]
async fn emotions_accept_only_the_mood_scale() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let entry = create_entry(&app, &slug, &token, "emotions", json!({ "emotion": "great" })).await?;
    assert_eq!(entry["emotion"], "great");

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "emotions", &common::today()),
        Some(&token),
        Some(json!({ "emotion": "meh" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status: {}", body);
    assert_eq!(body["emotion"][0], "\"meh\" is not a valid choice.");
    Ok(())
}

#[tokio::test]
async fn targets_list_in_explicit_order() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    create_entry(&app, &slug, &token, "target", json!({ "title": "Ship the report", "order": 2 }))
        .await?;
    // Order also accepts a numeric string, as forms send
    create_entry(&app, &slug, &token, "target", json!({ "title": "Inbox zero", "order": "1" }))
        .await?;

    let (status, body) =
        common::request(&app, Method::GET, &list_uri(&slug, "target"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    let titles: Vec<&str> = body
        .as_array()
        .map(|rows| rows.iter().filter_map(|row| row["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, vec!["Inbox zero", "Ship the report"], "unexpected order: {}", body);

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "target", &common::today()),
        Some(&token),
        Some(json!({ "title": "Broken", "order": "soon" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status: {}", body);
    assert_eq!(body["order"][0], "A valid integer is required.");
    Ok(())
}

#[tokio::test]
async fn wins_record_a_title() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let win = create_entry(&app, &slug, &token, "win", json!({ "title": "Ran 5k" })).await?;
    assert_eq!(win["title"], "Ran 5k");

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "win", &common::today()),
        Some(&token),
        Some(json!({ "title": "" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status: {}", body);
    assert_eq!(body["title"][0], "This field may not be blank.");
    Ok(())
}

#[tokio::test]
async fn entries_reject_other_users_with_the_category_noun() -> Result<()> {
    let app = common::test_app().await?;
    let (jane_slug, _) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let (_, ken_token) = common::signup_and_login(&app, "ken@example.com", "Ken", "Adams").await?;

    let cases = [
        ("notes", "You are not allowed to access notes of other users."),
        ("gratitude", "You are not allowed to access gratitudes of other users."),
        ("knowledge", "You are not allowed to access knowledge entries of other users."),
    ];
    for (category, message) in cases {
        let (status, body) = common::request(
            &app,
            Method::GET,
            &list_uri(&jane_slug, category),
            Some(&ken_token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::FORBIDDEN, "category {}: {}", category, body);
        assert_eq!(body["error"], message, "category {}", category);
    }
    Ok(())
}

#[tokio::test]
async fn lists_are_scoped_to_their_owner() -> Result<()> {
    let app = common::test_app().await?;
    let (jane_slug, jane_token) =
        common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let (ken_slug, ken_token) =
        common::signup_and_login(&app, "ken@example.com", "Ken", "Adams").await?;

    create_entry(&app, &jane_slug, &jane_token, "notes", json!({ "content": "jane's" })).await?;
    create_entry(&app, &ken_slug, &ken_token, "notes", json!({ "content": "ken's" })).await?;

    let (status, body) = common::request(
        &app,
        Method::GET,
        &list_uri(&jane_slug, "notes"),
        Some(&jane_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body.as_array().map(Vec::len), Some(1), "leaked entries: {}", body);
    assert_eq!(body[0]["content"], "jane's");
    Ok(())
}

#[tokio::test]
async fn unknown_categories_and_ids_are_not_found() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;
    let today = common::today();

    let (status, body) =
        common::request(&app, Method::GET, &list_uri(&slug, "diary"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status: {}", body);
    assert_eq!(body["error"], "Not found.");

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "diary", &today),
        Some(&token),
        Some(json!({ "content": "x" })),
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status: {}", body);

    // Ids must be numeric and must exist
    let (status, body) = common::request(
        &app,
        Method::GET,
        &format!("/api/users/{}/notes/{}/abc/", slug, today),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status: {}", body);

    let (status, body) = common::request(
        &app,
        Method::GET,
        &detail_uri(&slug, "notes", &today, 4242),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND, "unexpected status: {}", body);
    Ok(())
}

#[tokio::test]
async fn date_scoped_list_only_returns_that_day() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    create_entry(&app, &slug, &token, "notes", json!({ "content": "today's note" })).await?;

    let (status, body) = common::request(
        &app,
        Method::GET,
        &date_uri(&slug, "notes", "2020-01-01"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::OK, "unexpected status: {}", body);
    assert_eq!(body, json!([]), "expected an empty day: {}", body);
    Ok(())
}

#[tokio::test]
async fn missing_bodies_validate_like_empty_ones() -> Result<()> {
    let app = common::test_app().await?;
    let (slug, token) = common::signup_and_login(&app, "jane@example.com", "Jane", "Doe").await?;

    let (status, body) = common::request(
        &app,
        Method::POST,
        &date_uri(&slug, "notes", &common::today()),
        Some(&token),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status: {}", body);
    assert_eq!(body["content"][0], "This field is required.");
    Ok(())
}
