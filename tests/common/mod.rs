// Shared helpers; not every test binary uses all of them.
#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use mindful_minutes_api::app::app;
use mindful_minutes_api::database::schema::init_schema;
use mindful_minutes_api::database::DatabaseManager;

pub const PASSWORD: &str = "correct horse battery staple";

/// A fresh application against its own in-memory database. Every test gets
/// an isolated world; nothing persists between tests.
pub async fn test_app() -> Result<Router> {
    let pool = DatabaseManager::connect("sqlite::memory:")
        .await
        .context("in-memory pool")?;
    init_schema(&pool).await.context("schema init")?;
    Ok(app(pool))
}

/// Drive one request through the router and decode the JSON response.
/// 204s and other empty bodies come back as Value::Null.
pub async fn request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .with_context(|| format!("non-JSON body for {}: {:?}", status, bytes))?
    };

    Ok((status, value))
}

/// Register an account and return its API representation (includes the slug).
pub async fn signup(app: &Router, email: &str, first_name: &str, last_name: &str) -> Result<Value> {
    let (status, body) = request(
        app,
        Method::POST,
        "/api/users/",
        None,
        Some(json!({
            "email": email,
            "password": PASSWORD,
            "first_name": first_name,
            "last_name": last_name,
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "signup failed: {} {}", status, body);
    Ok(body)
}

/// Log in and return the bearer token.
pub async fn login(app: &Router, email: &str) -> Result<String> {
    let (status, body) = request(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);
    body["token"]
        .as_str()
        .map(str::to_string)
        .context("login response without token")
}

/// Register, log in, and hand back (slug, token) for the common case.
pub async fn signup_and_login(
    app: &Router,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(String, String)> {
    let user = signup(app, email, first_name, last_name).await?;
    let slug = user["slug"]
        .as_str()
        .context("signup response without slug")?
        .to_string();
    let token = login(app, email).await?;
    Ok((slug, token))
}

/// Today's date the way the URL path spells it.
pub fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
