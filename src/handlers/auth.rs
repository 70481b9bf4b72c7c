use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::error::ApiError;
use crate::journal::payload::parse_login;
use crate::services::UserService;

/// POST /auth/login - exchange email and password for a JWT
pub async fn login(
    State(pool): State<SqlitePool>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_login(&body).map_err(ApiError::validation)?;

    let user = UserService::new(pool)
        .login(&payload.email, &payload.password)
        .await?;

    let claims = Claims::new(user.id, user.email.clone(), user.slug.clone());
    let token = generate_jwt(claims)
        .map_err(|err| ApiError::internal_server_error(err.to_string()))?;
    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    tracing::info!(user_id = user.id, "user logged in");

    Ok((
        StatusCode::OK,
        Json(json!({
            "token": token,
            "expires_in": expires_in,
            "user": {
                "id": user.id,
                "email": user.email,
                "slug": user.slug,
                "first_name": user.first_name,
                "last_name": user.last_name,
            },
        })),
    )
        .into_response())
}
