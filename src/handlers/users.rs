use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::models::UserSettings;
use crate::database::{SettingsRepository, UserRepository};
use crate::error::ApiError;
use crate::journal::payload::{parse_signup, parse_user_update};
use crate::middleware::AuthUser;
use crate::services::UserService;

/// GET /api/users/ - list all accounts with their settings
pub async fn user_list(State(pool): State<SqlitePool>) -> Result<Response, ApiError> {
    let users = UserRepository::new(pool.clone()).list().await?;
    let settings = SettingsRepository::new(pool).list().await?;
    let by_user: HashMap<i64, &UserSettings> =
        settings.iter().map(|row| (row.user_id, row)).collect();

    let data: Vec<Value> = users
        .iter()
        .map(|user| user.to_api(by_user.get(&user.id).copied()))
        .collect();

    Ok((StatusCode::OK, Json(Value::Array(data))).into_response())
}

/// POST /api/users/ - register a new account
pub async fn user_create(
    State(pool): State<SqlitePool>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_signup(&body).map_err(ApiError::validation)?;

    let user = UserService::new(pool).signup(payload).await?;

    Ok((StatusCode::CREATED, Json(user.to_api(None))).into_response())
}

/// GET /api/users/:slug/ - retrieve one account
pub async fn user_detail(
    State(pool): State<SqlitePool>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let user = UserRepository::new(pool.clone())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;
    let settings = SettingsRepository::new(pool).find_for_user(user.id).await?;

    Ok((StatusCode::OK, Json(user.to_api(settings.as_ref()))).into_response())
}

/// PUT /api/users/:slug/ - update the caller's own account
pub async fn user_update(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    if auth.slug != slug {
        tracing::warn!(user_id = auth.id, target = %slug, "blocked cross-user update");
        return Err(ApiError::forbidden(
            "You are not allowed to update other users.",
        ));
    }

    let users = UserRepository::new(pool.clone());
    let current = users
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;

    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_user_update(&body).map_err(ApiError::validation)?;

    if payload.email != current.email {
        if let Some(other) = users.find_by_email(&payload.email).await? {
            if other.id != current.id {
                return Err(ApiError::field_error(
                    "email",
                    "user with this email address already exists.",
                ));
            }
        }
    }

    let updated = users
        .update_identity(
            current.id,
            &payload.email,
            &payload.first_name,
            &payload.last_name,
            payload.is_active.unwrap_or(current.is_active),
            payload.is_staff.unwrap_or(current.is_staff),
            payload.is_superuser.unwrap_or(current.is_superuser),
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;
    let settings = SettingsRepository::new(pool).find_for_user(updated.id).await?;
    tracing::info!(user_id = updated.id, "updated user profile");

    Ok((StatusCode::OK, Json(updated.to_api(settings.as_ref()))).into_response())
}

/// DELETE /api/users/:slug/ - delete the caller's own account
pub async fn user_delete(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    if auth.slug != slug {
        tracing::warn!(user_id = auth.id, target = %slug, "blocked cross-user delete");
        return Err(ApiError::forbidden(
            "You are not allowed to delete other users.",
        ));
    }

    let deleted = UserRepository::new(pool).delete(auth.id).await?;
    if !deleted {
        return Err(ApiError::not_found("Not found."));
    }
    tracing::info!(user_id = auth.id, slug = %slug, "deleted user account");

    Ok(StatusCode::NO_CONTENT.into_response())
}
