use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::SettingsRepository;
use crate::error::ApiError;
use crate::journal::payload::parse_settings;
use crate::middleware::AuthUser;

/// Settings are strictly private; even reads by other users are refused.
/// The verb in the message tracks the attempted operation.
fn check_owner(auth: &AuthUser, slug: &str, verb: &str) -> Result<(), ApiError> {
    if auth.slug != slug {
        tracing::warn!(user_id = auth.id, target = %slug, verb, "blocked cross-user settings access");
        return Err(ApiError::forbidden(format!(
            "You are not authorised to {verb} these settings."
        )));
    }
    Ok(())
}

/// GET /api/users/:slug/user-settings/ - retrieve the caller's settings
pub async fn settings_detail(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    check_owner(&auth, &slug, "access")?;

    let settings = SettingsRepository::new(pool)
        .find_for_user(auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User settings not found."))?;

    Ok((StatusCode::OK, Json(settings.to_api())).into_response())
}

/// POST /api/users/:slug/user-settings/ - create the caller's settings
pub async fn settings_create(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    check_owner(&auth, &slug, "create")?;

    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_settings(&body).map_err(ApiError::validation)?;

    let repository = SettingsRepository::new(pool);
    if repository.find_for_user(auth.id).await?.is_some() {
        return Err(ApiError::conflict("User settings already exist."));
    }
    let settings = repository.insert(auth.id, &payload).await?;
    tracing::info!(user_id = auth.id, "created user settings");

    Ok((StatusCode::CREATED, Json(settings.to_api())).into_response())
}

/// PUT /api/users/:slug/user-settings/ - replace the caller's settings
pub async fn settings_update(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    check_owner(&auth, &slug, "update")?;

    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_settings(&body).map_err(ApiError::validation)?;

    let settings = SettingsRepository::new(pool)
        .update_for_user(auth.id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("User settings not found."))?;
    tracing::info!(user_id = auth.id, "updated user settings");

    Ok((StatusCode::OK, Json(settings.to_api())).into_response())
}

/// DELETE /api/users/:slug/user-settings/ - delete the caller's settings
pub async fn settings_delete(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    check_owner(&auth, &slug, "delete")?;

    let deleted = SettingsRepository::new(pool).delete_for_user(auth.id).await?;
    if !deleted {
        return Err(ApiError::not_found("User settings not found."));
    }
    tracing::info!(user_id = auth.id, "deleted user settings");

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthUser {
        AuthUser {
            id: 1,
            email: "jane@example.com".to_string(),
            slug: "jane-doe-abc".to_string(),
        }
    }

    #[test]
    fn owner_check_passes_for_own_slug() {
        assert!(check_owner(&auth(), "jane-doe-abc", "access").is_ok());
    }

    #[test]
    fn owner_check_names_the_operation() {
        let err = check_owner(&auth(), "someone-else", "delete").unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_json(),
            serde_json::json!({"error": "You are not authorised to delete these settings."})
        );
    }
}
