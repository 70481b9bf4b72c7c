use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::database::EntryRepository;
use crate::error::ApiError;
use crate::journal::payload::EntryPayload;
use crate::journal::{gate, Category};
use crate::middleware::AuthUser;

/// One handler set serves all nine categories; the path segment picks the
/// descriptor. Unknown segments mean no such route exists.
fn resolve_category(segment: &str) -> Result<Category, ApiError> {
    Category::from_slug(segment).ok_or_else(|| ApiError::not_found("Not found."))
}

/// Numeric detail ids only; anything else is treated as an unknown entry.
fn resolve_id(segment: &str) -> Result<i64, ApiError> {
    segment
        .parse::<i64>()
        .map_err(|_| ApiError::not_found("Not found."))
}

fn parse_body(category: Category, body: &Value) -> Result<EntryPayload, ApiError> {
    EntryPayload::parse(category, body).map_err(ApiError::validation)
}

/// GET /api/users/:slug/:category/ - list all of the owner's entries
pub async fn entry_list(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;

    let rows = EntryRepository::new(pool).list(auth.id, category).await?;
    let data: Vec<Value> = rows.iter().map(|row| row.to_api(category)).collect();

    Ok((StatusCode::OK, Json(Value::Array(data))).into_response())
}

/// GET /api/users/:slug/:category/:date_request/ - list entries created on a date
pub async fn entry_list_by_date(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category, date_request)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;
    let date = gate::parse_date_segment(&date_request)?;

    let rows = EntryRepository::new(pool)
        .list_for_date(auth.id, category, date)
        .await?;
    let data: Vec<Value> = rows.iter().map(|row| row.to_api(category)).collect();

    Ok((StatusCode::OK, Json(Value::Array(data))).into_response())
}

/// POST /api/users/:slug/:category/:date_request/ - create an entry for today
pub async fn entry_create(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category, date_request)): Path<(String, String, String)>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;
    let date = gate::parse_date_segment(&date_request)?;
    gate::check_current_date(date, category.noun())?;

    // A missing or non-JSON body validates like an empty object
    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_body(category, &body)?;

    let entry = EntryRepository::new(pool)
        .create(auth.id, category, &payload)
        .await?;
    tracing::info!(user_id = auth.id, category = %category, entry_id = entry.id, "created entry");

    Ok((StatusCode::CREATED, Json(entry.to_api(category))).into_response())
}

/// GET /api/users/:slug/:category/:date_request/:id/ - retrieve one entry
pub async fn entry_detail(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category, date_request, id)): Path<(String, String, String, String)>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;
    // Reads are not restricted to today; the segment still has to be a date
    gate::parse_date_segment(&date_request)?;
    let id = resolve_id(&id)?;

    let entry = EntryRepository::new(pool)
        .find(auth.id, category, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;

    Ok((StatusCode::OK, Json(entry.to_api(category))).into_response())
}

/// PUT /api/users/:slug/:category/:date_request/:id/ - replace an entry today
pub async fn entry_update(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category, date_request, id)): Path<(String, String, String, String)>,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;
    let date = gate::parse_date_segment(&date_request)?;
    gate::check_current_date(date, category.noun())?;
    let id = resolve_id(&id)?;

    let body = body.map(|Json(value)| value).unwrap_or_else(|| json!({}));
    let payload = parse_body(category, &body)?;

    let entry = EntryRepository::new(pool)
        .update(auth.id, category, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Not found."))?;
    tracing::info!(user_id = auth.id, category = %category, entry_id = entry.id, "updated entry");

    Ok((StatusCode::OK, Json(entry.to_api(category))).into_response())
}

/// DELETE /api/users/:slug/:category/:date_request/:id/ - delete an entry today
pub async fn entry_delete(
    State(pool): State<SqlitePool>,
    Extension(auth): Extension<AuthUser>,
    Path((slug, category, date_request, id)): Path<(String, String, String, String)>,
) -> Result<Response, ApiError> {
    let category = resolve_category(&category)?;
    gate::check_ownership(&auth, &slug, category.noun())?;
    let date = gate::parse_date_segment(&date_request)?;
    gate::check_current_date(date, category.noun())?;
    let id = resolve_id(&id)?;

    let deleted = EntryRepository::new(pool)
        .delete(auth.id, category, id)
        .await?;
    if !deleted {
        return Err(ApiError::not_found("Not found."));
    }
    tracing::info!(user_id = auth.id, category = %category, entry_id = id, "deleted entry");

    Ok(StatusCode::NO_CONTENT.into_response())
}
