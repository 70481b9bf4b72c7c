use axum::extract::State;
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::DatabaseManager;
use crate::middleware::jwt_auth_middleware;

/// Build the full application router against the given pool. Tests call this
/// directly with an in-memory database; main() calls it with the shared pool.
pub fn app(pool: SqlitePool) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Everything under a user slug requires a valid token
        .merge(protected_routes())
        .layer(TraceLayer::new_for_http());

    if config::config().security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(pool)
}

fn public_routes() -> Router<SqlitePool> {
    use axum::routing::post;
    use crate::handlers::{auth, users};

    Router::new()
        .route("/auth/login", post(auth::login))
        // Signup and the user directory are open; per-user routes are not
        .route("/api/users/", get(users::user_list).post(users::user_create))
}

fn protected_routes() -> Router<SqlitePool> {
    use crate::handlers::{entries, user_settings, users};

    Router::new()
        .route(
            "/api/users/:slug/",
            get(users::user_detail)
                .put(users::user_update)
                .delete(users::user_delete),
        )
        // Static segment wins over :category, so settings stay reachable
        .route(
            "/api/users/:slug/user-settings/",
            get(user_settings::settings_detail)
                .post(user_settings::settings_create)
                .put(user_settings::settings_update)
                .delete(user_settings::settings_delete),
        )
        .route("/api/users/:slug/:category/", get(entries::entry_list))
        .route(
            "/api/users/:slug/:category/:date_request/",
            get(entries::entry_list_by_date).post(entries::entry_create),
        )
        .route(
            "/api/users/:slug/:category/:date_request/:id/",
            get(entries::entry_detail)
                .put(entries::entry_update)
                .delete(entries::entry_delete),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "name": "Mindful Minutes API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

async fn health(State(pool): State<SqlitePool>) -> impl axum::response::IntoResponse {
    match DatabaseManager::health_check(&pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "healthy",
                "database": "connected",
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                })),
            )
        }
    }
}
