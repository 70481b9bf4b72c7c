// HTTP handlers, one module per resource. All handlers return
// Result<Response, ApiError> so error bodies render uniformly.

pub mod auth;
pub mod entries;
pub mod user_settings;
pub mod users;
