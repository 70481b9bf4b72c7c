use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::database::models::UserSettings;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub slug: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl User {
    /// API representation. The password hash never leaves the server and the
    /// nested settings object is null until the user creates one.
    pub fn to_api(&self, settings: Option<&UserSettings>) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "slug": self.slug,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "is_staff": self.is_staff,
            "is_active": self.is_active,
            "is_superuser": self.is_superuser,
            "user_settings": settings.map(UserSettings::to_api),
        })
    }
}
