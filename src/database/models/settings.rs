use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserSettings {
    pub id: i64,
    pub user_id: i64,
    pub start_week_day: i64,
    pub morning_check_in: String,
    pub evening_check_in: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl UserSettings {
    /// API representation: the owner as a numeric `user` id plus the three
    /// settings fields. Row id and timestamps stay internal.
    pub fn to_api(&self) -> Value {
        json!({
            "user": self.user_id,
            "start_week_day": self.start_week_day,
            "morning_check_in": self.morning_check_in,
            "evening_check_in": self.evening_check_in,
        })
    }
}
