use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;

use crate::journal::Category;

/// One row of the shared journal_entries table. Payload columns not used by
/// the row's category are NULL; date and time fields are stored in their
/// canonical text forms.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EntryRow {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    pub title: Option<String>,
    pub content: Option<String>,
    pub emotion: Option<String>,
    pub date: Option<String>,
    pub time_from: Option<String>,
    pub time_until: Option<String>,
    pub entry_order: Option<i64>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

impl EntryRow {
    /// API representation for the row's category: the payload fields plus
    /// `user` and a date-only `created_on`. `updated_on` is never exposed.
    pub fn to_api(&self, category: Category) -> Value {
        let created_on = self.created_on.format("%Y-%m-%d").to_string();

        match category {
            Category::Appointments => json!({
                "id": self.id,
                "user": self.user_id,
                "title": self.title.clone().unwrap_or_default(),
                "date": self.date.clone().unwrap_or_default(),
                "time_from": self.time_from.clone().unwrap_or_default(),
                "time_until": self.time_until.clone().unwrap_or_default(),
                "created_on": created_on,
            }),
            Category::Emotions => json!({
                "id": self.id,
                "user": self.user_id,
                "emotion": self.emotion.clone().unwrap_or_default(),
                "created_on": created_on,
            }),
            Category::Gratitude
            | Category::Ideas
            | Category::Improvement
            | Category::Knowledge
            | Category::Notes => json!({
                "id": self.id,
                "user": self.user_id,
                "content": self.content.clone().unwrap_or_default(),
                "created_on": created_on,
            }),
            Category::Target => json!({
                "id": self.id,
                "user": self.user_id,
                "title": self.title.clone().unwrap_or_default(),
                "order": self.entry_order.unwrap_or_default(),
                "created_on": created_on,
            }),
            Category::Win => json!({
                "id": self.id,
                "user": self.user_id,
                "title": self.title.clone().unwrap_or_default(),
                "created_on": created_on,
            }),
        }
    }
}
