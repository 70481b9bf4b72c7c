use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::database::models::{EntryRow, User, UserSettings};
use crate::journal::payload::{EntryPayload, SettingsPayload};
use crate::journal::Category;

const ENTRY_COLUMNS: &str = "id, user_id, category, title, content, emotion, date, time_from, \
                             time_until, entry_order, created_on, updated_on";

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, slug, is_active, \
                            is_staff, is_superuser, created_on, updated_on";

const SETTINGS_COLUMNS: &str =
    "id, user_id, start_week_day, morning_check_in, evening_check_in, created_on, updated_on";

/// Payload fields mapped onto the journal_entries superset columns.
struct PayloadColumns {
    title: Option<String>,
    content: Option<String>,
    emotion: Option<String>,
    date: Option<String>,
    time_from: Option<String>,
    time_until: Option<String>,
    entry_order: Option<i64>,
}

impl PayloadColumns {
    fn from_payload(payload: &EntryPayload) -> Self {
        let mut columns = PayloadColumns {
            title: None,
            content: None,
            emotion: None,
            date: None,
            time_from: None,
            time_until: None,
            entry_order: None,
        };

        match payload {
            EntryPayload::Appointment { title, date, time_from, time_until } => {
                columns.title = Some(title.clone());
                columns.date = Some(date.format("%Y-%m-%d").to_string());
                columns.time_from = Some(time_from.format("%H:%M:%S").to_string());
                columns.time_until = Some(time_until.format("%H:%M:%S").to_string());
            }
            EntryPayload::Emotion { emotion } => {
                columns.emotion = Some(emotion.clone());
            }
            EntryPayload::Freeform { content } => {
                columns.content = Some(content.clone());
            }
            EntryPayload::Target { title, order } => {
                columns.title = Some(title.clone());
                columns.entry_order = Some(*order);
            }
            EntryPayload::Win { title } => {
                columns.title = Some(title.clone());
            }
        }

        columns
    }
}

#[derive(Clone)]
pub struct EntryRepository {
    pool: SqlitePool,
}

impl EntryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, user_id: i64, category: Category) -> Result<Vec<EntryRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries \
             WHERE user_id = ? AND category = ? ORDER BY {}",
            category.order_by()
        );
        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(user_id)
            .bind(category.slug())
            .fetch_all(&self.pool)
            .await
    }

    /// Entries whose creation date matches the given calendar date.
    pub async fn list_for_date(
        &self,
        user_id: i64,
        category: Category,
        date: NaiveDate,
    ) -> Result<Vec<EntryRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries \
             WHERE user_id = ? AND category = ? AND date(created_on) = ? ORDER BY {}",
            category.order_by()
        );
        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(user_id)
            .bind(category.slug())
            .bind(date.format("%Y-%m-%d").to_string())
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find(
        &self,
        user_id: i64,
        category: Category,
        id: i64,
    ) -> Result<Option<EntryRow>, sqlx::Error> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM journal_entries \
             WHERE id = ? AND user_id = ? AND category = ?"
        );
        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(category.slug())
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(
        &self,
        user_id: i64,
        category: Category,
        payload: &EntryPayload,
    ) -> Result<EntryRow, sqlx::Error> {
        let columns = PayloadColumns::from_payload(payload);
        let now = Utc::now();

        let sql = format!(
            "INSERT INTO journal_entries \
             (user_id, category, title, content, emotion, date, time_from, time_until, \
              entry_order, created_on, updated_on) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(user_id)
            .bind(category.slug())
            .bind(columns.title)
            .bind(columns.content)
            .bind(columns.emotion)
            .bind(columns.date)
            .bind(columns.time_from)
            .bind(columns.time_until)
            .bind(columns.entry_order)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
    }

    /// Full payload replacement. `created_on` and the owner never change;
    /// `updated_on` is refreshed.
    pub async fn update(
        &self,
        user_id: i64,
        category: Category,
        id: i64,
        payload: &EntryPayload,
    ) -> Result<Option<EntryRow>, sqlx::Error> {
        let columns = PayloadColumns::from_payload(payload);

        let sql = format!(
            "UPDATE journal_entries \
             SET title = ?, content = ?, emotion = ?, date = ?, time_from = ?, \
                 time_until = ?, entry_order = ?, updated_on = ? \
             WHERE id = ? AND user_id = ? AND category = ? \
             RETURNING {ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, EntryRow>(&sql)
            .bind(columns.title)
            .bind(columns.content)
            .bind(columns.emotion)
            .bind(columns.date)
            .bind(columns.time_from)
            .bind(columns.time_until)
            .bind(columns.entry_order)
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .bind(category.slug())
            .fetch_optional(&self.pool)
            .await
    }

    /// Returns false when no matching row existed.
    pub async fn delete(
        &self,
        user_id: i64,
        category: Category,
        id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM journal_entries WHERE id = ? AND user_id = ? AND category = ?",
        )
        .bind(id)
        .bind(user_id)
        .bind(category.slug())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Identity fields for a new user row; the service fills slug and hash.
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub slug: String,
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        sqlx::query_as::<_, User>(&sql).fetch_all(&self.pool).await
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE slug = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn slug_exists(&self, slug: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE slug = ?")
            .bind(slug)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    pub async fn insert(&self, new_user: NewUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users \
             (email, password_hash, first_name, last_name, slug, is_active, is_staff, \
              is_superuser, created_on, updated_on) \
             VALUES (?, ?, ?, ?, ?, 1, 0, 0, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(new_user.email)
            .bind(new_user.password_hash)
            .bind(new_user.first_name)
            .bind(new_user.last_name)
            .bind(new_user.slug)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
    }

    /// Full identity replacement; slug and password hash are immutable here.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_identity(
        &self,
        id: i64,
        email: &str,
        first_name: &str,
        last_name: &str,
        is_active: bool,
        is_staff: bool,
        is_superuser: bool,
    ) -> Result<Option<User>, sqlx::Error> {
        let sql = format!(
            "UPDATE users \
             SET email = ?, first_name = ?, last_name = ?, is_active = ?, is_staff = ?, \
                 is_superuser = ?, updated_on = ? \
             WHERE id = ? \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(first_name)
            .bind(last_name)
            .bind(is_active)
            .bind(is_staff)
            .bind(is_superuser)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Owned entries and settings go with the user via ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_for_user(&self, user_id: i64) -> Result<Option<UserSettings>, sqlx::Error> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM user_settings WHERE user_id = ?");
        sqlx::query_as::<_, UserSettings>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<UserSettings>, sqlx::Error> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM user_settings ORDER BY user_id ASC");
        sqlx::query_as::<_, UserSettings>(&sql)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert(
        &self,
        user_id: i64,
        payload: &SettingsPayload,
    ) -> Result<UserSettings, sqlx::Error> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO user_settings \
             (user_id, start_week_day, morning_check_in, evening_check_in, created_on, updated_on) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&sql)
            .bind(user_id)
            .bind(payload.start_week_day)
            .bind(payload.morning_check_in.format("%H:%M:%S").to_string())
            .bind(payload.evening_check_in.format("%H:%M:%S").to_string())
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn update_for_user(
        &self,
        user_id: i64,
        payload: &SettingsPayload,
    ) -> Result<Option<UserSettings>, sqlx::Error> {
        let sql = format!(
            "UPDATE user_settings \
             SET start_week_day = ?, morning_check_in = ?, evening_check_in = ?, updated_on = ? \
             WHERE user_id = ? \
             RETURNING {SETTINGS_COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&sql)
            .bind(payload.start_week_day)
            .bind(payload.morning_check_in.format("%H:%M:%S").to_string())
            .bind(payload.evening_check_in.format("%H:%M:%S").to_string())
            .bind(Utc::now())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_for_user(&self, user_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
