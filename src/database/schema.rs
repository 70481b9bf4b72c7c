use sqlx::SqlitePool;
use tracing::info;

use crate::database::manager::DatabaseError;

/// DDL applied idempotently at startup. One statement per slice entry;
/// SQLite prepares a single statement at a time.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        slug TEXT NOT NULL UNIQUE,
        is_active INTEGER NOT NULL DEFAULT 1,
        is_staff INTEGER NOT NULL DEFAULT 0,
        is_superuser INTEGER NOT NULL DEFAULT 0,
        created_on TEXT NOT NULL,
        updated_on TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_settings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
        start_week_day INTEGER NOT NULL,
        morning_check_in TEXT NOT NULL,
        evening_check_in TEXT NOT NULL,
        created_on TEXT NOT NULL,
        updated_on TEXT NOT NULL
    )
    "#,
    // One table for all nine entry categories; payload columns not used by
    // a category stay NULL. "entry_order" because ORDER is reserved.
    r#"
    CREATE TABLE IF NOT EXISTS journal_entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category TEXT NOT NULL,
        title TEXT,
        content TEXT,
        emotion TEXT,
        date TEXT,
        time_from TEXT,
        time_until TEXT,
        entry_order INTEGER,
        created_on TEXT NOT NULL,
        updated_on TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_journal_entries_user_category ON journal_entries (user_id, category)",
    "CREATE INDEX IF NOT EXISTS idx_journal_entries_created_on ON journal_entries (created_on)",
];

/// Create all application tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::SchemaError(e.to_string()))?;
    }

    info!("Database schema initialized");
    Ok(())
}
