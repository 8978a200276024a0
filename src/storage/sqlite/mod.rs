mod model;

use std::str::FromStr;

use async_trait::async_trait;
use model::{ReminderStorageModel, convert_status};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::reminder::{Reminder, ReminderId, ReminderStatus};

use super::{NewReminder, ReminderStorage, StorageError, reminder_storage::validate};

const CREATE_REMINDERS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS reminders (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    message TEXT    NOT NULL,
    time    TEXT    NOT NULL,
    status  TEXT    NOT NULL DEFAULT 'pending'
)";

const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS reminders_status ON reminders (status)";

pub struct SqliteReminderStorage {
    pool: SqlitePool,
}

impl SqliteReminderStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if needed) the database at `url` and prepares the schema.
    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let storage = Self::new(pool);
        storage.migrate().await?;

        Ok(storage)
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(CREATE_REMINDERS_TABLE)
            .execute(&self.pool)
            .await?;
        sqlx::query(CREATE_STATUS_INDEX).execute(&self.pool).await?;

        Ok(())
    }
}

#[async_trait]
impl ReminderStorage for SqliteReminderStorage {
    async fn insert(&self, reminder: NewReminder) -> Result<ReminderId, StorageError> {
        validate(&reminder)?;

        let NewReminder {
            owner,
            text,
            fire_at,
        } = reminder;

        let result = sqlx::query(
            "INSERT INTO reminders (user_id, message, time, status) VALUES (?, ?, ?, ?)",
        )
        .bind(owner)
        .bind(text)
        .bind(fire_at.into_string())
        .bind(convert_status(ReminderStatus::Pending))
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError> {
        let reminder = sqlx::query_as::<_, ReminderStorageModel>(
            "SELECT id, user_id, message, time, status FROM reminders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        reminder.map(Reminder::try_from).transpose()
    }

    async fn get_pending(&self) -> Result<Vec<Reminder>, StorageError> {
        let reminders = sqlx::query_as::<_, ReminderStorageModel>(
            "SELECT id, user_id, message, time, status FROM reminders WHERE status = ?",
        )
        .bind(convert_status(ReminderStatus::Pending))
        .fetch_all(&self.pool)
        .await?;

        reminders.into_iter().map(Reminder::try_from).collect()
    }

    async fn mark_sent(&self, id: ReminderId) -> Result<(), StorageError> {
        sqlx::query("UPDATE reminders SET status = ? WHERE id = ?")
            .bind(convert_status(ReminderStatus::Sent))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
