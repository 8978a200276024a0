use async_trait::async_trait;
use thiserror::Error;

use crate::reminder::{Reminder, ReminderId};

use super::NewReminder;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("reminder text must not be empty")]
    EmptyText,

    #[error("unknown reminder status \"{0}\"")]
    UnknownStatus(String),
}

#[async_trait]
pub trait ReminderStorage: Send + Sync {
    /// Persists a new reminder in the pending state.
    async fn insert(&self, reminder: NewReminder) -> Result<ReminderId, StorageError>;
    async fn get(&self, id: ReminderId) -> Result<Option<Reminder>, StorageError>;
    async fn get_pending(&self) -> Result<Vec<Reminder>, StorageError>;
    /// Marks a reminder as delivered. Repeated calls and unknown ids are no-ops.
    async fn mark_sent(&self, id: ReminderId) -> Result<(), StorageError>;
}

pub(super) fn validate(reminder: &NewReminder) -> Result<(), StorageError> {
    if reminder.text.trim().is_empty() {
        return Err(StorageError::EmptyText);
    }

    Ok(())
}

#[cfg(test)]
pub use in_memory::InMemoryReminderStorage;
