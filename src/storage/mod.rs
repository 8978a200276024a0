mod model;
mod reminder_storage;
pub mod sqlite;

pub use model::NewReminder;
pub use reminder_storage::{ReminderStorage, StorageError};

#[cfg(test)]
pub use reminder_storage::InMemoryReminderStorage;
