use crate::{
    reminder::{Reminder, ReminderFireTime, ReminderStatus},
    storage::StorageError,
};

const PENDING: &str = "pending";
const SENT: &str = "sent";

#[derive(sqlx::FromRow)]
pub struct ReminderStorageModel {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub time: String,
    pub status: String,
}

impl TryFrom<ReminderStorageModel> for Reminder {
    type Error = StorageError;

    fn try_from(value: ReminderStorageModel) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id,
            owner: value.user_id,
            text: value.message,
            fire_at: ReminderFireTime::new(value.time),
            status: parse_status(&value.status)?,
        })
    }
}

pub fn convert_status(status: ReminderStatus) -> &'static str {
    match status {
        ReminderStatus::Pending => PENDING,
        ReminderStatus::Sent => SENT,
    }
}

fn parse_status(status: &str) -> Result<ReminderStatus, StorageError> {
    match status {
        PENDING => Ok(ReminderStatus::Pending),
        SENT => Ok(ReminderStatus::Sent),
        other => Err(StorageError::UnknownStatus(other.to_string())),
    }
}
