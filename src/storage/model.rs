use crate::reminder::{OwnerId, ReminderFireTime};

pub struct NewReminder {
    pub owner: OwnerId,
    pub text: String,
    pub fire_at: ReminderFireTime,
}
