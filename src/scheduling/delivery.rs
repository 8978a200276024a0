use async_trait::async_trait;

use crate::reminder::Reminder;

/// Outbound side of the chat transport used to hand a due reminder to its owner.
#[async_trait]
pub trait ReminderDeliveryChannel: Send + Sync + 'static {
    async fn deliver(&self, reminder: &Reminder) -> anyhow::Result<()>;
}
