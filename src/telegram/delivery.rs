use async_trait::async_trait;
use teloxide::prelude::*;

use crate::{reminder::Reminder, scheduling::ReminderDeliveryChannel};

pub struct TelegramDeliveryChannel {
    bot: Bot,
}

impl TelegramDeliveryChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReminderDeliveryChannel for TelegramDeliveryChannel {
    async fn deliver(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.bot
            .send_message(ChatId(reminder.owner), get_message_text(reminder))
            .await?;

        Ok(())
    }
}

fn get_message_text(reminder: &Reminder) -> String {
    format!("Reminder: {}", reminder.text)
}
