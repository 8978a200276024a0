use std::sync::Arc;

use teloxide::dptree::deps;
use teloxide_tests::{
    MockBot, MockGroupChat, MockMessagePhoto, MockMessageText, mock_bot::DistributionKey,
};

use crate::{
    conversation::{ConversationReply, ConversationTracker},
    reminder::{ReminderFireTime, ReminderStatus},
    storage::InMemoryReminderStorage,
    time_parser::TimeExpressionParser,
};

use super::*;

fn tracker() -> (HandlerConversationTracker, Arc<InMemoryReminderStorage>) {
    let storage = Arc::new(InMemoryReminderStorage::new());
    let tracker = Arc::new(ConversationTracker::new(
        storage.clone(),
        TimeExpressionParser::lenient(),
    ));
    (tracker, storage)
}

fn last_reply(bot: &MockBot<anyhow::Error, DistributionKey>) -> Option<String> {
    bot.get_responses()
        .sent_messages
        .last()
        .and_then(|message| message.text().map(str::to_string))
}

#[tokio::test]
async fn remind_text_and_time_save_the_reminder() {
    let (tracker, storage) = tracker();
    let mut bot = MockBot::new(MockMessageText::new().text("/remind"), schema());
    bot.dependencies(deps![tracker]);

    bot.dispatch().await;
    assert_eq!(
        last_reply(&bot),
        Some(ConversationReply::AskForMessage.to_string())
    );

    bot.update(MockMessageText::new().text("Buy milk"));
    bot.dispatch().await;
    assert_eq!(
        last_reply(&bot),
        Some(
            ConversationReply::AskForTime {
                text: "Buy milk".to_string()
            }
            .to_string()
        )
    );

    bot.update(MockMessageText::new().text("agsham"));
    bot.dispatch().await;
    assert_eq!(
        last_reply(&bot),
        Some("Reminder saved! I'll remind you at 18:00".to_string())
    );

    let reminders = storage.all().await;
    assert_eq!(reminders.len(), 1);
    assert_eq!(reminders[0].text, "Buy milk");
    assert_eq!(reminders[0].fire_at, ReminderFireTime::new("18:00"));
    assert_eq!(reminders[0].status, ReminderStatus::Pending);
}

#[tokio::test]
async fn idle_text_in_private_chat_gets_a_hint() {
    let (tracker, storage) = tracker();
    let mut bot = MockBot::new(MockMessageText::new().text("agsham"), schema());
    bot.dependencies(deps![tracker]);

    bot.dispatch().await;

    assert_eq!(
        last_reply(&bot),
        Some("Use /remind to create a new reminder.".to_string())
    );
    assert!(storage.all().await.is_empty());
}

#[tokio::test]
async fn idle_text_in_group_chat_is_left_unanswered() {
    let (tracker, _) = tracker();
    let message = MockMessageText::new()
        .text("hello everyone")
        .chat(MockGroupChat::new().build());
    let mut bot = MockBot::new(message, schema());
    bot.dependencies(deps![tracker]);

    bot.dispatch().await;

    assert!(bot.get_responses().sent_messages.is_empty());
}

#[tokio::test]
async fn non_text_message_during_dialog_asks_for_text() {
    let (tracker, _) = tracker();
    let mut bot = MockBot::new(MockMessageText::new().text("/remind"), schema());
    bot.dependencies(deps![tracker]);
    bot.dispatch().await;

    bot.update(MockMessagePhoto::new());
    bot.dispatch().await;

    assert_eq!(
        last_reply(&bot),
        Some(ConversationReply::MessageRequired.to_string())
    );
}

#[tokio::test]
async fn non_text_message_while_idle_is_left_unanswered() {
    let (tracker, _) = tracker();
    let mut bot = MockBot::new(MockMessagePhoto::new(), schema());
    bot.dependencies(deps![tracker]);

    bot.dispatch().await;

    assert!(bot.get_responses().sent_messages.is_empty());
}

#[tokio::test]
async fn cancel_drops_the_dialog() {
    let (tracker, storage) = tracker();
    let mut bot = MockBot::new(MockMessageText::new().text("/remind"), schema());
    bot.dependencies(deps![tracker]);
    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Buy milk"));
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("/cancel"));
    bot.dispatch().await;
    assert_eq!(
        last_reply(&bot),
        Some("Cancelled current operation.".to_string())
    );

    bot.update(MockMessageText::new().text("agsham"));
    bot.dispatch().await;
    assert_eq!(
        last_reply(&bot),
        Some(ConversationReply::Ignored.to_string())
    );
    assert!(storage.all().await.is_empty());
}
