mod delivery;

pub use delivery::TelegramDeliveryChannel;

use std::sync::Arc;

use teloxide::{
    dispatching::UpdateHandler,
    dptree,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup},
    utils::command::BotCommands,
};

use crate::{
    conversation::{ConversationPhase, ConversationReply, ConversationTracker},
    reminder::OwnerId,
};

type HandlerResult = anyhow::Result<()>;
type HandlerConversationTracker = Arc<ConversationTracker>;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
enum GlobalCommand {
    #[command(description = "show the main menu.")]
    Start,
    #[command(description = "create a new reminder.")]
    Remind,
    #[command(description = "stop creating the current reminder.")]
    Cancel,
    #[command(description = "display this text.")]
    Help,
}

pub struct TelegramInteractionInterface;
impl TelegramInteractionInterface {
    pub async fn start(bot: Bot, tracker: HandlerConversationTracker) {
        log::info!("Starting Telegram interaction interface");

        if let Err(e) = bot.set_my_commands(GlobalCommand::bot_commands()).await {
            log::warn!("Could not register bot commands: {e}");
        }

        Dispatcher::builder(bot, schema())
            .dependencies(dptree::deps![tracker])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await
    }
}

pub(crate) fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message()
        .branch(teloxide::filter_command::<GlobalCommand, _>().endpoint(handle_command))
        .branch(dptree::endpoint(handle_message))
}

fn sender_id(msg: &Message) -> Option<OwnerId> {
    msg.from.as_ref().map(|user| user.id.0 as OwnerId)
}

fn main_menu() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("/start"),
        KeyboardButton::new("/remind"),
    ]])
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: GlobalCommand,
    tracker: HandlerConversationTracker,
) -> HandlerResult {
    let reply = match cmd {
        GlobalCommand::Start => {
            bot.send_message(msg.chat.id, "Hello! Use /remind to create a reminder.")
                .reply_markup(main_menu())
                .await?;
            return Ok(());
        }
        GlobalCommand::Help => {
            bot.send_message(msg.chat.id, GlobalCommand::descriptions().to_string())
                .await?;
            return Ok(());
        }
        GlobalCommand::Remind => match sender_id(&msg) {
            Some(owner) => tracker.begin(owner).await?,
            None => return Ok(()),
        },
        GlobalCommand::Cancel => match sender_id(&msg) {
            Some(owner) => tracker.cancel(owner).await?,
            None => return Ok(()),
        },
    };

    bot.send_message(msg.chat.id, reply.to_string()).await?;
    Ok(())
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    tracker: HandlerConversationTracker,
) -> HandlerResult {
    let Some(owner) = sender_id(&msg) else {
        return Ok(());
    };

    let reply = match msg.text() {
        Some(text) => tracker.handle_text(owner, text).await?,
        None if tracker.phase(owner).await? != ConversationPhase::Idle => {
            ConversationReply::MessageRequired
        }
        None => return Ok(()),
    };

    // Group chatter outside a dialog gets no answer.
    if reply == ConversationReply::Ignored && !msg.chat.is_private() {
        return Ok(());
    }

    bot.send_message(msg.chat.id, reply.to_string()).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
