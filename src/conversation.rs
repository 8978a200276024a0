use std::{fmt, sync::Arc};

use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage, InMemStorageError},
    types::ChatId,
};

use crate::{
    reminder::{OwnerId, ReminderFireTime},
    storage::{NewReminder, ReminderStorage},
    time_parser::TimeExpressionParser,
};

type ConversationDialogue = Dialogue<ConversationPhase, InMemStorage<ConversationPhase>>;
pub type DialogueResult<T> = Result<T, InMemStorageError>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConversationPhase {
    #[default]
    Idle,
    AwaitingMessage,
    AwaitingTime {
        text: String,
    },
}

/// What the bot should answer after a conversation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversationReply {
    AskForMessage,
    AskForTime { text: String },
    MessageRequired,
    InvalidTime,
    Saved { fire_at: ReminderFireTime },
    SaveFailed,
    Cancelled,
    NothingToCancel,
    /// The owner has no conversation going on.
    Ignored,
}

impl fmt::Display for ConversationReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AskForMessage => write!(
                f,
                "Enter your reminder message. If you want to stop, use the /cancel command."
            ),
            Self::AskForTime { text } => write!(
                f,
                "You will be reminded about \"{text}\".\nNow enter the time (Irden, Gunortan, Agsham + hour:minute or hour):"
            ),
            Self::MessageRequired => write!(f, "Please send me the reminder text."),
            Self::InvalidTime => write!(f, "Invalid time format. Try again!"),
            Self::Saved { fire_at } => write!(f, "Reminder saved! I'll remind you at {fire_at}"),
            Self::SaveFailed => write!(
                f,
                "Failed to save reminder. Please start over with /remind."
            ),
            Self::Cancelled => write!(f, "Cancelled current operation."),
            Self::NothingToCancel => write!(f, "Nothing to cancel."),
            Self::Ignored => write!(f, "Use /remind to create a new reminder."),
        }
    }
}

/// Per-owner reminder creation dialog.
///
/// `/remind` moves an owner to [`ConversationPhase::AwaitingMessage`], the next
/// text becomes the reminder content, and the following text is parsed as the
/// fire time. A time that does not parse keeps the owner at the time step with
/// the captured content. Dialogues are keyed by the owner's user id rather than
/// the chat, so interleaved messages from different owners never touch each
/// other's state.
pub struct ConversationTracker {
    storage: Arc<dyn ReminderStorage>,
    parser: TimeExpressionParser,
    dialogues: Arc<InMemStorage<ConversationPhase>>,
}

impl ConversationTracker {
    pub fn new(storage: Arc<dyn ReminderStorage>, parser: TimeExpressionParser) -> Self {
        Self {
            storage,
            parser,
            dialogues: InMemStorage::new(),
        }
    }

    fn dialogue(&self, owner: OwnerId) -> ConversationDialogue {
        Dialogue::new(self.dialogues.clone(), ChatId(owner))
    }

    pub async fn phase(&self, owner: OwnerId) -> DialogueResult<ConversationPhase> {
        self.dialogue(owner).get_or_default().await
    }

    /// Starts a new conversation, dropping whatever the owner had in progress.
    pub async fn begin(&self, owner: OwnerId) -> DialogueResult<ConversationReply> {
        self.dialogue(owner)
            .update(ConversationPhase::AwaitingMessage)
            .await?;

        Ok(ConversationReply::AskForMessage)
    }

    pub async fn cancel(&self, owner: OwnerId) -> DialogueResult<ConversationReply> {
        let dialogue = self.dialogue(owner);
        match dialogue.get().await? {
            None | Some(ConversationPhase::Idle) => Ok(ConversationReply::NothingToCancel),
            Some(_) => {
                dialogue.exit().await?;
                Ok(ConversationReply::Cancelled)
            }
        }
    }

    pub async fn handle_text(
        &self,
        owner: OwnerId,
        text: &str,
    ) -> DialogueResult<ConversationReply> {
        let dialogue = self.dialogue(owner);

        let reply = match dialogue.get_or_default().await? {
            ConversationPhase::Idle => ConversationReply::Ignored,
            ConversationPhase::AwaitingMessage if text.trim().is_empty() => {
                ConversationReply::MessageRequired
            }
            ConversationPhase::AwaitingMessage => {
                dialogue
                    .update(ConversationPhase::AwaitingTime {
                        text: text.to_string(),
                    })
                    .await?;
                ConversationReply::AskForTime {
                    text: text.to_string(),
                }
            }
            ConversationPhase::AwaitingTime { text: captured } => match self.parser.parse(text) {
                Ok(fire_at) => {
                    dialogue.exit().await?;
                    self.commit(owner, captured, fire_at).await
                }
                Err(e) => {
                    log::debug!("Rejected time expression from {owner}: {e}");
                    ConversationReply::InvalidTime
                }
            },
        };

        Ok(reply)
    }

    async fn commit(
        &self,
        owner: OwnerId,
        text: String,
        fire_at: ReminderFireTime,
    ) -> ConversationReply {
        let new_reminder = NewReminder {
            owner,
            text,
            fire_at: fire_at.clone(),
        };

        match self.storage.insert(new_reminder).await {
            Ok(id) => {
                log::info!("Created reminder {id} for {owner} at {fire_at}");
                ConversationReply::Saved { fire_at }
            }
            Err(e) => {
                log::error!("Failed to save reminder for {owner}: {e}");
                ConversationReply::SaveFailed
            }
        }
    }
}
