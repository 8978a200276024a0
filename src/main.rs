use std::{sync::Arc, time::Duration};

use teloxide::Bot;
use tokio_util::sync::CancellationToken;
use yatlat::{
    appsettings::AppSettings,
    conversation::ConversationTracker,
    scheduling::{LocalClock, PollingReminderScheduler},
    storage::sqlite::SqliteReminderStorage,
    telegram::{TelegramDeliveryChannel, TelegramInteractionInterface},
    time_parser::TimeExpressionParser,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load()?;

    let storage = Arc::new(SqliteReminderStorage::connect(&settings.database.url).await?);
    log::info!("Connected to reminder storage");

    let bot = Bot::new(settings.telegram.token.clone());

    let scheduler = PollingReminderScheduler::new(
        storage.clone(),
        Arc::new(TelegramDeliveryChannel::new(bot.clone())),
        Arc::new(LocalClock),
        Duration::from_secs(settings.scheduler.poll_interval_secs),
    );

    let shutdown = CancellationToken::new();
    let scheduler_task = tokio::spawn(scheduler.run(shutdown.child_token()));

    let parser = if settings.reminders.strict_time_validation {
        TimeExpressionParser::strict()
    } else {
        TimeExpressionParser::lenient()
    };
    log::info!(
        "Time expressions are validated {}",
        if parser.is_strict() { "strictly" } else { "leniently" }
    );

    let tracker = Arc::new(ConversationTracker::new(storage, parser));
    TelegramInteractionInterface::start(bot, tracker).await;

    shutdown.cancel();
    scheduler_task.await?;

    log::info!("Stopped");
    Ok(())
}
