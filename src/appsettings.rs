use std::env;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Debug)]
pub struct SchedulerSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Deserialize, Debug, Default)]
pub struct ReminderSettings {
    /// Reject numeric times that are not a real clock time instead of storing them verbatim.
    #[serde(default)]
    pub strict_time_validation: bool,
}

#[derive(Deserialize, Debug)]
pub struct AppSettings {
    pub telegram: TelegramSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub reminders: ReminderSettings,
}

impl AppSettings {
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("telegram.token", env::var("BOT_TOKEN").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?;

        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;

        if settings.scheduler.poll_interval_secs == 0 {
            return Err(ConfigError::Message(
                "scheduler.poll_interval_secs must be at least 1".to_string(),
            ));
        }

        Ok(settings)
    }
}
