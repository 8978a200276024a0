pub mod delivery;
mod dispatch_scheduler;

pub use delivery::ReminderDeliveryChannel;
pub use dispatch_scheduler::{Clock, DispatchSummary, LocalClock, PollingReminderScheduler};
