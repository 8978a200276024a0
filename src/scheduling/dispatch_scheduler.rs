use std::{sync::Arc, time::Duration};

use chrono::{Local, NaiveTime};
use tokio_util::sync::CancellationToken;

use crate::{reminder::Reminder, storage::ReminderStorage};

use super::ReminderDeliveryChannel;

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveTime;
}

/// Wall clock of the host in its local timezone.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub pending: usize,
    pub due: usize,
    pub delivered: usize,
    pub failed: usize,
}

/// Delivers pending reminders by polling the store on a fixed interval.
///
/// A reminder is due when its fire time names the same hour and minute as the
/// clock at poll time. Minutes that no poll observes (e.g. while the process is
/// down) are not caught up, the reminder then waits for the same minute on a
/// later day.
pub struct PollingReminderScheduler {
    storage: Arc<dyn ReminderStorage>,
    delivery_channel: Arc<dyn ReminderDeliveryChannel>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl PollingReminderScheduler {
    pub fn new(
        storage: Arc<dyn ReminderStorage>,
        delivery_channel: Arc<dyn ReminderDeliveryChannel>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            storage,
            delivery_channel,
            clock,
            poll_interval,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        log::info!(
            "Starting reminder dispatch loop with {:?} poll interval",
            self.poll_interval
        );

        loop {
            let summary = self.run_cycle(self.clock.now()).await;
            if summary.due > 0 {
                log::info!(
                    "Dispatch cycle finished. [pending = {}, due = {}, delivered = {}, failed = {}]",
                    summary.pending,
                    summary.due,
                    summary.delivered,
                    summary.failed
                );
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = shutdown.cancelled() => {
                    log::info!("Reminder dispatch loop shutting down");
                    break;
                }
            }
        }
    }

    pub async fn run_cycle(&self, now: NaiveTime) -> DispatchSummary {
        let pending = match self.storage.get_pending().await {
            Ok(pending) => pending,
            Err(e) => {
                log::error!("Could not query pending reminders, skipping cycle: {e}");
                return DispatchSummary::default();
            }
        };

        let mut summary = DispatchSummary {
            pending: pending.len(),
            ..Default::default()
        };

        for reminder in pending.iter().filter(|reminder| is_due(reminder, now)) {
            summary.due += 1;
            if self.dispatch(reminder).await {
                summary.delivered += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    async fn dispatch(&self, reminder: &Reminder) -> bool {
        if let Err(e) = self.delivery_channel.deliver(reminder).await {
            log::warn!(
                "Failed to deliver reminder, it stays pending. [reminder_id = {}, error = {e}]",
                reminder.id
            );
            return false;
        }

        log::info!(
            "Delivered reminder {} to {}",
            reminder.id,
            reminder.owner
        );

        if let Err(e) = self.storage.mark_sent(reminder.id).await {
            log::error!(
                "Delivered reminder could not be marked as sent and may be delivered again. [reminder_id = {}, error = {e}]",
                reminder.id
            );
        }

        true
    }
}

fn is_due(reminder: &Reminder, now: NaiveTime) -> bool {
    if reminder.fire_at.clock_time().is_none() {
        log::debug!(
            "Reminder {} has no valid clock time \"{}\" and will never fire",
            reminder.id,
            reminder.fire_at
        );
        return false;
    }

    reminder.fire_at.is_due(now)
}
