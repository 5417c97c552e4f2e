use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, TimeZone, Utc};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::services::reminder_service::ReminderService;

/// Runs reminder passes on a fixed interval until the task is dropped or aborted.
pub struct ReminderScheduler<Tz: TimeZone = Local> {
    service: Arc<ReminderService<Tz>>,
    interval: Duration,
}

impl<Tz> ReminderScheduler<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
{
    pub fn new(service: Arc<ReminderService<Tz>>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.start().await;
        })
    }

    pub async fn start(self) {
        info!("Starting reminder scheduler (interval: {:?})", self.interval);

        let mut ticker = interval(self.interval);
        loop {
            ticker.tick().await;

            match self.service.run_once(Utc::now()).await {
                Ok(stats) if stats.dispatched > 0 || stats.failed > 0 => {
                    info!(
                        "Reminder pass completed - evaluated: {}, dispatched: {}, deduplicated: {}, failed: {}",
                        stats.evaluated, stats.dispatched, stats.deduplicated, stats.failed
                    );
                }
                Ok(stats) => {
                    debug!("Reminder pass completed - evaluated: {}", stats.evaluated);
                }
                Err(e) => {
                    // keep polling; the next tick retries
                    warn!("Reminder pass failed: {:?}", e);
                }
            }
        }
    }
}
