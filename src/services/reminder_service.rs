use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::repository;
use crate::error::AppError;
use crate::notifier::{DispatchRequest, Notifier};
use crate::reminder::{self, ReminderDecision};
use crate::services::ledger::NotifiedLedger;

/// One reminder pass: load candidates and preferences, evaluate each
/// activity against `now`, and dispatch the ones that are due and have not
/// been notified yet today.
pub struct ReminderService<Tz: TimeZone = Local> {
    db: SqlitePool,
    notifier: Arc<dyn Notifier>,
    ledger: Arc<NotifiedLedger>,
    tz: Tz,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderStats {
    pub reminders_disabled: bool,
    pub evaluated: usize,
    pub dispatched: usize,
    pub deduplicated: usize,
    pub failed: usize,
}

impl ReminderService<Local> {
    pub fn new(db: SqlitePool, notifier: Arc<dyn Notifier>) -> Self {
        Self::with_timezone(db, notifier, Arc::new(NotifiedLedger::new()), Local)
    }
}

impl<Tz> ReminderService<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
{
    pub fn with_timezone(
        db: SqlitePool,
        notifier: Arc<dyn Notifier>,
        ledger: Arc<NotifiedLedger>,
        tz: Tz,
    ) -> Self {
        Self {
            db,
            notifier,
            ledger,
            tz,
        }
    }

    pub fn ledger(&self) -> &Arc<NotifiedLedger> {
        &self.ledger
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> Result<ReminderStats, AppError> {
        let mut stats = ReminderStats::default();
        let today = now.with_timezone(&self.tz).date_naive();

        let pruned = self.ledger.prune_before(today).await;
        if pruned > 0 {
            debug!("Pruned {} stale reminder ledger entries", pruned);
        }

        let prefs = repository::fetch_preferences(&self.db).await?;
        if !prefs.reminders_enabled {
            debug!("Reminders disabled in preferences, skipping pass");
            stats.reminders_disabled = true;
            return Ok(stats);
        }

        let activities = repository::fetch_reminder_candidates(&self.db).await?;
        for activity in &activities {
            stats.evaluated += 1;

            let ReminderDecision::Fire {
                activity_id,
                title,
                body,
            } = reminder::evaluate(activity, now, &self.tz)
            else {
                continue;
            };

            if !self.ledger.try_claim(&activity_id, today).await {
                stats.deduplicated += 1;
                continue;
            }

            let request = DispatchRequest {
                activity_id,
                title,
                body,
                style: prefs.notification_style,
            };
            match self.notifier.notify(&request).await {
                Ok(()) => {
                    stats.dispatched += 1;
                    info!("Reminder dispatched for activity {}", request.activity_id);
                }
                Err(e) => {
                    self.ledger.release(&request.activity_id, today).await;
                    stats.failed += 1;
                    warn!(
                        "Reminder dispatch failed for activity {}: {}",
                        request.activity_id, e
                    );
                }
            }
        }

        Ok(stats)
    }
}
