use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::Mutex;

/// Remembers the last local calendar day each activity was notified on, so
/// overlapping reminder passes dispatch at most once per activity per day.
#[derive(Debug, Default)]
pub struct NotifiedLedger {
    last_notified: Mutex<HashMap<String, NaiveDate>>,
}

impl NotifiedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn was_notified(&self, activity_id: &str, day: NaiveDate) -> bool {
        let last = self.last_notified.lock().await;
        last.get(activity_id) == Some(&day)
    }

    /// Marks the activity as notified for `day`. Returns false when it already
    /// was, in which case the caller must not dispatch.
    pub async fn try_claim(&self, activity_id: &str, day: NaiveDate) -> bool {
        let mut last = self.last_notified.lock().await;
        if last.get(activity_id) == Some(&day) {
            return false;
        }
        last.insert(activity_id.to_string(), day);
        true
    }

    /// Undoes a claim for `day` after a failed dispatch so the next pass retries.
    pub async fn release(&self, activity_id: &str, day: NaiveDate) {
        let mut last = self.last_notified.lock().await;
        if last.get(activity_id) == Some(&day) {
            last.remove(activity_id);
        }
    }

    /// Forgets an activity, e.g. after it is edited so a changed reminder can fire again.
    pub async fn forget(&self, activity_id: &str) {
        self.last_notified.lock().await.remove(activity_id);
    }

    /// Drops entries from days before `today`; they can never suppress a dispatch again.
    pub async fn prune_before(&self, today: NaiveDate) -> usize {
        let mut last = self.last_notified.lock().await;
        let before = last.len();
        last.retain(|_, day| *day >= today);
        before - last.len()
    }

    pub async fn len(&self) -> usize {
        self.last_notified.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn claims_once_per_activity_and_day() {
        let ledger = NotifiedLedger::new();
        assert!(!ledger.was_notified("a1", day(8)).await);

        assert!(ledger.try_claim("a1", day(8)).await);
        assert!(!ledger.try_claim("a1", day(8)).await);
        assert!(ledger.was_notified("a1", day(8)).await);
        assert!(!ledger.was_notified("a1", day(9)).await);
        assert!(!ledger.was_notified("a2", day(8)).await);

        assert!(ledger.try_claim("a1", day(9)).await);
    }

    #[tokio::test]
    async fn release_reopens_the_day() {
        let ledger = NotifiedLedger::new();
        assert!(ledger.try_claim("a1", day(8)).await);
        ledger.release("a1", day(8)).await;
        assert!(ledger.try_claim("a1", day(8)).await);
    }

    #[tokio::test]
    async fn prune_drops_only_past_days() {
        let ledger = NotifiedLedger::new();
        ledger.try_claim("old", day(7)).await;
        ledger.try_claim("today", day(8)).await;

        assert_eq!(ledger.prune_before(day(8)).await, 1);
        assert_eq!(ledger.len().await, 1);
        assert!(ledger.was_notified("today", day(8)).await);
    }

    #[tokio::test]
    async fn forget_allows_renotifying() {
        let ledger = NotifiedLedger::new();
        ledger.try_claim("a1", day(8)).await;
        ledger.forget("a1").await;
        assert!(!ledger.was_notified("a1", day(8)).await);
    }
}
