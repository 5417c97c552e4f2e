mod common;

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use organizer::db::repository;
use organizer::models::{NotificationStyle, UserPreferences};
use organizer::services::{NotifiedLedger, ReminderService};

use common::{RecordingNotifier, new_activity, test_pool};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn service(
    db: sqlx::SqlitePool,
    notifier: Arc<RecordingNotifier>,
) -> ReminderService<Utc> {
    ReminderService::with_timezone(db, notifier, Arc::new(NotifiedLedger::new()), Utc)
}

#[tokio::test]
async fn test_dispatches_once_per_day() {
    let db = test_pool().await;
    let activity = new_activity("Lab report", day(2024, 6, 10), 2, 8, 0);
    repository::insert_activity(&db, &activity).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let service = service(db, notifier.clone());

    let early = service.run_once(at(2024, 6, 8, 7, 59)).await.unwrap();
    assert_eq!(early.evaluated, 1);
    assert_eq!(early.dispatched, 0);

    let first = service.run_once(at(2024, 6, 8, 8, 0)).await.unwrap();
    assert_eq!(first.dispatched, 1);

    let again = service.run_once(at(2024, 6, 8, 21, 30)).await.unwrap();
    assert_eq!(again.dispatched, 0);
    assert_eq!(again.deduplicated, 1);

    let next_day = service.run_once(at(2024, 6, 9, 8, 0)).await.unwrap();
    assert_eq!(next_day.dispatched, 0);
    assert_eq!(next_day.deduplicated, 0);

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].activity_id, activity.id);
    assert_eq!(sent[0].title, "Reminder: Lab report");
    assert_eq!(sent[0].body, "2 days left until the due date.");
}

#[tokio::test]
async fn test_global_switch_disables_dispatch() {
    let db = test_pool().await;
    repository::insert_activity(&db, &new_activity("Quiz", day(2024, 6, 10), 0, 8, 0))
        .await
        .unwrap();
    let prefs = UserPreferences {
        reminders_enabled: false,
        ..UserPreferences::default()
    };
    repository::save_preferences(&db, &prefs).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let stats = service(db, notifier.clone())
        .run_once(at(2024, 6, 10, 12, 0))
        .await
        .unwrap();

    assert!(stats.reminders_disabled);
    assert_eq!(stats.evaluated, 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_notification_style_is_passed_through() {
    let db = test_pool().await;
    repository::insert_activity(&db, &new_activity("Quiz", day(2024, 6, 10), 0, 8, 0))
        .await
        .unwrap();
    let prefs = UserPreferences {
        notification_style: NotificationStyle::Vibrate,
        ..UserPreferences::default()
    };
    repository::save_preferences(&db, &prefs).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    service(db, notifier.clone())
        .run_once(at(2024, 6, 10, 9, 0))
        .await
        .unwrap();

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].style, NotificationStyle::Vibrate);
    assert_eq!(sent[0].body, "Due today!");
}

#[tokio::test]
async fn test_completed_and_disabled_activities_are_not_evaluated() {
    let db = test_pool().await;
    let mut done = new_activity("Done", day(2024, 6, 10), 0, 8, 0);
    done.is_completed = true;
    let mut silent = new_activity("Silent", day(2024, 6, 10), 0, 8, 0);
    silent.is_reminder_enabled = false;
    repository::insert_activity(&db, &done).await.unwrap();
    repository::insert_activity(&db, &silent).await.unwrap();

    let notifier = Arc::new(RecordingNotifier::default());
    let stats = service(db, notifier.clone())
        .run_once(at(2024, 6, 10, 9, 0))
        .await
        .unwrap();

    assert_eq!(stats.evaluated, 0);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_failed_dispatch_is_retried_next_pass() {
    let db = test_pool().await;
    repository::insert_activity(&db, &new_activity("Quiz", day(2024, 6, 10), 0, 8, 0))
        .await
        .unwrap();

    let ledger = Arc::new(NotifiedLedger::new());
    let failing = ReminderService::with_timezone(
        db.clone(),
        Arc::new(RecordingNotifier::failing()),
        ledger.clone(),
        Utc,
    );
    let stats = failing.run_once(at(2024, 6, 10, 9, 0)).await.unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(ledger.len().await, 0);

    let notifier = Arc::new(RecordingNotifier::default());
    let working = ReminderService::with_timezone(db, notifier.clone(), ledger, Utc);
    let stats = working.run_once(at(2024, 6, 10, 9, 5)).await.unwrap();
    assert_eq!(stats.dispatched, 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_overlapping_pollers_share_one_ledger() {
    let db = test_pool().await;
    repository::insert_activity(&db, &new_activity("Quiz", day(2024, 6, 10), 0, 8, 0))
        .await
        .unwrap();

    let ledger = Arc::new(NotifiedLedger::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let a = ReminderService::with_timezone(db.clone(), notifier.clone(), ledger.clone(), Utc);
    let b = ReminderService::with_timezone(db, notifier.clone(), ledger, Utc);

    let now = at(2024, 6, 10, 9, 0);
    let (ra, rb) = tokio::join!(a.run_once(now), b.run_once(now));
    let total = ra.unwrap().dispatched + rb.unwrap().dispatched;

    assert_eq!(total, 1);
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_local_zone_decides_the_reminder_day() {
    let db = test_pool().await;
    repository::insert_activity(&db, &new_activity("Exam", day(2024, 6, 10), 0, 20, 0))
        .await
        .unwrap();

    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    let service = ReminderService::with_timezone(
        db,
        notifier.clone(),
        Arc::new(NotifiedLedger::new()),
        tz,
    );

    // 20:00 on June 10 in UTC-5 is 01:00 UTC on June 11
    let before = service.run_once(at(2024, 6, 11, 0, 59)).await.unwrap();
    assert_eq!(before.dispatched, 0);
    let after = service.run_once(at(2024, 6, 11, 1, 0)).await.unwrap();
    assert_eq!(after.dispatched, 1);
}
