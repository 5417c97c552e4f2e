#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use organizer::error::AppError;
use organizer::models::{Activity, NewActivityRequest, UserPreferences};
use organizer::notifier::{DispatchRequest, Notifier};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub async fn test_pool() -> SqlitePool {
    // one connection so every query sees the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn new_activity(title: &str, due: NaiveDate, offset: i32, hour: i32, minute: i32) -> Activity {
    NewActivityRequest {
        title: title.to_string(),
        description: String::new(),
        due_date: due,
        category_id: None,
        is_reminder_enabled: true,
        reminder_offset_days: Some(offset),
        reminder_hour: Some(hour),
        reminder_minute: Some(minute),
    }
    .into_activity(
        &UserPreferences::default(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .expect("valid activity")
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<DispatchRequest>>,
    pub cancelled: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<DispatchRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, request: &DispatchRequest) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::dispatch("permission denied"));
        }
        self.sent.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn cancel(&self, activity_id: &str) -> Result<(), AppError> {
        self.cancelled.lock().unwrap().push(activity_id.to_string());
        Ok(())
    }
}
