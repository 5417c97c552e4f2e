use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::Activity;
use crate::reminder::{self, DueStatus, due::reminder_label};

/// An activity as listed to clients, with its due-date presentation attached.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    #[serde(flatten)]
    pub activity: Activity,
    pub days_remaining: i64,
    pub due_status: DueStatus,
    pub due_label: String,
    pub reminder_label: Option<String>,
}

impl ActivityView {
    pub fn new<Tz: TimeZone>(activity: Activity, now: DateTime<Utc>, tz: &Tz) -> Self {
        let days_remaining = reminder::days_remaining(activity.due_date, now, tz);
        let due_status = DueStatus::from_days_remaining(days_remaining);
        Self {
            due_label: due_status.label(),
            reminder_label: reminder_label(&activity),
            days_remaining,
            due_status,
            activity,
        }
    }
}
