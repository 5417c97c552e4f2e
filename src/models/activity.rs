use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::UserPreferences;
use crate::reminder::{self, MILLIS_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Epoch millis of 00:00 UTC on the due calendar day.
    pub due_date: i64,
    pub category_id: Option<String>,
    pub is_completed: bool,
    pub is_reminder_enabled: bool,
    pub reminder_offset_days: i32,
    pub reminder_hour: i32,
    pub reminder_minute: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Activity {
    /// Calendar day the activity is due, recovered from the UTC-midnight encoding.
    pub fn due_day(&self) -> Option<NaiveDate> {
        reminder::utc_day(self.due_date)
    }

    /// Whether any field that decides when the reminder fires differs from `other`.
    pub fn reminder_schedule_changed(&self, other: &Activity) -> bool {
        self.due_date != other.due_date
            || self.is_reminder_enabled != other.is_reminder_enabled
            || self.reminder_offset_days != other.reminder_offset_days
            || self.reminder_hour != other.reminder_hour
            || self.reminder_minute != other.reminder_minute
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        if self.due_date.rem_euclid(MILLIS_PER_DAY) != 0 {
            return Err(AppError::validation("due_date must be midnight UTC"));
        }
        validate_reminder(
            self.reminder_offset_days,
            self.reminder_hour,
            self.reminder_minute,
        )
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::validation("title must not be empty"));
    }
    Ok(())
}

pub(crate) fn validate_reminder(offset_days: i32, hour: i32, minute: i32) -> Result<(), AppError> {
    if offset_days < 0 {
        return Err(AppError::validation(format!(
            "reminder_offset_days must not be negative (got {})",
            offset_days
        )));
    }
    if !(0..=23).contains(&hour) {
        return Err(AppError::validation(format!(
            "reminder_hour must be between 0 and 23 (got {})",
            hour
        )));
    }
    if !(0..=59).contains(&minute) {
        return Err(AppError::validation(format!(
            "reminder_minute must be between 0 and 59 (got {})",
            minute
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewActivityRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub is_reminder_enabled: bool,
    pub reminder_offset_days: Option<i32>,
    pub reminder_hour: Option<i32>,
    pub reminder_minute: Option<i32>,
}

impl NewActivityRequest {
    /// Builds a validated activity; unset reminder fields fall back to the user's defaults.
    pub fn into_activity(
        self,
        prefs: &UserPreferences,
        now: DateTime<Utc>,
    ) -> Result<Activity, AppError> {
        let now = now.to_rfc3339();
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            title: self.title.trim().to_string(),
            description: self.description,
            due_date: reminder::utc_midnight_millis(self.due_date),
            category_id: self.category_id,
            is_completed: false,
            is_reminder_enabled: self.is_reminder_enabled,
            reminder_offset_days: self
                .reminder_offset_days
                .unwrap_or(prefs.default_reminder_days),
            reminder_hour: self.reminder_hour.unwrap_or(prefs.default_reminder_hour),
            reminder_minute: self.reminder_minute.unwrap_or(prefs.default_reminder_minute),
            created_at: now.clone(),
            updated_at: now,
        };
        activity.validate()?;
        Ok(activity)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub is_completed: Option<bool>,
    pub is_reminder_enabled: Option<bool>,
    pub reminder_offset_days: Option<i32>,
    pub reminder_hour: Option<i32>,
    pub reminder_minute: Option<i32>,
}

impl UpdateActivityRequest {
    pub fn apply(self, current: &mut Activity, now: DateTime<Utc>) -> Result<(), AppError> {
        if let Some(title) = self.title {
            current.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            current.description = description;
        }
        if let Some(due_date) = self.due_date {
            current.due_date = reminder::utc_midnight_millis(due_date);
        }
        if let Some(category_id) = self.category_id {
            current.category_id = Some(category_id);
        }
        if let Some(is_completed) = self.is_completed {
            current.is_completed = is_completed;
        }
        if let Some(enabled) = self.is_reminder_enabled {
            current.is_reminder_enabled = enabled;
        }
        if let Some(offset) = self.reminder_offset_days {
            current.reminder_offset_days = offset;
        }
        if let Some(hour) = self.reminder_hour {
            current.reminder_hour = hour;
        }
        if let Some(minute) = self.reminder_minute {
            current.reminder_minute = minute;
        }
        current.updated_at = now.to_rfc3339();
        current.validate()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Pending,
    Completed,
    All,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    pub category_id: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    pub q: Option<String>,
}

impl ActivityFilter {
    pub fn matches(&self, activity: &Activity) -> bool {
        let category_ok = match &self.category_id {
            Some(id) => activity.category_id.as_deref() == Some(id.as_str()),
            None => true,
        };
        let status_ok = match self.status {
            StatusFilter::Pending => !activity.is_completed,
            StatusFilter::Completed => activity.is_completed,
            StatusFilter::All => true,
        };
        let query_ok = match &self.q {
            Some(q) => activity.title.to_lowercase().contains(&q.to_lowercase()),
            None => true,
        };
        category_ok && status_ok && query_ok
    }
}
