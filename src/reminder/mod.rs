//! Reminder timing rules.
//!
//! Due dates are stored as the epoch millis of midnight UTC on the due
//! calendar day. That value is only a day identifier: the reminder itself fires
//! at a local wall-clock time on a local calendar day derived from it. Every
//! function here takes "now" and the local time zone as arguments and never
//! reads a clock.

pub mod due;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::models::Activity;

pub use due::DueStatus;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Encodes a calendar day as the epoch millis of its UTC midnight.
pub fn utc_midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Recovers the calendar day from a UTC-midnight encoded value.
pub fn utc_day(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Outcome of evaluating one activity at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDecision {
    Fire {
        activity_id: String,
        title: String,
        body: String,
    },
    Skip,
}

impl ReminderDecision {
    pub fn is_fire(&self) -> bool {
        matches!(self, ReminderDecision::Fire { .. })
    }
}

/// Local instant at which the activity's reminder becomes due.
///
/// The UTC calendar fields of the due date are reinterpreted as local fields,
/// the reminder time-of-day is applied, and the offset is subtracted in whole
/// calendar days so the wall-clock time survives DST changes. Returns `None`
/// for values that cannot be represented.
pub fn target_instant<Tz: TimeZone>(activity: &Activity, tz: &Tz) -> Option<DateTime<Tz>> {
    let due = utc_day(activity.due_date)?;
    let time = NaiveTime::from_hms_opt(
        u32::try_from(activity.reminder_hour).ok()?,
        u32::try_from(activity.reminder_minute).ok()?,
        0,
    )?;
    let offset = u64::try_from(activity.reminder_offset_days).ok()?;
    let day = due.checked_sub_days(Days::new(offset))?;
    resolve_local(tz, day.and_time(time))
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&wall).earliest() {
        Some(instant) => Some(instant),
        // skipped by a DST gap
        None => {
            let shifted = wall.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}

/// Whether the reminder should fire at `now`.
///
/// True once `now` reaches the target instant and stays true for the rest of
/// that local calendar day. It turns false again on the next day whether or
/// not anything was dispatched, so callers must deduplicate.
pub fn should_fire<Tz: TimeZone>(activity: &Activity, now: DateTime<Utc>, tz: &Tz) -> bool {
    if activity.is_completed || !activity.is_reminder_enabled {
        return false;
    }
    let Some(target) = target_instant(activity, tz) else {
        return false;
    };
    let local_now = now.with_timezone(tz);

    let same_day = local_now.year() == target.year() && local_now.ordinal() == target.ordinal();
    same_day && now.timestamp_millis() >= target.timestamp_millis()
}

pub fn render_message(activity: &Activity) -> String {
    if activity.reminder_offset_days == 0 {
        "Due today!".to_string()
    } else {
        format!(
            "{} days left until the due date.",
            activity.reminder_offset_days
        )
    }
}

pub fn notification_title(activity: &Activity) -> String {
    format!("Reminder: {}", activity.title)
}

pub fn evaluate<Tz: TimeZone>(activity: &Activity, now: DateTime<Utc>, tz: &Tz) -> ReminderDecision {
    if should_fire(activity, now, tz) {
        ReminderDecision::Fire {
            activity_id: activity.id.clone(),
            title: notification_title(activity),
            body: render_message(activity),
        }
    } else {
        ReminderDecision::Skip
    }
}

/// Whole days from local "today" to the due date; negative when overdue.
///
/// Today is re-encoded as a UTC-midnight value so both sides live in the same
/// day-identifier space, then the difference is floor-divided.
pub fn days_remaining<Tz: TimeZone>(due_date: i64, now: DateTime<Utc>, tz: &Tz) -> i64 {
    let today = now.with_timezone(tz).date_naive();
    due_date
        .saturating_sub(utc_midnight_millis(today))
        .div_euclid(MILLIS_PER_DAY)
}
