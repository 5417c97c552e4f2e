use serde::Serialize;

use crate::models::Activity;

/// Coarse urgency bucket for an activity's due date, as shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueStatus {
    Overdue { days: i64 },
    Today,
    Tomorrow,
    Soon { days: i64 },
    Later { days: i64 },
}

impl DueStatus {
    pub fn from_days_remaining(days: i64) -> Self {
        match days {
            d if d < 0 => DueStatus::Overdue { days: -d },
            0 => DueStatus::Today,
            1 => DueStatus::Tomorrow,
            d if d < 3 => DueStatus::Soon { days: d },
            d => DueStatus::Later { days: d },
        }
    }

    pub fn label(&self) -> String {
        match self {
            DueStatus::Overdue { days } => format!("Overdue by {} days", days),
            DueStatus::Today => "Due today".to_string(),
            DueStatus::Tomorrow => "Due tomorrow".to_string(),
            DueStatus::Soon { days } | DueStatus::Later { days } => format!("Due in {} days", days),
        }
    }
}

pub fn reminder_label(activity: &Activity) -> Option<String> {
    if !activity.is_reminder_enabled {
        return None;
    }
    Some(if activity.reminder_offset_days == 0 {
        "Remind today".to_string()
    } else {
        format!("Remind {} days before", activity.reminder_offset_days)
    })
}
