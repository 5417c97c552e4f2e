use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::activity::validate_reminder;

/// How a reminder should alert the user. Passed through to the notifier untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStyle {
    #[default]
    Standard,
    Sound,
    Vibrate,
    Both,
}

impl NotificationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStyle::Standard => "standard",
            NotificationStyle::Sound => "sound",
            NotificationStyle::Vibrate => "vibrate",
            NotificationStyle::Both => "both",
        }
    }

    /// Unknown values read back as `Standard`.
    pub fn parse(value: &str) -> Self {
        match value {
            "sound" => NotificationStyle::Sound,
            "vibrate" => NotificationStyle::Vibrate,
            "both" => NotificationStyle::Both,
            _ => NotificationStyle::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickAction {
    #[default]
    Detail,
    Edit,
}

impl ClickAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClickAction::Detail => "detail",
            ClickAction::Edit => "edit",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "edit" => ClickAction::Edit,
            _ => ClickAction::Detail,
        }
    }
}

const THEMES: [&str; 3] = ["system", "light", "dark"];

pub const KEY_REMINDERS_ENABLED: &str = "reminders_enabled";
pub const KEY_NOTIFICATION_STYLE: &str = "notification_style";
pub const KEY_DEFAULT_REMINDER_DAYS: &str = "default_reminder_days";
pub const KEY_DEFAULT_REMINDER_HOUR: &str = "default_reminder_hour";
pub const KEY_DEFAULT_REMINDER_MINUTE: &str = "default_reminder_minute";
pub const KEY_THEME: &str = "theme";
pub const KEY_CONFIRM_DELETE: &str = "confirm_delete";
pub const KEY_ACTIVITY_CLICK_ACTION: &str = "activity_click_action";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub reminders_enabled: bool,
    pub notification_style: NotificationStyle,
    pub default_reminder_days: i32,
    pub default_reminder_hour: i32,
    pub default_reminder_minute: i32,
    pub theme: String,
    pub confirm_delete: bool,
    pub activity_click_action: ClickAction,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            reminders_enabled: true,
            notification_style: NotificationStyle::Standard,
            default_reminder_days: 1,
            default_reminder_hour: 8,
            default_reminder_minute: 0,
            theme: "system".to_string(),
            confirm_delete: true,
            activity_click_action: ClickAction::Detail,
        }
    }
}

impl UserPreferences {
    /// Builds preferences from stored key/value rows. Missing or unparsable
    /// values keep their defaults.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut prefs = Self::default();
        for (key, value) in entries {
            match key.as_str() {
                KEY_REMINDERS_ENABLED => {
                    if let Ok(v) = value.parse() {
                        prefs.reminders_enabled = v;
                    }
                }
                KEY_NOTIFICATION_STYLE => prefs.notification_style = NotificationStyle::parse(&value),
                KEY_DEFAULT_REMINDER_DAYS => {
                    if let Ok(v) = value.parse() {
                        prefs.default_reminder_days = v;
                    }
                }
                KEY_DEFAULT_REMINDER_HOUR => {
                    if let Ok(v) = value.parse() {
                        prefs.default_reminder_hour = v;
                    }
                }
                KEY_DEFAULT_REMINDER_MINUTE => {
                    if let Ok(v) = value.parse() {
                        prefs.default_reminder_minute = v;
                    }
                }
                KEY_THEME => prefs.theme = value,
                KEY_CONFIRM_DELETE => {
                    if let Ok(v) = value.parse() {
                        prefs.confirm_delete = v;
                    }
                }
                KEY_ACTIVITY_CLICK_ACTION => prefs.activity_click_action = ClickAction::parse(&value),
                _ => {}
            }
        }
        prefs
    }

    pub fn to_entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (KEY_REMINDERS_ENABLED, self.reminders_enabled.to_string()),
            (KEY_NOTIFICATION_STYLE, self.notification_style.as_str().to_string()),
            (KEY_DEFAULT_REMINDER_DAYS, self.default_reminder_days.to_string()),
            (KEY_DEFAULT_REMINDER_HOUR, self.default_reminder_hour.to_string()),
            (KEY_DEFAULT_REMINDER_MINUTE, self.default_reminder_minute.to_string()),
            (KEY_THEME, self.theme.clone()),
            (KEY_CONFIRM_DELETE, self.confirm_delete.to_string()),
            (KEY_ACTIVITY_CLICK_ACTION, self.activity_click_action.as_str().to_string()),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub reminders_enabled: Option<bool>,
    pub notification_style: Option<NotificationStyle>,
    pub default_reminder_days: Option<i32>,
    pub default_reminder_hour: Option<i32>,
    pub default_reminder_minute: Option<i32>,
    pub theme: Option<String>,
    pub confirm_delete: Option<bool>,
    pub activity_click_action: Option<ClickAction>,
}

impl UpdatePreferencesRequest {
    pub fn apply(self, prefs: &mut UserPreferences) -> Result<(), AppError> {
        let mut next = prefs.clone();
        if let Some(v) = self.reminders_enabled {
            next.reminders_enabled = v;
        }
        if let Some(v) = self.notification_style {
            next.notification_style = v;
        }
        if let Some(v) = self.default_reminder_days {
            next.default_reminder_days = v;
        }
        if let Some(v) = self.default_reminder_hour {
            next.default_reminder_hour = v;
        }
        if let Some(v) = self.default_reminder_minute {
            next.default_reminder_minute = v;
        }
        if let Some(v) = self.theme {
            if !THEMES.contains(&v.as_str()) {
                return Err(AppError::validation(format!("unknown theme: {}", v)));
            }
            next.theme = v;
        }
        if let Some(v) = self.confirm_delete {
            next.confirm_delete = v;
        }
        if let Some(v) = self.activity_click_action {
            next.activity_click_action = v;
        }

        validate_reminder(
            next.default_reminder_days,
            next.default_reminder_hour,
            next.default_reminder_minute,
        )?;
        *prefs = next;
        Ok(())
    }
}
