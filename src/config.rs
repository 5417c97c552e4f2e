use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_DATABASE_URL: &str = "sqlite://organizer.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REMINDER_POLL_SECS: u64 = 60;

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub reminder_poll_interval: Duration,
    /// When set, reminders are posted here instead of only being logged.
    pub notify_webhook_url: Option<String>,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::BadRequest(format!("BIND_ADDR is invalid: {}", e)))?;

        let poll_secs = match lookup("REMINDER_POLL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::BadRequest(format!("REMINDER_POLL_SECS is invalid: {}", e))
            })?,
            None => DEFAULT_REMINDER_POLL_SECS,
        };
        if poll_secs == 0 {
            return Err(AppError::BadRequest(
                "REMINDER_POLL_SECS must be greater than zero".to_string(),
            ));
        }

        let notify_webhook_url = lookup("NOTIFY_WEBHOOK_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            database_url,
            bind_addr,
            reminder_poll_interval: Duration::from_secs(poll_secs),
            notify_webhook_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.reminder_poll_interval, Duration::from_secs(60));
        assert!(config.notify_webhook_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("REMINDER_POLL_SECS", "15"),
            ("NOTIFY_WEBHOOK_URL", "http://localhost:9000/notify"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.reminder_poll_interval, Duration::from_secs(15));
        assert_eq!(
            config.notify_webhook_url.as_deref(),
            Some("http://localhost:9000/notify")
        );
    }

    #[test]
    fn rejects_zero_or_garbage_poll_interval() {
        assert!(Config::from_lookup(lookup(&[("REMINDER_POLL_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("REMINDER_POLL_SECS", "soon")])).is_err());
    }

    #[test]
    fn blank_webhook_url_is_ignored() {
        let config = Config::from_lookup(lookup(&[("NOTIFY_WEBHOOK_URL", "  ")])).unwrap();
        assert!(config.notify_webhook_url.is_none());
    }
}
