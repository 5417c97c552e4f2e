use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::ReminderService;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub reminders: Arc<ReminderService>,
}
