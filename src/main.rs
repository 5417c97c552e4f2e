use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use organizer::api::router;
use organizer::config::Config;
use organizer::db::repository;
use organizer::notifier::{LogNotifier, Notifier, WebhookNotifier};
use organizer::services::{ReminderScheduler, ReminderService};
use organizer::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "organizer=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::new_from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let seeded = repository::seed_default_categories(&pool).await?;
    if seeded > 0 {
        info!("seeded {} default categories", seeded);
    }

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            info!("delivering reminders to webhook {}", url);
            Arc::new(WebhookNotifier::new(url.clone())?)
        }
        None => Arc::new(LogNotifier),
    };

    let reminders = Arc::new(ReminderService::new(pool.clone(), notifier));
    let _scheduler = ReminderScheduler::new(reminders.clone(), config.reminder_poll_interval).spawn();

    let state = AppState {
        db: pool.clone(),
        reminders,
    };

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
