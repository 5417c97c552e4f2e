pub mod dto;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::AppError;

pub use dto::DispatchRequest;

/// Delivers reminder notifications to the user.
///
/// Implementations must treat `activity_id` as the notification key: notifying
/// twice for the same activity replaces the earlier notification.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, request: &DispatchRequest) -> Result<(), AppError>;
    async fn cancel(&self, activity_id: &str) -> Result<(), AppError>;
}

/// Writes reminders to the log. Used when no delivery endpoint is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, request: &DispatchRequest) -> Result<(), AppError> {
        info!(
            activity_id = %request.activity_id,
            style = request.style.as_str(),
            "{}: {}",
            request.title,
            request.body
        );
        Ok(())
    }

    async fn cancel(&self, activity_id: &str) -> Result<(), AppError> {
        debug!(activity_id, "notification cancelled");
        Ok(())
    }
}

pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _request: &DispatchRequest) -> Result<(), AppError> {
        Ok(())
    }

    async fn cancel(&self, _activity_id: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Posts reminders as JSON to an HTTP endpoint that owns actual delivery.
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::BadRequest(format!("Failed to build http client: {}", e)))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn post(&self, payload: &dto::WebhookPayload<'_>) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::dispatch(format!("webhook request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::dispatch(format!("webhook error {}: {}", status, body)));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, request: &DispatchRequest) -> Result<(), AppError> {
        self.post(&dto::WebhookPayload::from(request)).await
    }

    async fn cancel(&self, activity_id: &str) -> Result<(), AppError> {
        self.post(&dto::WebhookPayload::Cancel { activity_id }).await
    }
}
