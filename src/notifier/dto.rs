use serde::{Deserialize, Serialize};

use crate::models::NotificationStyle;

/// A reminder ready for delivery. Delivery is keyed on `activity_id`, so a
/// second request for the same activity replaces the first in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub activity_id: String,
    pub title: String,
    pub body: String,
    pub style: NotificationStyle,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WebhookPayload<'a> {
    Notify {
        activity_id: &'a str,
        title: &'a str,
        body: &'a str,
        style: NotificationStyle,
    },
    Cancel {
        activity_id: &'a str,
    },
}

impl<'a> From<&'a DispatchRequest> for WebhookPayload<'a> {
    fn from(request: &'a DispatchRequest) -> Self {
        WebhookPayload::Notify {
            activity_id: &request.activity_id,
            title: &request.title,
            body: &request.body,
            style: request.style,
        }
    }
}
