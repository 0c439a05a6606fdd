//! Tracking webhook payloads and notification text
//!
//! Only the handful of fields the relay consumes are modeled; everything
//! else the tracking server sends is ignored.

use crate::push::NotificationPayload;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An identifier the tracking server may send as a number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackingId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingId::Number(n) => write!(f, "{}", n),
            TrackingId::Text(s) => f.write_str(s),
        }
    }
}

/// The `event` object of a tracking webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub device_id: Option<TrackingId>,
    #[serde(default)]
    pub device_name: Option<String>,
}

/// The `device` object of a tracking webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedDevice {
    #[serde(default)]
    pub id: Option<TrackingId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: Option<TrackingId>,
}

/// Webhook body as posted by the tracking server
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingWebhook {
    #[serde(default)]
    pub event: Option<TrackingEvent>,
    #[serde(default)]
    pub device: Option<TrackedDevice>,
}

impl TrackingWebhook {
    /// Parse a raw body. Anything that is not a JSON object of the expected
    /// shape yields `None`.
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

/// Human-readable label for the device in an event
pub fn device_label(event: &TrackingEvent, device: &TrackedDevice) -> String {
    let named = device
        .name
        .as_deref()
        .or(event.device_name.as_deref())
        .filter(|n| !n.trim().is_empty());

    if let Some(name) = named {
        return name.to_string();
    }

    match device.id.as_ref().or(event.device_id.as_ref()) {
        Some(id) => format!("Dispositivo {}", id),
        None => "Dispositivo desconhecido".to_string(),
    }
}

/// Notification text for an event type
pub fn notification_body(event_type: &str, device: &str) -> String {
    match event_type {
        "deviceOnline" => format!("{} está online.", device),
        // deviceUnknown reads the same as deviceOffline for users
        "deviceOffline" | "deviceUnknown" => format!("{} ficou offline.", device),
        other => format!("Novo evento \"{}\" para {}.", other, device),
    }
}

/// Build the full notification for a tracking event
pub fn build_payload(event: &TrackingEvent, device: &TrackedDevice) -> NotificationPayload {
    let label = device_label(event, device);
    NotificationPayload::new(
        format!("Rastreamento: {}", label),
        notification_body(&event.event_type, &label),
    )
}
