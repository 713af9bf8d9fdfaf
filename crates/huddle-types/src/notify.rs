//! Notification payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational (the default).
    #[default]
    Info,
    /// Something completed successfully.
    Success,
    /// Something needs attention.
    Warning,
    /// Something failed.
    Error,
}

/// Request payload for posting an ad-hoc notification.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NotifyRequest {
    /// Target room identifier.
    #[validate(length(min = 1, max = 120))]
    pub room: String,
    /// Severity; defaults to `info` when omitted.
    #[serde(rename = "type", default)]
    pub severity: Severity,
    /// Short headline.
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    /// Optional longer body; defaults to empty.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub body: String,
}

/// A broadcast notification event.
///
/// Transient: exists only as a broadcast payload, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Room the event belongs to.
    pub room: String,
    /// Severity.
    #[serde(rename = "type")]
    pub severity: Severity,
    /// Short headline.
    pub title: String,
    /// Longer body, possibly empty.
    pub body: String,
    /// Broadcast timestamp.
    pub ts: DateTime<Utc>,
}

impl NotificationEvent {
    /// Build an event from a validated request, stamping the current time.
    pub fn create(req: &NotifyRequest) -> Self {
        Self {
            room: req.room.clone(),
            severity: req.severity,
            title: req.title.clone(),
            body: req.body.clone(),
            ts: Utc::now(),
        }
    }
}
