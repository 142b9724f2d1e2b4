use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    Click,
    Impression,
}

/// Published once per recorded counter increment.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRecordedEvent {
    pub event_id: Uuid,
    pub kind: EngagementKind,
    pub banner_id: String,
    /// Counter value after the increment.
    pub count: u64,
    pub recorded_at: DateTime<Utc>,
}

impl EngagementRecordedEvent {
    pub fn new(kind: EngagementKind, banner_id: impl Into<String>, count: u64, recorded_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            kind,
            banner_id: banner_id.into(),
            count,
            recorded_at,
        }
    }
}
