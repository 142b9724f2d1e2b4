use afrikvent_core::{BannerRepository, CoreResult};
use afrikvent_shared::EngagementKind;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// What happened to one referenced banner id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// Counter incremented; holds the new value.
    Recorded(u64),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedId {
    pub banner_id: String,
    pub outcome: IncrementOutcome,
}

/// Per-id result of a best-effort engagement batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementReport {
    pub kind: EngagementKind,
    pub entries: Vec<RecordedId>,
}

impl EngagementReport {
    pub fn recorded(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().filter_map(|e| match e.outcome {
            IncrementOutcome::Recorded(count) => Some((e.banner_id.as_str(), count)),
            IncrementOutcome::NotFound => None,
        })
    }

    /// Ids that referenced no banner, in request order.
    pub fn skipped_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.outcome == IncrementOutcome::NotFound)
            .map(|e| e.banner_id.clone())
            .collect()
    }
}

/// The only write path for click and impression counters.
pub struct EngagementRecorder {
    repo: Arc<dyn BannerRepository>,
}

impl EngagementRecorder {
    pub fn new(repo: Arc<dyn BannerRepository>) -> Self {
        Self { repo }
    }

    /// Add one click to `banner_id`. Unknown ids are skipped, not rejected.
    pub async fn record_click(&self, banner_id: &str, now: DateTime<Utc>) -> CoreResult<EngagementReport> {
        let outcome = match self.repo.increment_clicks(banner_id, now).await? {
            Some(count) => {
                info!("Tracked click for banner ID: {}. New click count: {}", banner_id, count);
                IncrementOutcome::Recorded(count)
            }
            None => {
                warn!("Click reported for unknown banner ID: {}", banner_id);
                IncrementOutcome::NotFound
            }
        };

        Ok(EngagementReport {
            kind: EngagementKind::Click,
            entries: vec![RecordedId { banner_id: banner_id.to_string(), outcome }],
        })
    }

    /// Add one impression per listed id. Duplicates count once per occurrence;
    /// callers wanting unique views must dedupe first.
    pub async fn record_impressions(&self, banner_ids: &[String], now: DateTime<Utc>) -> CoreResult<EngagementReport> {
        let counts = self.repo.increment_impressions(banner_ids, now).await?;

        let entries: Vec<RecordedId> = banner_ids
            .iter()
            .zip(counts)
            .map(|(id, count)| RecordedId {
                banner_id: id.clone(),
                outcome: count.map_or(IncrementOutcome::NotFound, IncrementOutcome::Recorded),
            })
            .collect();

        let report = EngagementReport { kind: EngagementKind::Impression, entries };
        info!("Tracked impressions for banner IDs: {:?}", banner_ids);

        let skipped = report.skipped_ids();
        if !skipped.is_empty() {
            warn!("Impressions reported for unknown banner IDs: {:?}", skipped);
        }

        Ok(report)
    }
}
