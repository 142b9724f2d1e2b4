use crate::eligibility::filter_eligible;
use crate::events::EngagementEvent;
use crate::ranker::rank;
use crate::recorder::{EngagementRecorder, EngagementReport};
use afrikvent_core::{BannerRepository, CoreResult};
use afrikvent_shared::{Banner, BannerView, EngagementRecordedEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Boundary between presentation code and the banner store.
///
/// Reads compose the store, eligibility filter and ranker on every call;
/// writes go through the [`EngagementRecorder`]. The two paths share nothing
/// but the store, so a failing engagement report never affects listing.
pub struct DisplayGateway {
    repo: Arc<dyn BannerRepository>,
    recorder: EngagementRecorder,
    events: Option<broadcast::Sender<EngagementRecordedEvent>>,
}

impl DisplayGateway {
    pub fn new(repo: Arc<dyn BannerRepository>) -> Self {
        Self {
            recorder: EngagementRecorder::new(repo.clone()),
            repo,
            events: None,
        }
    }

    /// Publish every recorded increment on `sender`.
    pub fn with_event_channel(mut self, sender: broadcast::Sender<EngagementRecordedEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn subscribe(&self) -> Option<broadcast::Receiver<EngagementRecordedEvent>> {
        self.events.as_ref().map(|tx| tx.subscribe())
    }

    /// Eligible banners at `now`, highest priority first, at most `limit` of them.
    pub async fn list_display_banners(&self, now: DateTime<Utc>, limit: Option<usize>) -> CoreResult<Vec<BannerView>> {
        let banners = self.repo.list_banners().await?;
        let ranked = rank(filter_eligible(&banners, now), limit);
        Ok(ranked.into_iter().map(BannerView::from).collect())
    }

    /// Full stored record, counters included.
    pub async fn get_banner(&self, id: &str) -> CoreResult<Option<Banner>> {
        self.repo.get_banner(id).await
    }

    /// Apply a click or impression report. Unknown ids are listed in the
    /// report but never fail the call; only store errors do.
    pub async fn handle_engagement_event(&self, event: EngagementEvent, now: DateTime<Utc>) -> CoreResult<EngagementReport> {
        let report = match &event {
            EngagementEvent::Click { banner_id } => self.recorder.record_click(banner_id, now).await?,
            EngagementEvent::Impression { banner_ids } => self.recorder.record_impressions(banner_ids, now).await?,
        };

        if let Some(tx) = &self.events {
            for (banner_id, count) in report.recorded() {
                // No subscribers is not an error.
                let _ = tx.send(EngagementRecordedEvent::new(report.kind, banner_id, count, now));
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBannerStore;
    use afrikvent_core::CoreError;
    use afrikvent_shared::{BannerPatch, EngagementKind};
    use async_trait::async_trait;
    use chrono::Duration;

    fn banner(id: &str, priority: i32) -> Banner {
        Banner::new(id, format!("/images/{}.jpg", id), id, "https://example.com", priority)
    }

    fn gateway(banners: Vec<Banner>) -> (Arc<InMemoryBannerStore>, DisplayGateway) {
        let store = Arc::new(InMemoryBannerStore::with_banners(banners).unwrap());
        let gateway = DisplayGateway::new(store.clone());
        (store, gateway)
    }

    fn ids(views: &[BannerView]) -> Vec<String> {
        views.iter().map(|v| v.id.clone()).collect()
    }

    #[tokio::test]
    async fn test_future_banner_excluded() {
        let now = Utc::now();
        let a = banner("A", 10);
        let mut b = banner("B", 8);
        b.start_date = Some(now + Duration::days(3));
        let (_, gateway) = gateway(vec![a, b]);

        let views = gateway.list_display_banners(now, None).await.unwrap();
        assert_eq!(ids(&views), vec!["A"]);
    }

    #[tokio::test]
    async fn test_priority_tiebreak_and_limit() {
        let (_, gateway) = gateway(vec![banner("A", 5), banner("B", 5), banner("C", 9)]);

        let views = gateway.list_display_banners(Utc::now(), Some(2)).await.unwrap();
        assert_eq!(ids(&views), vec!["C", "A"]);

        let all = gateway.list_display_banners(Utc::now(), None).await.unwrap();
        assert_eq!(ids(&all), vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_listing_reflects_store_updates() {
        let (store, gateway) = gateway(vec![banner("A", 5), banner("B", 1)]);
        let patch = BannerPatch { priority: Some(20), ..Default::default() };
        store.update_banner("B", patch, Utc::now()).await.unwrap();

        let views = gateway.list_display_banners(Utc::now(), Some(1)).await.unwrap();
        assert_eq!(ids(&views), vec!["B"]);
    }

    #[tokio::test]
    async fn test_engagement_events_dispatch_and_publish() {
        let (store, gateway) = gateway(vec![banner("A", 5), banner("B", 1)]);
        let (tx, _) = broadcast::channel(16);
        let gateway = gateway.with_event_channel(tx);
        let mut rx = gateway.subscribe().unwrap();

        gateway
            .handle_engagement_event(EngagementEvent::Click { banner_id: "A".into() }, Utc::now())
            .await
            .unwrap();
        let report = gateway
            .handle_engagement_event(
                EngagementEvent::Impression { banner_ids: vec!["A".into(), "missing".into()] },
                Utc::now(),
            )
            .await
            .unwrap();
        assert_eq!(report.skipped_ids(), vec!["missing".to_string()]);

        let a = store.get_banner("A").await.unwrap().unwrap();
        assert_eq!((a.click_count, a.impression_count), (1, 1));

        let first = rx.recv().await.unwrap();
        assert_eq!((first.kind, first.banner_id.as_str(), first.count), (EngagementKind::Click, "A", 1));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, EngagementKind::Impression);
        assert!(rx.try_recv().is_err());
    }

    struct UnavailableStore;

    #[async_trait]
    impl BannerRepository for UnavailableStore {
        async fn list_banners(&self) -> CoreResult<Vec<Banner>> {
            Err(CoreError::StoreError("connection refused".into()))
        }
        async fn get_banner(&self, _id: &str) -> CoreResult<Option<Banner>> {
            Err(CoreError::StoreError("connection refused".into()))
        }
        async fn update_banner(&self, _id: &str, _patch: BannerPatch, _now: DateTime<Utc>) -> CoreResult<bool> {
            Err(CoreError::StoreError("connection refused".into()))
        }
        async fn increment_clicks(&self, _id: &str, _now: DateTime<Utc>) -> CoreResult<Option<u64>> {
            Err(CoreError::StoreError("connection refused".into()))
        }
        async fn increment_impressions(&self, _ids: &[String], _now: DateTime<Utc>) -> CoreResult<Vec<Option<u64>>> {
            Err(CoreError::StoreError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let gateway = DisplayGateway::new(Arc::new(UnavailableStore));
        let result = gateway
            .handle_engagement_event(EngagementEvent::Click { banner_id: "A".into() }, Utc::now())
            .await;
        assert!(matches!(result, Err(CoreError::StoreError(_))));
        assert!(gateway.list_display_banners(Utc::now(), None).await.is_err());
    }
}
