use afrikvent_core::{BannerRepository, CoreError, CoreResult};
use afrikvent_shared::{Banner, BannerPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory banner store. Insertion order is preserved for enumeration and
/// every write holds the lock for the whole call, so increments on the same
/// id can never interleave.
pub struct InMemoryBannerStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    banners: Vec<Banner>,
    index: HashMap<String, usize>,
}

impl Inner {
    fn insert(&mut self, banner: Banner) -> CoreResult<()> {
        if self.index.contains_key(&banner.id) {
            return Err(CoreError::DuplicateBanner(banner.id));
        }
        if banner.updated_at < banner.created_at {
            return Err(CoreError::ValidationError(format!(
                "banner {} has updatedAt before createdAt",
                banner.id
            )));
        }
        self.index.insert(banner.id.clone(), self.banners.len());
        self.banners.push(banner);
        Ok(())
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Banner> {
        let pos = *self.index.get(id)?;
        self.banners.get_mut(pos)
    }
}

impl InMemoryBannerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Build a store from an ordered list, rejecting duplicate ids and
    /// records whose `updated_at` precedes `created_at`.
    pub fn with_banners(banners: Vec<Banner>) -> CoreResult<Self> {
        let mut inner = Inner::default();
        for banner in banners {
            inner.insert(banner)?;
        }
        Ok(Self {
            inner: RwLock::new(inner),
        })
    }

    pub async fn insert(&self, banner: Banner) -> CoreResult<()> {
        self.inner.write().await.insert(banner)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.banners.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryBannerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BannerRepository for InMemoryBannerStore {
    async fn list_banners(&self) -> CoreResult<Vec<Banner>> {
        Ok(self.inner.read().await.banners.clone())
    }

    async fn get_banner(&self, id: &str) -> CoreResult<Option<Banner>> {
        let inner = self.inner.read().await;
        Ok(inner.index.get(id).and_then(|&pos| inner.banners.get(pos)).cloned())
    }

    async fn update_banner(&self, id: &str, patch: BannerPatch, now: DateTime<Utc>) -> CoreResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(banner) = inner.get_mut(id) else {
            return Ok(false);
        };
        patch.apply(banner);
        banner.touch(now);
        Ok(true)
    }

    async fn increment_clicks(&self, id: &str, now: DateTime<Utc>) -> CoreResult<Option<u64>> {
        let mut inner = self.inner.write().await;
        Ok(inner.get_mut(id).map(|banner| {
            banner.click_count = banner.click_count.saturating_add(1);
            banner.touch(now);
            banner.click_count
        }))
    }

    async fn increment_impressions(&self, ids: &[String], now: DateTime<Utc>) -> CoreResult<Vec<Option<u64>>> {
        let mut inner = self.inner.write().await;
        Ok(ids
            .iter()
            .map(|id| {
                inner.get_mut(id).map(|banner| {
                    banner.impression_count = banner.impression_count.saturating_add(1);
                    banner.touch(now);
                    banner.impression_count
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn banner(id: &str, priority: i32) -> Banner {
        Banner::new(id, format!("/images/{}.jpg", id), id, "https://example.com", priority)
    }

    #[tokio::test]
    async fn test_enumeration_keeps_insertion_order() {
        let store = InMemoryBannerStore::with_banners(vec![banner("a", 1), banner("b", 9)]).unwrap();
        store.insert(banner("c", 5)).await.unwrap();

        let ids: Vec<String> = store.list_banners().await.unwrap().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let result = InMemoryBannerStore::with_banners(vec![banner("a", 1), banner("a", 2)]);
        assert!(matches!(result, Err(CoreError::DuplicateBanner(id)) if id == "a"));

        let store = InMemoryBannerStore::with_banners(vec![banner("a", 1)]).unwrap();
        assert!(store.insert(banner("a", 3)).await.is_err());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_updated_before_created_rejected() {
        let mut stale = banner("stale", 1);
        stale.updated_at = stale.created_at - chrono::Duration::seconds(1);

        let result = InMemoryBannerStore::with_banners(vec![banner("a", 1), stale.clone()]);
        assert!(matches!(result, Err(CoreError::ValidationError(_))));

        let store = InMemoryBannerStore::new();
        assert!(store.insert(stale).await.is_err());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_noop() {
        let store = InMemoryBannerStore::with_banners(vec![banner("a", 1)]).unwrap();
        let before = store.list_banners().await.unwrap();

        let patch = BannerPatch { priority: Some(99), ..Default::default() };
        assert!(!store.update_banner("missing", patch, Utc::now()).await.unwrap());
        assert_eq!(store.list_banners().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_applies_patch_and_refreshes_timestamp() {
        let store = InMemoryBannerStore::with_banners(vec![banner("a", 1)]).unwrap();
        let now = Utc::now() + chrono::Duration::minutes(5);

        let patch = BannerPatch { is_active: Some(false), priority: Some(7), ..Default::default() };
        assert!(store.update_banner("a", patch, now).await.unwrap());

        let updated = store.get_banner("a").await.unwrap().unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.priority, 7);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.click_count, 0);
    }

    #[tokio::test]
    async fn test_concurrent_clicks_are_not_lost() {
        let store = Arc::new(InMemoryBannerStore::with_banners(vec![banner("a", 1)]).unwrap());

        let mut handles = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_clicks("a", Utc::now()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get_banner("a").await.unwrap().unwrap().click_count, 50);
    }

    #[tokio::test]
    async fn test_concurrent_impression_batches_are_not_lost() {
        let store = Arc::new(InMemoryBannerStore::with_banners(vec![banner("a", 1), banner("b", 1)]).unwrap());

        let mut handles = Vec::new();
        for i in 0..40 {
            let store = store.clone();
            let ids: Vec<String> = if i % 2 == 0 {
                vec!["a".into(), "b".into(), "a".into()]
            } else {
                vec!["b".into(), "a".into()]
            };
            handles.push(tokio::spawn(async move {
                store.increment_impressions(&ids, Utc::now()).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let a = store.get_banner("a").await.unwrap().unwrap();
        let b = store.get_banner("b").await.unwrap().unwrap();
        assert_eq!(a.impression_count, 20 * 2 + 20);
        assert_eq!(b.impression_count, 40);
    }

    #[tokio::test]
    async fn test_impression_batch_counts_duplicates() {
        let store = InMemoryBannerStore::with_banners(vec![banner("a", 1), banner("b", 1)]).unwrap();
        let ids = vec!["a".to_string(), "ghost".to_string(), "a".to_string()];

        let counts = store.increment_impressions(&ids, Utc::now()).await.unwrap();
        assert_eq!(counts, vec![Some(1), None, Some(2)]);
        assert_eq!(store.get_banner("b").await.unwrap().unwrap().impression_count, 0);
    }
}
