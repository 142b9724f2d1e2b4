use async_trait::async_trait;
use chrono::{DateTime, Utc};
use afrikvent_shared::{Banner, BannerPatch};
use crate::CoreResult;

/// Repository trait for banner data access.
///
/// Missing ids are never an error at this layer: lookups return `None` and
/// writes report whether a banner was touched, leaving policy to callers.
#[async_trait]
pub trait BannerRepository: Send + Sync {
    /// All banners in insertion order.
    async fn list_banners(&self) -> CoreResult<Vec<Banner>>;

    async fn get_banner(&self, id: &str) -> CoreResult<Option<Banner>>;

    /// Apply `patch` and refresh `updated_at`. Returns `false` when no banner has `id`.
    async fn update_banner(
        &self,
        id: &str,
        patch: BannerPatch,
        now: DateTime<Utc>,
    ) -> CoreResult<bool>;

    /// Atomically add one click. Returns the new count, or `None` if `id` is unknown.
    async fn increment_clicks(&self, id: &str, now: DateTime<Utc>) -> CoreResult<Option<u64>>;

    /// Atomically add one impression per listed id, duplicates included.
    /// The result lines up with `ids`; unknown ids yield `None`.
    /// Either every increment is applied or, on error, none is.
    async fn increment_impressions(
        &self,
        ids: &[String],
        now: DateTime<Utc>,
    ) -> CoreResult<Vec<Option<u64>>>;
}
