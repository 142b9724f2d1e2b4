use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BANNER_HEIGHT: u32 = 200;

fn default_true() -> bool { true }

/// Optional caption rendered over the banner image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text: Option<String>,
}

/// A promotional banner as held by the banner store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: String,
    pub image_url: String,
    pub alt_text: String,
    pub href: String,
    #[serde(default = "default_true")]
    pub open_in_new_tab: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_text: Option<OverlayText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub is_active: bool,
    /// Higher shows first.
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub impression_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Advertiser/billing metadata, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_click: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_impression: Option<f64>,
}

impl Banner {
    /// Create an active banner with zeroed counters and no schedule.
    pub fn new(
        id: impl Into<String>,
        image_url: impl Into<String>,
        alt_text: impl Into<String>,
        href: impl Into<String>,
        priority: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            image_url: image_url.into(),
            alt_text: alt_text.into(),
            href: href.into(),
            open_in_new_tab: true,
            overlay_text: None,
            height: None,
            is_active: true,
            priority,
            start_date: None,
            end_date: None,
            click_count: 0,
            impression_count: 0,
            created_at: now,
            updated_at: now,
            client_id: None,
            campaign_id: None,
            budget: None,
            cost_per_click: None,
            cost_per_impression: None,
        }
    }

    /// Whether the banner may be shown at `now`. Both window bounds are inclusive.
    pub fn is_eligible_at(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active {
            return false;
        }
        if matches!(self.start_date, Some(start) if start > now) {
            return false;
        }
        if matches!(self.end_date, Some(end) if end < now) {
            return false;
        }
        true
    }

    /// Refresh `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    pub fn view(&self) -> BannerView {
        BannerView::from(self)
    }
}

/// Partial mutation applied through the store's `update`. Counters are not
/// part of it: only engagement recording writes them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerPatch {
    pub image_url: Option<String>,
    pub alt_text: Option<String>,
    pub href: Option<String>,
    pub open_in_new_tab: Option<bool>,
    pub overlay_text: Option<OverlayText>,
    pub height: Option<u32>,
    pub is_active: Option<bool>,
    pub priority: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub client_id: Option<String>,
    pub campaign_id: Option<String>,
    pub budget: Option<f64>,
    pub cost_per_click: Option<f64>,
    pub cost_per_impression: Option<f64>,
}

impl BannerPatch {
    pub fn apply(self, banner: &mut Banner) {
        if let Some(v) = self.image_url { banner.image_url = v; }
        if let Some(v) = self.alt_text { banner.alt_text = v; }
        if let Some(v) = self.href { banner.href = v; }
        if let Some(v) = self.open_in_new_tab { banner.open_in_new_tab = v; }
        if let Some(v) = self.overlay_text { banner.overlay_text = Some(v); }
        if let Some(v) = self.height { banner.height = Some(v); }
        if let Some(v) = self.is_active { banner.is_active = v; }
        if let Some(v) = self.priority { banner.priority = v; }
        if let Some(v) = self.start_date { banner.start_date = Some(v); }
        if let Some(v) = self.end_date { banner.end_date = Some(v); }
        if let Some(v) = self.client_id { banner.client_id = Some(v); }
        if let Some(v) = self.campaign_id { banner.campaign_id = Some(v); }
        if let Some(v) = self.budget { banner.budget = Some(v); }
        if let Some(v) = self.cost_per_click { banner.cost_per_click = Some(v); }
        if let Some(v) = self.cost_per_impression { banner.cost_per_impression = Some(v); }
    }
}

/// What presentation code needs to render a banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerView {
    pub id: String,
    pub image_url: String,
    pub alt_text: String,
    pub href: String,
    pub open_in_new_tab: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_text: Option<OverlayText>,
    pub height: u32,
}

impl From<&Banner> for BannerView {
    fn from(banner: &Banner) -> Self {
        Self {
            id: banner.id.clone(),
            image_url: banner.image_url.clone(),
            alt_text: banner.alt_text.clone(),
            href: banner.href.clone(),
            open_in_new_tab: banner.open_in_new_tab,
            overlay_text: banner.overlay_text.clone(),
            height: banner.height.unwrap_or(DEFAULT_BANNER_HEIGHT),
        }
    }
}
