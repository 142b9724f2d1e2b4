pub mod models;

pub use models::banner::{Banner, BannerPatch, BannerView, OverlayText};
pub use models::events::{EngagementKind, EngagementRecordedEvent};
