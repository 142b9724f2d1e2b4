use afrikvent_shared::Banner;
use chrono::{DateTime, Utc};

/// Banners that may be displayed at `now`, in input order.
///
/// A banner qualifies when it is active and `now` falls inside its
/// `[start_date, end_date]` window, either bound being optional. Inverted
/// windows are evaluated literally and therefore never match.
pub fn filter_eligible(banners: &[Banner], now: DateTime<Utc>) -> Vec<&Banner> {
    banners.iter().filter(|b| b.is_eligible_at(now)).collect()
}
