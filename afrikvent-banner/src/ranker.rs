use afrikvent_shared::Banner;
use std::cmp::Reverse;

/// Order by descending priority and keep at most `limit` banners.
///
/// The sort is stable: equal priorities keep their input order. `None`
/// returns everything, `Some(0)` nothing.
pub fn rank(mut eligible: Vec<&Banner>, limit: Option<usize>) -> Vec<&Banner> {
    eligible.sort_by_key(|b| Reverse(b.priority));
    if let Some(limit) = limit {
        eligible.truncate(limit);
    }
    eligible
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banner(id: &str, priority: i32) -> Banner {
        Banner::new(id, "/img.jpg", id, "https://example.com", priority)
    }

    fn ids(banners: &[&Banner]) -> Vec<String> {
        banners.iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_priority_desc_with_stable_ties() {
        let all = vec![banner("a", 5), banner("b", 5), banner("c", 9), banner("d", -1)];
        let ranked = rank(all.iter().collect(), None);
        assert_eq!(ids(&ranked), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_limit_truncates() {
        let all = vec![banner("a", 5), banner("b", 5), banner("c", 9)];
        assert_eq!(ids(&rank(all.iter().collect(), Some(2))), vec!["c", "a"]);
        assert!(rank(all.iter().collect(), Some(0)).is_empty());
        assert_eq!(rank(all.iter().collect(), Some(10)).len(), 3);
    }
}
