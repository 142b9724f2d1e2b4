use serde_json::Value;

/// An engagement report coming back from presentation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngagementEvent {
    Click { banner_id: String },
    /// Ids are kept as sent, duplicates included.
    Impression { banner_ids: Vec<String> },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngagementError {
    #[error("Missing required field: action")]
    MissingAction,

    #[error("bannerId required for click tracking")]
    MissingBannerId,

    #[error("bannerIds (array) required for impression tracking")]
    MissingBannerIds,

    #[error("Invalid action specified")]
    InvalidAction(String),
}

impl EngagementEvent {
    /// Parse a tracking request body of the form
    /// `{"action": "click", "bannerId": ..}` or
    /// `{"action": "impression", "bannerIds": [..]}`. Unknown fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self, EngagementError> {
        let action = match body.get("action") {
            None | Some(Value::Null) => return Err(EngagementError::MissingAction),
            Some(Value::String(s)) if s.is_empty() => return Err(EngagementError::MissingAction),
            Some(Value::String(s)) => s.as_str(),
            Some(other) => return Err(EngagementError::InvalidAction(other.to_string())),
        };

        match action {
            "click" => {
                let banner_id = body
                    .get("bannerId")
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                    .ok_or(EngagementError::MissingBannerId)?;
                Ok(Self::Click { banner_id: banner_id.to_string() })
            }
            "impression" => {
                let list = body
                    .get("bannerIds")
                    .and_then(Value::as_array)
                    .ok_or(EngagementError::MissingBannerIds)?;
                let banner_ids = list
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(EngagementError::MissingBannerIds)?;
                Ok(Self::Impression { banner_ids })
            }
            other => Err(EngagementError::InvalidAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_click() {
        let event = EngagementEvent::from_json(&json!({
            "action": "click",
            "bannerId": "banner-1",
            "timestamp": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(event, EngagementEvent::Click { banner_id: "banner-1".into() });
    }

    #[test]
    fn test_parse_impression_keeps_duplicates() {
        let event = EngagementEvent::from_json(&json!({
            "action": "impression",
            "bannerIds": ["a", "b", "a"]
        }))
        .unwrap();
        assert_eq!(
            event,
            EngagementEvent::Impression { banner_ids: vec!["a".into(), "b".into(), "a".into()] }
        );
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(
            EngagementEvent::from_json(&json!({ "bannerId": "a" })),
            Err(EngagementError::MissingAction)
        );
        assert_eq!(
            EngagementEvent::from_json(&json!({ "action": "click" })),
            Err(EngagementError::MissingBannerId)
        );
        assert_eq!(
            EngagementEvent::from_json(&json!({ "action": "click", "bannerId": "" })),
            Err(EngagementError::MissingBannerId)
        );
        assert_eq!(
            EngagementEvent::from_json(&json!({ "action": "impression", "bannerIds": "a" })),
            Err(EngagementError::MissingBannerIds)
        );
        assert_eq!(
            EngagementEvent::from_json(&json!({ "action": "impression", "bannerIds": ["a", 3] })),
            Err(EngagementError::MissingBannerIds)
        );
        assert!(matches!(
            EngagementEvent::from_json(&json!({ "action": "hover", "bannerId": "a" })),
            Err(EngagementError::InvalidAction(_))
        ));
        assert_eq!(
            EngagementError::MissingBannerIds.to_string(),
            "bannerIds (array) required for impression tracking"
        );
    }
}
