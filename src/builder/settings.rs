//! Scalar group settings.

use crate::reconcile::MergeOrder;
use crate::transition::ResolvedTiming;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings a host may keep in configuration.
///
/// Every field has a default, so a partial document is enough:
///
/// ```rust
/// use keyflow::builder::GroupSettings;
/// use keyflow::reconcile::MergeOrder;
/// use std::time::Duration;
///
/// let settings: GroupSettings =
///     serde_json::from_str(r#"{ "duration_ms": 400, "merge_order": "follow_data" }"#).unwrap();
///
/// assert_eq!(settings.duration(), Duration::from_millis(400));
/// assert_eq!(settings.delay(), Duration::ZERO);
/// assert_eq!(settings.merge_order, MergeOrder::FollowData);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Default leg duration in milliseconds.
    pub duration_ms: u64,
    /// Default leg delay in milliseconds.
    pub delay_ms: u64,
    /// Namespace for template elements that do not set their own.
    pub namespace: Option<String>,
    pub merge_order: MergeOrder,
}

impl GroupSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            duration_ms: ResolvedTiming::DEFAULT_DURATION.as_millis() as u64,
            delay_ms: 0,
            namespace: None,
            merge_order: MergeOrder::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_timing_defaults() {
        let settings = GroupSettings::default();
        assert_eq!(settings.duration(), Duration::from_millis(250));
        assert_eq!(settings.delay(), Duration::ZERO);
        assert_eq!(settings.merge_order, MergeOrder::Stable);
        assert!(settings.namespace.is_none());
    }

    #[test]
    fn serde_round_trip() {
        let settings = GroupSettings {
            duration_ms: 120,
            delay_ms: 30,
            namespace: Some("svg".to_string()),
            merge_order: MergeOrder::FollowData,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"merge_order\":\"follow_data\""));
        let back: GroupSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn empty_document_gives_defaults() {
        let settings: GroupSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, GroupSettings::default());
    }
}
