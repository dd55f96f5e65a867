use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_WINDOW_RADIUS_MS: u64 = 10_000;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 300;
/// Longest accepted animation step; larger values are clamped
pub const MAX_FRAME_INTERVAL_MS: u64 = 3_600_000;

/// Preview tuning, readable from a JSON settings fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Frames within this distance of a key point are shown
    pub window_radius_ms: u64,
    /// Delay between animation steps
    pub frame_interval_ms: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            window_radius_ms: DEFAULT_WINDOW_RADIUS_MS,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl PreviewConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn frame_interval(&self) -> Duration {
        // tokio's interval panics on a zero period and on an overflowing deadline
        Duration::from_millis(self.frame_interval_ms.clamp(1, MAX_FRAME_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::{PreviewConfig, MAX_FRAME_INTERVAL_MS};
    use std::time::Duration;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = PreviewConfig::from_json(r#"{"frame_interval_ms": 150}"#).unwrap();
        assert_eq!(config.frame_interval_ms, 150);
        assert_eq!(config.window_radius_ms, 10_000);
        assert_eq!(config.frame_interval(), Duration::from_millis(150));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = PreviewConfig {
            frame_interval_ms: 0,
            ..PreviewConfig::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_huge_interval_is_clamped() {
        let config =
            PreviewConfig::from_json(r#"{"frame_interval_ms": 18446744073709551615}"#).unwrap();
        assert_eq!(config.frame_interval_ms, u64::MAX);
        assert_eq!(
            config.frame_interval(),
            Duration::from_millis(MAX_FRAME_INTERVAL_MS)
        );
    }
}
