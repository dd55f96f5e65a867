use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Importance {
    High,
    Medium,
    #[default]
    Low,
}

/// Unknown levels read as `Low`.
impl From<String> for Importance {
    fn from(level: String) -> Self {
        match level.trim() {
            "high" => Importance::High,
            "medium" => Importance::Medium,
            _ => Importance::Low,
        }
    }
}

impl Importance {
    pub fn name(&self) -> &str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

/// A timestamped highlight from a generated summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPoint {
    pub text: String,
    pub timestamp_ms: u64,
    pub importance: Importance,
}

impl KeyPoint {
    pub fn new(text: impl Into<String>, timestamp: &str, importance: Importance) -> Self {
        Self {
            text: text.into(),
            timestamp_ms: super::timestamp::parse_timestamp(timestamp),
            importance,
        }
    }
}
