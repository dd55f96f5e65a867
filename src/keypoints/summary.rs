use super::timestamp::parse_timestamp;
use super::types::{Importance, KeyPoint};
use crate::errors::SummaryError;
use log::{info, warn};
use serde::Deserialize;

/// Key point as it appears in the summary document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryKeyPoint {
    pub content: String,
    pub timestamp: Option<String>,
    pub importance: Importance,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TechnicalTerm {
    pub term: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryOverview {
    pub title: String,
    pub core_theme: String,
    pub content_focus: String,
    pub tags: Vec<String>,
}

/// Generated summary document. Only the parts the preview needs are typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryDocument {
    pub version: String,
    pub status: String,
    pub summary: SummaryOverview,
    pub key_points: Vec<SummaryKeyPoint>,
    pub technical_terms: Vec<TechnicalTerm>,
    pub error: Option<String>,
}

impl SummaryDocument {
    pub fn from_json(json: &str) -> Result<Self, SummaryError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn key_points(&self) -> Vec<KeyPoint> {
        self.key_points
            .iter()
            .map(|point| KeyPoint {
                text: point.content.clone(),
                timestamp_ms: point.timestamp.as_deref().map(parse_timestamp).unwrap_or(0),
                importance: point.importance,
            })
            .collect()
    }
}

/// Read the key points of a summary document.
pub fn parse_summary(json: &str) -> Result<Vec<KeyPoint>, SummaryError> {
    let document = SummaryDocument::from_json(json)?;
    if let Some(error) = &document.error {
        warn!("Summary document carries an error: {}", error);
    }
    let key_points = document.key_points();
    info!("Summary has {} key points", key_points.len());
    Ok(key_points)
}

#[cfg(test)]
mod tests {
    use super::{parse_summary, SummaryDocument};
    use crate::keypoints::Importance;

    const SUMMARY: &str = r#"{
        "version": "1.0",
        "status": "success",
        "summary": { "title": "Demo", "core_theme": "Rust", "content_focus": "core_points" },
        "key_points": [
            { "content": "Intro", "timestamp": "00:05", "importance": "high" },
            { "content": "Deep dive", "timestamp": "01:30", "importance": "medium" },
            { "content": "Outro", "importance": "critical" },
            { "content": "Broken", "timestamp": "soon", "importance": "low" }
        ],
        "full_text": "ignored"
    }"#;

    #[test]
    fn test_parse_summary_key_points() {
        let points = parse_summary(SUMMARY).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].text, "Intro");
        assert_eq!(points[0].timestamp_ms, 5_000);
        assert_eq!(points[0].importance, Importance::High);
        assert_eq!(points[1].timestamp_ms, 90_000);
        assert_eq!(points[1].importance, Importance::Medium);
        // missing timestamp and unknown importance
        assert_eq!(points[2].timestamp_ms, 0);
        assert_eq!(points[2].importance, Importance::Low);
        assert_eq!(points[3].timestamp_ms, 0);
    }

    #[test]
    fn test_summary_without_key_points() {
        let doc = SummaryDocument::from_json(r#"{"status": "failed", "error": "quota"}"#).unwrap();
        assert!(doc.key_points().is_empty());
        assert_eq!(doc.error.as_deref(), Some("quota"));
    }

    #[test]
    fn test_invalid_summary_json() {
        let err = parse_summary("{ not json").unwrap_err();
        assert!(err.message.starts_with("invalid summary JSON"));
    }
}
