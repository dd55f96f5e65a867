pub mod bits;

pub mod bif;
pub use bif::{decode, decode_with_report, BifHeader, BifWriter, DecodeReport, DecodedFrame};

pub mod keypoints;
pub use keypoints::{parse_summary, parse_timestamp, Importance, KeyPoint};

pub mod preview;
pub use preview::{
    DataUrlStore, HandleStore, LoadOutcome, PreviewConfig, PreviewScheduler, PreviewSession,
};

pub mod source;
pub use source::{open_source, BifSource, HttpBifSource, LocalBifSource};

pub mod errors;
pub use errors::{BifError, BifPreviewError, BifPreviewResult, SourceError, SummaryError};

/// Fetch and decode a BIF from a URL or a local path.
pub async fn extract_frames(source: String) -> BifPreviewResult<Vec<DecodedFrame>> {
    let source = open_source(&source)?;
    let buffer = source.fetch().await?;
    Ok(decode(&buffer)?)
}

/// Fetch and decode a BIF, keeping the header and decode diagnostics.
pub async fn inspect_bif(source: String) -> BifPreviewResult<DecodeReport> {
    let source = open_source(&source)?;
    let buffer = source.fetch().await?;
    Ok(decode_with_report(&buffer)?)
}
