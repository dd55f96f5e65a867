use super::header::parse_header;
use super::index::scan_index;
use super::types::{DecodeReport, DecodedFrame, Diagnostic, ScanEnd};
use crate::errors::BifError;
use log::{info, warn};

/// Decode a complete BIF buffer into frames ordered as the index lists them.
///
/// Fails only on a bad magic, a non-zero version, a truncated header or an index
/// offset outside the buffer. Broken ranges are dropped silently.
pub fn decode(data: &[u8]) -> Result<Vec<DecodedFrame>, BifError> {
    decode_with_report(data).map(|report| report.frames)
}

/// Decode and keep the header, the scan outcome and every non-fatal diagnostic.
pub fn decode_with_report(data: &[u8]) -> Result<DecodeReport, BifError> {
    let header = parse_header(data)?;
    debug_assert!(header.is_usable());
    let table = scan_index(data)?;
    info!(
        "BIF header: {} images declared, multiplier {} ms, {} index entries",
        header.image_count,
        header.timestamp_multiplier_ms,
        table.entries.len()
    );

    let mut diagnostics = Vec::new();
    if !matches!(table.scan_end, ScanEnd::SentinelFound { .. }) && !table.entries.is_empty() {
        warn!("BIF index did not end with 0xFFFFFFFF marker, assuming last image extends to EOF");
        diagnostics.push(Diagnostic::MissingSentinel);
    }

    let multiplier = header.timestamp_multiplier_ms as f64;
    let mut frames = Vec::with_capacity(table.entries.len());
    for (index, frame_ref) in table.frame_refs().into_iter().enumerate() {
        if !frame_ref.is_valid(data.len()) {
            warn!(
                "Skipping image {} due to invalid range: start={}, end={}",
                index, frame_ref.start_offset, frame_ref.end_offset
            );
            diagnostics.push(Diagnostic::SkippedRange {
                index,
                start_offset: frame_ref.start_offset,
                end_offset: frame_ref.end_offset,
            });
            continue;
        }

        frames.push(DecodedFrame {
            time_seconds: frame_ref.timestamp_raw as f64 * multiplier / 1000.0,
            payload: data[frame_ref.start_offset..frame_ref.end_offset].to_vec(),
        });
    }

    if frames.len() != header.image_count as usize {
        warn!(
            "Expected {} images based on header, but parsed {}",
            header.image_count,
            frames.len()
        );
        diagnostics.push(Diagnostic::ImageCountMismatch {
            declared: header.image_count,
            extracted: frames.len(),
        });
    }

    Ok(DecodeReport {
        header,
        scan_end: table.scan_end,
        frames,
        diagnostics,
    })
}
