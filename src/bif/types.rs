use serde::Serialize;

/// Fixed BIF magic: `\x89BIF\r\n\x1a\n`
pub const BIF_MAGIC: [u8; 8] = [0x89, 0x42, 0x49, 0x46, 0x0D, 0x0A, 0x1A, 0x0A];
pub const SUPPORTED_VERSION: u32 = 0;
/// Bytes needed to read magic, version, image count and separation
pub const HEADER_FIELDS_LEN: usize = 20;
/// Offset of the first index record
pub const INDEX_TABLE_OFFSET: usize = 64;
pub const INDEX_RECORD_LEN: usize = 8;
/// Timestamp value marking the end of the index table
pub const SENTINEL_TIMESTAMP: u32 = 0xFFFF_FFFF;
pub const DEFAULT_TIMESTAMP_MULTIPLIER_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BifHeader {
    pub magic_valid: bool,
    pub version: u32,
    pub image_count: u32,
    pub timestamp_multiplier_ms: u32,
}

impl BifHeader {
    pub fn is_usable(&self) -> bool {
        self.magic_valid && self.version == SUPPORTED_VERSION
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub timestamp_raw: u32,
    pub byte_offset: u32,
}

/// Byte range of one frame, built from two adjacent index entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef {
    pub timestamp_raw: u32,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl FrameRef {
    pub fn is_valid(&self, buffer_len: usize) -> bool {
        self.end_offset > self.start_offset && self.end_offset <= buffer_len
    }
}

/// A single still frame with its presentation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFrame {
    pub time_seconds: f64,
    #[serde(skip)]
    pub payload: Vec<u8>,
}

impl DecodedFrame {
    pub fn time_ms(&self) -> f64 {
        self.time_seconds * 1000.0
    }
}

/// How the index table scan terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanEnd {
    /// A `0xFFFFFFFF` record closed the table; its offset ends the last frame
    SentinelFound { end_offset: u32 },
    /// The table ran into the first frame's bytes without a sentinel
    HeuristicStop,
    /// Fewer than 8 bytes remained and no sentinel was seen
    BufferExhausted,
}

/// Non-fatal anomalies found while decoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    SkippedRange {
        index: usize,
        start_offset: usize,
        end_offset: usize,
    },
    ImageCountMismatch {
        declared: u32,
        extracted: usize,
    },
    MissingSentinel,
}

/// Everything a decode learned about a buffer
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    pub header: BifHeader,
    pub scan_end: ScanEnd,
    pub frames: Vec<DecodedFrame>,
    pub diagnostics: Vec<Diagnostic>,
}
