use std::error::Error;
use std::fmt;
use std::io;

/// Enumeration of all possible errors surfaced by the crate
#[derive(Debug)]
pub enum BifPreviewError {
    Decode(BifError),
    Source(SourceError),
    Summary(SummaryError),
    Other(io::Error),
}

/// Fatal BIF decode errors. Anything not listed here degrades to fewer frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BifError {
    /// The first 8 bytes are not the BIF magic constant
    BadMagic,
    /// The version field at offset 8 is not 0
    UnsupportedVersion(u32),
    /// The magic is valid but the fixed header is cut short
    Truncated { needed: usize, actual: usize },
    /// An index record points at or beyond the end of the buffer
    InvalidOffset {
        position: usize,
        offset: u32,
        buffer_len: usize,
    },
}

/// Fetching the raw BIF buffer failed
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The summary document could not be read
#[derive(Debug)]
pub struct SummaryError {
    pub message: String,
}

impl SummaryError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for BifPreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BifPreviewError::Other(err) => write!(f, "I/O error: {}", err),
            BifPreviewError::Decode(err) => write!(f, "BIF decode error: {}", err),
            BifPreviewError::Source(err) => write!(f, "Source error: {}", err),
            BifPreviewError::Summary(err) => write!(f, "Summary error: {}", err),
        }
    }
}

impl fmt::Display for BifError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BifError::BadMagic => write!(f, "invalid BIF magic number"),
            BifError::UnsupportedVersion(version) => {
                write!(f, "unsupported BIF version: {}", version)
            }
            BifError::Truncated { needed, actual } => write!(
                f,
                "BIF header truncated: need {} bytes, got {}",
                needed, actual
            ),
            BifError::InvalidOffset {
                position,
                offset,
                buffer_len,
            } => write!(
                f,
                "invalid offset {} in index record at {} (buffer is {} bytes)",
                offset, position, buffer_len
            ),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for BifPreviewError {}
impl Error for BifError {}
impl Error for SourceError {}
impl Error for SummaryError {}

// Conversion implementations
impl From<io::Error> for BifPreviewError {
    fn from(err: io::Error) -> Self {
        BifPreviewError::Other(err)
    }
}

impl From<BifError> for BifPreviewError {
    fn from(err: BifError) -> Self {
        BifPreviewError::Decode(err)
    }
}

impl From<SourceError> for BifPreviewError {
    fn from(err: SourceError) -> Self {
        BifPreviewError::Source(err)
    }
}

impl From<SummaryError> for BifPreviewError {
    fn from(err: SummaryError) -> Self {
        BifPreviewError::Summary(err)
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::new(format!("invalid summary JSON: {}", err))
    }
}

// Conversion to io::Error for callers that only speak io
impl From<BifPreviewError> for io::Error {
    fn from(err: BifPreviewError) -> Self {
        io::Error::other(err)
    }
}

impl From<BifError> for io::Error {
    fn from(err: BifError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}

// Type alias for Result with BifPreviewError
pub type BifPreviewResult<T> = Result<T, BifPreviewError>;
