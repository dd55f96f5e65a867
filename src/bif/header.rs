use super::types::{
    BifHeader, BIF_MAGIC, DEFAULT_TIMESTAMP_MULTIPLIER_MS, HEADER_FIELDS_LEN, SUPPORTED_VERSION,
};
use crate::bits::u32_le_at;
use crate::errors::BifError;

/// Check the first 8 bytes against the BIF magic.
pub fn has_bif_magic(data: &[u8]) -> bool {
    data.len() >= BIF_MAGIC.len() && data[..BIF_MAGIC.len()] == BIF_MAGIC
}

/// Parse and validate the fixed header.
///
/// Nothing past the magic is read when the magic does not match.
pub fn parse_header(data: &[u8]) -> Result<BifHeader, BifError> {
    if !has_bif_magic(data) {
        return Err(BifError::BadMagic);
    }

    let truncated = || BifError::Truncated {
        needed: HEADER_FIELDS_LEN,
        actual: data.len(),
    };
    let version = u32_le_at(data, 8).ok_or_else(truncated)?;
    if version != SUPPORTED_VERSION {
        return Err(BifError::UnsupportedVersion(version));
    }

    let image_count = u32_le_at(data, 12).ok_or_else(truncated)?;
    let separation = u32_le_at(data, 16).ok_or_else(truncated)?;
    let timestamp_multiplier_ms = if separation == 0 {
        DEFAULT_TIMESTAMP_MULTIPLIER_MS
    } else {
        separation
    };

    Ok(BifHeader {
        magic_valid: true,
        version,
        image_count,
        timestamp_multiplier_ms,
    })
}
