use super::types::{BIF_MAGIC, INDEX_RECORD_LEN, INDEX_TABLE_OFFSET, SENTINEL_TIMESTAMP};
use crate::bits::write_u32_le;
use std::io;

/// Encoder for the version 0 BIF layout
///
/// Frames are written in push order; timestamps are raw values in units of the
/// separation (1000 ms when the separation is 0).
#[derive(Debug, Clone, Default)]
pub struct BifWriter {
    separation_ms: u32,
    frames: Vec<(u32, Vec<u8>)>,
    omit_sentinel: bool,
    declared_count: Option<u32>,
}

impl BifWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separation_ms(mut self, separation_ms: u32) -> Self {
        self.separation_ms = separation_ms;
        self
    }

    /// Leave out the `0xFFFFFFFF` record; payloads start right after the last entry.
    pub fn without_sentinel(mut self) -> Self {
        self.omit_sentinel = true;
        self
    }

    /// Override the image count written to the header.
    pub fn with_declared_count(mut self, count: u32) -> Self {
        self.declared_count = Some(count);
        self
    }

    pub fn push_frame(mut self, timestamp_raw: u32, payload: impl Into<Vec<u8>>) -> Self {
        self.frames.push((timestamp_raw, payload.into()));
        self
    }

    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let record_count = self.frames.len() + usize::from(!self.omit_sentinel);
        let data_start = INDEX_TABLE_OFFSET + record_count * INDEX_RECORD_LEN;
        let payload_len: usize = self.frames.iter().map(|(_, p)| p.len()).sum();
        let total_len = data_start + payload_len;
        if total_len > u32::MAX as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("BIF of {} bytes does not fit 32-bit offsets", total_len),
            ));
        }

        let image_count = match self.declared_count {
            Some(count) => count,
            None => self.frames.len() as u32,
        };

        let mut output = Vec::with_capacity(total_len);
        output.extend_from_slice(&BIF_MAGIC);
        write_u32_le(&mut output, 0);
        write_u32_le(&mut output, image_count);
        write_u32_le(&mut output, self.separation_ms);
        output.resize(INDEX_TABLE_OFFSET, 0);

        let mut offset = data_start;
        for (timestamp_raw, payload) in &self.frames {
            write_u32_le(&mut output, *timestamp_raw);
            write_u32_le(&mut output, offset as u32);
            offset += payload.len();
        }
        if !self.omit_sentinel {
            write_u32_le(&mut output, SENTINEL_TIMESTAMP);
            write_u32_le(&mut output, offset as u32);
        }

        for (_, payload) in &self.frames {
            output.extend_from_slice(payload);
        }

        Ok(output)
    }
}
