/*
# BIF Index Scanner

 Walks the index table as an explicit state machine:

   ScanningIndex -> SentinelFound | HeuristicStop | BufferExhausted -> Finalizing

 Every termination path is a distinct `ScanEnd` so the recovery heuristics
 can be tested on their own.
*/

use super::types::{
    FrameRef, IndexEntry, ScanEnd, INDEX_RECORD_LEN, INDEX_TABLE_OFFSET, SENTINEL_TIMESTAMP,
};
use crate::bits::read_u32_pair_le;
use crate::errors::BifError;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    ScanningIndex,
    Finalizing(ScanEnd),
}

/// Result of a finished scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTable {
    pub entries: Vec<IndexEntry>,
    pub scan_end: ScanEnd,
    /// End offset of the last entry's range
    pub final_end: usize,
}

impl IndexTable {
    /// Build frame ranges pairwise: each entry ends where the next starts.
    pub fn frame_refs(&self) -> Vec<FrameRef> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let end_offset = self
                    .entries
                    .get(i + 1)
                    .map(|next| next.byte_offset as usize)
                    .unwrap_or(self.final_end);
                FrameRef {
                    timestamp_raw: entry.timestamp_raw,
                    start_offset: entry.byte_offset as usize,
                    end_offset,
                }
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct IndexScanner<'a> {
    data: &'a [u8],
    position: usize,
    entries: Vec<IndexEntry>,
    state: ScanState,
}

impl<'a> IndexScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: INDEX_TABLE_OFFSET,
            entries: Vec::new(),
            state: ScanState::ScanningIndex,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Consume one index record.
    ///
    /// Once the scanner reaches `Finalizing` further calls leave it there.
    pub fn step(&mut self) -> Result<ScanState, BifError> {
        if let ScanState::Finalizing(_) = self.state {
            return Ok(self.state);
        }

        let record_position = self.position;
        let Some((timestamp_raw, byte_offset)) = read_u32_pair_le(self.data, &mut self.position)
        else {
            self.state = ScanState::Finalizing(ScanEnd::BufferExhausted);
            return Ok(self.state);
        };

        debug!(
            "Index record at {}: timestamp={}, offset={}",
            record_position, timestamp_raw, byte_offset
        );

        if timestamp_raw == SENTINEL_TIMESTAMP {
            self.state = ScanState::Finalizing(ScanEnd::SentinelFound {
                end_offset: byte_offset,
            });
            return Ok(self.state);
        }

        if byte_offset as usize >= self.data.len() {
            return Err(BifError::InvalidOffset {
                position: record_position,
                offset: byte_offset,
                buffer_len: self.data.len(),
            });
        }

        self.entries.push(IndexEntry {
            timestamp_raw,
            byte_offset,
        });

        // The next record would sit on top of image data: the producer left out the sentinel.
        let next_record = record_position + INDEX_RECORD_LEN;
        let first_start = self.entries[0].byte_offset as usize;
        if next_record >= first_start {
            warn!(
                "Index table at {} overlaps image data starting at {}, stopping index read",
                record_position, first_start
            );
            self.state = ScanState::Finalizing(ScanEnd::HeuristicStop);
        }

        Ok(self.state)
    }

    /// Drive the scanner until it finalizes.
    pub fn run(mut self) -> Result<IndexTable, BifError> {
        let scan_end = loop {
            if let ScanState::Finalizing(end) = self.step()? {
                break end;
            }
        };

        let final_end = match scan_end {
            ScanEnd::SentinelFound { end_offset } => end_offset as usize,
            ScanEnd::HeuristicStop | ScanEnd::BufferExhausted => self.data.len(),
        };

        Ok(IndexTable {
            entries: self.entries,
            scan_end,
            final_end,
        })
    }
}

/// Scan the index table of a buffer whose header was already validated.
pub fn scan_index(data: &[u8]) -> Result<IndexTable, BifError> {
    IndexScanner::new(data).run()
}
