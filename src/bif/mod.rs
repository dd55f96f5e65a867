mod decoder;
mod header;
pub mod index;
mod types;
mod writer;

pub use decoder::{decode, decode_with_report};
pub use header::{has_bif_magic, parse_header};
pub use index::{scan_index, IndexScanner, IndexTable, ScanState};
pub use types::*;
pub use writer::BifWriter;
