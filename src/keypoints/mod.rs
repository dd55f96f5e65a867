pub mod summary;
mod timestamp;
mod types;

pub use summary::{parse_summary, SummaryDocument, SummaryKeyPoint};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use types::{Importance, KeyPoint};
