mod bif_source;

pub use bif_source::{bif_download_url, open_source, BifSource, HttpBifSource, LocalBifSource};
