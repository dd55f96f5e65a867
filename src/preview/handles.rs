use crate::bif::DecodedFrame;
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Token identifying one activation cycle of the scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Revocable reference to a decoded frame's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FrameHandle {
    pub id: u64,
    pub generation: Generation,
}

/// Allocator for presentation-side frame resources
#[cfg_attr(test, mockall::automock)]
pub trait HandleStore {
    fn allocate(&mut self, generation: Generation, frame: &DecodedFrame) -> FrameHandle;
    fn revoke(&mut self, handle: FrameHandle);
    fn live_count(&self) -> usize;
}

/// Store that materialises every frame as a `data:` URL
#[derive(Debug, Default)]
pub struct DataUrlStore {
    next_id: u64,
    urls: HashMap<u64, (Generation, String)>,
}

impl DataUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, handle: &FrameHandle) -> Option<&str> {
        self.urls
            .get(&handle.id)
            .filter(|(generation, _)| *generation == handle.generation)
            .map(|(_, url)| url.as_str())
    }

    /// Live handles belonging to one generation.
    pub fn live_in(&self, generation: Generation) -> usize {
        self.urls.values().filter(|(g, _)| *g == generation).count()
    }
}

impl HandleStore for DataUrlStore {
    fn allocate(&mut self, generation: Generation, frame: &DecodedFrame) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle {
            id: self.next_id,
            generation,
        };
        let url = frame_to_data_url(&frame.payload);
        debug!(
            "Allocated handle {} for frame at {:.2}s ({} bytes)",
            handle.id,
            frame.time_seconds,
            frame.payload.len()
        );
        self.urls.insert(handle.id, (generation, url));
        handle
    }

    fn revoke(&mut self, handle: FrameHandle) {
        self.urls.remove(&handle.id);
    }

    fn live_count(&self) -> usize {
        self.urls.len()
    }
}

/// Sniff the payload's image type; BIF frames are JPEG unless proven otherwise.
pub fn frame_mime_type(payload: &[u8]) -> &'static str {
    match image::guess_format(payload) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "image/jpeg",
    }
}

/// Convert frame bytes to a base64 data URL
pub fn frame_to_data_url(payload: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(payload);
    format!("data:{};base64,{}", frame_mime_type(payload), encoded)
}

#[cfg(test)]
mod tests {
    use super::{frame_mime_type, frame_to_data_url, DataUrlStore, Generation, HandleStore};
    use crate::bif::DecodedFrame;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_mime_sniffing() {
        assert_eq!(frame_mime_type(&PNG_SIGNATURE), "image/png");
        assert_eq!(frame_mime_type(&[0xff, 0xd8, 0xff, 0xe0]), "image/jpeg");
        assert_eq!(frame_mime_type(b"??"), "image/jpeg");
    }

    #[test]
    fn test_data_url_encoding() {
        assert_eq!(frame_to_data_url(b"abc"), "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_store_allocate_and_revoke() {
        let mut store = DataUrlStore::new();
        let frame = DecodedFrame {
            time_seconds: 1.0,
            payload: b"abc".to_vec(),
        };
        let g1 = Generation::default().next();
        let a = store.allocate(g1, &frame);
        let b = store.allocate(g1.next(), &frame);
        assert_ne!(a.id, b.id);
        assert_eq!(store.live_count(), 2);
        assert_eq!(store.live_in(g1), 1);
        assert_eq!(store.resolve(&a), Some("data:image/jpeg;base64,YWJj"));

        store.revoke(a);
        assert_eq!(store.resolve(&a), None);
        assert_eq!(store.live_count(), 1);
        // revoking twice is harmless
        store.revoke(a);
        assert_eq!(store.live_count(), 1);
    }
}
