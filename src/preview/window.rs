use super::handles::FrameHandle;
use crate::bif::DecodedFrame;
use serde::Serialize;

/// Inclusive time range around a key point, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowBounds {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl WindowBounds {
    pub fn around(timestamp_ms: u64, radius_ms: u64) -> Self {
        Self {
            start_ms: timestamp_ms.saturating_sub(radius_ms),
            end_ms: timestamp_ms.saturating_add(radius_ms),
        }
    }

    pub fn contains(&self, frame: &DecodedFrame) -> bool {
        let time_ms = frame.time_ms();
        time_ms >= self.start_ms as f64 && time_ms <= self.end_ms as f64
    }
}

/// Indices of the frames inside `bounds`, in decode order.
pub fn select_frames(frames: &[DecodedFrame], bounds: WindowBounds) -> Vec<usize> {
    frames
        .iter()
        .enumerate()
        .filter(|(_, frame)| bounds.contains(frame))
        .map(|(index, _)| index)
        .collect()
}

/// Animated (or static) frame window for one key point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewWindow {
    pub bounds: WindowBounds,
    pub frames: Vec<FrameHandle>,
    pub current_index: usize,
}

impl PreviewWindow {
    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn current_handle(&self) -> Option<FrameHandle> {
        self.frames.get(self.current_index).copied()
    }

    /// Step to the next frame, wrapping around. Static windows stay put.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.is_animated() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.frames.len();
        Some(self.current_index)
    }
}

#[cfg(test)]
mod tests {
    use super::{select_frames, WindowBounds};
    use crate::bif::DecodedFrame;

    fn frames_every_five_seconds(last: u32) -> Vec<DecodedFrame> {
        (0..=last / 5)
            .map(|i| DecodedFrame {
                time_seconds: (i * 5) as f64,
                payload: vec![i as u8],
            })
            .collect()
    }

    #[test]
    fn test_window_around_ninety_seconds() {
        let frames = frames_every_five_seconds(200);
        let bounds = WindowBounds::around(90_000, 10_000);
        assert_eq!(
            bounds,
            WindowBounds {
                start_ms: 80_000,
                end_ms: 100_000,
            }
        );

        let selected = select_frames(&frames, bounds);
        let times: Vec<f64> = selected.iter().map(|&i| frames[i].time_seconds).collect();
        assert_eq!(times, vec![80.0, 85.0, 90.0, 95.0, 100.0]);
    }

    #[test]
    fn test_window_clamped_at_zero() {
        let frames = frames_every_five_seconds(60);
        let bounds = WindowBounds::around(3_000, 10_000);
        assert_eq!(bounds.start_ms, 0);
        assert_eq!(select_frames(&frames, bounds), vec![0, 1, 2]);
    }

    #[test]
    fn test_window_beyond_last_frame_is_empty() {
        let frames = frames_every_five_seconds(60);
        assert!(select_frames(&frames, WindowBounds::around(600_000, 10_000)).is_empty());
    }
}
