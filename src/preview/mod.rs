mod config;
mod handles;
mod scheduler;
mod session;
mod window;

pub use config::{
    PreviewConfig, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_WINDOW_RADIUS_MS, MAX_FRAME_INTERVAL_MS,
};
pub use handles::{
    frame_mime_type, frame_to_data_url, DataUrlStore, FrameHandle, Generation, HandleStore,
};
pub use scheduler::{
    ActivationSummary, Advance, KeyPointId, KeyPointPreview, PreviewScheduler, SchedulerState,
    Tick,
};
pub use session::{LoadOutcome, LoadTicket, PreviewSession};
pub use window::{select_frames, PreviewWindow, WindowBounds};
