/*
# Preview Scheduler

 Owns every resource of the active generation: frame handles, preview windows
 and animation timers. Timers never touch state. Each one is a tokio task
 that sends `Tick { generation, key_point }` into the scheduler's channel, and
 the scheduler applies ticks against its live state. A tick whose generation
 is not the current one, or whose window is gone, is ignored.

 Lifecycle per generation: Empty -> Activating -> Active -> Deactivating -> Empty.
*/

use super::config::PreviewConfig;
use super::handles::{FrameHandle, Generation, HandleStore};
use super::window::{select_frames, PreviewWindow, WindowBounds};
use crate::bif::DecodedFrame;
use crate::keypoints::KeyPoint;
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Position of a key point in the list handed to `activate`
pub type KeyPointId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    Empty,
    Activating,
    Active,
    Deactivating,
}

/// Timer message asking the scheduler to step one window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: Generation,
    pub key_point: KeyPointId,
}

/// Notification that a window moved to a new frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advance {
    pub generation: Generation,
    pub key_point: KeyPointId,
    pub current_index: usize,
    pub handle: FrameHandle,
}

/// What the presentation layer reads for one key point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyPointPreview {
    pub has_frames: bool,
    pub current_handle: Option<FrameHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivationSummary {
    pub generation: Generation,
    pub windows: usize,
    pub animated: usize,
    pub handles: usize,
}

#[derive(Debug)]
struct TimerTask {
    generation: Generation,
    task: JoinHandle<()>,
}

pub struct PreviewScheduler<S: HandleStore> {
    config: PreviewConfig,
    store: S,
    state: SchedulerState,
    generation: Generation,
    windows: HashMap<KeyPointId, PreviewWindow>,
    // decoded frame index -> handle; shared by overlapping windows
    handles: HashMap<usize, FrameHandle>,
    timers: HashMap<KeyPointId, TimerTask>,
    tick_tx: mpsc::UnboundedSender<Tick>,
    tick_rx: mpsc::UnboundedReceiver<Tick>,
}

impl<S: HandleStore> PreviewScheduler<S> {
    pub fn new(store: S, config: PreviewConfig) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            config,
            store,
            state: SchedulerState::Empty,
            generation: Generation::default(),
            windows: HashMap::new(),
            handles: HashMap::new(),
            timers: HashMap::new(),
            tick_tx,
            tick_rx,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn window(&self, key_point: KeyPointId) -> Option<&PreviewWindow> {
        self.windows.get(&key_point)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Timers still registered (and not yet finished) for `generation`.
    pub fn live_timers(&self, generation: Generation) -> usize {
        self.timers
            .values()
            .filter(|timer| timer.generation == generation && !timer.task.is_finished())
            .count()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Sender for injecting ticks from outside, e.g. a custom clock.
    pub fn tick_sender(&self) -> mpsc::UnboundedSender<Tick> {
        self.tick_tx.clone()
    }

    pub fn preview(&self, key_point: KeyPointId) -> KeyPointPreview {
        match self.windows.get(&key_point) {
            Some(window) => KeyPointPreview {
                has_frames: true,
                current_handle: window.current_handle(),
            },
            None => KeyPointPreview {
                has_frames: false,
                current_handle: None,
            },
        }
    }

    /// Replace the current generation with one built from `frames` and `key_points`.
    ///
    /// The previous generation is fully torn down before the first allocation.
    /// Animated windows spawn tokio tasks, so this must run inside a runtime
    /// whenever any window matches two or more frames.
    pub fn activate(
        &mut self,
        frames: &[DecodedFrame],
        key_points: &[KeyPoint],
    ) -> ActivationSummary {
        self.deactivate();

        self.generation = self.generation.next();
        self.state = SchedulerState::Activating;
        let generation = self.generation;

        for (key_point, point) in key_points.iter().enumerate() {
            let bounds = WindowBounds::around(point.timestamp_ms, self.config.window_radius_ms);
            let selected = select_frames(frames, bounds);
            if selected.is_empty() {
                debug!(
                    "Key point {} ({} ms): no frames in [{}, {}]",
                    key_point, point.timestamp_ms, bounds.start_ms, bounds.end_ms
                );
                continue;
            }

            let mut window_handles = Vec::with_capacity(selected.len());
            for index in selected {
                let handle = match self.handles.get(&index) {
                    Some(handle) => *handle,
                    None => {
                        let handle = self.store.allocate(generation, &frames[index]);
                        self.handles.insert(index, handle);
                        handle
                    }
                };
                window_handles.push(handle);
            }

            self.windows.insert(
                key_point,
                PreviewWindow {
                    bounds,
                    frames: window_handles,
                    current_index: 0,
                },
            );
        }

        // every handle exists before the first timer can fire
        self.state = SchedulerState::Active;
        let mut animated: Vec<KeyPointId> = self
            .windows
            .iter()
            .filter(|(_, window)| window.is_animated())
            .map(|(key_point, _)| *key_point)
            .collect();
        animated.sort_unstable();
        for key_point in &animated {
            self.start_timer(*key_point);
        }

        let summary = ActivationSummary {
            generation,
            windows: self.windows.len(),
            animated: animated.len(),
            handles: self.handles.len(),
        };
        info!(
            "Preview generation {} active: {} windows ({} animated), {} handles",
            generation.value(),
            summary.windows,
            summary.animated,
            summary.handles
        );
        summary
    }

    fn start_timer(&mut self, key_point: KeyPointId) {
        let tick = Tick {
            generation: self.generation,
            key_point,
        };
        let period = self.config.frame_interval();
        let tx = self.tick_tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(tick).is_err() {
                    break;
                }
            }
        });
        self.timers.insert(
            key_point,
            TimerTask {
                generation: self.generation,
                task,
            },
        );
    }

    /// Stop every timer and revoke every handle of the current generation.
    ///
    /// Safe to call when nothing is active.
    pub fn deactivate(&mut self) {
        if self.state == SchedulerState::Empty && self.timers.is_empty() && self.handles.is_empty()
        {
            return;
        }

        self.state = SchedulerState::Deactivating;
        let timers = self.timers.len();
        for (_, timer) in self.timers.drain() {
            timer.task.abort();
        }
        self.windows.clear();
        let handles = self.handles.len();
        for (_, handle) in self.handles.drain() {
            self.store.revoke(handle);
        }
        // queued ticks belong to the generation being torn down
        while self.tick_rx.try_recv().is_ok() {}
        self.state = SchedulerState::Empty;

        debug!(
            "Preview generation {} torn down: {} timers stopped, {} handles revoked",
            self.generation.value(),
            timers,
            handles
        );
    }

    /// Apply one timer tick against the live state.
    pub fn apply_tick(&mut self, tick: Tick) -> Option<Advance> {
        if tick.generation != self.generation || self.state != SchedulerState::Active {
            debug!(
                "Ignoring stale tick for key point {} (generation {})",
                tick.key_point,
                tick.generation.value()
            );
            return None;
        }

        let window = self.windows.get_mut(&tick.key_point)?;
        let current_index = window.advance()?;
        let handle = window.current_handle()?;
        Some(Advance {
            generation: tick.generation,
            key_point: tick.key_point,
            current_index,
            handle,
        })
    }

    /// Wait for the next tick that actually moves a window.
    ///
    /// Pends for as long as no window is animated.
    pub async fn next_advance(&mut self) -> Option<Advance> {
        loop {
            let tick = self.tick_rx.recv().await?;
            if let Some(advance) = self.apply_tick(tick) {
                return Some(advance);
            }
        }
    }
}

impl<S: HandleStore> Drop for PreviewScheduler<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::{PreviewScheduler, SchedulerState};
    use crate::bif::DecodedFrame;
    use crate::keypoints::{Importance, KeyPoint};
    use crate::preview::{DataUrlStore, HandleStore, PreviewConfig};
    use std::time::Duration;
    use tokio::sync::mpsc::error::TryRecvError;

    fn frames_every_five_seconds(last: u32) -> Vec<DecodedFrame> {
        (0..=last / 5)
            .map(|i| DecodedFrame {
                time_seconds: (i * 5) as f64,
                payload: vec![0xff, 0xd8, 0xff, i as u8],
            })
            .collect()
    }

    fn key_point(timestamp: &str) -> KeyPoint {
        KeyPoint::new(timestamp, timestamp, Importance::High)
    }

    fn queued_ticks(scheduler: &mut PreviewScheduler<DataUrlStore>) -> usize {
        let mut count = 0;
        while scheduler.tick_rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_deactivate_stops_timer_tasks() {
        let frames = frames_every_five_seconds(200);
        let mut scheduler = PreviewScheduler::new(DataUrlStore::new(), PreviewConfig::default());
        let summary = scheduler.activate(&frames, &[key_point("01:30"), key_point("02:30")]);
        assert_eq!(summary.animated, 2);

        tokio::time::sleep(Duration::from_millis(700)).await;
        assert!(queued_ticks(&mut scheduler) >= 2);

        scheduler.deactivate();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(scheduler.tick_rx.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(scheduler.state(), SchedulerState::Empty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reactivation_stops_previous_timers() {
        let frames = frames_every_five_seconds(200);
        let mut scheduler = PreviewScheduler::new(DataUrlStore::new(), PreviewConfig::default());
        scheduler.activate(&frames, &[key_point("01:30"), key_point("02:30")]);
        tokio::time::sleep(Duration::from_millis(400)).await;

        // a 2 s radius around 01:31 only holds the 90 s frame: static, no timer
        scheduler.config.window_radius_ms = 2_000;
        let second = scheduler.activate(&frames, &[key_point("01:31")]);
        assert_eq!(second.windows, 1);
        assert_eq!(second.animated, 0);
        assert_eq!(scheduler.store().live_count(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(queued_ticks(&mut scheduler), 0);
        assert_eq!(scheduler.window(0).map(|w| w.current_index), Some(0));
    }
}
