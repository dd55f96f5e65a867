use super::config::PreviewConfig;
use super::handles::HandleStore;
use super::scheduler::{ActivationSummary, PreviewScheduler};
use crate::bif::decode;
use crate::errors::{BifPreviewError, BifPreviewResult};
use crate::keypoints::KeyPoint;
use crate::source::BifSource;
use log::{info, warn};

/// Identifies one buffer request; only the latest ticket may activate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug)]
pub enum LoadOutcome {
    Activated(ActivationSummary),
    /// The result arrived after a newer load or a shutdown
    Discarded { frames: usize },
    /// Fetch or decode failed; the scheduler was torn down as for an empty decode
    Failed(BifPreviewError),
}

/// Routes fetched buffers through decode and into the scheduler
pub struct PreviewSession<S: HandleStore> {
    scheduler: PreviewScheduler<S>,
    latest_ticket: u64,
}

impl<S: HandleStore> PreviewSession<S> {
    pub fn new(store: S, config: PreviewConfig) -> Self {
        Self {
            scheduler: PreviewScheduler::new(store, config),
            latest_ticket: 0,
        }
    }

    pub fn scheduler(&self) -> &PreviewScheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut PreviewScheduler<S> {
        &mut self.scheduler
    }

    /// Start a new load, superseding every earlier ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.scheduler.deactivate();
        LoadTicket(self.latest_ticket)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Finish a load with whatever the fetch produced.
    ///
    /// A successful fetch is always decoded, but only the current ticket activates.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        fetched: BifPreviewResult<Vec<u8>>,
        key_points: &[KeyPoint],
    ) -> LoadOutcome {
        let decoded = fetched.and_then(|buffer| decode(&buffer).map_err(BifPreviewError::from));

        if !self.is_current(ticket) {
            let frames = decoded.as_ref().map(|frames| frames.len()).unwrap_or(0);
            info!(
                "Discarding superseded BIF load {} ({} frames)",
                ticket.0, frames
            );
            return LoadOutcome::Discarded { frames };
        }

        match decoded {
            Ok(frames) => LoadOutcome::Activated(self.scheduler.activate(&frames, key_points)),
            Err(err) => {
                warn!("Error loading/parsing BIF: {}", err);
                self.scheduler.deactivate();
                LoadOutcome::Failed(err)
            }
        }
    }

    pub async fn load<B: BifSource + ?Sized>(
        &mut self,
        source: &B,
        key_points: &[KeyPoint],
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        info!("Fetching BIF: {}", source.describe());
        let fetched = source.fetch().await;
        self.complete_load(ticket, fetched, key_points)
    }

    /// Tear everything down and invalidate any load still in flight.
    pub fn shutdown(&mut self) {
        self.latest_ticket += 1;
        self.scheduler.deactivate();
    }
}
