//! Cadence-driven sampling of a playback session

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::playback::reporter::ProgressReporter;
use crate::playback::session::PlaybackSession;

/// Owned interval task that turns playback state into watch reports.
///
/// At most one report is in flight at a time: each tick awaits delivery
/// before the next fires, and ticks that land while a report is pending are
/// skipped rather than queued. Dropping the sampler aborts the task, so no
/// new report can start after teardown (one already on the wire may still
/// land, which is fine for absolute snapshots).
pub struct WatchSampler {
    task: JoinHandle<()>,
}

impl WatchSampler {
    /// Spawn the sampling task. The first report happens one full cadence
    /// after spawn.
    pub fn spawn(
        session: PlaybackSession,
        reporter: Arc<dyn ProgressReporter>,
        cadence: Duration,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut ticks = tokio::time::interval(cadence);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // An interval's first tick completes immediately; skip it so
            // sampling starts one cadence in.
            ticks.tick().await;

            loop {
                ticks.tick().await;
                if let Some(event) = session.sample().await {
                    reporter.report(&event).await;
                }
            }
        });

        Self { task }
    }
}

impl Drop for WatchSampler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
