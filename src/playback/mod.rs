//! Watch-progress tracking
//!
//! While a video plays, a sampler task snapshots the playback state on a
//! fixed cadence and reports absolute progress to the platform. Reports are
//! best effort; the durable record lives server-side and the latest
//! snapshot wins.

mod reporter;
mod sampler;
mod session;

pub use reporter::{HttpProgressReporter, ProgressReporter};
pub use sampler::WatchSampler;
pub use session::{PlaybackSession, WatchEvent};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

/// One watched video: playback state plus the sampler bound to it.
///
/// The sampler starts when the duration becomes known and stops when this
/// session is dropped. A holder switching to another video must drop the
/// old session before creating the next one so the timers never overlap.
pub struct WatchSession {
    session: PlaybackSession,
    reporter: Arc<dyn ProgressReporter>,
    cadence: Duration,
    sampler: Option<WatchSampler>,
}

impl WatchSession {
    pub fn new(media_id: i64, reporter: Arc<dyn ProgressReporter>, cadence: Duration) -> Self {
        Self {
            session: PlaybackSession::new(media_id),
            reporter,
            cadence,
            sampler: None,
        }
    }

    pub fn media_id(&self) -> i64 {
        self.session.media_id()
    }

    pub async fn position(&self) -> f64 {
        self.session.position().await
    }

    pub async fn set_position(&self, secs: f64) {
        self.session.set_position(secs).await;
    }

    pub async fn duration(&self) -> f64 {
        self.session.duration().await
    }

    /// Feed in the duration once the player learns it.
    ///
    /// The unknown-to-known transition starts the report cadence; later
    /// calls only refresh the value ticks compute against.
    pub async fn resolve_duration(&mut self, secs: f64) {
        self.session.set_duration(secs).await;
        if self.sampler.is_none() && secs > 0.0 {
            self.sampler = Some(WatchSampler::spawn(
                self.session.clone(),
                Arc::clone(&self.reporter),
                self.cadence,
            ));
        }
    }

    /// Mark playback complete: move the playhead to the end and report the
    /// final snapshot immediately, off cadence.
    ///
    /// Does nothing while the duration is unknown.
    pub async fn mark_ended(&self) {
        let duration = self.session.duration().await;
        if duration <= 0.0 {
            return;
        }
        self.session.set_position(duration).await;
        if let Some(event) = self.session.sample().await {
            self.reporter.report(&event).await;
        }
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        let open_for = Utc::now().signed_duration_since(self.session.started_at());
        debug!(
            "closing watch session for video {} after {}s",
            self.session.media_id(),
            open_for.num_seconds()
        );
    }
}
