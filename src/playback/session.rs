//! Playback state shared between the player and the sampler

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// An absolute watch-progress snapshot for one video
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEvent {
    pub media_id: i64,
    pub watched_seconds: f64,
    pub completion_percent: f64,
}

#[derive(Debug, Default)]
struct Playhead {
    position_secs: f64,
    /// 0.0 until the player learns the real duration
    duration_secs: f64,
}

/// Live playback state for one video.
///
/// Clones share the same playhead, so the view driving the position and the
/// sampler reading it stay in sync.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    media_id: i64,
    started_at: DateTime<Utc>,
    playhead: Arc<RwLock<Playhead>>,
}

impl PlaybackSession {
    pub fn new(media_id: i64) -> Self {
        Self {
            media_id,
            started_at: Utc::now(),
            playhead: Arc::new(RwLock::new(Playhead::default())),
        }
    }

    pub fn media_id(&self) -> i64 {
        self.media_id
    }

    /// Wall-clock time this session was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub async fn position(&self) -> f64 {
        self.playhead.read().await.position_secs
    }

    /// Move the playhead. Positions may jump backwards on seek.
    pub async fn set_position(&self, secs: f64) {
        self.playhead.write().await.position_secs = secs.max(0.0);
    }

    pub async fn duration(&self) -> f64 {
        self.playhead.read().await.duration_secs
    }

    /// Record the duration. Zero or negative keeps it unknown.
    pub async fn set_duration(&self, secs: f64) {
        self.playhead.write().await.duration_secs = secs.max(0.0);
    }

    /// Snapshot the playhead as a reportable event.
    ///
    /// Returns `None` while the duration is unknown: no completion
    /// percentage can be computed yet, so the tick is suppressed.
    pub async fn sample(&self) -> Option<WatchEvent> {
        let playhead = self.playhead.read().await;
        if playhead.duration_secs <= 0.0 {
            return None;
        }
        Some(WatchEvent {
            media_id: self.media_id,
            watched_seconds: playhead.position_secs,
            completion_percent: completion_percent(
                playhead.position_secs,
                playhead.duration_secs,
            ),
        })
    }
}

/// Watched share of the duration as a percentage, clamped to 0..=100.
fn completion_percent(watched_secs: f64, duration_secs: f64) -> f64 {
    (watched_secs / duration_secs * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_clamped() {
        assert_eq!(completion_percent(30.0, 120.0), 25.0);
        assert_eq!(completion_percent(150.0, 120.0), 100.0);
        assert_eq!(completion_percent(-5.0, 120.0), 0.0);
    }

    #[tokio::test]
    async fn sample_is_suppressed_until_duration_known() {
        let session = PlaybackSession::new(7);
        session.set_position(42.0).await;
        assert_eq!(session.sample().await, None);

        session.set_duration(120.0).await;
        let event = session.sample().await.unwrap();
        assert_eq!(event.media_id, 7);
        assert_eq!(event.watched_seconds, 42.0);
        assert_eq!(event.completion_percent, 35.0);
    }

    #[tokio::test]
    async fn later_duration_updates_feed_new_samples() {
        let session = PlaybackSession::new(1);
        session.set_duration(100.0).await;
        session.set_position(50.0).await;
        assert_eq!(session.sample().await.unwrap().completion_percent, 50.0);

        session.set_duration(200.0).await;
        assert_eq!(session.sample().await.unwrap().completion_percent, 25.0);
    }

    #[tokio::test]
    async fn position_never_goes_negative() {
        let session = PlaybackSession::new(1);
        session.set_position(-10.0).await;
        assert_eq!(session.position().await, 0.0);
    }
}
