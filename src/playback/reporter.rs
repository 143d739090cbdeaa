//! Watch-progress delivery

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::api::ApiClient;
use crate::playback::session::WatchEvent;

/// Destination for watch-progress snapshots.
///
/// Delivery is fire and forget: implementations handle their own failures
/// and never surface them to the sampler. A dropped report costs nothing,
/// the next snapshot carries fresher absolute numbers anyway.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn report(&self, event: &WatchEvent);
}

/// Reports snapshots to the platform's watch endpoint.
pub struct HttpProgressReporter {
    api: Arc<ApiClient>,
}

impl HttpProgressReporter {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProgressReporter for HttpProgressReporter {
    async fn report(&self, event: &WatchEvent) {
        if let Err(err) = self
            .api
            .record_watch(
                event.media_id,
                event.watched_seconds,
                event.completion_percent,
            )
            .await
        {
            warn!(
                "failed to record watch progress for video {}: {err}",
                event.media_id
            );
        }
    }
}
