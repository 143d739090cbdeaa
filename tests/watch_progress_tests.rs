use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lectern::playback::{PlaybackSession, ProgressReporter, WatchEvent, WatchSampler, WatchSession};

struct RecordingReporter {
    events: Mutex<Vec<WatchEvent>>,
}

impl RecordingReporter {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    fn events(&self) -> Vec<WatchEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report(&self, event: &WatchEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// These tests run on tokio's paused clock: sleeping auto-advances time
// through the sampler's ticks without waiting in real time.

#[tokio::test(start_paused = true)]
async fn samples_on_the_report_cadence() {
    let recorder = RecordingReporter::new();
    let mut session = WatchSession::new(7, recorder.clone(), Duration::from_secs(10));
    session.resolve_duration(100.0).await;
    session.set_position(25.0).await;

    tokio::time::sleep(Duration::from_secs(35)).await;

    let events = recorder.events();
    assert_eq!(events.len(), 3, "expected one report per elapsed cadence");
    assert!(events.iter().all(|e| e.media_id == 7));
    assert!(events.iter().all(|e| e.watched_seconds == 25.0));
    assert!(events.iter().all(|e| e.completion_percent == 25.0));
}

#[tokio::test(start_paused = true)]
async fn reports_are_absolute_snapshots_of_the_playhead() {
    let recorder = RecordingReporter::new();
    let mut session = WatchSession::new(7, recorder.clone(), Duration::from_secs(10));
    session.resolve_duration(200.0).await;

    session.set_position(50.0).await;
    tokio::time::sleep(Duration::from_secs(15)).await;

    // Rewinding must be reported as-is, not accumulated.
    session.set_position(30.0).await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    let events = recorder.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].watched_seconds, 50.0);
    assert_eq!(events[0].completion_percent, 25.0);
    assert_eq!(events[1].watched_seconds, 30.0);
    assert_eq!(events[1].completion_percent, 15.0);
}

#[tokio::test(start_paused = true)]
async fn nothing_is_reported_while_the_duration_is_unknown() {
    let recorder = RecordingReporter::new();
    let session = PlaybackSession::new(9);
    let _sampler = WatchSampler::spawn(session.clone(), recorder.clone(), Duration::from_secs(10));
    session.set_position(42.0).await;

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert!(
        recorder.events().is_empty(),
        "ticks without a duration must not produce reports"
    );

    // Once the duration lands, the next tick reports a real percentage.
    session.set_duration(84.0).await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].watched_seconds, 42.0);
    assert_eq!(events[0].completion_percent, 50.0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_session_stops_the_reports() {
    let recorder = RecordingReporter::new();
    let mut session = WatchSession::new(7, recorder.clone(), Duration::from_secs(10));
    session.resolve_duration(100.0).await;
    session.set_position(10.0).await;

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(recorder.events().len(), 1);

    drop(session);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(
        recorder.events().len(),
        1,
        "a dropped session must not keep reporting"
    );
}

#[tokio::test(start_paused = true)]
async fn refreshed_duration_changes_later_percentages() {
    let recorder = RecordingReporter::new();
    let mut session = WatchSession::new(7, recorder.clone(), Duration::from_secs(10));
    session.resolve_duration(50.0).await;
    session.set_position(25.0).await;

    tokio::time::sleep(Duration::from_secs(15)).await;

    // A later, better probe of the same file.
    session.resolve_duration(100.0).await;
    tokio::time::sleep(Duration::from_secs(10)).await;

    let events = recorder.events();
    assert_eq!(events.len(), 2, "a refreshed duration must not add a second timer");
    assert_eq!(events[0].completion_percent, 50.0);
    assert_eq!(events[1].completion_percent, 25.0);
}

#[tokio::test(start_paused = true)]
async fn slow_reports_are_skipped_not_queued() {
    struct SlowReporter {
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl ProgressReporter for SlowReporter {
        async fn report(&self, _event: &WatchEvent) {
            *self.calls.lock().unwrap() += 1;
            // Slower than two full cadences.
            tokio::time::sleep(Duration::from_secs(25)).await;
        }
    }

    let reporter = Arc::new(SlowReporter {
        calls: Mutex::new(0),
    });
    let mut session = WatchSession::new(7, reporter.clone(), Duration::from_secs(10));
    session.resolve_duration(100.0).await;
    session.set_position(10.0).await;

    // 40 seconds of cadence time: ticks at 10/20/30/40, but the report
    // started at 10 runs until 35, so 20 and 30 are skipped entirely.
    tokio::time::sleep(Duration::from_secs(41)).await;

    let calls = *reporter.calls.lock().unwrap();
    assert_eq!(calls, 2, "missed ticks must be skipped, not queued up");
}
