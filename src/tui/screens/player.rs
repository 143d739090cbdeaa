//! Player screen - playback state and progress reporting for one video

use std::sync::Arc;
use std::time::Duration;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::api::Video;
use crate::config::Settings;
use crate::playback::{ProgressReporter, WatchSession};

/// Player screen state
///
/// The screen owns the playhead. Every change is mirrored into the watch
/// session so the report timer always snapshots the position the user sees.
pub struct PlayerScreen {
    video: Option<Video>,
    watch: Option<WatchSession>,
    position: f64,
    duration: f64,
    playing: bool,
    ended: bool,
}

impl Default for PlayerScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerScreen {
    pub fn new() -> Self {
        Self {
            video: None,
            watch: None,
            position: 0.0,
            duration: 0.0,
            playing: false,
            ended: false,
        }
    }

    /// Start a new viewing session, replacing any previous one.
    pub async fn open(
        &mut self,
        video: Video,
        reporter: Arc<dyn ProgressReporter>,
        cadence: Duration,
    ) {
        // The old session must be gone before the new timer starts.
        self.close();

        let mut watch = WatchSession::new(video.id, reporter, cadence);
        let duration = video.duration.unwrap_or(0.0).max(0.0);
        if duration > 0.0 {
            watch.resolve_duration(duration).await;
        }

        self.video = Some(video);
        self.watch = Some(watch);
        self.position = 0.0;
        self.duration = duration;
        self.playing = true;
        self.ended = false;
    }

    /// Drop the session and its report timer.
    pub fn close(&mut self) {
        self.watch = None;
        self.video = None;
        self.position = 0.0;
        self.duration = 0.0;
        self.playing = false;
        self.ended = false;
    }

    pub fn video_id(&self) -> Option<i64> {
        self.video.as_ref().map(|v| v.id)
    }

    /// Pause/resume, or replay from the start after the video ended.
    pub async fn toggle_playing(&mut self) {
        if self.watch.is_none() {
            return;
        }
        if self.ended {
            self.position = 0.0;
            self.ended = false;
            self.playing = true;
            if let Some(watch) = &self.watch {
                watch.set_position(0.0).await;
            }
        } else {
            self.playing = !self.playing;
        }
    }

    /// Move the playhead by `delta` seconds, clamped to the video bounds.
    pub async fn seek(&mut self, delta: f64) {
        let Some(watch) = &self.watch else {
            return;
        };

        let mut target = (self.position + delta).max(0.0);
        if self.duration > 0.0 {
            target = target.min(self.duration);
            if target < self.duration {
                self.ended = false;
            }
        }
        self.position = target;
        watch.set_position(target).await;
    }

    /// Advance the playhead by the elapsed wall-clock time.
    ///
    /// Reaching the end pauses playback and reports the final snapshot
    /// right away.
    pub async fn advance(&mut self, dt: f64) {
        if !self.playing {
            return;
        }
        let Some(watch) = &self.watch else {
            return;
        };

        self.position += dt.max(0.0);
        if self.duration > 0.0 && self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.ended = true;
            watch.mark_ended().await;
        } else {
            watch.set_position(self.position).await;
        }
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, _settings: &Settings) {
        let Some(video) = &self.video else {
            let empty = Paragraph::new("No video loaded. Press [q] to return to the library.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(" Player "));
            frame.render_widget(empty, area);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(5),    // Details
                Constraint::Length(3), // Progress
                Constraint::Length(1), // Status
                Constraint::Length(2), // Help
            ])
            .split(area);

        let title = Paragraph::new(video.title.as_str())
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Now Watching ")
                    .border_style(Style::default().fg(Color::Blue)),
            );
        frame.render_widget(title, chunks[0]);

        let mut lines: Vec<Line> = Vec::new();
        if let Some(uploader) = &video.uploader_name {
            lines.push(Line::from(vec![
                Span::styled("Uploaded by  ", Style::default().fg(Color::DarkGray)),
                Span::raw(uploader.as_str()),
            ]));
        }
        let scope = [
            video.subject.as_deref(),
            video.topic.as_deref(),
            video.level.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ");
        if !scope.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Covers       ", Style::default().fg(Color::DarkGray)),
                Span::raw(scope),
            ]));
        }
        lines.push(Line::from(vec![
            Span::styled("Views        ", Style::default().fg(Color::DarkGray)),
            Span::raw(video.views_count.to_string()),
        ]));
        if let Some(description) = &video.description {
            lines.push(Line::raw(""));
            lines.push(Line::raw(description.as_str()));
        }

        let details = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        frame.render_widget(details, chunks[1]);

        let (ratio, label) = if self.duration > 0.0 {
            (
                (self.position / self.duration).clamp(0.0, 1.0),
                format!(
                    "{} / {}",
                    format_clock(self.position),
                    format_clock(self.duration)
                ),
            )
        } else {
            (0.0, format!("{} / --:--", format_clock(self.position)))
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(ratio)
            .label(label);
        frame.render_widget(gauge, chunks[2]);

        let status = if self.duration <= 0.0 {
            Paragraph::new(" Duration unknown; progress reports start once the platform probes the file")
                .style(Style::default().fg(Color::Yellow))
        } else if self.ended {
            Paragraph::new(" Completed. Press [Space] to watch again")
                .style(Style::default().fg(Color::Green))
        } else if self.playing {
            Paragraph::new(" Playing").style(Style::default().fg(Color::Cyan))
        } else {
            Paragraph::new(" Paused").style(Style::default().fg(Color::DarkGray))
        };
        frame.render_widget(status, chunks[3]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Space ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Play/Pause  "),
            Span::styled(" ←/→ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Seek  "),
            Span::styled(" a ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Ask about this  "),
            Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[4]);
    }
}

fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
