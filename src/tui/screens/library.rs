//! Library screen - browse and filter the video catalog

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::api::{Video, VideoPage};

/// Library screen state
pub struct LibraryScreen {
    videos: Vec<Video>,
    total: i64,
    state: ListState,
    search_mode: bool,
    search_query: String,
    filtered_indices: Vec<usize>,
    error: Option<String>,
}

impl Default for LibraryScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryScreen {
    pub fn new() -> Self {
        Self {
            videos: Vec::new(),
            total: 0,
            state: ListState::default(),
            search_mode: false,
            search_query: String::new(),
            filtered_indices: Vec::new(),
            error: None,
        }
    }

    /// Replace the catalog page shown in the list
    pub fn set_videos(&mut self, page: VideoPage) {
        self.videos = page.videos;
        self.total = page.total;
        self.error = None;
        self.search_query.clear();
        self.search_mode = false;
        self.filtered_indices = (0..self.videos.len()).collect();
        self.state = ListState::default();
        if !self.videos.is_empty() {
            self.state.select(Some(0));
        }
    }

    /// Show a load failure where the catalog would be
    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(5),    // List
                Constraint::Length(1), // Status
                Constraint::Length(2), // Help
            ])
            .split(area);

        // Search bar
        let search_style = if self.search_mode {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let search_text = if self.search_mode {
            format!("Search: {}█", self.search_query)
        } else if self.search_query.is_empty() {
            "Press [/] to filter by title or subject".to_string()
        } else {
            format!("Search: {}", self.search_query)
        };

        let search = Paragraph::new(search_text)
            .style(search_style)
            .block(Block::default().borders(Borders::ALL).title(" Search "));
        frame.render_widget(search, chunks[0]);

        // Video list
        let items: Vec<ListItem> = self
            .filtered_indices
            .iter()
            .map(|&i| {
                let video = &self.videos[i];
                let duration = video
                    .duration
                    .map(format_duration)
                    .unwrap_or_else(|| "??:??".to_string());

                let scope = match (video.subject.as_deref(), video.topic.as_deref()) {
                    (Some(subject), Some(topic)) => format!("{} / {}", subject, topic),
                    (Some(subject), None) => subject.to_string(),
                    (None, Some(topic)) => topic.to_string(),
                    (None, None) => String::new(),
                };

                ListItem::new(Line::from(vec![
                    Span::styled(pad(&video.title, 34), Style::default().fg(Color::White)),
                    Span::raw(" "),
                    Span::styled(pad(&scope, 24), Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(pad(&duration, 8), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(
                        format!("{} views", video.views_count),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Videos ({}) ", self.filtered_indices.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, chunks[1], &mut self.state);

        // Status line: an error outranks the catalog summary
        let status = match &self.error {
            Some(message) => {
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red))
            }
            None => Paragraph::new(format!(
                " {} of {} videos",
                self.filtered_indices.len(),
                self.total
            ))
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(status, chunks[2]);

        // Help bar
        let help = Paragraph::new(Line::from(vec![
            Span::styled(" ↑/↓ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Navigate  "),
            Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Watch  "),
            Span::styled(" / ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Filter  "),
            Span::styled(" s ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Study  "),
            Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Refresh  "),
            Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[3]);
    }

    pub fn next(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.filtered_indices.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.filtered_indices.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&Video> {
        self.state
            .selected()
            .and_then(|i| self.filtered_indices.get(i))
            .map(|&i| &self.videos[i])
    }

    pub fn searching(&self) -> bool {
        self.search_mode
    }

    pub fn start_search(&mut self) {
        self.search_mode = true;
    }

    pub fn stop_search(&mut self) {
        self.search_mode = false;
    }

    pub fn handle_search_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.apply_filter();
            }
            KeyCode::Enter => {
                self.search_mode = false;
            }
            _ => {}
        }
    }

    fn apply_filter(&mut self) {
        if self.search_query.is_empty() {
            self.filtered_indices = (0..self.videos.len()).collect();
        } else {
            let query = self.search_query.to_lowercase();
            self.filtered_indices = self
                .videos
                .iter()
                .enumerate()
                .filter(|(_, v)| {
                    v.title.to_lowercase().contains(&query)
                        || v.subject
                            .as_deref()
                            .is_some_and(|s| s.to_lowercase().contains(&query))
                        || v.topic
                            .as_deref()
                            .is_some_and(|t| t.to_lowercase().contains(&query))
                })
                .map(|(i, _)| i)
                .collect();
        }

        // Reset selection
        if !self.filtered_indices.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }
}

fn pad(s: &str, width: usize) -> String {
    let truncated: String = if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    };
    format!("{:<width$}", truncated, width = width)
}

fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    format!("{}:{:02}", minutes, seconds)
}
