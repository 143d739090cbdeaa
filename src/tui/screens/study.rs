//! Study screen - chat transcript and question input

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::api::{ApiClient, ContextRef};
use crate::config::Settings;
use crate::study::{ChatGateway, Role, Transcript};

/// Study screen state
pub struct StudyScreen {
    transcript: Transcript,
    history_loaded: bool,
    load_error: Option<String>,
    context: Option<ContextRef>,
    input: String,
    /// Answer being fetched for the latest question, if any
    pending: Option<JoinHandle<String>>,
    /// Lines scrolled up from the transcript's end; 0 follows new turns
    scroll: usize,
    /// Viewport height from the last draw, used as the page-scroll step
    page: usize,
}

impl Default for StudyScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl StudyScreen {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            history_loaded: false,
            load_error: None,
            context: None,
            input: String::new(),
            pending: None,
            scroll: 0,
            page: 10,
        }
    }

    /// Scope the next questions to one material, or to everything
    pub fn set_context(&mut self, context: Option<ContextRef>) {
        self.context = context;
    }

    /// Load the persisted conversation once.
    ///
    /// A failed load is shown in place of the history and retried the next
    /// time the screen is entered. Turns created in this session are only
    /// replaced once a load succeeds, and the platform has those already.
    pub async fn ensure_history(&mut self, api: &ApiClient) {
        if self.history_loaded {
            return;
        }
        match Transcript::load(api).await {
            Ok(transcript) => {
                self.transcript = transcript;
                self.history_loaded = true;
                self.load_error = None;
                self.scroll = 0;
            }
            Err(err) => {
                warn!("failed to load chat history: {err}");
                self.load_error = Some(format!("Failed to load chat history: {err}"));
            }
        }
    }

    /// Send the typed question, if there is one and nothing is in flight.
    pub fn submit(&mut self, gateway: ChatGateway) {
        if self.pending.is_some() {
            return;
        }
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return;
        }

        self.transcript.append_user_turn(question.clone(), self.context);
        self.input.clear();
        self.scroll = 0;

        let context = self.context;
        self.pending = Some(tokio::spawn(async move {
            gateway.ask(&question, context).await
        }));
    }

    /// Fold a finished answer into the transcript.
    ///
    /// Called every frame; does nothing while the answer is still in
    /// flight, so the screen never blocks on the platform.
    pub async fn poll_answer(&mut self) {
        let done = self.pending.as_ref().is_some_and(|task| task.is_finished());
        if !done {
            return;
        }
        if let Some(task) = self.pending.take() {
            match task.await {
                Ok(answer) => {
                    self.transcript.append_assistant_turn(answer);
                }
                Err(err) => {
                    warn!("study question task failed: {err}");
                    self.transcript.append_error_turn();
                }
            }
            self.scroll = 0;
        }
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn page_up(&mut self) {
        self.scroll = self.scroll.saturating_add(self.page);
    }

    pub fn page_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(self.page);
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, settings: &Settings) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Transcript
                Constraint::Length(3), // Input
                Constraint::Length(2), // Help
            ])
            .split(area);

        let wrap_width = chunks[0].width.saturating_sub(4) as usize;
        let lines = self.transcript_lines(wrap_width, settings.tui.show_context_tags);

        // Stick to the newest turn unless the user scrolled away from it.
        let view_height = chunks[0].height.saturating_sub(2) as usize;
        self.page = view_height.max(1);
        let max_offset = lines.len().saturating_sub(view_height);
        self.scroll = self.scroll.min(max_offset);
        let from_top = (max_offset - self.scroll).min(u16::MAX as usize) as u16;

        let transcript = Paragraph::new(lines).scroll((from_top, 0)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Study Chat ")
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(transcript, chunks[0]);

        let input_title = match &self.context {
            Some(context) => format!(" Ask about {} ", context),
            None => " Ask (all materials) ".to_string(),
        };
        let input = Paragraph::new(format!("{}█", self.input))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(input_title));
        frame.render_widget(input, chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Send  "),
            Span::styled(" Tab ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" All materials  "),
            Span::styled(" ↑/↓ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Scroll  "),
            Span::styled(" Esc ", Style::default().fg(Color::Black).bg(Color::Cyan)),
            Span::raw(" Back"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[2]);
    }

    fn transcript_lines(&self, width: usize, show_tags: bool) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = Vec::new();

        if let Some(error) = &self.load_error {
            lines.push(Line::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ));
            lines.push(Line::raw(""));
        }

        if self.transcript.is_empty() && self.load_error.is_none() {
            lines.push(Line::styled(
                "Ask anything about your videos and documents.",
                Style::default().fg(Color::DarkGray),
            ));
        }

        for turn in self.transcript.turns() {
            let (speaker, style) = match turn.role {
                Role::User => ("You", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
                Role::Assistant => (
                    "Assistant",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
            };
            let mut header = vec![Span::styled(speaker, style)];
            if show_tags {
                if let Some(context) = &turn.context {
                    header.push(Span::styled(
                        format!("  [{}]", context),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            lines.push(Line::from(header));

            for row in wrap_text(&turn.text, width) {
                lines.push(Line::raw(format!("  {}", row)));
            }
            lines.push(Line::raw(""));
        }

        if self.pending.is_some() {
            lines.push(Line::styled(
                "Assistant is thinking...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }

        lines
    }
}

/// Word-wrap `text` to `width` columns, hard-splitting overlong words.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let mut word = word.to_string();
            loop {
                let join = if current.is_empty() { 0 } else { 1 };
                let room = width.saturating_sub(current.chars().count() + join);
                if word.chars().count() <= room {
                    if !current.is_empty() {
                        current.push(' ');
                    }
                    current.push_str(&word);
                    break;
                }
                if current.is_empty() {
                    let head: String = word.chars().take(width).collect();
                    word = word.chars().skip(width).collect();
                    lines.push(head);
                } else {
                    lines.push(std::mem::take(&mut current));
                }
            }
        }
        lines.push(std::mem::take(&mut current));
    }

    // The trailing split always leaves one line, even for empty text.
    while lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}
