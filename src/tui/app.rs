//! Main TUI application state and logic

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::Instant;

use crate::api::{ApiClient, ContextRef, Video, VideoQuery};
use crate::config::Settings;
use crate::playback::{HttpProgressReporter, ProgressReporter};
use crate::study::ChatGateway;
use crate::tui::screens::{LibraryScreen, PlayerScreen, StudyScreen};
use crate::tui::widgets::HelpPopup;
use crate::tui::Launch;

/// Current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Library,
    Player,
    Study,
}

/// Main application state
pub struct App {
    settings: Settings,
    api: Arc<ApiClient>,
    reporter: Arc<dyn ProgressReporter>,
    gateway: ChatGateway,
    current_screen: AppScreen,
    show_help: bool,

    // Screen states
    library: LibraryScreen,
    player: PlayerScreen,
    study: StudyScreen,

    // Wall clock driving the playback position
    last_frame: Instant,
}

impl App {
    /// Create a new app instance and run its initial fetches
    pub async fn new(settings: Settings, launch: Launch) -> Result<Self> {
        let api = Arc::new(ApiClient::from_settings(&settings)?);
        let reporter: Arc<dyn ProgressReporter> =
            Arc::new(HttpProgressReporter::new(Arc::clone(&api)));
        let gateway = ChatGateway::new(Arc::clone(&api));

        let mut app = Self {
            settings,
            api,
            reporter,
            gateway,
            current_screen: AppScreen::Library,
            show_help: false,
            library: LibraryScreen::new(),
            player: PlayerScreen::new(),
            study: StudyScreen::new(),
            last_frame: Instant::now(),
        };

        app.refresh_library().await;

        if let Launch::Player(id) = launch {
            app.open_video_by_id(id)
                .await
                .context("Failed to load video")?;
        }

        Ok(app)
    }

    /// Draw the current screen
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();

        match self.current_screen {
            AppScreen::Library => {
                self.library.draw(frame, area);
            }
            AppScreen::Player => {
                self.player.draw(frame, area, &self.settings);
            }
            AppScreen::Study => {
                self.study.draw(frame, area, &self.settings);
            }
        }

        // Draw help popup if active
        if self.show_help {
            HelpPopup::draw(frame, area, self.current_screen);
        }
    }

    /// Handle key input
    pub async fn handle_key(&mut self, key: KeyCode) -> Result<()> {
        if self.show_help {
            self.show_help = false;
            return Ok(());
        }

        match self.current_screen {
            AppScreen::Library => {
                self.handle_library_key(key).await?;
            }
            AppScreen::Player => {
                self.handle_player_key(key).await?;
            }
            AppScreen::Study => {
                self.handle_study_key(key)?;
            }
        }

        Ok(())
    }

    /// Handle library key input
    async fn handle_library_key(&mut self, key: KeyCode) -> Result<()> {
        if self.library.searching() {
            self.library.handle_search_key(key);
            return Ok(());
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                self.library.previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.library.next();
            }
            KeyCode::Enter => {
                if let Some(id) = self.library.selected().map(|v| v.id) {
                    if let Err(err) = self.open_video_by_id(id).await {
                        self.library.set_error(format!("Failed to open video: {err}"));
                    }
                }
            }
            KeyCode::Char('/') => {
                self.library.start_search();
            }
            KeyCode::Char('r') => {
                self.refresh_library().await;
            }
            KeyCode::Char('s') => {
                self.study.set_context(None);
                self.enter_study().await;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle player key input
    async fn handle_player_key(&mut self, key: KeyCode) -> Result<()> {
        let step = self.settings.tui.seek_step_secs as f64;
        match key {
            KeyCode::Char(' ') => {
                self.player.toggle_playing().await;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.player.seek(-step).await;
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.player.seek(step).await;
            }
            KeyCode::Char('a') => {
                // Ask about the video being watched.
                if let Some(id) = self.player.video_id() {
                    self.study.set_context(Some(ContextRef::Video(id)));
                    self.enter_study().await;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle study key input. Most keys belong to the input line.
    fn handle_study_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Enter => {
                self.study.submit(self.gateway.clone());
            }
            KeyCode::Up => {
                self.study.scroll_up();
            }
            KeyCode::Down => {
                self.study.scroll_down();
            }
            KeyCode::PageUp => {
                self.study.page_up();
            }
            KeyCode::PageDown => {
                self.study.page_down();
            }
            KeyCode::Tab => {
                self.study.set_context(None);
            }
            KeyCode::Backspace => {
                self.study.backspace();
            }
            KeyCode::Char(c) => {
                self.study.push_input(c);
            }
            _ => {}
        }
        Ok(())
    }

    /// Fetch the first library page
    async fn refresh_library(&mut self) {
        let query = VideoQuery {
            limit: self.settings.tui.page_size.max(1),
            ..VideoQuery::default()
        };
        match self.api.list_videos(&query).await {
            Ok(page) => self.library.set_videos(page),
            Err(err) => self.library.set_error(format!("Failed to load videos: {err}")),
        }
    }

    /// Fetch a video by id and open it in the player.
    ///
    /// Fetching (rather than reusing the listing row) registers the view
    /// with the platform and picks up a freshly probed duration.
    async fn open_video_by_id(&mut self, id: i64) -> crate::Result<()> {
        let video = self.api.get_video(id).await?;
        self.open_video(video).await;
        Ok(())
    }

    async fn open_video(&mut self, video: Video) {
        self.player
            .open(
                video,
                Arc::clone(&self.reporter),
                self.settings.report_interval(),
            )
            .await;
        self.switch_screen(AppScreen::Player);
    }

    async fn enter_study(&mut self) {
        self.study.ensure_history(&self.api).await;
        self.switch_screen(AppScreen::Study);
    }

    /// Switch to a different screen.
    ///
    /// Leaving the player releases its watch session, which stops the
    /// report timer for the previous video before anything new starts.
    fn switch_screen(&mut self, screen: AppScreen) {
        if self.current_screen == AppScreen::Player && screen != AppScreen::Player {
            self.player.close();
        }
        self.current_screen = screen;
    }

    /// Handle back navigation
    pub fn handle_back(&mut self) {
        self.switch_screen(AppScreen::Library);
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.current_screen == AppScreen::Library && !self.show_help
    }

    /// Whether a text box currently owns printable keys
    pub fn capturing_input(&self) -> bool {
        if self.show_help {
            return false;
        }
        match self.current_screen {
            AppScreen::Library => self.library.searching(),
            AppScreen::Study => true,
            AppScreen::Player => false,
        }
    }

    /// Let Esc close transient input surfaces before it means "back".
    /// Returns true when it consumed the key.
    pub fn dismiss_input(&mut self) -> bool {
        if self.show_help {
            self.show_help = false;
            return true;
        }
        if self.current_screen == AppScreen::Library && self.library.searching() {
            self.library.stop_search();
            return true;
        }
        false
    }

    /// Toggle help popup
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Update app state
    pub async fn update(&mut self) -> Result<()> {
        let dt = self.last_frame.elapsed().as_secs_f64();
        self.last_frame = Instant::now();

        if self.current_screen == AppScreen::Player {
            self.player.advance(dt).await;
        }

        // Answers resolve whether or not the study screen is visible.
        self.study.poll_answer().await;

        Ok(())
    }
}
