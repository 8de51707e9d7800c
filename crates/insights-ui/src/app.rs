//! Application state and TUI event loop for the campaign dashboard.
//!
//! [`App`] owns the theme, the [`FilterSession`] and the cursor state of the
//! filter panel. Key presses mutate the session; every redraw asks it for the
//! (possibly memoised) snapshot.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use insights_core::error::{InsightsError, Result};
use insights_runtime::filter_session::FilterSession;

use crate::dashboard_view::{self, DashboardViewData, FilterFocus};
use crate::themes::Theme;

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub session: FilterSession,
    pub focus: FilterFocus,
    pub channel_cursor: usize,
    pub campaign_cursor: usize,
    /// Whether the campaign detail table is visible.
    pub show_table: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, session: FilterSession) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            session,
            focus: FilterFocus::Channels,
            channel_cursor: 0,
            campaign_cursor: 0,
            show_table: true,
            should_quit: false,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the interactive dashboard until `q`, `Q` or `Ctrl+C`.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout so the loop keeps
    /// redrawing without busy-waiting.
    pub async fn run_dashboard(mut self) -> Result<()> {
        enable_raw_mode().map_err(terminal_error)?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(terminal_error)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(terminal_error)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode().map_err(terminal_error)?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(terminal_error)?;
        terminal.show_cursor().map_err(terminal_error)?;

        result.map_err(terminal_error)
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Apply one key press to the application state.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('c') => self.cycle_channel_cursor(),
            KeyCode::Char('k') => self.cycle_campaign_cursor(),
            KeyCode::Char(' ') => {
                if let Some(channel) = self.session.channel_options().get(self.channel_cursor) {
                    let channel = channel.clone();
                    tracing::debug!(%channel, "toggling channel");
                    self.session.toggle_channel(&channel);
                }
            }
            KeyCode::Enter => {
                if let Some(campaign) = self.session.campaign_options().get(self.campaign_cursor) {
                    let campaign = campaign.clone();
                    tracing::debug!(%campaign, "toggling campaign");
                    self.session.toggle_campaign(&campaign);
                }
            }
            KeyCode::Char('a') => self.session.select_all(),
            KeyCode::Char('x') => self.session.clear(),
            KeyCode::Char('t') => self.show_table = !self.show_table,
            _ => {}
        }
    }

    /// First press focuses the channel list; later presses advance and wrap.
    fn cycle_channel_cursor(&mut self) {
        if self.focus != FilterFocus::Channels {
            self.focus = FilterFocus::Channels;
            return;
        }
        let len = self.session.channel_options().len();
        if len > 0 {
            self.channel_cursor = (self.channel_cursor + 1) % len;
        }
    }

    fn cycle_campaign_cursor(&mut self) {
        if self.focus != FilterFocus::Campaigns {
            self.focus = FilterFocus::Campaigns;
            return;
        }
        let len = self.session.campaign_options().len();
        if len > 0 {
            self.campaign_cursor = (self.campaign_cursor + 1) % len;
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        self.session.snapshot();
        let Some(snapshot) = self.session.cached_snapshot() else {
            return;
        };
        let channels = self
            .session
            .channel_options()
            .iter()
            .map(|c| (c.as_str(), self.session.is_channel_selected(c)))
            .collect();
        let campaigns = self
            .session
            .campaign_options()
            .iter()
            .map(|c| (c.as_str(), self.session.is_campaign_selected(c)))
            .collect();

        let data = DashboardViewData {
            snapshot,
            channels,
            campaigns,
            channel_cursor: self.channel_cursor,
            campaign_cursor: self.campaign_cursor,
            focus: self.focus,
            show_table: self.show_table,
        };
        dashboard_view::render_dashboard(frame, &data, &self.theme);
    }
}

/// Terminal setup, drawing and restore failures all surface as
/// [`InsightsError::Terminal`].
fn terminal_error(err: io::Error) -> InsightsError {
    InsightsError::Terminal(err.to_string())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
