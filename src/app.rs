use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::alert::tone::{BellPlayer, LogPlayer, TonePlayer};
use crate::alert::{AlertKind, Alerter};
use crate::api::ApiClient;
use crate::config::DashboardConfig;
use crate::display::{DisplayController, DisplayMode};
use crate::events::{AppAction, PollOutcome};
use crate::scheduler::Ticker;
use crate::state::DisasterState;
use crate::ui::{EewView, QuakeView, TsunamiView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Disconnected,
    Connecting,
}

pub struct App {
    api_client: ApiClient,
    state: DisasterState,
    display: DisplayController,
    alerter: Alerter,
    poll: Ticker,
    quake_view: QuakeView,
    tsunami_view: TsunamiView,
    eew_view: EewView,
    connection_state: ConnectionState,
    last_update: Option<Instant>,
    should_quit: bool,
    error_message: Option<String>,
    show_help: bool,
    help_scroll: u16,
}

/// Map a key press to the action it requests.
pub fn key_action(key: KeyCode) -> Option<AppAction> {
    let action = match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => AppAction::Quit,
        KeyCode::Char('r') | KeyCode::Char('R') => AppAction::Refresh,
        KeyCode::Char('1') => AppAction::ShowEarthquake,
        KeyCode::Char('2') => AppAction::ShowTsunami,
        KeyCode::Tab | KeyCode::Left | KeyCode::Right => AppAction::CycleMode,
        KeyCode::Char('a') | KeyCode::Char('A') => AppAction::ToggleAuto,
        KeyCode::Char('m') | KeyCode::Char('M') => AppAction::ToggleMute,
        KeyCode::Char('s') | KeyCode::Char('S') => AppAction::SoundCheck,
        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => AppAction::ToggleHelp,
        KeyCode::Esc => AppAction::CloseHelp,
        KeyCode::Up => AppAction::ScrollUp,
        KeyCode::Down => AppAction::ScrollDown,
        _ => return None,
    };
    Some(action)
}

impl App {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let player: Box<dyn TonePlayer> = if config.bell {
            Box::new(BellPlayer::stdout())
        } else {
            Box::new(LogPlayer)
        };
        Self::with_player(config, player)
    }

    /// Build the app around a specific tone backend.
    pub fn with_player(config: DashboardConfig, player: Box<dyn TonePlayer>) -> Result<Self> {
        let api_client = ApiClient::new(config.api_url.clone(), config.request_timeout_secs)?;
        let now = Instant::now();

        Ok(Self {
            api_client,
            state: DisasterState::new(config.eew_window_secs),
            display: DisplayController::new(config.rotate_interval, now),
            alerter: Alerter::new(player, config.alert_threshold, config.muted),
            poll: Ticker::new(config.poll_interval),
            quake_view: QuakeView::new(),
            tsunami_view: TsunamiView::new(),
            eew_view: EewView::new(),
            connection_state: ConnectionState::Connecting,
            last_update: None,
            should_quit: false,
            error_message: None,
            show_help: false,
            help_scroll: 0,
        })
    }

    pub fn state(&self) -> &DisasterState {
        &self.state
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display.mode()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self, terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>) -> Result<()> {
        self.poll_feeds().await;
        self.poll.start(Instant::now());

        loop {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = key_action(key.code) {
                            self.handle_action(action).await;
                        }
                    }
                }
            }

            if self.poll.fire(Instant::now()) {
                self.poll_feeds().await;
            }

            self.on_tick(Utc::now(), Instant::now());

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    async fn handle_action(&mut self, action: AppAction) {
        if action == AppAction::Refresh {
            self.poll_feeds().await;
            self.poll.start(Instant::now());
        } else {
            self.apply_action(action, Instant::now());
        }
    }

    /// Every action except `Refresh`, which needs the network.
    pub fn apply_action(&mut self, action: AppAction, now: Instant) {
        match action {
            AppAction::Quit => self.should_quit = true,
            AppAction::Refresh => {}
            AppAction::ShowEarthquake => {
                self.display.select(DisplayMode::Earthquake);
            }
            AppAction::ShowTsunami => {
                self.display.select(DisplayMode::Tsunami);
            }
            AppAction::CycleMode => {
                self.display.cycle();
            }
            AppAction::ToggleAuto => {
                self.display.toggle_auto(now);
            }
            AppAction::ToggleMute => {
                let muted = self.alerter.toggle_mute();
                debug!(muted, "mute toggled");
            }
            AppAction::SoundCheck => self.alerter.sound(AlertKind::Earthquake),
            AppAction::ToggleHelp => {
                self.show_help = !self.show_help;
                self.help_scroll = 0;
            }
            AppAction::CloseHelp => {
                self.show_help = false;
                self.help_scroll = 0;
            }
            AppAction::ScrollUp => {
                if self.show_help {
                    self.help_scroll = self.help_scroll.saturating_sub(1);
                } else {
                    self.tsunami_view.select_previous();
                }
            }
            AppAction::ScrollDown => {
                if self.show_help {
                    self.help_scroll = self.help_scroll.saturating_add(1);
                } else {
                    let len = self.state.tsunami().map_or(0, |t| t.areas.len());
                    self.tsunami_view.select_next(len);
                }
            }
        }
    }

    async fn poll_feeds(&mut self) {
        self.connection_state = ConnectionState::Connecting;

        let (quake, tsunami, eew) = tokio::join!(
            self.api_client.get_latest_quake(),
            self.api_client.get_latest_tsunami(),
            self.api_client.get_latest_eew(),
        );

        self.apply_poll(PollOutcome { quake, tsunami, eew }, Utc::now(), Instant::now());
    }

    /// Fold one poll into the state. Failed feeds keep their previous record.
    pub fn apply_poll(&mut self, outcome: PollOutcome, now_utc: DateTime<Utc>, now: Instant) {
        let mut failures = Vec::new();
        let mut changed = false;

        if let Some(record) = take_feed("earthquake", outcome.quake, &mut failures) {
            changed |= self.state.apply_quake(record);
        }
        if let Some(record) = take_feed("tsunami", outcome.tsunami, &mut failures) {
            changed |= self.state.apply_tsunami(record);
        }
        if let Some(record) = take_feed("eew", outcome.eew, &mut failures) {
            changed |= self.state.apply_eew(record, now_utc);
        }

        if failures.len() == 3 {
            self.connection_state = ConnectionState::Disconnected;
        } else {
            self.connection_state = ConnectionState::Connected;
            self.last_update = Some(now);
        }
        self.error_message = if failures.is_empty() {
            None
        } else {
            Some(failures.join("; "))
        };

        self.after_change(changed, now_utc, now);
    }

    /// Time-driven housekeeping: EEW expiry and mode rotation.
    pub fn on_tick(&mut self, now_utc: DateTime<Utc>, now: Instant) {
        self.after_change(false, now_utc, now);
        if self.display.tick(now) {
            debug!(mode = self.display.mode().title(), "display rotated");
        }
    }

    fn after_change(&mut self, changed: bool, now_utc: DateTime<Utc>, now: Instant) {
        let expired = self.state.expire_eew(now_utc);
        self.display.sync(self.state.has_eew(), now);
        if changed || expired {
            self.alerter.evaluate(&self.state);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Status bar
                Constraint::Length(3), // Mode tabs
                Constraint::Min(0),    // Main panel
                Constraint::Length(3), // Footer
            ])
            .split(frame.size());

        self.render_status_bar(frame, chunks[0]);
        self.render_tabs(frame, chunks[1]);

        match self.display.mode() {
            DisplayMode::Earthquake => self.quake_view.render(frame, chunks[2], self.state.quake()),
            DisplayMode::Tsunami => self.tsunami_view.render(frame, chunks[2], self.state.tsunami()),
            DisplayMode::Eew => self.eew_view.render(frame, chunks[2], self.state.eew(), Utc::now()),
        }

        self.render_footer(frame, chunks[3]);

        if self.show_help {
            self.render_help(frame);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let now = Instant::now();

        let connection_indicator = match self.connection_state {
            ConnectionState::Connected => Span::styled("● Live", Style::default().fg(Color::Green)),
            ConnectionState::Disconnected => Span::styled("● Offline", Style::default().fg(Color::Red)),
            ConnectionState::Connecting => Span::styled("● Connecting...", Style::default().fg(Color::Yellow)),
        };

        let update_time = match self.last_update {
            Some(last) => format!("Update: {}s", last.elapsed().as_secs()),
            None => "Update: --".to_string(),
        };

        let next_refresh = match self.poll.remaining(now) {
            Some(left) => format!("Next: {}s", left.as_secs()),
            None => "Next: --".to_string(),
        };

        let rotation = if self.display.is_locked() {
            Span::styled("Rotate: LOCKED", Style::default().fg(Color::Red))
        } else if let Some(left) = self.display.rotation_remaining(now) {
            Span::raw(format!("Rotate: {}s", left.as_secs()))
        } else {
            Span::styled("Rotate: OFF", Style::default().fg(Color::DarkGray))
        };

        let sound = if self.alerter.is_muted() {
            Span::styled("Sound: MUTED", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled("Sound: ON", Style::default().fg(Color::Green))
        };

        let line = Line::from(vec![
            connection_indicator,
            Span::raw("  │  "),
            Span::raw(update_time),
            Span::raw("  │  "),
            Span::raw(next_refresh),
            Span::raw("  │  "),
            rotation,
            Span::raw("  │  "),
            sound,
        ]);

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" SHINDO "));
        frame.render_widget(paragraph, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let modes = [DisplayMode::Earthquake, DisplayMode::Tsunami, DisplayMode::Eew];
        let selected = modes.iter().position(|m| *m == self.display.mode()).unwrap_or(0);

        let highlight = if self.display.is_locked() {
            Style::default().fg(Color::White).bg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
        };

        let tabs = Tabs::new(modes.iter().map(|m| format!(" {} ", m.title())).collect::<Vec<_>>())
            .select(selected)
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray))
            .highlight_style(highlight)
            .divider("│");

        frame.render_widget(tabs, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer_text = if let Some(ref error) = self.error_message {
            Line::from(vec![
                Span::styled("ERROR: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
                Span::styled(error.as_str(), Style::default().fg(Color::Red)),
            ])
        } else {
            Line::from(vec![
                Span::styled("[r] ", Style::default().fg(Color::Yellow)),
                Span::raw("Refresh  "),
                Span::styled("[1/2/Tab] ", Style::default().fg(Color::Yellow)),
                Span::raw("Mode  "),
                Span::styled("[a] ", Style::default().fg(Color::Yellow)),
                Span::raw("Auto  "),
                Span::styled("[m] ", Style::default().fg(Color::Yellow)),
                Span::raw("Mute  "),
                Span::styled("[h/?] ", Style::default().fg(Color::Yellow)),
                Span::raw("Help  "),
                Span::styled("[q] ", Style::default().fg(Color::Yellow)),
                Span::raw("Quit"),
            ])
        };

        let paragraph = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_help(&self, frame: &mut Frame) {
        let popup_area = centered_popup(frame.size(), 80, 90);
        let popup_width = popup_area.width;

        frame.render_widget(Clear, popup_area);

        let rule = || {
            Line::from(Span::styled(
                "─".repeat((popup_width as usize).saturating_sub(4)),
                Style::default().fg(Color::DarkGray),
            ))
        };
        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        };
        let key = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {:<10}", keys), Style::default().fg(Color::Cyan)),
                Span::raw(what),
            ])
        };

        let help_text = vec![
            Line::from(Span::styled(
                "HELP",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            heading("KEYBOARD SHORTCUTS"),
            Line::from(""),
            key("[r]", "Refresh all feeds now"),
            key("[1] [2]", "Show earthquake / tsunami (stops auto-rotation)"),
            key("[Tab] [←→]", "Switch between earthquake and tsunami"),
            key("[a]", "Toggle auto-rotation"),
            key("[m]", "Mute or unmute alert sounds"),
            key("[s]", "Play the earthquake chime"),
            key("[↑↓]", "Scroll tsunami areas / this help"),
            key("[q]", "Quit"),
            key("[ESC]", "Close help"),
            Line::from(""),
            rule(),
            Line::from(""),
            heading("DISPLAY MODES"),
            Line::from(""),
            Line::from("  EARTHQUAKE and TSUNAMI alternate automatically until you pick one."),
            Line::from("  An active early warning takes over the panel and locks switching"),
            Line::from("  until the warning is cancelled or is more than a few minutes old."),
            Line::from(""),
            rule(),
            Line::from(""),
            heading("ALERT SOUNDS"),
            Line::from(""),
            Line::from("  Early warning first, then earthquakes of intensity 3 or more,"),
            Line::from("  then active tsunami forecasts. Each event sounds only once."),
            Line::from(""),
            rule(),
            Line::from(""),
            heading("TSUNAMI GRADES"),
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled("MAJOR WARNING", Style::default().fg(Color::Magenta)),
                Span::raw(" > "),
                Span::styled("WARNING", Style::default().fg(Color::Red)),
                Span::raw(" > "),
                Span::styled("ADVISORY", Style::default().fg(Color::Yellow)),
                Span::raw(" > "),
                Span::styled("INFO", Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(Span::styled("Press [ESC] or [h] to close", Style::default().fg(Color::DarkGray))),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
                    .title(" HELP (Use ↑↓ to scroll) ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            )
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false })
            .scroll((self.help_scroll, 0));

        frame.render_widget(paragraph, popup_area);
    }
}

/// Unwrap one feed result, logging and recording failures.
fn take_feed<T>(feed: &str, result: Result<Option<T>, Error>, failures: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(record) => record,
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(feed, error = %message, "feed update skipped");
            failures.push(format!("{}: {}", feed, message));
            None
        }
    }
}

/// Rect of `width_pct` by `height_pct` of `area`, centered in it.
fn centered_popup(area: Rect, width_pct: u16, height_pct: u16) -> Rect {
    // u32 so wide terminals don't overflow the multiply
    let scale = |len: u16, pct: u16| (u32::from(len) * u32::from(pct.min(100)) / 100) as u16;
    let width = scale(area.width, width_pct);
    let height = scale(area.height, height_pct);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action(KeyCode::Char('q')), Some(AppAction::Quit));
        assert_eq!(key_action(KeyCode::Char('2')), Some(AppAction::ShowTsunami));
        assert_eq!(key_action(KeyCode::Tab), Some(AppAction::CycleMode));
        assert_eq!(key_action(KeyCode::Char('?')), Some(AppAction::ToggleHelp));
        assert_eq!(key_action(KeyCode::Char('z')), None);
    }

    #[test]
    fn help_popup_fits_wide_terminals() {
        let wide = Rect {
            x: 0,
            y: 0,
            width: u16::MAX,
            height: 1000,
        };
        let popup = centered_popup(wide, 80, 90);
        assert_eq!(popup.width, 52428);
        assert_eq!(popup.height, 900);
        assert_eq!(popup.x, (u16::MAX - 52428) / 2);
        assert_eq!(popup.y, 50);

        let popup = centered_popup(Rect::new(0, 0, 100, 40), 80, 90);
        assert_eq!(popup, Rect::new(10, 2, 80, 36));
    }
}
