use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, info, warn};

use crate::event::AppEvent;
use crate::lookup::{LookupFinished, LyricsDispatcher, SubmissionOutcome};
use crate::models::{Lyrics, SearchQuery};

use super::controller::{Resolution, SearchController, SearchState};
use super::forms::SearchField;
use super::helpers::{centered_rect, surface_error};
use super::history::SearchHistory;
use super::router::{Route, Router};
use super::screens::{lyrics_paragraph, LyricsScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Accent color, also used as the background while offline.
const ORANGE: Color = Color::Rgb(245, 130, 32);
const ERROR_TITLE: &str = "SORRY";
const ERROR_TEXT: &str = "No lyrics found";
const OFFLINE_BANNER: &str = "No internet Connection";

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Application state: the search controller plus everything it is wired to.
pub struct App {
    controller: SearchController,
    dispatcher: LyricsDispatcher,
    router: Router,
    connected: bool,
    lyrics_view: LyricsScreen,
    history: Option<SearchHistory>,
    status: Option<StatusMessage>,
}

impl App {
    /// `history` is `None` when previous searches are switched off.
    pub fn new(dispatcher: LyricsDispatcher, history: Option<SearchHistory>) -> Self {
        Self {
            controller: SearchController::default(),
            dispatcher,
            router: Router::default(),
            connected: false,
            lyrics_view: LyricsScreen::default(),
            history,
            status: None,
        }
    }

    /// Handle a key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.router.current() {
            Route::Search => self.handle_search_key(code),
            Route::SongLyrics => self.handle_lyrics_key(code),
        }
    }

    /// Handle a full key event, modifiers included. Ctrl+C quits and Ctrl+P
    /// recalls a previous search; other Ctrl chords are ignored so they never
    /// type into the form.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('p') => self.handle_ctrl_p(),
                code => debug!(?code, "ignoring unbound ctrl chord"),
            }
            return false;
        }
        self.handle_key(key.code)
    }

    /// Apply a message posted by a background thread.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Connectivity(connected) => {
                info!(connected, "connectivity snapshot updated");
                self.connected = connected;
            }
            AppEvent::LookupFinished(finished) => self.finish_lookup(finished),
        }
    }

    /// Ctrl+P: pull the next previous search into the form.
    pub(crate) fn handle_ctrl_p(&mut self) {
        if self.router.current() != Route::Search || self.controller.state() != SearchState::Idle
        {
            return;
        }
        let recalled = self
            .history
            .as_mut()
            .and_then(|history| history.recall_next())
            .cloned();
        if let Some(query) = recalled {
            self.controller.form_mut().fill(&query);
            self.set_status(format!("Recalled {query}."), StatusKind::Info);
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) -> bool {
        match self.controller.state() {
            SearchState::Idle => match code {
                KeyCode::Esc => return true,
                KeyCode::Enter => self.submit(),
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    self.controller.form_mut().toggle_field()
                }
                KeyCode::Backspace => {
                    self.controller.form_mut().backspace();
                    self.clear_status();
                }
                KeyCode::Char(ch) => {
                    if self.controller.form_mut().push_char(ch) {
                        self.clear_status();
                    }
                }
                _ => {}
            },
            SearchState::Submitting { .. } => {
                if code == KeyCode::Esc {
                    self.cancel_search();
                }
            }
            SearchState::ErrorShown => {
                if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.controller.dismiss_error();
                    self.clear_status();
                }
            }
        }
        false
    }

    fn handle_lyrics_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                self.router.back();
            }
            KeyCode::Up => self.lyrics_view.scroll_by(-1, self.dispatcher.store()),
            KeyCode::Down => self.lyrics_view.scroll_by(1, self.dispatcher.store()),
            KeyCode::PageUp => self.lyrics_view.page_up(self.dispatcher.store()),
            KeyCode::PageDown => self.lyrics_view.page_down(self.dispatcher.store()),
            KeyCode::Home => self.lyrics_view.reset(),
            _ => {}
        }
        false
    }

    fn submit(&mut self) {
        match self.controller.submit(self.connected, &mut self.dispatcher) {
            Ok(_) => self.set_status("Searching…", StatusKind::Info),
            Err(rejected) => {
                debug!(%rejected, "submit rejected");
                self.set_status(rejected.to_string(), StatusKind::Error);
            }
        }
    }

    fn cancel_search(&mut self) {
        if let Some(request) = self.controller.cancel() {
            self.dispatcher.abandon();
            info!(request = %request, "lookup cancelled");
            self.set_status("Search cancelled.", StatusKind::Info);
        }
    }

    fn finish_lookup(&mut self, finished: LookupFinished) {
        let LookupFinished { request, outcome } = finished;
        if !self.controller.awaits(request) {
            debug!(request = %request, "dropping result of abandoned lookup");
            return;
        }

        self.dispatcher.complete(&outcome);
        match self
            .controller
            .resolve(request, &outcome, &mut self.router)
        {
            Resolution::Navigated => {
                self.lyrics_view.reset();
                self.clear_status();
                if let SubmissionOutcome::Success(lyrics) = &outcome {
                    info!(request = %request, song = %lyrics.display_title(), "showing lyrics");
                    self.remember(lyrics);
                }
            }
            Resolution::ErrorShown => {
                if let SubmissionOutcome::Failure(err) = &outcome {
                    warn!(request = %request, error = %err, "lyrics lookup failed");
                }
                self.clear_status();
            }
            Resolution::Stale => {}
        }
    }

    fn remember(&mut self, lyrics: &Lyrics) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        let Some(query) = SearchQuery::new(&lyrics.artist, &lyrics.song) else {
            return;
        };
        if let Err(err) = history.record(&query) {
            let detail = format!("{err:#}");
            warn!(error = %detail, "failed to record search");
            self.set_status(surface_error(&err), StatusKind::Error);
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.router.current() {
            Route::Search => self.draw_search(frame, content_area),
            Route::SongLyrics => self.draw_lyrics(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if self.router.current() == Route::Search && self.controller.error_modal_visible() {
            self.draw_error_modal(frame, area);
        }
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let (chrome, accent) = if self.connected {
            (Style::default(), Style::default().fg(ORANGE))
        } else {
            (
                Style::default().bg(ORANGE).fg(Color::White),
                Style::default().fg(Color::White),
            )
        };
        frame.render_widget(Block::default().style(chrome), area);

        let banner_height = if self.connected { 0 } else { 1 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(banner_height),
                Constraint::Length(3),
                Constraint::Length(6),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        if !self.connected {
            let banner = Paragraph::new(Span::styled(
                OFFLINE_BANNER,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center);
            frame.render_widget(banner, chunks[0]);
        }

        let subtitle = if self.connected {
            "Your Lyrics ♫"
        } else {
            "Not Available"
        };
        let title = Paragraph::new(vec![
            Line::from(Span::styled("Search", accent.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(subtitle, accent)),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[1]);

        self.draw_form(frame, chunks[2]);
        self.draw_submit_button(frame, chunks[3]);

        if let Some(history) = &self.history {
            self.draw_previous_searches(frame, chunks[4], history);
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let form = self.controller.form();
        let block = Block::default().title(" Lyrics ").borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let error_line = |field: SearchField| match form.field_error(field) {
            Some(message) => Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(""),
        };

        let lines = vec![
            form.build_line(SearchField::Artist),
            error_line(SearchField::Artist),
            form.build_line(SearchField::Song),
            error_line(SearchField::Song),
        ];
        frame.render_widget(Paragraph::new(lines), inner);

        let keyboard_up = self.controller.state() == SearchState::Idle && form.keyboard_visible();
        if keyboard_up && inner.width > 0 && inner.height > 2 {
            let field = form.active();
            let prefix = format!("{}: ", field.label()).len();
            let row = match field {
                SearchField::Artist => 0,
                SearchField::Song => 2,
            };
            let last_column = usize::from(inner.right().saturating_sub(1));
            let cursor_x = (usize::from(inner.x) + prefix + form.value_width(field))
                .min(last_column) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_submit_button(&self, frame: &mut Frame, area: Rect) {
        let (label, style) = match self.controller.state() {
            SearchState::Submitting { .. } => ("[ Searching… ]", Style::default().fg(Color::Gray)),
            _ if self.controller.submit_enabled(self.connected) => (
                "[ Search ]",
                Style::default()
                    .fg(Color::White)
                    .bg(ORANGE)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => ("[ Search ]", Style::default().fg(Color::DarkGray)),
        };

        let button = Paragraph::new(Span::styled(label, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style));
        let width = (label.chars().count() as u16 + 4).min(area.width);
        let button_area = Rect {
            x: area.x + (area.width - width) / 2,
            width,
            ..area
        };
        frame.render_widget(button, button_area);
    }

    fn draw_previous_searches(&self, frame: &mut Frame, area: Rect, history: &SearchHistory) {
        if area.height == 0 || history.recent().is_empty() {
            return;
        }
        let lines: Vec<Line> = history
            .recent()
            .iter()
            .enumerate()
            .map(|(idx, query)| {
                if history.cursor() == Some(idx) {
                    Line::from(Span::styled(
                        format!("> {query}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {query}"))
                }
            })
            .collect();
        let block = Block::default()
            .title(" Previous searches ")
            .borders(Borders::TOP);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_lyrics(&self, frame: &mut Frame, area: Rect) {
        let store = self.dispatcher.store();
        let (title, body) = match &store.lyrics {
            Some(lyrics) => (lyrics.display_title(), lyrics.text.as_str()),
            None => ("Lyrics".to_string(), "No lyrics loaded."),
        };

        let block = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.lyrics_view.set_viewport(inner.width, inner.height);

        let paragraph = lyrics_paragraph(body).scroll((self.lyrics_view.scroll, 0));
        frame.render_widget(paragraph, inner);
    }

    fn draw_error_modal(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(Line::from(ERROR_TITLE).centered())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let lines = vec![
            Line::from(""),
            Line::from(ERROR_TEXT),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to dismiss.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (self.router.current(), self.controller.state()) {
            (Route::SongLyrics, _) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Scroll   "),
                Span::styled("[PgUp/PgDn]", key_style),
                Span::raw(" Page   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Back   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            (Route::Search, SearchState::Submitting { .. }) => Line::from(vec![
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel search"),
            ]),
            (Route::Search, SearchState::ErrorShown) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Dismiss"),
            ]),
            (Route::Search, SearchState::Idle) => {
                let mut spans = vec![
                    Span::styled("[Enter]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[Tab]", key_style),
                    Span::raw(" Switch field   "),
                ];
                if self.history.is_some() {
                    spans.push(Span::styled("[Ctrl+P]", key_style));
                    spans.push(Span::raw(" Previous   "));
                }
                spans.push(Span::styled("[Esc]", key_style));
                spans.push(Span::raw(" Quit"));
                Line::from(spans)
            }
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
