//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into coordinator calls.
//!
//! This is the only module that knows about ratatui and crossterm. It never
//! writes presentation state itself: it subscribes to the coordinator's
//! slots, copies each new snapshot into `TuiState`, and renders from there.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (a fetch in flight, or an error toast showing): draws every
//!   ~80ms so the spinner moves and the toast expires on time.
//! - **Idle**: sleeps up to 500ms, only redraws on input, terminal resize, or
//!   a newly published slot.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::fmt;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::sync::watch;

use crate::catalog::{CatalogPayload, DetailRecord, ErrorInfo, OmdbRepository, RepositoryError};
use crate::core::config::{ConfigError, ResolvedConfig};
use crate::core::coordinator::{Coordinator, Slot};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    DetailEvent, DetailViewState, ResultEvent, ResultListState, SearchBox, SearchEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// How long an error toast stays in the title bar.
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Which component receives keystrokes when no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Results,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Search => Focus::Results,
            Focus::Results => Focus::Search,
        }
    }
}

/// A transient error notice.
pub struct Toast {
    pub message: String,
    pub raised_at: Instant,
}

/// TUI-specific presentation state
pub struct TuiState {
    // Persistent component states
    pub search_box: SearchBox,
    pub results: ResultListState,
    // Detail overlay (None = hidden)
    pub detail: Option<DetailViewState>,
    pub focus: Focus,
    // Latest slot snapshots from the coordinator
    pub movies: Slot<CatalogPayload>,
    pub details: Slot<DetailRecord>,
    pub toast: Option<Toast>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            search_box: SearchBox::new(),
            results: ResultListState::new(),
            detail: None,
            focus: Focus::Search, // User expects to type immediately
            movies: Slot::default(),
            details: Slot::default(),
            toast: None,
        }
    }

    /// Takes a new movies snapshot. The rendered list only changes when a
    /// result lands successfully; while loading or after a failure the
    /// previous hits stay on screen.
    pub fn apply_movies(&mut self, slot: Slot<CatalogPayload>) {
        if let Some(payload) = slot.value() {
            self.results.sync(&payload.items);
        }
        self.movies = slot;
    }

    pub fn raise_toast(&mut self, error: &ErrorInfo, now: Instant) {
        self.toast = Some(Toast {
            message: error.message.clone(),
            raised_at: now,
        });
    }

    /// Drops the toast once it has been up long enough. Returns whether it was dropped.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if let Some(toast) = &self.toast
            && now.duration_since(toast.raised_at) >= TOAST_DURATION
        {
            self.toast = None;
            return true;
        }
        false
    }

    fn sync_focus(&mut self) {
        let overlay_open = self.detail.is_some();
        self.search_box.focused = !overlay_open && self.focus == Focus::Search;
        self.results.focused = !overlay_open && self.focus == Focus::Results;
    }

    fn is_animating(&self) -> bool {
        self.movies.is_loading()
            || (self.detail.is_some() && self.details.is_loading())
            || self.toast.is_some()
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Receivers for the coordinator's slots.
struct Subscriptions {
    movies: watch::Receiver<Slot<CatalogPayload>>,
    details: watch::Receiver<Slot<DetailRecord>>,
    errors: watch::Receiver<Option<ErrorInfo>>,
}

impl Subscriptions {
    fn new(coordinator: &Coordinator) -> Self {
        Self {
            movies: coordinator.subscribe_movies(),
            details: coordinator.subscribe_details(),
            errors: coordinator.subscribe_errors(),
        }
    }

    /// Copies every slot published since the last call into `tui`.
    /// Returns whether anything changed.
    fn absorb(&mut self, tui: &mut TuiState) -> bool {
        let mut changed = false;

        if self.movies.has_changed().unwrap_or(false) {
            let slot = self.movies.borrow_and_update().clone();
            debug!("Movies slot #{} received", slot.generation);
            tui.apply_movies(slot);
            changed = true;
        }

        if self.details.has_changed().unwrap_or(false) {
            tui.details = self.details.borrow_and_update().clone();
            changed = true;
        }

        if self.errors.has_changed().unwrap_or(false) {
            let latest = self.errors.borrow_and_update().clone();
            if let Some(error) = latest {
                warn!("Showing error: {}", error);
                tui.raise_toast(&error, Instant::now());
            }
            changed = true;
        }

        changed
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol: harmlessly ignored by terminals without it
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

// ============================================================================
// Error Type
// ============================================================================

/// Why the TUI could not start or stopped abnormally.
#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Repository(RepositoryError),
    Io(std::io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Config(e) => write!(f, "{e}"),
            RunError::Repository(e) => write!(f, "could not set up OMDb client: {e}"),
            RunError::Io(e) => write!(f, "terminal error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Config(e) => Some(e),
            RunError::Repository(e) => Some(e),
            RunError::Io(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        RunError::Config(e)
    }
}

impl From<RepositoryError> for RunError {
    fn from(e: RepositoryError) -> Self {
        RunError::Repository(e)
    }
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Io(e)
    }
}

// ============================================================================
// Event Loop
// ============================================================================

/// Runs the browser until Ctrl+C. Must be called from within a tokio runtime.
///
/// `initial_query`, when given, is typed into the search box and searched
/// right away.
pub fn run(config: ResolvedConfig, initial_query: Option<String>) -> Result<(), RunError> {
    let api_key = config.require_api_key()?.to_string();
    let repository = OmdbRepository::new(Some(config.base_url.clone()), config.timeout)?;
    info!(
        "Using OMDb at {} (timeout {:?})",
        config.base_url, config.timeout
    );

    let mut coordinator = Coordinator::new(Arc::new(repository), api_key);
    let mut subscriptions = Subscriptions::new(&coordinator);
    let mut tui = TuiState::new();

    if let Some(query) = initial_query {
        tui.search_box.set_text(&query);
        coordinator.fetch_movies(&query);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Could not enable terminal modes: {}", e);
            None
        }
    };

    let result = event_loop(&mut terminal, &mut tui, &mut coordinator, &mut subscriptions);

    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    tui: &mut TuiState,
    coordinator: &mut Coordinator,
    subscriptions: &mut Subscriptions,
) -> Result<(), RunError> {
    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        if subscriptions.absorb(tui) {
            needs_redraw = true;
        }
        if tui.expire_toast(Instant::now()) {
            needs_redraw = true;
        }

        let animating = tui.is_animating();
        if animating {
            needs_redraw = true;
        }

        // Only draw when something changed
        if needs_redraw {
            tui.sync_focus();
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(tui, coordinator, event) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            info!("Quit requested");
            return Ok(());
        }
    }
}

/// Routes one input event. Returns true when the app should quit.
fn handle_event(tui: &mut TuiState, coordinator: &mut Coordinator, event: TuiEvent) -> bool {
    match event {
        // Ctrl+C always quits regardless of focus
        TuiEvent::ForceQuit => return true,
        // Resize just needs a redraw (already flagged)
        TuiEvent::Resize => return false,
        _ => {}
    }

    // When the overlay is open, route all events to it
    if let Some(detail) = tui.detail.as_mut() {
        if let Some(DetailEvent::Dismiss) = detail.handle_event(&event) {
            tui.detail = None;
        }
        return false;
    }

    // Mouse wheel always scrolls the results
    if matches!(event, TuiEvent::ScrollUp | TuiEvent::ScrollDown) {
        tui.results.handle_event(&event);
        return false;
    }

    if matches!(event, TuiEvent::FocusNext) {
        tui.focus = tui.focus.next();
        return false;
    }

    match tui.focus {
        Focus::Search => match event {
            TuiEvent::CursorDown | TuiEvent::PageDown if !tui.results.items.is_empty() => {
                tui.focus = Focus::Results;
            }
            _ => {
                if let Some(SearchEvent::Submit(query)) = tui.search_box.handle_event(&event)
                    && !coordinator.fetch_movies(&query)
                {
                    debug!("Blank query submitted; nothing to search");
                }
            }
        },
        Focus::Results => match event {
            // Typing jumps back to the search box and keeps the keystroke
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace => {
                tui.focus = Focus::Search;
                tui.search_box.handle_event(&event);
            }
            TuiEvent::Escape => tui.focus = Focus::Search,
            TuiEvent::CursorUp if tui.results.list_state.selected().unwrap_or(0) == 0 => {
                tui.focus = Focus::Search;
            }
            _ => {
                if let Some(ResultEvent::Open(id)) = tui.results.handle_event(&event) {
                    coordinator.fetch_details(&id);
                    tui.details = coordinator.details();
                    tui.detail = Some(DetailViewState::new(id));
                }
            }
        },
    }
    false
}
