//! # TitleBar Component
//!
//! Top status bar: app name, search status, and a transient error toast.
//!
//! Stateless: it receives all data as props and renders what it's given.
//!
//! 1. **Toast**: `"Reel | 3 of 41 results          ✗ Invalid API key!"`
//! 2. **Status**: `"Reel | ⠙ Searching…"`
//! 3. **Idle**: `"Reel"`

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::catalog::CatalogPayload;
use crate::core::coordinator::Slot;
use crate::tui::component::Component;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Top status bar.
pub struct TitleBar {
    /// Status text (e.g., "Searching…", "10 of 41 results")
    pub status_message: String,
    /// Latest failure, shown right-aligned while it is fresh
    pub toast: Option<String>,
}

impl TitleBar {
    pub fn new(status_message: String, toast: Option<String>) -> Self {
        Self {
            status_message,
            toast,
        }
    }
}

/// Status line text for the current movies slot.
pub fn search_status(movies: &Slot<CatalogPayload>, spinner_frame: usize) -> String {
    if movies.is_idle() {
        return String::new();
    }
    if movies.is_loading() {
        return format!("{} Searching…", SPINNER[spinner_frame % SPINNER.len()]);
    }
    match (movies.value(), movies.error()) {
        (Some(payload), _) if payload.items.is_empty() => "No matches".to_string(),
        (Some(payload), _) if payload.total_results > payload.items.len() => format!(
            "{} of {} results",
            payload.items.len(),
            payload.total_results
        ),
        (Some(payload), _) if payload.items.len() == 1 => "1 result".to_string(),
        (Some(payload), _) => format!("{} results", payload.items.len()),
        (None, Some(_)) => "Search failed".to_string(),
        (None, None) => String::new(),
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_text = if self.status_message.is_empty() {
            "Reel".to_string()
        } else {
            format!("Reel | {}", self.status_message)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                title_text,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            area,
        );

        if let Some(toast) = &self.toast {
            let toast = Paragraph::new(Line::from(Span::styled(
                format!("✗ {toast}"),
                Style::default().fg(Color::Red),
            )))
            .alignment(Alignment::Right);
            frame.render_widget(toast, area);
        }
    }
}
