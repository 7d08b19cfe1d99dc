//! # DetailView Component
//!
//! Overlay showing the full record for one title. Opened with Enter on a
//! result, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `DetailViewState` lives in `TuiState` (`None` = hidden)
//! - `DetailView` is created each frame with borrowed state and the current
//!   details slot

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::catalog::DetailRecord;
use crate::core::coordinator::Slot;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Events emitted by the detail overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailEvent {
    Dismiss,
}

/// Persistent state for the detail overlay.
pub struct DetailViewState {
    /// Id the overlay was opened for.
    pub id: String,
    pub scroll_state: ScrollViewState,
}

impl DetailViewState {
    pub fn new(id: String) -> Self {
        Self {
            id,
            scroll_state: ScrollViewState::default(),
        }
    }
}

impl EventHandler for DetailViewState {
    type Event = DetailEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => return Some(DetailEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::CursorHome => self.scroll_state.scroll_to_top(),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the detail overlay.
pub struct DetailView<'a> {
    state: &'a mut DetailViewState,
    details: &'a Slot<DetailRecord>,
}

impl<'a> DetailView<'a> {
    pub fn new(state: &'a mut DetailViewState, details: &'a Slot<DetailRecord>) -> Self {
        Self { state, details }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 80, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.state.id))
            .title_bottom(Line::from(" ↑↓ Scroll  Esc Back ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let record = match (self.details.value(), self.details.error()) {
            (Some(record), _) => record,
            (None, Some(e)) => {
                let failed = Paragraph::new(format!("Could not load details: {}", e.message))
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(failed, inner);
                return;
            }
            (None, None) => {
                let loading = Paragraph::new("Loading…")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center);
                frame.render_widget(loading, inner);
                return;
            }
        };

        // One column for the scrollbar.
        let content_width = inner.width.saturating_sub(1);
        let lines = record_lines(record, content_width as usize);
        let height = lines.len() as u16;

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(lines),
            Rect::new(0, 0, content_width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

/// Pre-wrapped lines for a record: heading, facts, then the plot.
fn record_lines(record: &DetailRecord, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                record.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" ({})", record.year),
                Style::default().fg(Color::Gray),
            ),
        ]),
        Line::default(),
    ];

    let label_style = Style::default().fg(Color::Yellow);
    for (label, value) in record.facts() {
        let prefix = format!("{label}: ");
        let options = textwrap::Options::new(width)
            .initial_indent(&prefix)
            .subsequent_indent("  ")
            .break_words(true);
        for (i, wrapped) in textwrap::wrap(value, options).into_iter().enumerate() {
            if i == 0 {
                // textwrap keeps the indent in the first line; re-style it.
                let rest = wrapped.strip_prefix(prefix.as_str()).unwrap_or(&wrapped);
                lines.push(Line::from(vec![
                    Span::styled(prefix.clone(), label_style),
                    Span::raw(rest.to_string()),
                ]));
            } else {
                lines.push(Line::from(wrapped.into_owned()));
            }
        }
    }

    if !record.plot.is_empty() {
        lines.push(Line::default());
        let options = textwrap::Options::new(width)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);
        lines.extend(
            textwrap::wrap(&record.plot, options)
                .into_iter()
                .map(|l| Line::from(l.into_owned())),
        );
    }
    lines
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ErrorInfo;
    use crate::core::coordinator::LoadState;
    use crate::test_support::detail;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(state: &mut DetailViewState, details: &Slot<DetailRecord>) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| DetailView::new(state, details).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_escape_dismisses() {
        let mut state = DetailViewState::new("tt0133093".to_string());
        assert_eq!(state.handle_event(&TuiEvent::CursorDown), None);
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(DetailEvent::Dismiss));
    }

    #[test]
    fn test_record_lines_wrap_plot_and_label_facts() {
        let mut record = detail("tt0133093", "The Matrix");
        record.director = Some("Lana Wachowski, Lilly Wachowski".to_string());
        record.plot = "word ".repeat(30).trim().to_string();

        let lines = record_lines(&record, 20);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();

        assert_eq!(text[0], "The Matrix (1999)");
        assert!(text[2].starts_with("Director: "));
        assert!(text.iter().all(|l| l.chars().count() <= 20));
        // 30 four-letter words at width 20 wrap to 8 lines.
        let plot_lines = text.iter().filter(|l| l.starts_with("word")).count();
        assert_eq!(plot_lines, 8);
    }

    #[test]
    fn test_renders_loading_record_and_error() {
        let mut state = DetailViewState::new("tt0133093".to_string());

        let loading = Slot {
            generation: 1,
            state: LoadState::Pending,
        };
        assert!(rendered(&mut state, &loading).contains("Loading"));

        let ready = Slot {
            generation: 1,
            state: LoadState::Ready(Ok(detail("tt0133093", "The Matrix"))),
        };
        let text = rendered(&mut state, &ready);
        assert!(text.contains("The Matrix (1999)"));
        assert!(text.contains("The plot of The Matrix."));

        let failed = Slot {
            generation: 2,
            state: LoadState::Ready(Err(ErrorInfo::new("request timed out"))),
        };
        assert!(rendered(&mut state, &failed).contains("request timed out"));
    }
}
