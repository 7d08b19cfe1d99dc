//! # ResultList Component
//!
//! Scrollable list of search hits.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ResultListState` lives in `TuiState` and keeps its own rendered copy of
//!   the items. Every new movies snapshot is folded in through
//!   `reconcile::diff` + `reconcile::apply`, never by wholesale replacement,
//!   so the selection can follow the selected title when the list reorders.
//! - `ResultList` is created each frame with borrowed state plus the current
//!   movies slot, which decides the empty-state message.

use log::{debug, warn};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::catalog::{CatalogItem, CatalogPayload};
use crate::core::coordinator::Slot;
use crate::core::reconcile::{self, Keyed};
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

/// Rows jumped by PageUp / PageDown.
const PAGE_STEP: usize = 10;

/// Events emitted by the result list.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEvent {
    /// Enter on a row: show the detail view for this id.
    Open(String),
}

/// Persistent state for the result list.
pub struct ResultListState {
    /// Rendered items, kept in step with the movies slot via diff/apply.
    pub items: Vec<CatalogItem>,
    pub list_state: ListState,
    /// Whether arrow keys go here (Prop)
    pub focused: bool,
}

impl ResultListState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
            focused: false,
        }
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    /// Brings the rendered items in line with `next`, keeping the selected
    /// title selected if it is still present. Returns the number of
    /// operations applied.
    pub fn sync(&mut self, next: &[CatalogItem]) -> usize {
        let selected_id = self.selected_item().map(|item| item.key().to_string());
        let selected_index = self.list_state.selected();

        let ops = reconcile::diff(&self.items, next);
        if let Err(e) = reconcile::apply(&mut self.items, &ops) {
            warn!("Result list diff did not apply ({}), replacing list", e);
            self.items = next.to_vec();
        }
        debug!(
            "Result list synced: {} ops, {} items",
            ops.len(),
            self.items.len()
        );

        let reselect = selected_id
            .and_then(|id| self.items.iter().position(|item| item.key() == id))
            .or_else(|| {
                if self.items.is_empty() {
                    None
                } else {
                    // Selected title went away: stay near where it was.
                    Some(selected_index.unwrap_or(0).min(self.items.len() - 1))
                }
            });
        self.list_state.select(reselect);
        ops.len()
    }

    fn move_selection(&mut self, delta: isize) {
        if self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(last);
        self.list_state.select(Some(next));
    }
}

impl Default for ResultListState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for ResultListState {
    type Event = ResultEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => self.move_selection(-1),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => self.move_selection(1),
            TuiEvent::PageUp => self.move_selection(-(PAGE_STEP as isize)),
            TuiEvent::PageDown => self.move_selection(PAGE_STEP as isize),
            TuiEvent::CursorHome if !self.items.is_empty() => self.list_state.select(Some(0)),
            TuiEvent::CursorEnd if !self.items.is_empty() => {
                self.list_state.select(Some(self.items.len() - 1))
            }
            TuiEvent::Submit => {
                return self
                    .selected_item()
                    .map(|item| ResultEvent::Open(item.id.clone()));
            }
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the result list.
pub struct ResultList<'a> {
    state: &'a mut ResultListState,
    movies: &'a Slot<CatalogPayload>,
}

impl<'a> ResultList<'a> {
    pub fn new(state: &'a mut ResultListState, movies: &'a Slot<CatalogPayload>) -> Self {
        Self { state, movies }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.state.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Results ")
            .title_bottom(Line::from(" Tab Focus  Enter Details  Ctrl+C Quit ").centered());

        if self.state.items.is_empty() {
            let message = empty_message(self.movies);
            let empty = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let inner_width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .state
            .items
            .iter()
            .map(|item| ListItem::new(row(item, inner_width)))
            .collect();

        let highlight = if self.state.focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        let list = List::new(items).block(block).highlight_style(highlight);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// What to show when there is nothing to list.
fn empty_message(movies: &Slot<CatalogPayload>) -> String {
    if movies.is_idle() {
        "Type a title and press Enter.".to_string()
    } else if movies.is_loading() {
        "Searching…".to_string()
    } else if let Some(e) = movies.error() {
        format!("Search failed: {}", e.message)
    } else {
        "No matches.".to_string()
    }
}

/// "Title (Year)  kind", with the title truncated to fit.
fn row(item: &CatalogItem, width: usize) -> Line<'static> {
    let year = format!(" ({})", item.year);
    let kind = format!("  {}", item.kind);
    let title_width = width.saturating_sub(year.width() + kind.width());
    Line::from(vec![
        Span::raw(truncate_to_width(&item.title, title_width)),
        Span::styled(year, Style::default().fg(Color::Gray)),
        Span::styled(kind, Style::default().fg(Color::DarkGray)),
    ])
}

/// Cuts `s` to at most `max_width` display columns, ending in "…" if cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ErrorInfo;
    use crate::core::coordinator::LoadState;
    use crate::test_support::{item, payload};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn state_with(items: &[CatalogItem]) -> ResultListState {
        let mut state = ResultListState::new();
        state.sync(items);
        state
    }

    fn rendered(state: &mut ResultListState, movies: &Slot<CatalogPayload>) -> String {
        let backend = TestBackend::new(60, 8);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| ResultList::new(state, movies).render(f, f.area()))
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
    fn test_first_sync_selects_first_row() {
        let state = state_with(&[item("tt1", "Alien"), item("tt2", "Aliens")]);
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.selected_item().map(|i| i.id.as_str()), Some("tt1"));
    }

    #[test]
    fn test_selection_follows_item_across_reorder() {
        let mut state = state_with(&[item("tt1", "Alien"), item("tt2", "Aliens"), item("tt3", "Alien 3")]);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected_item().map(|i| i.id.as_str()), Some("tt2"));

        let next = [item("tt2", "Aliens"), item("tt4", "Prometheus"), item("tt1", "Alien")];
        state.sync(&next);

        assert_eq!(state.items, next.to_vec());
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_selection_clamps_when_selected_item_removed() {
        let mut state = state_with(&[item("tt1", "Alien"), item("tt2", "Aliens")]);
        state.handle_event(&TuiEvent::CursorEnd);
        state.sync(&[item("tt1", "Alien")]);
        assert_eq!(state.list_state.selected(), Some(0));

        state.sync(&[]);
        assert_eq!(state.list_state.selected(), None);
        assert!(state.selected_item().is_none());
    }

    #[test]
    fn test_identical_snapshot_applies_nothing() {
        let items = [item("tt1", "Alien"), item("tt2", "Aliens")];
        let mut state = state_with(&items);
        assert_eq!(state.sync(&items), 0);
    }

    #[test]
    fn test_submit_opens_selected() {
        let mut state = state_with(&[item("tt1", "Alien"), item("tt2", "Aliens")]);
        state.handle_event(&TuiEvent::PageDown);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(ResultEvent::Open("tt2".to_string()))
        );

        let mut empty = ResultListState::new();
        assert_eq!(empty.handle_event(&TuiEvent::Submit), None);
        empty.handle_event(&TuiEvent::CursorDown);
        assert_eq!(empty.list_state.selected(), None);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut state = state_with(&[item("tt1", "Alien"), item("tt2", "Aliens")]);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.list_state.selected(), Some(0));
        state.handle_event(&TuiEvent::PageDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.list_state.selected(), Some(1));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Heat", 10), "Heat");
        assert_eq!(truncate_to_width("The Godfather", 8), "The God…");
        assert_eq!(truncate_to_width("千と千尋の神隠し", 5), "千と…");
        assert_eq!(truncate_to_width("Heat", 0), "");
    }

    #[test]
    fn test_empty_messages_follow_slot_state() {
        let mut state = ResultListState::new();

        let idle = Slot::default();
        assert!(rendered(&mut state, &idle).contains("Type a title"));

        let loading = Slot {
            generation: 1,
            state: LoadState::Pending,
        };
        assert!(rendered(&mut state, &loading).contains("Searching"));

        let empty = Slot {
            generation: 1,
            state: LoadState::Ready(Ok(CatalogPayload::empty())),
        };
        assert!(rendered(&mut state, &empty).contains("No matches."));

        let failed = Slot {
            generation: 2,
            state: LoadState::Ready(Err(ErrorInfo::new("Invalid API key!"))),
        };
        assert!(rendered(&mut state, &failed).contains("Invalid API key!"));
    }

    #[test]
    fn test_rows_render_title_year_and_kind() {
        let items = [item("tt0133093", "The Matrix")];
        let mut state = state_with(&items);
        let movies = Slot {
            generation: 1,
            state: LoadState::Ready(Ok(payload(&items))),
        };
        let text = rendered(&mut state, &movies);
        assert!(text.contains("The Matrix (1999)"));
        assert!(text.contains("movie"));
    }
}
