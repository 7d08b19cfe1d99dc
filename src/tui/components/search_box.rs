//! # SearchBox Component
//!
//! Single-line title query input.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, backspace/delete, cursor movement)
//! - Emit `SearchEvent::Submit` on Enter
//! - Keep the cursor visible by scrolling horizontally when the query is
//!   wider than the box
//!
//! The buffer is internal state; `focused` is a prop from `TuiState`.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the SearchBox
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// User submitted the query (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct SearchBox {
    /// Query text (Internal State)
    pub buffer: String,
    /// Whether keystrokes go here (Prop)
    pub focused: bool,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
}

impl SearchBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            focused: true,
            cursor: 0,
        }
    }

    /// Replaces the query text and parks the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = single_line(text);
        self.cursor = self.buffer.len();
    }

    fn insert_str(&mut self, text: &str) {
        let text = single_line(text);
        self.buffer.insert_str(self.cursor, &text);
        self.cursor += text.len();
    }

    /// Display column of the cursor.
    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor]
            .chars()
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    /// The slice of the buffer that fits in `width` columns with the cursor in view,
    /// and the cursor's column within that slice.
    fn visible(&self, width: usize) -> (&str, usize) {
        let cursor_col = self.cursor_column();
        if width == 0 {
            return ("", 0);
        }
        // Keep one column free for the cursor itself.
        let skip_cols = (cursor_col + 1).saturating_sub(width);

        let mut start = 0;
        let mut skipped = 0;
        for (i, c) in self.buffer.char_indices() {
            if skipped >= skip_cols {
                start = i;
                break;
            }
            skipped += c.width().unwrap_or(0);
            start = i + c.len_utf8();
        }

        let mut end = start;
        let mut used = 0;
        for (i, c) in self.buffer[start..].char_indices() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            end = start + i + c.len_utf8();
        }

        (&self.buffer[start..end], cursor_col - skipped)
    }
}

impl Default for SearchBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Queries are one line; pasted newlines and tabs become spaces.
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map_or(pos, |c| pos + c.len_utf8())
}

impl Component for SearchBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Search ");

        let inner_width = area.width.saturating_sub(2) as usize;
        let (text, cursor_col) = self.visible(inner_width);

        let paragraph = if self.buffer.is_empty() && !self.focused {
            Paragraph::new("Title, e.g. Blade Runner")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(text.to_string())
        };

        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            let x = area.x + 1 + cursor_col as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}

impl EventHandler for SearchBox {
    type Event = SearchEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.insert_str(&c.to_string());
                Some(SearchEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_str(text);
                Some(SearchEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(SearchEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(SearchEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => Some(SearchEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> SearchBox {
        let mut search = SearchBox::new();
        for c in text.chars() {
            search.handle_event(&TuiEvent::InputChar(c));
        }
        search
    }

    #[test]
    fn test_typing_and_submit() {
        let mut search = typed("heat");
        assert_eq!(
            search.handle_event(&TuiEvent::Submit),
            Some(SearchEvent::Submit("heat".to_string()))
        );
        // Submitting keeps the query so it can be refined.
        assert_eq!(search.buffer, "heat");
    }

    #[test]
    fn test_backspace_and_delete_respect_char_boundaries() {
        let mut search = typed("amélie");
        search.handle_event(&TuiEvent::CursorLeft);
        search.handle_event(&TuiEvent::CursorLeft);
        search.handle_event(&TuiEvent::CursorLeft);
        search.handle_event(&TuiEvent::Backspace);
        assert_eq!(search.buffer, "amlie");

        search.handle_event(&TuiEvent::CursorHome);
        search.handle_event(&TuiEvent::Delete);
        assert_eq!(search.buffer, "mlie");
        assert_eq!(search.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut search = SearchBox::new();
        search.handle_event(&TuiEvent::Paste("blade\nrunner".to_string()));
        assert_eq!(search.buffer, "blade runner");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut search = typed("aens");
        search.handle_event(&TuiEvent::CursorHome);
        search.handle_event(&TuiEvent::CursorRight);
        search.handle_event(&TuiEvent::InputChar('l'));
        search.handle_event(&TuiEvent::InputChar('i'));
        assert_eq!(search.buffer, "aliens");
    }

    #[test]
    fn test_visible_window_follows_cursor() {
        let search = typed("the good the bad and the ugly");
        let (text, col) = search.visible(10);
        assert_eq!(text, " the ugly");
        assert_eq!(col, 9);

        let short = typed("heat");
        assert_eq!(short.visible(10), ("heat", 4));
    }

    #[test]
    fn test_set_text_moves_cursor_to_end() {
        let mut search = SearchBox::new();
        search.set_text("dune");
        search.handle_event(&TuiEvent::InputChar('!'));
        assert_eq!(search.buffer, "dune!");
    }
}
