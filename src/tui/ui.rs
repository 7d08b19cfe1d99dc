use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{DetailView, ResultList, TitleBar, search_status};

pub fn draw_ui(frame: &mut Frame, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Min(0)]);
    let [title_area, search_area, results_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        search_status(&tui.movies, spinner_frame),
        tui.toast.as_ref().map(|t| t.message.clone()),
    );
    title_bar.render(frame, title_area);

    tui.search_box.render(frame, search_area);
    ResultList::new(&mut tui.results, &tui.movies).render(frame, results_area);

    // Overlay last so it covers everything else
    if let Some(detail) = tui.detail.as_mut() {
        DetailView::new(detail, &tui.details).render(frame, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinator::{LoadState, Slot};
    use crate::test_support::{detail, item, payload};
    use crate::tui::components::DetailViewState;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_ui_empty() {
        let mut tui = TuiState::new();
        let text = rendered(&mut tui);
        assert!(text.contains("Reel"));
        assert!(text.contains("Search"));
        assert!(text.contains("Type a title"));
    }

    #[test]
    fn test_draw_ui_with_results_and_overlay() {
        let mut tui = TuiState::new();
        let items = [item("tt0133093", "The Matrix")];
        tui.apply_movies(Slot {
            generation: 1,
            state: LoadState::Ready(Ok(payload(&items))),
        });
        let text = rendered(&mut tui);
        assert!(text.contains("Reel | 1 result"));
        assert!(text.contains("The Matrix (1999)"));

        tui.detail = Some(DetailViewState::new("tt0133093".to_string()));
        tui.details = Slot {
            generation: 1,
            state: LoadState::Ready(Ok(detail("tt0133093", "The Matrix"))),
        };
        let text = rendered(&mut tui);
        assert!(text.contains("The plot of The Matrix."));
    }
}
