//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: Top status bar showing search status and error toasts
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `SearchBox`: Query input; emits `Submit` on Enter
//! - `ResultListState` / `ResultList`: search hits, kept in step with the
//!   movies slot through `core::reconcile`
//! - `DetailViewState` / `DetailView`: overlay for one title
//!
//! Stateful components with a render wrapper hold their persistent state in
//! `TuiState` and are wrapped each frame together with the slot snapshot
//! they display.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── search_box.rs    (Query input)
//! ├── result_list.rs   (Search hits)
//! └── detail_view.rs   (Detail overlay)
//! ```

mod title_bar;
pub use title_bar::{TitleBar, search_status};

pub mod detail_view;
pub mod result_list;
pub mod search_box;
pub use detail_view::{DetailEvent, DetailView, DetailViewState};
pub use result_list::{ResultEvent, ResultList, ResultListState};
pub use search_box::{SearchBox, SearchEvent};
