//! # Core Application Logic
//!
//! This module contains Reel's presentation logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Coordinator (slots)  │
//!                    │  • diff() (reconciler)  │
//!                    │  • Config               │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Catalog   │
//!     │  Adapter   │                          │ Repository │
//!     │ (ratatui)  │                          │  (OMDb)    │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`coordinator`]: The `Coordinator`, sole writer of the observable slots
//! - [`reconcile`]: `diff()` / `apply()` for keyed lists
//! - [`config`]: Layered configuration

pub mod config;
pub mod coordinator;
pub mod reconcile;
