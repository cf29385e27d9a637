//! Terminal trace viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! - **[`app`]**: viewer state, keyboard event loop, pane focus, auto-play
//! - **[`panes`]**: stateless render functions for each pane (source, trace,
//!   diagnostics, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! Construct an [`App`] from a finished [`ParseOutcome`] and the source it was
//! produced from, then call [`App::run`].
//!
//! [`ParseOutcome`]: crate::parser::parse::ParseOutcome
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
