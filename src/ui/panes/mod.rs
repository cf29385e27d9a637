//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and error markers
//! - [`trace`]: The rule trace, with the selected entry highlighted
//! - [`diagnostics`]: Syntax errors reported by the parser
//! - [`status`]: Status bar with keybindings and stepping state
//!
//! Each pane module exports a primary `render_*_pane()` function and, where
//! the pane scrolls, its scroll state type.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod trace;

// Re-export render functions for convenience
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use trace::{render_trace_pane, TraceScrollState};
