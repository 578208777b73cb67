//! TUI pane rendering modules
//!
//! - [`console`]: command transcript and the `(sdb)` input line
//! - [`watchpoints`]: active watchpoints with their creation and latest values
//! - [`status`]: status bar with keybindings and the last command's result
//!
//! Each pane module exports a `render_*` function that draws from borrowed
//! state. Scroll offsets are owned by [`crate::ui::App`] and clamped here.

pub mod console;
pub mod status;
pub mod watchpoints;

pub use console::{render_console_pane, ConsoleRenderData};
pub use status::{render_status_bar, StatusRenderData};
pub use watchpoints::render_watchpoints_pane;
