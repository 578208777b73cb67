//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, input line and history
//! - **[`panes`]**: render functions for each visible pane (console,
//!   watchpoints, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Sdb`]
//! session and call [`App::run`] to start the event loop.
//!
//! [`Sdb`]: crate::monitor::Sdb
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
