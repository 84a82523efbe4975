//! User interface of the editor.
//!
//! Contains the application state, the menu contract, dialogs, the help
//! viewer and the terminal plumbing (event thread, RAII guard).
mod app;
mod dialog;
mod event;
mod guard;
mod help_view;
pub mod logging;
pub mod menu;

pub use app::{App, AppMode};
pub use dialog::{Dialog, DialogOutcome, PendingAction, PromptKind};
pub use event::{Event, EventHandler};
pub use guard::{TerminalGuard, init_panic_hook, init_tui};
