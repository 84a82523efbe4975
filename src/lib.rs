//! teditor Library
//!
//! A small text editor for the terminal.
//!
//! # Features
//!
//! - One document at a time, with New / Open / Close / Save / Save As
//! - Unsaved-change tracking and confirmation before discarding changes
//! - Two switchable styles, `white` and `grey`
//! - A built-in help browser
//!
//! # Modules
//!
//! - `document`: the document being edited and its file operations
//! - `buffer`: editable text with a cursor
//! - `style`: style names and their colour themes
//! - `help`: the bundled help documents and their browser
//! - `ui`: terminal user interface, menus, dialogs and event handling
pub mod buffer;
pub mod document;
pub mod error;
pub mod help;
mod resources;
pub mod style;
pub mod ui;

pub use buffer::{LineEnding, Position, TextBuffer};
pub use document::{Confirm, Decision, Document, Edit, Motion, PLACEHOLDER_FILENAME, SaveOutcome};
pub use error::DocumentError;
pub use help::{HelpBrowser, HelpError, HelpPage};
pub use style::{StyleName, Theme, ThemeError};
pub use ui::logging;
pub use ui::{App, AppMode, Event, EventHandler, TerminalGuard, init_panic_hook, init_tui};
