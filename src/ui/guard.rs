//! Provides a RAII guard for safe terminal lifecycle management.
//!
//! A guard object is created to put the terminal into raw mode, switch to
//! the alternate screen and turn on bracketed paste. Its `Drop`
//! implementation undoes all of that when it goes out of scope, either on
//! normal exit or during a panic unwind.
use std::io::{Result as IoResult, Stdout, stdout};
use std::panic::{set_hook, take_hook};

use crossterm::ExecutableCommand;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use log::error;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

/// RAII wrapper for terminal state.
///
/// Manages the terminal's configuration, ensuring it is always returned
/// to its original state when this struct is dropped.
pub struct TerminalGuard;

impl TerminalGuard
{
    /// Creates a `TerminalGuard` for TUI setup.
    ///
    /// Configures the terminal by entering raw mode, switching to the
    /// alternate screen buffer and enabling bracketed paste.
    ///
    /// # Errors
    ///
    /// On failure to enter raw mode or switch screens.
    pub fn new() -> IoResult<Self>
    {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        stdout().execute(EnableBracketedPaste)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard
{
    /// Restores the terminal state.
    fn drop(&mut self)
    {
        restore_terminal();
    }
}

/// Undoes everything `TerminalGuard::new` did, logging failures.
fn restore_terminal()
{
    // Terminal will be borked when failure, at least inform the user
    if let Err(err) = stdout().execute(DisableBracketedPaste)
    {
        error!("Failed to disable bracketed paste: {err}");
    }

    if let Err(err) = disable_raw_mode()
    {
        error!("Failed to disable raw mode: {err}");
    }

    if let Err(err) = stdout().execute(LeaveAlternateScreen)
    {
        error!("Failed to leave alternate screen: {err}");
    }
}

/// Initialize the terminal
///
/// # Errors
///
/// Returns an error if the backend cannot query the terminal size.
pub fn init_tui() -> IoResult<Terminal<CrosstermBackend<Stdout>>>
{
    // Terminal modes are handled by TerminalGuard
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

/// Installs a panic hook that restores the terminal before the default
/// hook prints the panic message.
pub fn init_panic_hook()
{
    let original_hook = take_hook();
    set_hook(Box::new(move |panic_info| {
        restore_terminal();

        error!("Application panicked: {panic_info}");

        original_hook(panic_info);
    }));
}
