//! Modal dialogs.
//!
//! A dialog takes over the keyboard until it is answered. Answering yields a
//! [`DialogOutcome`] that the application turns into a document operation.
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use textwrap::wrap;

use crate::{Decision, DocumentError, Theme};

/// Title of the discard-changes prompt.
pub const CONFIRM_TITLE: &str = "Are you sure?";

/// Body of the discard-changes prompt.
pub const CONFIRM_TEXT: &str = "All unsaved data will be lost!";

/// Operation waiting for a yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction
{
    /// Discard the document
    Close,
    /// Quit the editor
    Exit,
}

/// What a path prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind
{
    /// File to load
    Open,
    /// File to write
    SaveAs,
}

impl PromptKind
{
    const fn title(self) -> &'static str
    {
        match self
        {
            Self::Open => "Open Document",
            Self::SaveAs => "Save file as",
        }
    }
}

/// A modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog
{
    /// Yes/no question before losing unsaved changes
    Confirm
    {
        /// Operation to run on "Yes"
        pending: PendingAction,
        /// "Yes" is highlighted
        yes_selected: bool,
    },
    /// Single-line path input
    PathPrompt
    {
        /// What the path is for
        kind: PromptKind,
        /// Text typed so far
        input: String,
    },
    /// Something went wrong
    Warning
    {
        /// Frame title
        title: String,
        /// Text of the warning
        message: String,
    },
    /// Program information
    About,
}

/// Result of feeding a key to a dialog.
#[derive(Debug)]
pub enum DialogOutcome
{
    /// The dialog stays open
    Pending,
    /// The dialog was closed without anything to do
    Dismissed,
    /// The yes/no question was answered
    Answered(PendingAction, Decision),
    /// A path was entered, or the prompt was cancelled
    Path(PromptKind, Result<PathBuf, DocumentError>),
}

impl Dialog
{
    /// Creates the discard-changes prompt. "No" is highlighted.
    #[must_use]
    pub const fn confirm(pending: PendingAction) -> Self
    {
        Self::Confirm {
            pending,
            yes_selected: false,
        }
    }

    /// Creates a path prompt pre-filled with `initial`.
    #[must_use]
    pub fn path_prompt(kind: PromptKind, initial: impl Into<String>) -> Self
    {
        Self::PathPrompt {
            kind,
            input: initial.into(),
        }
    }

    /// Creates a warning.
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self
    {
        Self::Warning {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome
    {
        match self
        {
            Self::Confirm {
                pending,
                yes_selected,
            } => match key.code
            {
                KeyCode::Char('y' | 'Y') => DialogOutcome::Answered(*pending, Decision::Proceed),
                KeyCode::Char('n' | 'N') | KeyCode::Esc =>
                {
                    DialogOutcome::Answered(*pending, Decision::Abort)
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab =>
                {
                    *yes_selected = !*yes_selected;
                    DialogOutcome::Pending
                }
                KeyCode::Enter =>
                {
                    DialogOutcome::Answered(*pending, Decision::from_yes(*yes_selected))
                }
                _ => DialogOutcome::Pending,
            },
            Self::PathPrompt { kind, input } => match key.code
            {
                KeyCode::Enter =>
                {
                    let path = input.trim();
                    let result = if path.is_empty()
                    {
                        Err(DocumentError::UserCancelled)
                    }
                    else
                    {
                        Ok(PathBuf::from(path))
                    };
                    DialogOutcome::Path(*kind, result)
                }
                KeyCode::Esc => DialogOutcome::Path(*kind, Err(DocumentError::UserCancelled)),
                KeyCode::Backspace =>
                {
                    input.pop();
                    DialogOutcome::Pending
                }
                KeyCode::Char(ch) =>
                {
                    input.push(ch);
                    DialogOutcome::Pending
                }
                _ => DialogOutcome::Pending,
            },
            Self::Warning { .. } | Self::About => DialogOutcome::Dismissed,
        }
    }

    /// Appends pasted text to a path prompt. Other dialogs ignore it.
    pub fn paste(&mut self, text: &str)
    {
        if let Self::PathPrompt { input, .. } = self
        {
            input.extend(text.chars().filter(|ch| !ch.is_control()));
        }
    }

    /// Renders the dialog centred over `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme)
    {
        match self
        {
            Self::Confirm { yes_selected, .. } =>
            {
                let button = |label: &'static str, selected: bool| {
                    let style = if selected
                    {
                        theme.menu_selected()
                    }
                    else
                    {
                        Style::new()
                    };
                    Span::styled(format!("[ {label} ]"), style)
                };
                let lines = vec![
                    Line::from(CONFIRM_TEXT),
                    Line::from(""),
                    Line::from(vec![
                        button("Yes", *yes_selected),
                        Span::raw("   "),
                        button("No", !*yes_selected),
                    ]),
                ];
                render_box(frame, area, CONFIRM_TITLE, Text::from(lines), theme.dialog_border());
            }
            Self::PathPrompt { kind, input } =>
            {
                let lines = vec![
                    Line::from(format!("{input}_")),
                    Line::from(""),
                    Line::styled(
                        "Enter: confirm   Esc: cancel",
                        Style::new().add_modifier(Modifier::DIM),
                    ),
                ];
                render_box(frame, area, kind.title(), Text::from(lines), theme.dialog_border());
            }
            Self::Warning { title, message } =>
            {
                let lines: Vec<Line> = wrap(message, usize::from(area.width / 2))
                    .into_iter()
                    .map(|line| Line::styled(line.into_owned(), theme.warning()))
                    .collect();
                render_box(frame, area, title, Text::from(lines), theme.warning());
            }
            Self::About =>
            {
                let about = format!(
                    "{} v{}\n\n{}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION"),
                    env!("CARGO_PKG_DESCRIPTION")
                );
                let lines: Vec<Line> = about
                    .lines()
                    .flat_map(|para| {
                        if para.is_empty()
                        {
                            vec![Line::from("")]
                        }
                        else
                        {
                            wrap(para, usize::from(area.width / 2))
                                .into_iter()
                                .map(|line| Line::from(line.into_owned()))
                                .collect()
                        }
                    })
                    .collect();
                render_box(frame, area, "About", Text::from(lines), theme.dialog_border());
            }
        }
    }
}

/// Draws a bordered box sized to `text`, centred in `area`.
fn render_box(frame: &mut Frame, area: Rect, title: &str, text: Text, border: Style)
{
    let content_width = text
        .lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .max(title.chars().count());
    // 2 for the borders, 2 for padding
    let width = u16::try_from(content_width.saturating_add(4))
        .unwrap_or(u16::MAX)
        .min(area.width);
    let height = u16::try_from(text.lines.len().saturating_add(2))
        .unwrap_or(u16::MAX)
        .min(area.height);

    let rect = centered_fixed(width, height, area);
    frame.render_widget(Clear, rect);

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title.to_owned()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rect);
}

/// Creates a rectangle of the given size centred in `parent`.
fn centered_fixed(width: u16, height: u16, parent: Rect) -> Rect
{
    let x = parent.x.saturating_add(parent.width.saturating_sub(width) / 2);
    let y = parent.y.saturating_add(parent.height.saturating_sub(height) / 2);
    Rect::new(x, y, width, height)
}

/// Creates a centered rectangle inside the given area.
///
/// # Arguments
///
/// * `percent_x` - Width of the rectangle as a percentage of the parent area
/// * `percent_y` - Height of the rectangle as a percentage of the parent area
/// * `parent` - Parent rectangle
///
/// # Returns
///
/// A new rectangle positioned in the center of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, parent: Rect) -> Rect
{
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(parent);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests
{
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent
    {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn confirm_yes_proceeds_and_no_aborts()
    {
        let mut dialog = Dialog::confirm(PendingAction::Close);
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Char('y'))),
            DialogOutcome::Answered(PendingAction::Close, Decision::Proceed)
        ));
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Char('n'))),
            DialogOutcome::Answered(PendingAction::Close, Decision::Abort)
        ));
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Esc)),
            DialogOutcome::Answered(_, Decision::Abort)
        ));
    }

    #[test]
    fn confirm_enter_follows_the_highlighted_button()
    {
        let mut dialog = Dialog::confirm(PendingAction::Exit);
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Enter)),
            DialogOutcome::Answered(PendingAction::Exit, Decision::Abort)
        ));

        assert!(matches!(dialog.handle_key(press(KeyCode::Left)), DialogOutcome::Pending));
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Enter)),
            DialogOutcome::Answered(PendingAction::Exit, Decision::Proceed)
        ));
    }

    #[test]
    fn path_prompt_edits_and_submits()
    {
        let mut dialog = Dialog::path_prompt(PromptKind::SaveAs, "/tmp/");
        dialog.handle_key(press(KeyCode::Char('a')));
        dialog.handle_key(press(KeyCode::Char('x')));
        dialog.handle_key(press(KeyCode::Backspace));
        dialog.paste(".txt\n");

        match dialog.handle_key(press(KeyCode::Enter))
        {
            DialogOutcome::Path(PromptKind::SaveAs, Ok(path)) =>
            {
                assert_eq!(path, PathBuf::from("/tmp/a.txt"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn empty_or_escaped_prompt_is_cancelled()
    {
        let mut dialog = Dialog::path_prompt(PromptKind::Open, "  ");
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Enter)),
            DialogOutcome::Path(PromptKind::Open, Err(DocumentError::UserCancelled))
        ));

        let mut dialog = Dialog::path_prompt(PromptKind::Open, "/etc/hosts");
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Esc)),
            DialogOutcome::Path(PromptKind::Open, Err(DocumentError::UserCancelled))
        ));
    }

    #[test]
    fn any_key_dismisses_warnings()
    {
        let mut dialog = Dialog::warning("Error", "Open failed");
        assert!(matches!(
            dialog.handle_key(press(KeyCode::Char('x'))),
            DialogOutcome::Dismissed
        ));
    }
}
