//! Application module for the editor.
//!
//! This module provides the main application state: the one document being
//! edited, the current style, and whatever menu, dialog or help page is on
//! screen. Key presses are routed to the right place here, and every menu
//! action ends up in [`App::trigger`].
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error, info, warn};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::dialog::{Dialog, DialogOutcome, PendingAction, PromptKind, centered_rect};
use super::help_view;
use super::menu::{Action, Capability, MENUS, MenuItem, MenuState, affordances};
use crate::help::{HELP_INDEX, HELP_ROOT, HelpBrowser};
use crate::{Decision, Document, DocumentError, Edit, Motion, SaveOutcome, StyleName, Theme};

/// Number of spaces a Tab key inserts.
const TAB_WIDTH: usize = 4;

/// Application mode that determines how input is interpreted.
///
/// Derived from what is on screen; the topmost layer wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode
{
    /// Typing goes into the document
    Editing,
    /// A menu is open
    Menu,
    /// The help browser is shown
    Help,
    /// A modal dialog is waiting for an answer
    Dialog,
}

/// Main application state.
pub struct App
{
    /// The document being edited
    document: Document,
    /// Current style name
    style: StyleName,
    /// Colours of the current style
    theme: Theme,
    /// Open menu, if any
    menu: Option<MenuState>,
    /// Open dialog, if any
    dialog: Option<Dialog>,
    /// Help browser, created on first use and kept afterwards
    help: Option<HelpBrowser>,
    /// Whether the help browser is shown
    show_help: bool,
    /// Message in the status bar
    status: String,
    /// Directory path prompts start in
    start_dir: PathBuf,
    /// First visible line of the document
    scroll_row: usize,
    /// First visible column of the document
    scroll_col: usize,
    /// Height of the text area at the last draw
    viewport_height: usize,
    /// Flag indicating if the application should exit
    pub should_quit: bool,
}

impl App
{
    /// Creates the application around `document`.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to start with
    /// * `style` - The initial style
    /// * `start_dir` - Directory the open and save prompts start in
    #[must_use]
    pub fn new(document: Document, style: StyleName, start_dir: PathBuf) -> Self
    {
        let theme = Theme::load(style).unwrap_or_else(|err| {
            warn!("Falling back to terminal colours: {err}");
            Theme::default()
        });

        Self {
            document,
            style,
            theme,
            menu: None,
            dialog: None,
            help: None,
            show_help: false,
            status: String::from("Press F10 for the menu, F1 for help"),
            start_dir,
            scroll_row: 0,
            scroll_col: 0,
            viewport_height: 20,
            should_quit: false,
        }
    }

    /// Returns the document being edited.
    #[must_use]
    pub const fn document(&self) -> &Document
    {
        &self.document
    }

    /// Returns the current style.
    #[must_use]
    pub const fn style(&self) -> StyleName
    {
        self.style
    }

    /// Returns the status bar message.
    #[must_use]
    pub fn status(&self) -> &str
    {
        &self.status
    }

    /// Returns the open dialog, if any.
    #[must_use]
    pub const fn dialog(&self) -> Option<&Dialog>
    {
        self.dialog.as_ref()
    }

    /// Returns the current input mode.
    #[must_use]
    pub const fn mode(&self) -> AppMode
    {
        if self.dialog.is_some()
        {
            AppMode::Dialog
        }
        else if self.show_help
        {
            AppMode::Help
        }
        else if self.menu.is_some()
        {
            AppMode::Menu
        }
        else
        {
            AppMode::Editing
        }
    }

    /// Routes a key press to the topmost layer.
    pub fn handle_key(&mut self, key: KeyEvent)
    {
        match self.mode()
        {
            AppMode::Dialog => self.handle_dialog_key(key),
            AppMode::Help => self.handle_help_key(key),
            AppMode::Menu => self.handle_menu_key(key),
            AppMode::Editing => self.handle_editor_key(key),
        }
    }

    /// Handles pasted text.
    pub fn handle_paste(&mut self, text: &str)
    {
        match self.mode()
        {
            AppMode::Dialog =>
            {
                if let Some(dialog) = &mut self.dialog
                {
                    dialog.paste(text);
                }
            }
            AppMode::Editing =>
            {
                self.document.edit(Edit::Paste(text.to_owned()));
            }
            AppMode::Menu | AppMode::Help =>
            {}
        }
    }

    /// Runs a menu action, if it is currently available.
    pub fn trigger(&mut self, action: Action)
    {
        self.menu = None;

        if action.capability() == Capability::NotImplemented
        {
            debug!("{action:?} triggered but not implemented");
            self.status = format!("{} is not implemented yet", action.title());
            return;
        }

        if !action.is_enabled(affordances(&self.document))
        {
            self.status = format!("{} is not available", action.title());
            return;
        }

        match action
        {
            Action::New => self.on_new(),
            Action::Open => self.on_open(),
            Action::Close => self.on_close(),
            Action::Save => self.on_save(),
            Action::SaveAs => self.on_save_as(),
            Action::Exit => self.on_exit(),
            Action::ChangeStyle => self.on_change_style(),
            Action::Help => self.on_help(),
            Action::About => self.dialog = Some(Dialog::About),
            Action::Print |
            Action::CopyTextFormat |
            Action::ApplyTextFormat |
            Action::AlignTextRight |
            Action::AlignTextLeft |
            Action::AlignTextCenter |
            Action::SwitchFont |
            Action::ChangeLanguage |
            Action::ChangeKeyBindings =>
            {}
        }
    }

    /// Opens `path`, reporting a failure in a warning.
    pub fn open_path(&mut self, path: &Path)
    {
        match self.document.open(path)
        {
            Ok(()) =>
            {
                self.reset_view();
                self.status = format!("Opened {}", path.display());
            }
            Err(DocumentError::UserCancelled) => self.cancelled(),
            Err(err) =>
            {
                error!("{err}");
                self.dialog = Some(Dialog::warning("Error", format!("Open failed\n{err}")));
            }
        }
    }

    /// Saves to `path`, reporting a failure in a warning.
    pub fn save_as_path(&mut self, path: &Path)
    {
        match self.document.save_as(path)
        {
            Ok(()) => self.status = format!("File saved as {}.", path.display()),
            Err(DocumentError::UserCancelled) => self.cancelled(),
            Err(err) =>
            {
                error!("{err}");
                self.dialog = Some(Dialog::warning(
                    "Can't save file",
                    format!("Cannot save file {}", path.display()),
                ));
            }
        }
    }

    fn on_new(&mut self)
    {
        self.document.new_document();
        self.reset_view();
        self.status = String::from("New document");
    }

    fn on_open(&mut self)
    {
        self.dialog = Some(Dialog::path_prompt(PromptKind::Open, self.prompt_dir()));
    }

    fn on_close(&mut self)
    {
        if self.document.is_modified()
        {
            self.dialog = Some(Dialog::confirm(PendingAction::Close));
        }
        else
        {
            // Nothing unsaved, so nothing to ask.
            self.close_document(Decision::Proceed);
        }
    }

    fn on_save(&mut self)
    {
        match self.document.save()
        {
            Ok(SaveOutcome::Saved(path)) =>
            {
                self.status = format!("{} has been saved.", path.display());
            }
            Ok(SaveOutcome::NeedsPath) => self.on_save_as(),
            Err(err) =>
            {
                error!("{err}");
                self.status = String::from("Can't save file.");
            }
        }
    }

    fn on_save_as(&mut self)
    {
        let initial = self.document.path().map_or_else(
            || self.start_dir.join(self.document.last_filename()),
            Path::to_path_buf,
        );
        self.dialog = Some(Dialog::path_prompt(
            PromptKind::SaveAs,
            initial.display().to_string(),
        ));
    }

    fn on_exit(&mut self)
    {
        if self.document.is_modified()
        {
            self.dialog = Some(Dialog::confirm(PendingAction::Exit));
        }
        else
        {
            self.should_quit = true;
        }
    }

    fn on_change_style(&mut self)
    {
        let next = self.style.toggled();
        match Theme::load(next)
        {
            Ok(theme) =>
            {
                self.style = next;
                self.theme = theme;
                self.status = format!("Style: {next}");
                info!("Switched style to {next}");
            }
            Err(err) => warn!("Keeping style {}: {err}", self.style),
        }
    }

    fn on_help(&mut self)
    {
        if self.help.is_none()
        {
            match HelpBrowser::new(HELP_ROOT, HELP_INDEX)
            {
                Ok(browser) => self.help = Some(browser),
                Err(err) =>
                {
                    error!("{err}");
                    self.dialog = Some(Dialog::warning("Help", err.to_string()));
                    return;
                }
            }
        }
        self.show_help = true;
    }

    fn close_document(&mut self, mut decision: Decision)
    {
        if self.document.close(&mut decision)
        {
            self.reset_view();
            self.status = String::from("Document closed");
        }
    }

    fn cancelled(&mut self)
    {
        self.status = DocumentError::UserCancelled.to_string();
    }

    /// Directory shown when a path prompt opens.
    fn prompt_dir(&self) -> String
    {
        let mut dir = self.start_dir.display().to_string();
        if !dir.ends_with(std::path::MAIN_SEPARATOR)
        {
            dir.push(std::path::MAIN_SEPARATOR);
        }
        dir
    }

    fn reset_view(&mut self)
    {
        self.scroll_row = 0;
        self.scroll_col = 0;
    }

    fn handle_dialog_key(&mut self, key: KeyEvent)
    {
        let Some(mut dialog) = self.dialog.take()
        else
        {
            return;
        };

        match dialog.handle_key(key)
        {
            DialogOutcome::Pending => self.dialog = Some(dialog),
            DialogOutcome::Dismissed =>
            {}
            DialogOutcome::Answered(PendingAction::Close, decision) =>
            {
                self.close_document(decision);
            }
            DialogOutcome::Answered(PendingAction::Exit, mut decision) =>
            {
                self.should_quit = self.document.exit(&mut decision);
            }
            DialogOutcome::Path(_, Err(_)) => self.cancelled(),
            DialogOutcome::Path(PromptKind::Open, Ok(path)) => self.open_path(&path),
            DialogOutcome::Path(PromptKind::SaveAs, Ok(path)) => self.save_as_path(&path),
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent)
    {
        let page = self.viewport_height.max(1);
        let Some(browser) = &mut self.help
        else
        {
            self.show_help = false;
            return;
        };

        match key.code
        {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) => self.show_help = false,
            KeyCode::Tab => browser.next_link(),
            KeyCode::BackTab => browser.prev_link(),
            KeyCode::Enter =>
            {
                if let Err(err) = browser.follow_selected()
                {
                    self.status = err.to_string();
                }
            }
            KeyCode::Backspace | KeyCode::Left =>
            {
                browser.back();
            }
            KeyCode::Right =>
            {
                browser.forward();
            }
            KeyCode::Home =>
            {
                if let Err(err) = browser.home()
                {
                    self.status = err.to_string();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => browser.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => browser.scroll_up(1),
            KeyCode::PageDown => browser.scroll_down(page),
            KeyCode::PageUp => browser.scroll_up(page),
            _ =>
            {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent)
    {
        let Some(menu) = &mut self.menu
        else
        {
            return;
        };

        match key.code
        {
            KeyCode::Esc | KeyCode::F(10) => self.menu = None,
            KeyCode::Left => menu.prev_menu(),
            KeyCode::Right => menu.next_menu(),
            KeyCode::Up => menu.prev_item(),
            KeyCode::Down => menu.next_item(),
            KeyCode::Enter =>
            {
                if let Some(action) = menu.selected()
                {
                    self.trigger(action);
                }
            }
            _ =>
            {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent)
    {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl
        {
            let action = match key.code
            {
                KeyCode::Char('n') => Some(Action::New),
                KeyCode::Char('o') => Some(Action::Open),
                KeyCode::Char('w') => Some(Action::Close),
                KeyCode::Char('s') => Some(Action::Save),
                KeyCode::Char('p') => Some(Action::Print),
                KeyCode::Char('q') => Some(Action::Exit),
                KeyCode::Char('t') => Some(Action::ChangeStyle),
                KeyCode::Home =>
                {
                    self.document.move_cursor(Motion::BufferStart);
                    None
                }
                KeyCode::End =>
                {
                    self.document.move_cursor(Motion::BufferEnd);
                    None
                }
                _ => None,
            };
            if let Some(action) = action
            {
                self.trigger(action);
            }
            return;
        }

        let page = self.viewport_height.max(1);
        match key.code
        {
            KeyCode::F(10) | KeyCode::Esc => self.menu = Some(MenuState::default()),
            KeyCode::F(12) => self.trigger(Action::SaveAs),
            KeyCode::F(1) => self.trigger(Action::Help),
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.document.edit(Edit::Insert(ch));
            }
            KeyCode::Tab =>
            {
                self.document.edit(Edit::Paste(" ".repeat(TAB_WIDTH)));
            }
            KeyCode::Enter =>
            {
                self.document.edit(Edit::Newline);
            }
            KeyCode::Backspace =>
            {
                self.document.edit(Edit::Backspace);
            }
            KeyCode::Delete =>
            {
                self.document.edit(Edit::Delete);
            }
            KeyCode::Left => self.document.move_cursor(Motion::Left),
            KeyCode::Right => self.document.move_cursor(Motion::Right),
            KeyCode::Up => self.document.move_cursor(Motion::Up(1)),
            KeyCode::Down => self.document.move_cursor(Motion::Down(1)),
            KeyCode::Home => self.document.move_cursor(Motion::LineStart),
            KeyCode::End => self.document.move_cursor(Motion::LineEnd),
            KeyCode::PageUp => self.document.move_cursor(Motion::Up(page)),
            KeyCode::PageDown => self.document.move_cursor(Motion::Down(page)),
            _ =>
            {}
        }
    }

    /// Renders the application UI to the provided frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render the UI to
    pub fn render(&mut self, frame: &mut Frame)
    {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        self.render_menu_bar(frame, chunks[0]);
        self.render_editor(frame, chunks[1]);
        self.render_status(frame, chunks[2]);

        if self.show_help
        {
            if let Some(browser) = &mut self.help
            {
                help_view::render(frame, centered_rect(80, 90, chunks[1]), browser, &self.theme);
            }
        }

        if let Some(menu) = self.menu
        {
            self.render_menu(frame, chunks[0], menu);
        }

        if let Some(dialog) = &self.dialog
        {
            let area = frame.area();
            dialog.render(frame, area, &self.theme);
        }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect)
    {
        let open = self.menu.map(|menu| menu.menu);
        let spans: Vec<Span> = MENUS
            .iter()
            .enumerate()
            .map(|(index, menu)| {
                let style = if open == Some(index)
                {
                    self.theme.menu_selected()
                }
                else
                {
                    self.theme.menu()
                };
                Span::styled(format!(" {} ", menu.title), style)
            })
            .collect();

        let bar = Paragraph::new(Line::from(spans)).style(self.theme.menu());
        frame.render_widget(bar, area);
    }

    fn render_menu(&self, frame: &mut Frame, bar: Rect, state: MenuState)
    {
        let x_offset: usize = MENUS
            .iter()
            .take(state.menu)
            .map(|menu| menu.title.chars().count().saturating_add(2))
            .sum();

        let menu = state.current();
        let enabled = affordances(&self.document);
        let label_width = menu
            .actions()
            .map(|action| {
                action.title().len() +
                    action
                        .shortcut()
                        .map_or(0, |keys| keys.len().saturating_add(2))
            })
            .max()
            .unwrap_or(0);

        let selected = state.selected();
        let lines: Vec<Line> = menu
            .items
            .iter()
            .map(|item| match item
            {
                MenuItem::Separator => Line::styled("─".repeat(label_width), self.theme.menu()),
                MenuItem::Action(action) =>
                {
                    let keys = action.shortcut().unwrap_or("");
                    let pad = label_width
                        .saturating_sub(action.title().len())
                        .saturating_sub(keys.len());
                    let label = format!("{}{}{keys}", action.title(), " ".repeat(pad));
                    let style = if selected == Some(*action)
                    {
                        self.theme.menu_selected()
                    }
                    else if action.capability() == Capability::NotImplemented ||
                        !action.is_enabled(enabled)
                    {
                        self.theme.menu_disabled()
                    }
                    else
                    {
                        self.theme.menu()
                    };
                    Line::styled(label, style)
                }
            })
            .collect();

        let frame_area = frame.area();
        let width = u16::try_from(label_width.saturating_add(2))
            .unwrap_or(u16::MAX)
            .min(frame_area.width);
        let height = u16::try_from(lines.len().saturating_add(2))
            .unwrap_or(u16::MAX)
            .min(frame_area.height.saturating_sub(bar.y.saturating_add(1)));
        let x = u16::try_from(x_offset)
            .unwrap_or(u16::MAX)
            .min(frame_area.width.saturating_sub(width));
        let area = Rect::new(x, bar.y.saturating_add(1), width, height);

        let dropdown = Paragraph::new(Text::from(lines))
            .style(self.theme.menu())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.menu()),
            );
        frame.render_widget(Clear, area);
        frame.render_widget(dropdown, area);
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect)
    {
        let modified = if self.document.is_modified() { " *" } else { "" };
        let title = format!("{}{modified}", self.document.display_name());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.editor())
            .title(title);
        let inner = block.inner(area);

        self.viewport_height = usize::from(inner.height);
        self.scroll_to_cursor(usize::from(inner.height), usize::from(inner.width));

        let text: Vec<Line> = self
            .document
            .buffer()
            .lines()
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        let scroll = (
            u16::try_from(self.scroll_row).unwrap_or(u16::MAX),
            u16::try_from(self.scroll_col).unwrap_or(u16::MAX),
        );
        let paragraph = Paragraph::new(text)
            .style(self.theme.editor())
            .block(block)
            .scroll(scroll);
        frame.render_widget(paragraph, area);

        if self.mode() == AppMode::Editing
        {
            let cursor = self.document.cursor();
            let column = cursor.col.saturating_sub(self.scroll_col);
            let row = cursor.row.saturating_sub(self.scroll_row);
            let x = inner
                .x
                .saturating_add(u16::try_from(column).unwrap_or(u16::MAX));
            let y = inner
                .y
                .saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            frame.set_cursor_position((x, y));
        }
    }

    /// Moves the scroll offsets so the cursor stays inside the viewport.
    fn scroll_to_cursor(&mut self, height: usize, width: usize)
    {
        let cursor = self.document.cursor();

        if cursor.row < self.scroll_row
        {
            self.scroll_row = cursor.row;
        }
        else if height > 0 && cursor.row >= self.scroll_row.saturating_add(height)
        {
            self.scroll_row = cursor.row.saturating_sub(height.saturating_sub(1));
        }

        if cursor.col < self.scroll_col
        {
            self.scroll_col = cursor.col;
        }
        else if width > 0 && cursor.col >= self.scroll_col.saturating_add(width)
        {
            self.scroll_col = cursor.col.saturating_sub(width.saturating_sub(1));
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect)
    {
        let message = self
            .menu
            .and_then(|menu| menu.selected())
            .map_or(self.status.as_str(), |action| action.status_tip());

        let cursor = self.document.cursor();
        let position = format!(
            "Ln {}, Col {} | {} ",
            cursor.row.saturating_add(1),
            cursor.col.saturating_add(1),
            self.style
        );

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(u16::try_from(position.chars().count()).unwrap_or(u16::MAX)),
            ])
            .split(area);

        frame.render_widget(
            Paragraph::new(format!(" {message}")).style(self.theme.status()),
            chunks[0],
        );
        frame.render_widget(
            Paragraph::new(position)
                .style(self.theme.status())
                .alignment(Alignment::Right),
            chunks[1],
        );
    }
}
