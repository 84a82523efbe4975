//! Document and session state.
//!
//! A [`Document`] is the text being edited together with the file it belongs
//! to and whether it has unsaved changes. The application owns exactly one.
//!
//! All operations are synchronous. Files are opened, used and closed inside a
//! single call, and a failed operation leaves the document untouched.
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::buffer::{Position, TextBuffer};
use crate::error::DocumentError;

/// Name shown for a document that has never been saved.
pub const PLACEHOLDER_FILENAME: &str = "file.txt";

/// Answer to a "discard unsaved changes?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision
{
    /// Go ahead and lose the unsaved changes
    Proceed,
    /// Keep everything as it is
    Abort,
}

impl Decision
{
    /// Maps a yes/no answer onto a decision. Yes proceeds.
    #[must_use]
    pub const fn from_yes(yes: bool) -> Self
    {
        if yes { Self::Proceed } else { Self::Abort }
    }
}

/// Something that can ask the user to confirm a destructive action.
///
/// Only consulted when there are unsaved changes.
pub trait Confirm
{
    /// Asks whether unsaved changes may be thrown away.
    fn confirm_destructive_action(&mut self) -> Decision;
}

/// A decision taken in advance, e.g. after a dialog was answered.
impl Confirm for Decision
{
    fn confirm_destructive_action(&mut self) -> Decision
    {
        *self
    }
}

/// Result of [`Document::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome
{
    /// The buffer was written to this file
    Saved(PathBuf),
    /// No file is associated yet; the caller has to ask for a path and
    /// call [`Document::save_as`]
    NeedsPath,
}

/// Text-changing edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit
{
    /// Type a character
    Insert(char),
    /// Insert a whole string
    Paste(String),
    /// Split the line at the cursor
    Newline,
    /// Delete before the cursor
    Backspace,
    /// Delete under the cursor
    Delete,
}

/// Cursor motions. These never change the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion
{
    /// One character back, onto the previous line at its start
    Left,
    /// One character on, onto the next line at its end
    Right,
    /// Up by this many lines
    Up(usize),
    /// Down by this many lines
    Down(usize),
    /// Start of the line
    LineStart,
    /// End of the line
    LineEnd,
    /// Start of the text
    BufferStart,
    /// End of the text
    BufferEnd,
}

/// The document being edited.
#[derive(Debug, Clone)]
pub struct Document
{
    /// File the document is associated with, if any
    path: Option<PathBuf>,
    /// In-memory text
    buffer: TextBuffer,
    /// Unsaved changes exist
    modified: bool,
    /// Name of the last file opened, or the placeholder
    last_filename: String,
}

impl Default for Document
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl Document
{
    /// Creates an empty document with no associated file.
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            path: None,
            buffer: TextBuffer::new(),
            modified: false,
            last_filename: PLACEHOLDER_FILENAME.to_owned(),
        }
    }

    /// Starts over with an empty document.
    ///
    /// Unsaved changes are dropped without asking.
    pub fn new_document(&mut self)
    {
        if self.modified
        {
            warn!("Discarding unsaved changes to {}", self.display_name());
        }
        *self = Self::new();
        debug!("New document");
    }

    /// Replaces the document with the contents of `path`.
    ///
    /// The file is read and checked to be UTF-8 before anything changes, so
    /// on error the current text and modified flag are kept.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UserCancelled`] if `path` is empty,
    /// [`DocumentError::Io`] if the file cannot be read or is not UTF-8.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError>
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty()
        {
            return Err(DocumentError::UserCancelled);
        }

        let bytes = fs::read(path).map_err(|err| DocumentError::io(path, err))?;
        let text = String::from_utf8(bytes).map_err(|err| {
            DocumentError::io(path, io::Error::new(io::ErrorKind::InvalidData, err))
        })?;

        // Everything is validated, commit.
        self.buffer = TextBuffer::from_text(&text);
        self.path = Some(path.to_path_buf());
        self.last_filename = path.display().to_string();
        self.modified = false;

        info!("Opened {} ({} bytes)", path.display(), text.len());
        Ok(())
    }

    /// Writes the buffer to the associated file.
    ///
    /// # Returns
    ///
    /// [`SaveOutcome::NeedsPath`] if there is no associated file, in which
    /// case nothing happened.
    ///
    /// # Errors
    ///
    /// [`DocumentError::Io`] if the file cannot be written. The modified
    /// flag is kept.
    pub fn save(&mut self) -> Result<SaveOutcome, DocumentError>
    {
        let Some(path) = self.path.clone()
        else
        {
            debug!("Save requested without a file, asking for a path");
            return Ok(SaveOutcome::NeedsPath);
        };

        write_file(&path, &self.buffer.text()).map_err(|err| DocumentError::io(&path, err))?;
        self.modified = false;

        info!("Saved {}", path.display());
        Ok(SaveOutcome::Saved(path))
    }

    /// Writes the buffer to `path` and associates the document with it.
    ///
    /// # Errors
    ///
    /// [`DocumentError::UserCancelled`] if `path` is empty,
    /// [`DocumentError::Io`] if the file cannot be created or written.
    /// Either way the document is unchanged.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError>
    {
        let path = path.as_ref();
        if path.as_os_str().is_empty()
        {
            return Err(DocumentError::UserCancelled);
        }

        write_file(path, &self.buffer.text()).map_err(|err| DocumentError::io(path, err))?;
        self.path = Some(path.to_path_buf());
        self.modified = false;

        info!("Saved as {}", path.display());
        Ok(())
    }

    /// Discards the document.
    ///
    /// With unsaved changes the user is asked first. An unmodified document
    /// is discarded straight away.
    ///
    /// # Returns
    ///
    /// `true` if the document was discarded.
    pub fn close(&mut self, confirm: &mut impl Confirm) -> bool
    {
        if self.modified && confirm.confirm_destructive_action() == Decision::Abort
        {
            debug!("Close aborted");
            return false;
        }

        // Forget the closed file entirely, name included.
        *self = Self::new();
        debug!("Document closed");
        true
    }

    /// Decides whether the application may quit.
    ///
    /// # Returns
    ///
    /// `true` when there are no unsaved changes or the user agreed to lose
    /// them.
    pub fn exit(&self, confirm: &mut impl Confirm) -> bool
    {
        !self.modified || confirm.confirm_destructive_action() == Decision::Proceed
    }

    /// Records that the text changed.
    pub const fn on_text_changed(&mut self)
    {
        self.modified = true;
    }

    /// Applies a text edit, marking the document modified if anything
    /// changed.
    pub fn edit(&mut self, edit: Edit) -> bool
    {
        let changed = match edit
        {
            Edit::Insert(ch) => self.buffer.insert_char(ch),
            Edit::Paste(text) => self.buffer.insert_str(&text),
            Edit::Newline => self.buffer.newline(),
            Edit::Backspace => self.buffer.backspace(),
            Edit::Delete => self.buffer.delete(),
        };

        if changed
        {
            self.on_text_changed();
        }
        changed
    }

    /// Moves the cursor.
    pub fn move_cursor(&mut self, motion: Motion)
    {
        match motion
        {
            Motion::Left => self.buffer.move_left(),
            Motion::Right => self.buffer.move_right(),
            Motion::Up(count) => self.buffer.move_up(count),
            Motion::Down(count) => self.buffer.move_down(count),
            Motion::LineStart => self.buffer.move_home(),
            Motion::LineEnd => self.buffer.move_end(),
            Motion::BufferStart => self.buffer.move_to_start(),
            Motion::BufferEnd => self.buffer.move_to_end(),
        }
    }

    /// Replaces the whole text, as if the user had typed it.
    pub fn set_text(&mut self, text: &str)
    {
        self.buffer = TextBuffer::from_text(text);
        self.buffer.move_to_end();
        self.on_text_changed();
    }

    /// Returns the associated file, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path>
    {
        self.path.as_deref()
    }

    /// Returns the text buffer.
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer
    {
        &self.buffer
    }

    /// Returns the whole text.
    #[must_use]
    pub fn text(&self) -> String
    {
        self.buffer.text()
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn cursor(&self) -> Position
    {
        self.buffer.cursor()
    }

    /// Returns `true` if there are unsaved changes.
    #[must_use]
    pub const fn is_modified(&self) -> bool
    {
        self.modified
    }

    /// Returns the last opened file name, or the placeholder.
    #[must_use]
    pub fn last_filename(&self) -> &str
    {
        &self.last_filename
    }

    /// Returns `true` if there is anything to close: a file or some text.
    #[must_use]
    pub fn has_content(&self) -> bool
    {
        self.path.is_some() || !self.buffer.is_empty()
    }

    /// Returns the name to show in the title bar.
    #[must_use]
    pub fn display_name(&self) -> String
    {
        self.path.as_ref().map_or_else(
            || self.last_filename.clone(),
            |path| path.display().to_string(),
        )
    }
}

/// Creates or truncates `path` and writes `text` to it.
fn write_file(path: &Path, text: &str) -> io::Result<()>
{
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.flush()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn fresh_document_is_clean()
    {
        let doc = Document::new();
        assert!(!doc.is_modified());
        assert!(doc.path().is_none());
        assert_eq!(doc.last_filename(), PLACEHOLDER_FILENAME);
        assert!(!doc.has_content());
    }

    #[test]
    fn edits_set_modified_but_motions_do_not()
    {
        let mut doc = Document::new();
        doc.move_cursor(Motion::Right);
        assert!(!doc.is_modified());

        assert!(doc.edit(Edit::Insert('x')));
        assert!(doc.is_modified());
    }

    #[test]
    fn no_op_edit_leaves_flag_alone()
    {
        let mut doc = Document::new();
        assert!(!doc.edit(Edit::Backspace));
        assert!(!doc.is_modified());
    }

    #[test]
    fn on_text_changed_is_sticky()
    {
        let mut doc = Document::new();
        doc.on_text_changed();
        doc.on_text_changed();
        assert!(doc.is_modified());
    }

    #[test]
    fn save_without_path_needs_a_path()
    {
        let mut doc = Document::new();
        doc.set_text("draft");
        assert_eq!(doc.save().ok(), Some(SaveOutcome::NeedsPath));
        assert!(doc.is_modified());
    }

    #[test]
    fn empty_paths_are_cancellations()
    {
        let mut doc = Document::new();
        doc.set_text("draft");

        assert!(doc.save_as("").is_err_and(|err| err.is_cancelled()));
        assert!(doc.open("").is_err_and(|err| err.is_cancelled()));
        assert!(doc.is_modified());
        assert_eq!(doc.text(), "draft");
    }

    #[test]
    fn close_respects_the_decision()
    {
        let mut doc = Document::new();
        doc.set_text("keep me");

        assert!(!doc.close(&mut Decision::Abort));
        assert_eq!(doc.text(), "keep me");
        assert!(doc.is_modified());

        assert!(doc.close(&mut Decision::Proceed));
        assert_eq!(doc.text(), "");
        assert!(!doc.is_modified());
        assert!(!doc.has_content());
    }

    #[test]
    fn exit_only_asks_when_modified()
    {
        let mut doc = Document::new();
        assert!(doc.exit(&mut Decision::Abort));

        doc.on_text_changed();
        assert!(!doc.exit(&mut Decision::Abort));
        assert!(doc.exit(&mut Decision::Proceed));
    }

    #[test]
    fn yes_means_proceed()
    {
        assert_eq!(Decision::from_yes(true), Decision::Proceed);
        assert_eq!(Decision::from_yes(false), Decision::Abort);
    }
}
