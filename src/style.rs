//! Application styles.
//!
//! There are two styles, `white` and `grey`. Each one is a small bundled
//! style sheet of `key = colour` lines that is parsed into a [`Theme`].
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use regex::Regex;
use thiserror::Error;

use crate::resources;

/// `key = value`, surrounding whitespace ignored.
static ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([a-z_]+)\s*=\s*(\S+)\s*$").expect("Invalid theme entry regex")
});

/// Name of one of the bundled styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StyleName
{
    /// Dark text on white
    #[default]
    White,
    /// Light text on grey
    Grey,
}

impl StyleName
{
    /// Returns the other style.
    #[must_use]
    pub const fn toggled(self) -> Self
    {
        match self
        {
            Self::White => Self::Grey,
            Self::Grey => Self::White,
        }
    }

    /// Returns the style name as used in resource paths.
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self
        {
            Self::White => "white",
            Self::Grey => "grey",
        }
    }

    /// Returns the path of the bundled style sheet.
    #[must_use]
    pub fn resource_path(self) -> String
    {
        format!("themes/{}.theme", self.name())
    }
}

impl fmt::Display for StyleName
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        formatter.write_str(self.name())
    }
}

impl FromStr for StyleName
{
    type Err = ThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err>
    {
        match value
        {
            "white" => Ok(Self::White),
            "grey" | "gray" => Ok(Self::Grey),
            other => Err(ThemeError::UnknownStyle(other.to_owned())),
        }
    }
}

/// Failure to resolve or parse a style sheet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError
{
    /// Not one of the bundled style names
    #[error("Unknown style: {0}")]
    UnknownStyle(String),

    /// The style has no bundled sheet
    #[error("Style sheet not found: {0}")]
    MissingResource(String),

    /// A line is not a `key = colour` entry
    #[error("Line {line}: expected `key = colour`, got {text:?}")]
    Syntax
    {
        /// One-based line number
        line: usize,
        /// The offending line
        text: String,
    },

    /// The key names no theme colour
    #[error("Line {line}: unknown key {key:?}")]
    UnknownKey
    {
        /// One-based line number
        line: usize,
        /// The unknown key
        key: String,
    },

    /// The value is not a colour ratatui understands
    #[error("Line {line}: invalid colour {value:?}")]
    BadColour
    {
        /// One-based line number
        line: usize,
        /// The unparsable value
        value: String,
    },
}

/// Colours used to draw the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme
{
    /// Background of the text area
    pub background: Color,
    /// Document text
    pub text: Color,
    /// Background of the menu bar and menus
    pub menu_bar: Color,
    /// Menu entries
    pub menu_text: Color,
    /// Background of the highlighted menu entry
    pub menu_highlight: Color,
    /// Background of the status bar
    pub status_bar: Color,
    /// Status bar text
    pub status_text: Color,
    /// Dialog and help frames
    pub dialog_border: Color,
    /// Warning text and frames
    pub warning: Color,
    /// Help links
    pub link: Color,
}

impl Default for Theme
{
    /// The terminal's own colours.
    fn default() -> Self
    {
        Self {
            background: Color::Reset,
            text: Color::Reset,
            menu_bar: Color::Reset,
            menu_text: Color::Reset,
            menu_highlight: Color::Blue,
            status_bar: Color::Reset,
            status_text: Color::Reset,
            dialog_border: Color::Reset,
            warning: Color::Red,
            link: Color::Cyan,
        }
    }
}

impl Theme
{
    /// Resolves and parses the style sheet of `style`.
    ///
    /// # Errors
    ///
    /// Returns an error if the style sheet is not bundled or does not parse.
    pub fn load(style: StyleName) -> Result<Self, ThemeError>
    {
        let path = style.resource_path();
        let sheet = resources::lookup(&path).ok_or(ThemeError::MissingResource(path))?;
        Self::parse(sheet)
    }

    /// Parses a style sheet.
    ///
    /// Blank lines and lines starting with `#` are skipped. Keys that are
    /// not mentioned keep the terminal default.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending line.
    pub fn parse(sheet: &str) -> Result<Self, ThemeError>
    {
        let mut theme = Self::default();

        for (index, raw) in sheet.lines().enumerate()
        {
            let line = index.saturating_add(1);
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#')
            {
                continue;
            }

            let caps = ENTRY_REGEX
                .captures(trimmed)
                .ok_or_else(|| ThemeError::Syntax {
                    line,
                    text: trimmed.to_owned(),
                })?;
            let key = &caps[1];
            let value = &caps[2];

            let colour = Color::from_str(value).map_err(|_| ThemeError::BadColour {
                line,
                value: value.to_owned(),
            })?;

            let slot = match key
            {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "menu_bar" => &mut theme.menu_bar,
                "menu_text" => &mut theme.menu_text,
                "menu_highlight" => &mut theme.menu_highlight,
                "status_bar" => &mut theme.status_bar,
                "status_text" => &mut theme.status_text,
                "dialog_border" => &mut theme.dialog_border,
                "warning" => &mut theme.warning,
                "link" => &mut theme.link,
                _ =>
                {
                    return Err(ThemeError::UnknownKey {
                        line,
                        key: key.to_owned(),
                    });
                }
            };
            *slot = colour;
        }

        Ok(theme)
    }

    /// Style of the text area.
    #[must_use]
    pub const fn editor(&self) -> Style
    {
        Style::new().fg(self.text).bg(self.background)
    }

    /// Style of the menu bar and open menus.
    #[must_use]
    pub const fn menu(&self) -> Style
    {
        Style::new().fg(self.menu_text).bg(self.menu_bar)
    }

    /// Style of the highlighted menu entry.
    #[must_use]
    pub const fn menu_selected(&self) -> Style
    {
        Style::new()
            .fg(self.background)
            .bg(self.menu_highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of disabled or unimplemented menu entries.
    #[must_use]
    pub const fn menu_disabled(&self) -> Style
    {
        Style::new()
            .fg(self.menu_text)
            .bg(self.menu_bar)
            .add_modifier(Modifier::DIM)
    }

    /// Style of the status bar.
    #[must_use]
    pub const fn status(&self) -> Style
    {
        Style::new().fg(self.status_text).bg(self.status_bar)
    }

    /// Style of dialog frames.
    #[must_use]
    pub const fn dialog_border(&self) -> Style
    {
        Style::new().fg(self.dialog_border)
    }

    /// Style of warnings.
    #[must_use]
    pub const fn warning(&self) -> Style
    {
        Style::new()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Style of help links; the selected one is reversed.
    #[must_use]
    pub const fn link(&self, selected: bool) -> Style
    {
        let style = Style::new()
            .fg(self.link)
            .add_modifier(Modifier::UNDERLINED);
        if selected { style.add_modifier(Modifier::REVERSED) } else { style }
    }
}
