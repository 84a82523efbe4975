//! Menu bar contract.
//!
//! Lists every menu, the actions in it with their titles and status tips,
//! and which of them actually do something. Whether an action is currently
//! available is a pure function of the document, see [`affordances`].
use bitflags::bitflags;

use crate::Document;

/// Every action reachable from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action
{
    /// Start an empty document
    New,
    /// Load a file
    Open,
    /// Discard the document
    Close,
    /// Write to the associated file
    Save,
    /// Write to a chosen file
    SaveAs,
    /// Print the document
    Print,
    /// Quit the editor
    Exit,
    /// Copy the format at the cursor
    CopyTextFormat,
    /// Apply the copied format
    ApplyTextFormat,
    /// Right-align the paragraph
    AlignTextRight,
    /// Left-align the paragraph
    AlignTextLeft,
    /// Centre the paragraph
    AlignTextCenter,
    /// Pick another font
    SwitchFont,
    /// Pick the interface language
    ChangeLanguage,
    /// Edit the key bindings
    ChangeKeyBindings,
    /// Switch between the white and grey styles
    ChangeStyle,
    /// Open the help browser
    Help,
    /// Show program information
    About,
}

/// Whether an action has an implementation behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability
{
    /// Does what its title says
    Implemented,
    /// Listed in the menus but does nothing yet
    NotImplemented,
}

impl Action
{
    /// Title shown in the menu.
    #[must_use]
    pub const fn title(self) -> &'static str
    {
        match self
        {
            Self::New => "New",
            Self::Open => "Open",
            Self::Close => "Close",
            Self::Save => "Save",
            Self::SaveAs => "Save as",
            Self::Print => "Print",
            Self::Exit => "Exit",
            Self::CopyTextFormat => "Copy text format",
            Self::ApplyTextFormat => "Apply text format",
            Self::AlignTextRight => "Align text right",
            Self::AlignTextLeft => "Align text left",
            Self::AlignTextCenter => "Align text center",
            Self::SwitchFont => "Switch font",
            Self::ChangeLanguage => "Language",
            Self::ChangeKeyBindings => "Key bindings",
            Self::ChangeStyle => "Change style",
            Self::Help => "Help",
            Self::About => "About",
        }
    }

    /// Text shown in the status bar while the entry is highlighted.
    #[must_use]
    pub const fn status_tip(self) -> &'static str
    {
        match self
        {
            Self::New => "Create new file",
            Self::Open => "Open a file",
            Self::Close => "Close a file",
            Self::Save => "Save a file",
            Self::SaveAs => "Save file as",
            Self::Print => "Print a file",
            Self::Exit => "Exit application",
            Self::CopyTextFormat => "Copy text format",
            Self::ApplyTextFormat => "Apply text format",
            Self::AlignTextRight => "Align text right",
            Self::AlignTextLeft => "Align text left",
            Self::AlignTextCenter => "Align text center",
            Self::SwitchFont => "Switch font to other",
            Self::ChangeLanguage => "Change application language",
            Self::ChangeKeyBindings => "Edit key bindings settings",
            Self::ChangeStyle => "Change application style",
            Self::Help => "Show application manual",
            Self::About => "Short info about application",
        }
    }

    /// Keyboard shortcut, for display next to the title.
    #[must_use]
    pub const fn shortcut(self) -> Option<&'static str>
    {
        match self
        {
            Self::New => Some("Ctrl+N"),
            Self::Open => Some("Ctrl+O"),
            Self::Close => Some("Ctrl+W"),
            Self::Save => Some("Ctrl+S"),
            Self::SaveAs => Some("F12"),
            Self::Print => Some("Ctrl+P"),
            Self::Exit => Some("Ctrl+Q"),
            Self::ChangeStyle => Some("Ctrl+T"),
            Self::Help => Some("F1"),
            _ => None,
        }
    }

    /// Whether the action does anything.
    #[must_use]
    pub const fn capability(self) -> Capability
    {
        match self
        {
            Self::Print |
            Self::CopyTextFormat |
            Self::ApplyTextFormat |
            Self::AlignTextRight |
            Self::AlignTextLeft |
            Self::AlignTextCenter |
            Self::SwitchFont |
            Self::ChangeLanguage |
            Self::ChangeKeyBindings => Capability::NotImplemented,
            _ => Capability::Implemented,
        }
    }

    /// The affordance flag gating this action, if availability depends on
    /// the document.
    const fn gate(self) -> Option<Affordances>
    {
        match self
        {
            Self::Save => Some(Affordances::SAVE),
            Self::Close => Some(Affordances::CLOSE),
            _ => None,
        }
    }

    /// Returns `true` if the action can be triggered with the given
    /// affordances. Unimplemented actions are still enabled so that
    /// triggering them can say so.
    #[must_use]
    pub fn is_enabled(self, affordances: Affordances) -> bool
    {
        self.gate()
            .is_none_or(|flag| affordances.contains(flag))
    }
}

bitflags! {
    /// Document-dependent actions that are currently available.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Affordances: u8
    {
        /// There are unsaved changes
        const SAVE = 1;
        /// There is a file or some text to close
        const CLOSE = 1 << 1;
    }
}

/// Computes which document-dependent actions are available.
#[must_use]
pub fn affordances(document: &Document) -> Affordances
{
    let mut flags = Affordances::empty();
    flags.set(Affordances::SAVE, document.is_modified());
    flags.set(Affordances::CLOSE, document.has_content());
    flags
}

/// Entry of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem
{
    /// A selectable action
    Action(Action),
    /// A dividing line
    Separator,
}

/// A top-level menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu
{
    /// Title in the menu bar
    pub title: &'static str,
    /// Entries from top to bottom
    pub items: &'static [MenuItem],
}

impl Menu
{
    /// Returns the actions of the menu, skipping separators.
    pub fn actions(&self) -> impl Iterator<Item = Action> + '_
    {
        self.items.iter().filter_map(|item| match item
        {
            MenuItem::Action(action) => Some(*action),
            MenuItem::Separator => None,
        })
    }
}

/// The menu bar, left to right.
pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            MenuItem::Action(Action::New),
            MenuItem::Action(Action::Open),
            MenuItem::Action(Action::Close),
            MenuItem::Separator,
            MenuItem::Action(Action::Save),
            MenuItem::Action(Action::SaveAs),
            MenuItem::Separator,
            MenuItem::Action(Action::Print),
            MenuItem::Separator,
            MenuItem::Action(Action::Exit),
        ],
    },
    Menu {
        title: "Edit",
        items: &[
            MenuItem::Action(Action::CopyTextFormat),
            MenuItem::Action(Action::ApplyTextFormat),
            MenuItem::Separator,
            MenuItem::Action(Action::AlignTextRight),
            MenuItem::Action(Action::AlignTextLeft),
            MenuItem::Action(Action::AlignTextCenter),
            MenuItem::Separator,
            MenuItem::Action(Action::SwitchFont),
        ],
    },
    Menu {
        title: "Settings",
        items: &[
            MenuItem::Action(Action::ChangeLanguage),
            MenuItem::Separator,
            MenuItem::Action(Action::ChangeKeyBindings),
            MenuItem::Separator,
            MenuItem::Action(Action::ChangeStyle),
        ],
    },
    Menu {
        title: "?",
        items: &[
            MenuItem::Action(Action::Help),
            MenuItem::Separator,
            MenuItem::Action(Action::About),
        ],
    },
];

/// Open-menu navigation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState
{
    /// Index into [`MENUS`]
    pub menu: usize,
    /// Index into the menu's actions, separators not counted
    pub item: usize,
}

impl MenuState
{
    /// Returns the open menu.
    #[must_use]
    pub fn current(&self) -> &'static Menu
    {
        &MENUS[self.menu % MENUS.len()]
    }

    /// Returns the highlighted action.
    #[must_use]
    pub fn selected(&self) -> Option<Action>
    {
        self.current().actions().nth(self.item)
    }

    /// Opens the menu to the right, wrapping around.
    pub const fn next_menu(&mut self)
    {
        self.menu = (self.menu + 1) % MENUS.len();
        self.item = 0;
    }

    /// Opens the menu to the left, wrapping around.
    pub const fn prev_menu(&mut self)
    {
        self.menu = (self.menu + MENUS.len() - 1) % MENUS.len();
        self.item = 0;
    }

    /// Highlights the next entry, wrapping around.
    pub fn next_item(&mut self)
    {
        let count = self.current().actions().count();
        if count > 0
        {
            self.item = (self.item + 1) % count;
        }
    }

    /// Highlights the previous entry, wrapping around.
    pub fn prev_item(&mut self)
    {
        let count = self.current().actions().count();
        if count > 0
        {
            self.item = (self.item + count - 1) % count;
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::Decision;

    #[test]
    fn fresh_document_offers_neither_save_nor_close()
    {
        let doc = Document::new();
        assert_eq!(affordances(&doc), Affordances::empty());
        assert!(!Action::Save.is_enabled(affordances(&doc)));
        assert!(Action::SaveAs.is_enabled(affordances(&doc)));
    }

    #[test]
    fn typing_enables_save_and_close()
    {
        let mut doc = Document::new();
        doc.on_text_changed();
        assert!(affordances(&doc).contains(Affordances::SAVE));

        doc.set_text("x");
        assert_eq!(affordances(&doc), Affordances::SAVE | Affordances::CLOSE);
    }

    #[test]
    fn close_disables_close()
    {
        let mut doc = Document::new();
        doc.set_text("x");
        doc.close(&mut Decision::Proceed);
        assert_eq!(affordances(&doc), Affordances::empty());
    }

    #[test]
    fn stubs_are_marked_and_still_enabled()
    {
        for action in [Action::Print, Action::SwitchFont, Action::ChangeLanguage]
        {
            assert_eq!(action.capability(), Capability::NotImplemented);
            assert!(action.is_enabled(Affordances::empty()));
        }
        assert_eq!(Action::ChangeStyle.capability(), Capability::Implemented);
    }

    #[test]
    fn menu_bar_matches_the_contract()
    {
        let titles: Vec<_> = MENUS.iter().map(|menu| menu.title).collect();
        assert_eq!(titles, ["File", "Edit", "Settings", "?"]);

        let file: Vec<_> = MENUS[0].actions().collect();
        assert_eq!(
            file,
            [
                Action::New,
                Action::Open,
                Action::Close,
                Action::Save,
                Action::SaveAs,
                Action::Print,
                Action::Exit
            ]
        );
    }

    #[test]
    fn navigation_wraps_and_skips_separators()
    {
        let mut state = MenuState::default();
        state.prev_menu();
        assert_eq!(state.current().title, "?");
        state.next_item();
        assert_eq!(state.selected(), Some(Action::About));
        state.next_item();
        assert_eq!(state.selected(), Some(Action::Help));
        state.next_menu();
        assert_eq!(state.current().title, "File");
        state.prev_item();
        assert_eq!(state.selected(), Some(Action::Exit));
    }
}
