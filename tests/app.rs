//! Drives the application the way a user at the keyboard would.
use std::fs;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tempfile::TempDir;
use teditor::ui::menu::{Action, Affordances, affordances};
use teditor::ui::{Dialog, PendingAction, PromptKind};
use teditor::{App, AppMode, Document, PLACEHOLDER_FILENAME, StyleName};

fn app_in(dir: &Path) -> App
{
    App::new(Document::new(), StyleName::White, dir.to_path_buf())
}

fn press(app: &mut App, code: KeyCode)
{
    app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn ctrl(app: &mut App, ch: char)
{
    app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
}

fn type_text(app: &mut App, text: &str)
{
    for ch in text.chars()
    {
        if ch == '\n'
        {
            press(app, KeyCode::Enter);
        }
        else
        {
            press(app, KeyCode::Char(ch));
        }
    }
}

/// Replaces the contents of an open path prompt.
fn enter_path(app: &mut App, path: &Path)
{
    let Some(Dialog::PathPrompt { input, .. }) = app.dialog()
    else
    {
        panic!("expected a path prompt, got {:?}", app.dialog());
    };
    for _ in 0..input.chars().count()
    {
        press(app, KeyCode::Backspace);
    }
    app.handle_paste(&path.display().to_string());
    press(app, KeyCode::Enter);
}

#[test]
fn typing_marks_the_document_modified_and_enables_save()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    assert_eq!(affordances(app.document()), Affordances::empty());

    type_text(&mut app, "hi");

    assert!(app.document().is_modified());
    assert!(Action::Save.is_enabled(affordances(app.document())));
    assert_eq!(app.document().text(), "hi");
}

#[test]
fn save_without_a_file_asks_for_a_path()
{
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("new.txt");
    let mut app = app_in(dir.path());

    type_text(&mut app, "line one\nline two");
    ctrl(&mut app, 's');

    assert!(matches!(
        app.dialog(),
        Some(Dialog::PathPrompt {
            kind: PromptKind::SaveAs,
            ..
        })
    ));
    enter_path(&mut app, &path);

    assert_eq!(app.mode(), AppMode::Editing);
    assert_eq!(fs::read_to_string(&path).expect("saved"), "line one\nline two");
    assert!(!app.document().is_modified());
    assert!(app.status().starts_with("File saved as"));
}

#[test]
fn cancelled_prompt_reports_and_changes_nothing()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    type_text(&mut app, "draft");

    app.trigger(Action::SaveAs);
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.mode(), AppMode::Editing);
    assert_eq!(app.status(), "Operation cancelled");
    assert!(app.document().is_modified());
}

#[test]
fn opening_a_missing_file_shows_a_warning()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    type_text(&mut app, "keep");

    ctrl(&mut app, 'o');
    enter_path(&mut app, &dir.path().join("missing.txt"));

    assert!(matches!(app.dialog(), Some(Dialog::Warning { title, .. }) if title == "Error"));
    assert_eq!(app.document().text(), "keep");

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.mode(), AppMode::Editing);
}

#[test]
fn close_with_changes_needs_a_yes()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    type_text(&mut app, "unsaved");

    ctrl(&mut app, 'w');
    assert_eq!(app.dialog(), Some(&Dialog::confirm(PendingAction::Close)));
    press(&mut app, KeyCode::Char('n'));
    assert_eq!(app.document().text(), "unsaved");

    ctrl(&mut app, 'w');
    press(&mut app, KeyCode::Char('y'));
    assert_eq!(app.document().text(), "");
    assert!(!app.document().is_modified());
    assert!(!Action::Close.is_enabled(affordances(app.document())));
}

#[test]
fn exit_asks_only_with_unsaved_changes()
{
    let dir = TempDir::new().expect("temp dir");

    let mut clean = app_in(dir.path());
    ctrl(&mut clean, 'q');
    assert!(clean.should_quit);

    let mut dirty = app_in(dir.path());
    type_text(&mut dirty, "x");
    ctrl(&mut dirty, 'q');
    assert!(!dirty.should_quit);
    assert_eq!(dirty.dialog(), Some(&Dialog::confirm(PendingAction::Exit)));

    press(&mut dirty, KeyCode::Esc);
    assert!(!dirty.should_quit);

    ctrl(&mut dirty, 'q');
    press(&mut dirty, KeyCode::Char('y'));
    assert!(dirty.should_quit);
}

#[test]
fn open_replaces_content_from_disk()
{
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("existing.txt");
    fs::write(&path, "from disk").expect("seed");

    let mut app = app_in(dir.path());
    type_text(&mut app, "scratch");
    ctrl(&mut app, 'o');
    enter_path(&mut app, &path);

    assert_eq!(app.document().text(), "from disk");
    assert!(!app.document().is_modified());
    assert_eq!(app.document().path(), Some(path.as_path()));
}

#[test]
fn save_as_after_close_does_not_offer_the_closed_file()
{
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("precious.txt");
    fs::write(&path, "keep me").expect("seed");

    let mut app = app_in(dir.path());
    app.open_path(&path);
    ctrl(&mut app, 'w');
    assert_eq!(app.document().text(), "");

    press(&mut app, KeyCode::F(12));
    let expected = dir.path().join(PLACEHOLDER_FILENAME).display().to_string();
    assert!(matches!(
        app.dialog(),
        Some(Dialog::PathPrompt { kind: PromptKind::SaveAs, input }) if *input == expected
    ));

    press(&mut app, KeyCode::Enter);
    assert_eq!(fs::read_to_string(&path).expect("untouched"), "keep me");
}

#[test]
fn change_style_toggles()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());

    ctrl(&mut app, 't');
    assert_eq!(app.style(), StyleName::Grey);
    app.trigger(Action::ChangeStyle);
    assert_eq!(app.style(), StyleName::White);
}

#[test]
fn stubs_say_they_are_not_implemented()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());

    ctrl(&mut app, 'p');
    assert_eq!(app.status(), "Print is not implemented yet");

    app.trigger(Action::AlignTextCenter);
    assert_eq!(app.status(), "Align text center is not implemented yet");
}

#[test]
fn menu_navigation_triggers_actions()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());

    press(&mut app, KeyCode::F(10));
    assert_eq!(app.mode(), AppMode::Menu);

    // "?" menu, second entry is About
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.dialog(), Some(&Dialog::About));
}

#[test]
fn help_opens_and_closes()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());

    press(&mut app, KeyCode::F(1));
    assert_eq!(app.mode(), AppMode::Help);

    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.mode(), AppMode::Editing);
}

fn screen(terminal: &Terminal<TestBackend>) -> String
{
    let buffer = terminal.backend().buffer();
    buffer
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn help_scrolls_back_right_after_hitting_the_end()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    let mut terminal = Terminal::new(TestBackend::new(40, 12)).expect("terminal");

    press(&mut app, KeyCode::F(1));
    terminal.draw(|frame| app.render(frame)).expect("draw");
    let top = screen(&terminal);

    for _ in 0..200
    {
        press(&mut app, KeyCode::Down);
        terminal.draw(|frame| app.render(frame)).expect("draw");
    }
    let bottom = screen(&terminal);
    assert_ne!(top, bottom);

    press(&mut app, KeyCode::Up);
    terminal.draw(|frame| app.render(frame)).expect("draw");
    assert_ne!(screen(&terminal), bottom);
}

#[test]
fn renders_menu_bar_title_and_status()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    type_text(&mut app, "hello");

    let mut terminal = Terminal::new(TestBackend::new(60, 12)).expect("terminal");
    terminal
        .draw(|frame| app.render(frame))
        .expect("draw");

    let buffer = terminal.backend().buffer();
    let row = |y: u16| -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    };

    assert!(row(0).starts_with(" File  Edit  Settings  ? "));
    assert!(row(1).contains("file.txt *"));
    assert!(row(2).contains("hello"));
    assert!(row(11).contains("Ln 1, Col 6"));
}

#[test]
fn renders_dialogs_and_help_without_panicking()
{
    let dir = TempDir::new().expect("temp dir");
    let mut app = app_in(dir.path());
    let mut terminal = Terminal::new(TestBackend::new(20, 6)).expect("terminal");

    for setup in [Action::Help, Action::About, Action::SaveAs]
    {
        app.trigger(setup);
        terminal
            .draw(|frame| app.render(frame))
            .expect("draw");
        press(&mut app, KeyCode::Esc);
    }

    press(&mut app, KeyCode::F(10));
    terminal
        .draw(|frame| app.render(frame))
        .expect("draw");
}
