use std::env;
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command, value_parser};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use teditor::logging::{clear_log_file, init_logging, log_file_path};
use teditor::{App, Document, Event, EventHandler, StyleName};
use teditor::{TerminalGuard, init_panic_hook, init_tui};

fn main() -> Result<()>
{
    init_panic_hook();

    let log_location = log_file_path().map_or_else(
        |err| format!("unavailable ({err})"),
        |path| path.display().to_string(),
    );

    // Parse command line arguments
    let matches = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .after_help(format!("Logs are written to {log_location}"))
        .arg(
            Arg::new("file")
                .help("File to open")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("style")
                .long("style")
                .short('s')
                .help("Style to start with")
                .value_parser(["white", "grey"])
                .default_value("white"),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .help("Directory the open and save prompts start in")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("clear-log")
                .long("clear-log")
                .help("Delete the log file and exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("clear-log")
    {
        clear_log_file()?;
        println!("Log file cleared");
        return Ok(());
    }

    // An editor without a log is still an editor
    if let Err(err) = init_logging()
    {
        eprintln!("Logging disabled: {err:#}");
    }

    let style = matches
        .get_one::<String>("style")
        .map_or(Ok(StyleName::default()), |name| name.parse())
        .context("Invalid style")?;

    let start_dir = match matches.get_one::<PathBuf>("dir")
    {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("Failed to determine current directory")?,
    };

    let mut app = App::new(Document::new(), style, start_dir);
    if let Some(path) = matches.get_one::<PathBuf>("file")
    {
        app.open_path(path);
    }

    // Use RAII to ensure terminal cleanup happens
    let _terminal_guard = TerminalGuard::new().context("Failed to set up terminal")?;
    let mut terminal = init_tui().context("Failed to create terminal")?;

    let event_handler = EventHandler::new(Duration::from_millis(250));

    info!("Started with style {style}");

    // Terminal will be cleaned up automatically when _terminal_guard is dropped
    run_app(&mut terminal, app, &event_handler)
}

/// Run the main loop
///
/// # Arguments
///
/// * `terminal` - The terminal to draw to
/// * `app` - The app to run
/// * `event_handler` - The event handler to handle events
///
/// # Errors
///
/// Returns an error if drawing fails or the event thread goes away.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    event_handler: &EventHandler,
) -> Result<()>
{
    loop
    {
        terminal
            .draw(|frame| app.render(frame))
            .context("Failed to draw")?;

        match event_handler.next()?
        {
            Event::Key(key) => app.handle_key(key),
            Event::Paste(text) => app.handle_paste(&text),
            // Redrawn at the top of the loop
            Event::Resize(..) | Event::Tick =>
            {}
        }

        if app.should_quit
        {
            info!("Exiting");
            break;
        }
    }

    Ok(())
}
