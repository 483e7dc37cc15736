use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use statuspanel::app::DynPanel;
use statuspanel::{events, ui, App, PanelState, Settings, StatusPanel, StatusSource};

#[derive(Parser, Debug)]
#[command(name = "statuspanel")]
#[command(about = "Terminal status panel for an nginx-fronted service")]
struct Args {
    /// Host the status endpoints are resolved against
    #[arg(short, long)]
    base_url: Option<String>,

    /// Optional TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-request timeout (e.g., "10s", "500ms"); none unless set
    #[arg(short, long)]
    timeout: Option<String>,

    /// Run one refresh cycle, print the result and exit
    #[arg(long)]
    once: bool,

    /// Write the sparkline SVG to this file (with --once)
    #[arg(long, requires = "once")]
    svg: Option<PathBuf>,

    /// Export the panel state to a JSON file (with --once)
    #[arg(short, long, requires = "once")]
    export: Option<PathBuf>,

    /// Append logs to this file (the TUI logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let settings = Settings::load(args.config.as_deref())?
        .with_overrides(args.base_url.clone(), args.timeout.clone());
    tracing::debug!(?settings, "settings loaded");

    let source: Box<dyn StatusSource> = Box::new(settings.http_source()?);
    let panel = StatusPanel::new(source, settings.endpoints());

    let runtime = Runtime::new().context("Failed to start the async runtime")?;

    if args.once {
        return run_once(&runtime, &panel, args.svg.as_deref(), args.export.as_deref());
    }

    run_tui(App::new(panel, runtime.handle().clone()))
}

/// Set up tracing. The TUI owns the terminal, so it only logs to a file.
fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.verbose { "statuspanel=debug" } else { "statuspanel=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match (&args.log_file, args.once) {
        (Some(path), _) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Opening log file {}", path.display()))?;
            install_subscriber(filter, Mutex::new(file), false)
        }
        (None, true) => install_subscriber(filter, io::stderr, true),
        (None, false) => {
            // No logging for the TUI (prevents screen corruption)
            Ok(())
        }
    }
}

/// Install the global fmt subscriber. Fails if one is already installed.
fn install_subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> Result<()>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set up logging: {}", e))
}

/// Run one cycle into a plain set of slots and print them.
fn run_once(
    runtime: &Runtime,
    panel: &DynPanel,
    svg_path: Option<&Path>,
    export_path: Option<&Path>,
) -> Result<()> {
    let mut state = PanelState::new();
    let report = runtime.block_on(panel.run(&mut state));

    println!("Source:  {}", panel.source().description());
    println!("Updated: {}", state.updated_text());
    println!("API:     {}", state.api_status);
    println!("DB:      {}", state.db_status);
    if let Some(connections) = state.connections {
        println!("Active:  {}", connections.active);
    }
    if let Some(ref sparkline) = state.sparkline {
        println!("Trend:   {} (demo data)", sparkline.to_blocks());
    }
    println!();
    println!("{}", state.raw_status.trim_end());
    println!();
    println!("{}", report);

    if let (Some(path), Some(sparkline)) = (svg_path, state.sparkline.as_ref()) {
        std::fs::write(path, sparkline.to_svg())
            .with_context(|| format!("Writing {}", path.display()))?;
        println!("Wrote sparkline to: {}", path.display());
    }

    if let Some(path) = export_path {
        let json = serde_json::to_string_pretty(&state.to_json())?;
        std::fs::write(path, json).with_context(|| format!("Writing {}", path.display()))?;
        println!("Exported panel state to: {}", path.display());
    }

    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // The panel is populated once on start
    app.start_refresh();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Poll for events with a short timeout
        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_subscriber_is_an_error() {
        let _ = install_subscriber(EnvFilter::new("off"), io::sink, false);

        let err = install_subscriber(EnvFilter::new("off"), io::sink, false).unwrap_err();
        assert!(err.to_string().starts_with("Failed to set up logging"));
    }

    #[test]
    fn test_once_flags_require_once() {
        assert!(Args::try_parse_from(["statuspanel", "--svg", "trend.svg"]).is_err());
        assert!(Args::try_parse_from(["statuspanel", "--once", "--svg", "trend.svg"]).is_ok());
    }
}
