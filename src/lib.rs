pub mod app;
pub mod cli;
pub mod domain;
pub mod layout;
pub mod logging;
pub mod render;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

use std::{
    fs,
    io::{self, Read, Stdout, Write},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use app::{
    events::{AppEvent, spawn_input_task},
    settings::{RuntimeSettings, load_file_settings},
    state::{AppMode, AppState, build_run, canvas_size_for},
};
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use domain::words::{WordItem, demo_words, parse_word_list};
use futures::StreamExt;
use layout::{LayoutError, LayoutEvent, RunReport};
use ratatui::{Terminal, backend::CrosstermBackend};
use render::Canvas;
use tokio::sync::mpsc;
use tracing::{info, warn};
use ui::{cloud_view::to_lines, palette::stdout_color_capability};

const FALLBACK_TERMINAL_SIZE: (u16, u16) = (80, 24);

pub async fn run(cli: Cli) -> Result<()> {
    let words = load_words(&cli)?;
    let file_settings = load_file_settings(&cli)?;
    let settings = RuntimeSettings::resolve(&cli, &file_settings);
    info!(words = words.len(), "word list loaded");

    if cli.one_shot {
        let mut stdout = io::stdout().lock();
        return run_one_shot(&cli, settings, words, &mut stdout);
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, &cli, settings, words).await;
    restore_terminal(&mut terminal)?;
    result
}

/// Reads the word list named on the command line, `-` meaning stdin.
pub fn load_words(cli: &Cli) -> Result<Vec<WordItem>> {
    if cli.demo {
        return Ok(demo_words());
    }
    let Some(path) = &cli.input else {
        bail!("no word list given");
    };
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading word list from stdin failed")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("reading word list {} failed", path.display()))?
    };
    parse_word_list(&content).with_context(|| format!("parsing word list {} failed", path.display()))
}

/// Lays out the whole list without pausing and prints the cloud to `out`.
pub fn run_one_shot(
    cli: &Cli,
    mut settings: RuntimeSettings,
    words: Vec<WordItem>,
    out: &mut dyn Write,
) -> Result<()> {
    let (cols, rows) = crossterm::terminal::size().unwrap_or(FALLBACK_TERMINAL_SIZE);
    let (width, height) = canvas_size_for(cli, cols, rows);
    let mut canvas = Canvas::new(width, height, settings.layout.background);
    settings.layout.wait = Duration::ZERO;

    let mut run = build_run(words, &settings, Box::new(Vec::<LayoutEvent>::new()));
    let report = match run.run_to_end(&mut canvas) {
        Ok(report) => report,
        Err(LayoutError::Unsupported) => {
            warn!("text measurement is not supported, nothing to lay out");
            return Ok(());
        }
        Err(err) => return Err(err).context("layout run failed"),
    };
    log_report(&report);

    let capability = stdout_color_capability(cli.effective_color_mode());
    for line in to_lines(&canvas, capability) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

fn log_report(report: &RunReport) {
    info!(
        placed = report.placed(),
        skipped = report.skipped(),
        state = ?report.state,
        "layout finished"
    );
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: &Cli,
    settings: RuntimeSettings,
    words: Vec<WordItem>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let (layout_tx, mut layout_rx) = mpsc::unbounded_channel::<AppEvent>();
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let size = terminal.size()?;
    let mut app = AppState::new(cli, settings, words, (size.width, size.height), layout_tx);

    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        let redraw = tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx, cli).await?;
                }
                true
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx, cli).await?;
                }
                true
            }
            maybe_layout = layout_rx.recv() => {
                if let Some(event) = maybe_layout {
                    app.handle_event(event, &tx, cli).await?;
                }
                false
            }
        };

        if redraw {
            terminal.draw(|frame| ui::render(frame, &app))?;
        }

        if app.mode == AppMode::Quit {
            app.running = false;
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
