use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, LayoutForwarder, start_frame_task},
        settings::RuntimeSettings,
    },
    cli::Cli,
    domain::words::WordItem,
    layout::{
        Board, Collaborators, LayoutError, LayoutEvent, LifecycleSink, Run, RunState, Surface,
        WordOutcome,
    },
    render::{BitmapRasterizer, Canvas, CanvasPainter},
    ui::palette::{ColorCapability, detect_color_capability},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Packing,
    Finished,
    Unsupported,
    Quit,
}

/// Builds a run wired to the bitmap font and canvas painter.
pub fn build_run(
    words: Vec<WordItem>,
    settings: &RuntimeSettings,
    sink: Box<dyn LifecycleSink>,
) -> Run {
    let colors = settings.color_scheme(&words);
    let parts = Collaborators {
        rasterizer: Box::new(BitmapRasterizer),
        renderer: Box::new(CanvasPainter),
        colors: Box::new(colors),
        sink,
        on_abort: Some(Box::new(|| warn!("word took longer than the abort threshold"))),
    };
    Run::new(words, settings.layout.clone(), parts)
}

/// Canvas pixels for a terminal of `cols x rows`. One row is kept for the
/// status line; each remaining cell shows two pixels stacked.
#[must_use]
pub fn canvas_size_for(cli: &Cli, cols: u16, rows: u16) -> (u32, u32) {
    let width = cli.width.unwrap_or(u32::from(cols));
    let height = cli
        .height
        .unwrap_or(u32::from(rows.saturating_sub(1)) * 2);
    (width, height)
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub board: Board<Canvas>,
    pub words: Vec<WordItem>,
    pub settings: RuntimeSettings,
    pub capability: ColorCapability,
    pub run_state: RunState,
    pub generation: u64,
    pub placed: usize,
    pub skipped: usize,
    pub last_word: Option<String>,
    pub last_error: Option<String>,
    pub frame_tick: u64,
    follows_terminal: bool,
    layout_tx: mpsc::UnboundedSender<AppEvent>,
}

impl AppState {
    pub fn new(
        cli: &Cli,
        settings: RuntimeSettings,
        words: Vec<WordItem>,
        terminal_size: (u16, u16),
        layout_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (width, height) = canvas_size_for(cli, terminal_size.0, terminal_size.1);
        let canvas = Canvas::new(width, height, settings.layout.background);
        Self {
            mode: AppMode::Packing,
            running: true,
            board: Board::new(canvas),
            words,
            settings,
            capability: detect_color_capability(cli.effective_color_mode()),
            run_state: RunState::Idle,
            generation: 0,
            placed: 0,
            skipped: 0,
            last_word: None,
            last_error: None,
            frame_tick: 0,
            follows_terminal: cli.width.is_none() || cli.height.is_none(),
            layout_tx,
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                start_frame_task(tx.clone(), cli.fps);
                self.restart();
            }
            AppEvent::TickFrame => {
                self.frame_tick = self.frame_tick.saturating_add(1);
            }
            AppEvent::Input(event) => self.handle_input(event, tx, cli).await?,
            AppEvent::Layout { generation, event } => {
                if generation == self.generation {
                    self.apply_layout_event(event);
                } else {
                    debug!(generation, "dropping event from cancelled run");
                }
            }
            AppEvent::Quit => {
                self.board.cancel();
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    tx.send(AppEvent::Quit).await?;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    tx.send(AppEvent::Quit).await?;
                }
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('s') => {
                    self.settings.layout.shuffle = !self.settings.layout.shuffle;
                    info!(shuffle = self.settings.layout.shuffle, "toggled shuffle");
                    self.restart();
                }
                _ => {}
            },
            Event::Resize(cols, rows) if self.follows_terminal => {
                let size = canvas_size_for(cli, cols, rows);
                self.resize_canvas(size);
                self.restart();
            }
            _ => {}
        }

        Ok(())
    }

    /// Cancels the pending run, if any, and starts a fresh one on the same
    /// board. Must be called from within a tokio runtime.
    pub fn restart(&mut self) {
        self.board.cancel();
        self.generation = self.generation.wrapping_add(1);
        self.placed = 0;
        self.skipped = 0;
        self.last_word = None;
        self.last_error = None;
        self.run_state = RunState::Idle;
        self.mode = AppMode::Packing;

        let sink = LayoutForwarder::new(self.generation, self.layout_tx.clone());
        let run = build_run(self.words.clone(), &self.settings, Box::new(sink));
        match self.board.start(run) {
            Ok(()) => {}
            Err(LayoutError::Unsupported) => {
                warn!("text measurement is not supported, nothing to lay out");
                self.mode = AppMode::Unsupported;
            }
            Err(err) => {
                warn!(error = %err, "layout run did not start");
                self.last_error = Some(err.to_string());
                self.mode = AppMode::Finished;
            }
        }
    }

    fn resize_canvas(&mut self, (width, height): (u32, u32)) {
        let surface = self.board.surface();
        let mut canvas = surface
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if (canvas.width(), canvas.height()) != (width, height) {
            debug!(width, height, "resizing canvas");
            canvas.reset(width, height, self.settings.layout.background);
        }
    }

    fn apply_layout_event(&mut self, event: LayoutEvent) {
        match event {
            LayoutEvent::Start => self.run_state = RunState::Running,
            LayoutEvent::Word(WordOutcome::Placed { text, .. }) => {
                self.placed += 1;
                self.last_word = Some(text);
            }
            LayoutEvent::Word(WordOutcome::Skipped { .. }) => self.skipped += 1,
            LayoutEvent::Abort => self.run_state = RunState::Aborted,
            LayoutEvent::Stop => {
                if self.run_state != RunState::Aborted {
                    self.run_state = RunState::Stopped;
                }
                self.mode = AppMode::Finished;
            }
        }
    }
}
