use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    domain::words::WordItem,
    layout::{
        error::{Deadline, LayoutError, SkipReason, TimeBudgetExceeded},
        footprint::{Footprint, RasterRequest, Rasterizer},
        grid::OccupancyGrid,
        options::{LayoutOptions, max_radius},
        ring::RingCache,
        search::{Placement, SearchOutcome, place},
        surface::{Rgb, Surface},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopped,
    Aborted,
}

impl RunState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Aborted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    Start,
    /// Emitted once per word that finished, placed or skipped.
    Word(WordOutcome),
    Abort,
    Stop,
}

/// Receives lifecycle notifications. Must not block.
pub trait LifecycleSink: Send {
    fn notify(&mut self, event: LayoutEvent);
}

impl LifecycleSink for Vec<LayoutEvent> {
    fn notify(&mut self, event: LayoutEvent) {
        self.push(event);
    }
}

impl LifecycleSink for mpsc::UnboundedSender<LayoutEvent> {
    fn notify(&mut self, event: LayoutEvent) {
        let _ = self.send(event);
    }
}

pub struct DrawRequest<'a> {
    pub word: &'a WordItem,
    pub footprint: &'a Footprint,
    pub placement: &'a Placement,
    pub grid_size: u32,
    pub color: Rgb,
}

/// Paints a committed word onto the surface.
pub trait Renderer: Send {
    fn draw(&mut self, surface: &mut dyn Surface, request: &DrawRequest<'_>);
}

pub trait ColorResolver: Send {
    fn color_for(&mut self, word: &WordItem, font_size: f64, distance: usize, theta: f64) -> Rgb;
}

pub type AbortCallback = Box<dyn FnMut() + Send>;

/// External collaborators of a run.
pub struct Collaborators {
    pub rasterizer: Box<dyn Rasterizer>,
    pub renderer: Box<dyn Renderer>,
    pub colors: Box<dyn ColorResolver>,
    pub sink: Box<dyn LifecycleSink>,
    pub on_abort: Option<AbortCallback>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WordOutcome {
    Placed {
        index: usize,
        text: String,
        font_size: f64,
        placement: Placement,
    },
    Skipped {
        index: usize,
        text: String,
        reason: SkipReason,
    },
}

impl WordOutcome {
    #[must_use]
    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub outcomes: Vec<WordOutcome>,
    pub state: RunState,
}

impl RunReport {
    #[must_use]
    pub fn placed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_placed()).count()
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.placed()
    }
}

struct Workspace {
    grid: OccupancyGrid,
    rings: RingCache,
    max_radius: usize,
}

/// One layout pass over a word list, advanced one word per [`Run::step`].
pub struct Run {
    words: Vec<WordItem>,
    options: LayoutOptions,
    parts: Collaborators,
    rng: StdRng,
    workspace: Option<Workspace>,
    index: usize,
    state: RunState,
    outcomes: Vec<WordOutcome>,
}

impl Run {
    #[must_use]
    pub fn new(words: Vec<WordItem>, options: LayoutOptions, parts: Collaborators) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            words,
            options,
            parts,
            rng,
            workspace: None,
            index: 0,
            state: RunState::Idle,
            outcomes: Vec::new(),
        }
    }

    #[must_use]
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Index of the word the next step will attempt.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn grid(&self) -> Option<&OccupancyGrid> {
        self.workspace.as_ref().map(|ws| &ws.grid)
    }

    #[must_use]
    pub fn outcomes(&self) -> &[WordOutcome] {
        &self.outcomes
    }

    /// Builds the occupancy grid and emits `Start`.
    pub fn begin(&mut self, surface: &mut dyn Surface) -> Result<(), LayoutError> {
        if self.state != RunState::Idle {
            return Err(LayoutError::AlreadyStarted);
        }
        if !self.parts.rasterizer.is_supported() {
            warn!("rasterizer unsupported, layout skipped");
            return Err(LayoutError::Unsupported);
        }
        let (width, height) = (surface.width(), surface.height());
        if width == 0 || height == 0 {
            return Err(LayoutError::EmptySurface { width, height });
        }

        let g = self.options.grid_size();
        let grid = if self.options.clear_canvas {
            surface.fill(self.options.background);
            let (ngx, ngy) = OccupancyGrid::dimensions(width, height, g);
            OccupancyGrid::clear(ngx, ngy)
        } else {
            OccupancyGrid::from_surface(surface, g, self.options.background)
        };
        let (ngx, ngy) = (grid.width(), grid.height());
        let center = self.options.grid_center(ngx, ngy);
        let rings = RingCache::new(center, self.options.ellipticity, self.options.shape.clone());

        info!(
            words = self.words.len(),
            ngx,
            ngy,
            grid_size = g,
            free = grid.free_count(),
            "layout run started"
        );
        self.workspace = Some(Workspace {
            grid,
            rings,
            max_radius: max_radius(ngx, ngy),
        });
        self.index = 0;
        self.state = RunState::Running;
        self.parts.sink.notify(LayoutEvent::Start);
        Ok(())
    }

    /// Places at most one word and returns the resulting state.
    pub fn step(&mut self, surface: &mut dyn Surface) -> RunState {
        if self.state != RunState::Running {
            return self.state;
        }
        let Some(word) = self.words.get(self.index).cloned() else {
            self.finish(RunState::Stopped);
            return self.state;
        };

        let deadline = Deadline::after(self.options.abort_threshold);
        let result = self.place_word(&word, surface, &deadline);
        if let Ok(outcome) = &result {
            debug!(index = self.index, text = %word.text, ?outcome, "word processed");
            self.outcomes.push(outcome.clone());
            self.parts.sink.notify(LayoutEvent::Word(outcome.clone()));
        }

        if result.is_err() || deadline.exceeded() {
            warn!(
                index = self.index,
                text = %word.text,
                budget_ms = self.options.abort_threshold.as_millis() as u64,
                "word exceeded time budget, aborting run"
            );
            if let Some(on_abort) = self.parts.on_abort.as_mut() {
                on_abort();
            }
            self.parts.sink.notify(LayoutEvent::Abort);
            self.finish(RunState::Aborted);
            return self.state;
        }

        self.index += 1;
        self.state
    }

    /// Steps until the run stops or aborts, without yielding.
    pub fn run_to_end(&mut self, surface: &mut dyn Surface) -> Result<RunReport, LayoutError> {
        if self.state == RunState::Idle {
            self.begin(surface)?;
        }
        while !self.step(surface).is_terminal() {}
        Ok(self.report())
    }

    #[must_use]
    pub fn report(&self) -> RunReport {
        RunReport {
            outcomes: self.outcomes.clone(),
            state: self.state,
        }
    }

    #[must_use]
    pub fn into_report(self) -> RunReport {
        RunReport {
            outcomes: self.outcomes,
            state: self.state,
        }
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.parts.sink.notify(LayoutEvent::Stop);
        info!(
            ?state,
            placed = self.outcomes.iter().filter(|o| o.is_placed()).count(),
            attempted = self.outcomes.len(),
            "layout run finished"
        );
    }

    fn should_rotate(&mut self) -> bool {
        let ratio = self.options.rotate_ratio;
        if ratio >= 1.0 {
            true
        } else if ratio <= 0.0 {
            false
        } else {
            self.rng.random_bool(ratio)
        }
    }

    fn place_word(
        &mut self,
        word: &WordItem,
        surface: &mut dyn Surface,
        deadline: &Deadline,
    ) -> Result<WordOutcome, TimeBudgetExceeded> {
        let index = self.index;
        let font_size = self.options.font_scale.font_size(word.weight);
        let request = RasterRequest {
            text: &word.text,
            font_size,
            min_size: self.options.min_size,
            grid_size: self.options.grid_size(),
            grid_cells: self
                .workspace
                .as_ref()
                .map(|ws| (ws.grid.width(), ws.grid.height())),
        };
        let rotated = self.should_rotate();

        let footprint = self.parts.rasterizer.rasterize(&request, deadline)?;
        deadline.check()?;
        let Some(footprint) = footprint else {
            return Ok(WordOutcome::Skipped {
                index,
                text: word.text.clone(),
                reason: SkipReason::BelowMinSize,
            });
        };

        let Some(ws) = self.workspace.as_mut() else {
            return Ok(WordOutcome::Skipped {
                index,
                text: word.text.clone(),
                reason: SkipReason::NoSpace,
            });
        };
        let shuffle = self.options.shuffle.then_some(&mut self.rng);
        let placement = match place(
            &mut ws.grid,
            &mut ws.rings,
            &footprint,
            rotated,
            ws.max_radius,
            shuffle,
            deadline,
        ) {
            SearchOutcome::Placed(placement) => placement,
            SearchOutcome::NoSpace => {
                return Ok(WordOutcome::Skipped {
                    index,
                    text: word.text.clone(),
                    reason: SkipReason::NoSpace,
                });
            }
            SearchOutcome::TimedOut => return Err(TimeBudgetExceeded),
        };

        let color = self
            .parts
            .colors
            .color_for(word, font_size, placement.distance, placement.theta);
        self.parts.renderer.draw(
            surface,
            &DrawRequest {
                word,
                footprint: &footprint,
                placement: &placement,
                grid_size: self.options.grid_size(),
                color,
            },
        );
        Ok(WordOutcome::Placed {
            index,
            text: word.text.clone(),
            font_size,
            placement,
        })
    }
}
