use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use clap::Parser;
use tokio::sync::mpsc;

use crate::{
    cli::Cli,
    domain::words::WordItem,
    layout::{
        Collaborators, ColorResolver, Deadline, DrawRequest, Footprint, LayoutEvent,
        LayoutOptions, RasterRequest, Rasterizer, Renderer, Rgb, Surface, TimeBudgetExceeded,
    },
};

/// Hands out the same footprint for every word.
pub(crate) struct StubRasterizer {
    pub footprint: Footprint,
    pub delay: Duration,
    pub supported: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StubRasterizer {
    pub(crate) fn new(footprint: Footprint) -> Self {
        Self {
            footprint,
            delay: Duration::ZERO,
            supported: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Rasterizer for StubRasterizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn rasterize(
        &mut self,
        request: &RasterRequest<'_>,
        _deadline: &Deadline,
    ) -> Result<Option<Footprint>, TimeBudgetExceeded> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.font_size <= request.min_size {
            return Ok(None);
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        let mut footprint = self.footprint.clone();
        footprint.font_size = request.font_size;
        Ok(Some(footprint))
    }
}

/// Fills every grid cell under the footprint's ink with the word color.
pub(crate) struct CellRenderer;

impl Renderer for CellRenderer {
    fn draw(&mut self, surface: &mut dyn Surface, request: &DrawRequest<'_>) {
        let g = i64::from(request.grid_size);
        let p = request.placement;
        for (dx, dy) in request.footprint.ink_offsets(p.rotated) {
            let (cx, cy) = (p.gx + dx as i64, p.gy + dy as i64);
            for y in cy * g..(cy + 1) * g {
                for x in cx * g..(cx + 1) * g {
                    surface.put_pixel(x, y, request.color);
                }
            }
        }
    }
}

pub(crate) struct SolidColor(pub Rgb);

impl ColorResolver for SolidColor {
    fn color_for(&mut self, _word: &WordItem, _font_size: f64, _distance: usize, _theta: f64) -> Rgb {
        self.0
    }
}

pub(crate) fn collaborators(
    rasterizer: StubRasterizer,
) -> (Collaborators, mpsc::UnboundedReceiver<LayoutEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let parts = Collaborators {
        rasterizer: Box::new(rasterizer),
        renderer: Box::new(CellRenderer),
        colors: Box::new(SolidColor(Rgb::BLACK)),
        sink: Box::new(tx),
        on_abort: None,
    };
    (parts, rx)
}

pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<LayoutEvent>) -> Vec<LayoutEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub(crate) fn words(items: &[(&str, f64)]) -> Vec<WordItem> {
    items
        .iter()
        .map(|(text, weight)| WordItem::new(*text, *weight))
        .collect()
}

/// No shuffle, no rotation, round grid, 4 px cells.
pub(crate) fn deterministic_options() -> LayoutOptions {
    LayoutOptions {
        grid_size: 4,
        ellipticity: 1.0,
        shuffle: false,
        rotate_ratio: 0.0,
        seed: Some(7),
        ..LayoutOptions::default()
    }
}

pub(crate) fn default_test_cli() -> Cli {
    Cli::parse_from(["terminal-wordcloud", "--demo"])
}
