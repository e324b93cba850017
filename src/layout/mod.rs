//! Word cloud packing engine.
//!
//! A [`run::Run`] walks the word list in order. Each word is rasterized into a
//! [`footprint::Footprint`], then [`search`] tries candidate points from the
//! [`ring::RingCache`] outward from the center until the footprint's ink fits
//! on free cells of the [`grid::OccupancyGrid`]. [`scheduler::Board`] drives a
//! run cooperatively on tokio, one word per tick.

pub mod error;
pub mod footprint;
pub mod grid;
pub mod options;
pub mod ring;
pub mod run;
pub mod scheduler;
pub mod search;
pub mod shape;
pub mod surface;

pub use error::{Deadline, LayoutError, SkipReason, TimeBudgetExceeded};
pub use footprint::{Footprint, RasterRequest, Rasterizer};
pub use grid::OccupancyGrid;
pub use options::{FontScale, LayoutOptions};
pub use run::{
    Collaborators, ColorResolver, DrawRequest, LayoutEvent, LifecycleSink, Renderer, Run,
    RunReport, RunState, WordOutcome,
};
pub use scheduler::{Board, RunHandle};
pub use search::Placement;
pub use shape::Shape;
pub use surface::{Rgb, Surface};
