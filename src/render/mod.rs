pub mod canvas;
pub mod color;
pub mod glyph;

pub use canvas::Canvas;
pub use color::ColorScheme;
pub use glyph::{BitmapRasterizer, CanvasPainter};
