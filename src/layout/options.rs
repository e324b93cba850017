use std::{fmt, sync::Arc, time::Duration};

use crate::layout::{shape::Shape, surface::Rgb};

pub const MIN_GRID_SIZE: u32 = 4;

/// Maps a word weight to a font size in pixels.
#[derive(Clone)]
pub enum FontScale {
    Linear(f64),
    Sqrt(f64),
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl FontScale {
    #[must_use]
    pub fn font_size(&self, weight: f64) -> f64 {
        match self {
            Self::Linear(factor) => weight * factor,
            Self::Sqrt(factor) => weight.max(0.0).sqrt() * factor,
            Self::Custom(f) => f(weight),
        }
    }
}

impl Default for FontScale {
    fn default() -> Self {
        Self::Linear(1.0)
    }
}

impl fmt::Debug for FontScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(k) => f.debug_tuple("Linear").field(k).finish(),
            Self::Sqrt(k) => f.debug_tuple("Sqrt").field(k).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Immutable per-run layout configuration.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub grid_size: u32,
    pub ellipticity: f64,
    /// Cloud center in pixels; `None` uses the middle of the surface.
    pub origin: Option<(f64, f64)>,
    pub shuffle: bool,
    /// Zero disables the per-word budget.
    pub abort_threshold: Duration,
    pub wait: Duration,
    pub font_scale: FontScale,
    pub min_size: f64,
    pub rotate_ratio: f64,
    pub shape: Shape,
    pub clear_canvas: bool,
    pub background: Rgb,
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            grid_size: 8,
            ellipticity: 0.65,
            origin: None,
            shuffle: true,
            abort_threshold: Duration::ZERO,
            wait: Duration::ZERO,
            font_scale: FontScale::default(),
            min_size: 0.0,
            rotate_ratio: 0.1,
            shape: Shape::Circle,
            clear_canvas: true,
            background: Rgb::WHITE,
            seed: None,
        }
    }
}

impl LayoutOptions {
    #[must_use]
    pub fn grid_size(&self) -> u32 {
        self.grid_size.max(MIN_GRID_SIZE)
    }

    /// Center of the cloud in grid coordinates.
    #[must_use]
    pub fn grid_center(&self, ngx: usize, ngy: usize) -> (f64, f64) {
        match self.origin {
            Some((x, y)) => {
                let g = f64::from(self.grid_size());
                (x / g, y / g)
            }
            None => (ngx as f64 / 2.0, ngy as f64 / 2.0),
        }
    }
}

#[must_use]
pub fn max_radius(ngx: usize, ngy: usize) -> usize {
    ((ngx * ngx + ngy * ngy) as f64).sqrt().floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_has_a_floor() {
        let options = LayoutOptions {
            grid_size: 2,
            ..LayoutOptions::default()
        };
        assert_eq!(options.grid_size(), MIN_GRID_SIZE);
        assert_eq!(LayoutOptions::default().grid_size(), 8);
    }

    #[test]
    fn center_defaults_to_grid_middle() {
        let options = LayoutOptions::default();
        assert_eq!(options.grid_center(13, 7), (6.5, 3.5));
    }

    #[test]
    fn origin_is_converted_to_grid_units() {
        let options = LayoutOptions {
            origin: Some((40.0, 16.0)),
            ..LayoutOptions::default()
        };
        assert_eq!(options.grid_center(100, 100), (5.0, 2.0));
    }

    #[test]
    fn max_radius_is_grid_diagonal() {
        assert_eq!(max_radius(10, 10), 14);
        assert_eq!(max_radius(3, 4), 5);
        assert_eq!(max_radius(0, 0), 0);
    }

    #[test]
    fn font_scales() {
        assert!((FontScale::Linear(2.0).font_size(10.0) - 20.0).abs() < f64::EPSILON);
        assert!((FontScale::Sqrt(3.0).font_size(16.0) - 12.0).abs() < f64::EPSILON);
        assert!(FontScale::Sqrt(3.0).font_size(-4.0).abs() < f64::EPSILON);
        let custom = FontScale::Custom(Arc::new(|w| w + 1.0));
        assert!((custom.font_size(1.0) - 2.0).abs() < f64::EPSILON);
    }
}
