use std::{fmt, sync::Arc};

use rand::Rng;

use crate::{
    domain::words::WordItem,
    layout::{ColorResolver, Rgb},
};

pub type ColorFn = Arc<dyn Fn(&WordItem, f64, usize, f64) -> Rgb + Send + Sync>;

#[derive(Clone)]
pub enum ColorScheme {
    Fixed(Rgb),
    RandomDark,
    RandomLight,
    /// Interpolates between two colors over the weight range.
    ByWeight {
        low: Rgb,
        high: Rgb,
        min_weight: f64,
        max_weight: f64,
    },
    Custom(ColorFn),
}

impl ColorScheme {
    /// Weight gradient spanning the weights of `words`.
    #[must_use]
    pub fn by_weight(low: Rgb, high: Rgb, words: &[WordItem]) -> Self {
        let min_weight = words.iter().map(|w| w.weight).fold(f64::INFINITY, f64::min);
        let max_weight = words
            .iter()
            .map(|w| w.weight)
            .fold(f64::NEG_INFINITY, f64::max);
        Self::ByWeight {
            low,
            high,
            min_weight,
            max_weight,
        }
    }

    /// Default palette for a background: dark words on light backgrounds.
    #[must_use]
    pub fn for_background(background: Rgb) -> Self {
        let luma = 0.299 * f64::from(background.r)
            + 0.587 * f64::from(background.g)
            + 0.114 * f64::from(background.b);
        if luma > 127.0 {
            Self::RandomDark
        } else {
            Self::RandomLight
        }
    }
}

impl ColorResolver for ColorScheme {
    fn color_for(&mut self, word: &WordItem, font_size: f64, distance: usize, theta: f64) -> Rgb {
        match self {
            Self::Fixed(color) => *color,
            Self::RandomDark => {
                let mut rng = rand::rng();
                Rgb::from_hsl(
                    rng.random_range(0.0..360.0),
                    rng.random_range(0.3..0.8),
                    rng.random_range(0.1..0.4),
                )
            }
            Self::RandomLight => {
                let mut rng = rand::rng();
                Rgb::from_hsl(
                    rng.random_range(0.0..360.0),
                    rng.random_range(0.3..0.8),
                    rng.random_range(0.5..0.8),
                )
            }
            Self::ByWeight {
                low,
                high,
                min_weight,
                max_weight,
            } => {
                let span = *max_weight - *min_weight;
                let t = if span.is_finite() && span > 0.0 {
                    (word.weight - *min_weight) / span
                } else {
                    1.0
                };
                low.lerp(*high, t)
            }
            Self::Custom(f) => f(word, font_size, distance, theta),
        }
    }
}

impl fmt::Debug for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(color) => f.debug_tuple("Fixed").field(color).finish(),
            Self::RandomDark => f.write_str("RandomDark"),
            Self::RandomLight => f.write_str("RandomLight"),
            Self::ByWeight { low, high, .. } => f
                .debug_struct("ByWeight")
                .field("low", low)
                .field("high", high)
                .finish_non_exhaustive(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
