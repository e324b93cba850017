use std::{
    f64::consts::{PI, TAU},
    fmt,
    sync::Arc,
};

pub type ShapeFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Silhouette of the cloud, expressed as a radial scale per angle.
#[derive(Clone, Default)]
pub enum Shape {
    #[default]
    Circle,
    Cardioid,
    Diamond,
    Square,
    TriangleForward,
    Triangle,
    Pentagon,
    Star,
    /// k-fold polygon: `1 / (cos t + slope * sin t)` with
    /// `t = (theta + phase) mod (2π / sides)`.
    Polygon { sides: u32, slope: f64, phase: f64 },
    /// Values outside (0, 1] are accepted as-is.
    Custom(ShapeFn),
}

const STAR_PHASE: f64 = 0.955;
const STAR_SLOPE: f64 = 3.077_68;
const PENTAGON_SLOPE: f64 = 0.726_543;

impl Shape {
    #[must_use]
    pub fn regular(sides: u32) -> Self {
        let sides = sides.max(3);
        Self::Polygon {
            sides,
            slope: (PI / f64::from(sides)).tan(),
            phase: 0.0,
        }
    }

    #[must_use]
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Case-insensitive lookup of a named shape.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let shape = match name.trim().to_ascii_lowercase().as_str() {
            "circle" => Self::Circle,
            "cardioid" => Self::Cardioid,
            "diamond" => Self::Diamond,
            "square" => Self::Square,
            "triangle-forward" => Self::TriangleForward,
            "triangle" | "triangle-upright" => Self::Triangle,
            "pentagon" => Self::Pentagon,
            "star" => Self::Star,
            _ => return None,
        };
        Some(shape)
    }

    #[must_use]
    pub fn is_circle(&self) -> bool {
        matches!(self, Self::Circle)
    }

    #[must_use]
    pub fn scale(&self, theta: f64) -> f64 {
        match self {
            Self::Circle => 1.0,
            Self::Cardioid => 1.0 - theta.sin(),
            Self::Diamond => polygon(theta, 4, 1.0, 0.0),
            Self::Square => (1.0 / theta.cos().abs()).min(1.0 / theta.sin().abs()),
            Self::TriangleForward => polygon(theta, 3, 3f64.sqrt(), 0.0),
            Self::Triangle => polygon(theta, 3, 3f64.sqrt(), PI * 3.0 / 2.0),
            Self::Pentagon => polygon(theta, 5, PENTAGON_SLOPE, STAR_PHASE),
            Self::Star => star(theta),
            Self::Polygon {
                sides,
                slope,
                phase,
            } => polygon(theta, (*sides).max(1), *slope, *phase),
            Self::Custom(f) => f(theta),
        }
    }
}

fn polygon(theta: f64, sides: u32, slope: f64, phase: f64) -> f64 {
    let t = (theta + phase) % (TAU / f64::from(sides));
    1.0 / (t.cos() + slope * t.sin())
}

fn star(theta: f64) -> f64 {
    let spoke = TAU / 10.0;
    let t = (theta + STAR_PHASE) % spoke;
    if (theta + STAR_PHASE) % (TAU / 5.0) - spoke >= 0.0 {
        1.0 / ((spoke - t).cos() + STAR_SLOPE * (spoke - t).sin())
    } else {
        1.0 / (t.cos() + STAR_SLOPE * t.sin())
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circle => f.write_str("Circle"),
            Self::Cardioid => f.write_str("Cardioid"),
            Self::Diamond => f.write_str("Diamond"),
            Self::Square => f.write_str("Square"),
            Self::TriangleForward => f.write_str("TriangleForward"),
            Self::Triangle => f.write_str("Triangle"),
            Self::Pentagon => f.write_str("Pentagon"),
            Self::Star => f.write_str("Star"),
            Self::Polygon {
                sides,
                slope,
                phase,
            } => f
                .debug_struct("Polygon")
                .field("sides", sides)
                .field("slope", slope)
                .field("phase", phase)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
