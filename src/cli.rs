#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::layout::{Rgb, Shape};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeArg {
    Circle,
    Cardioid,
    Diamond,
    Square,
    TriangleForward,
    #[value(alias = "triangle-upright")]
    #[serde(alias = "triangle-upright")]
    Triangle,
    Pentagon,
    Star,
    /// Regular polygon, see --sides
    Polygon,
}

impl ShapeArg {
    #[must_use]
    pub fn to_shape(self, sides: u32) -> Shape {
        match self {
            Self::Circle => Shape::Circle,
            Self::Cardioid => Shape::Cardioid,
            Self::Diamond => Shape::Diamond,
            Self::Square => Shape::Square,
            Self::TriangleForward => Shape::TriangleForward,
            Self::Triangle => Shape::Triangle,
            Self::Pentagon => Shape::Pentagon,
            Self::Star => Shape::Star,
            Self::Polygon => Shape::regular(sides),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontScaleArg {
    Linear,
    Sqrt,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSchemeArg {
    /// Random dark or light colors, whichever contrasts the background
    #[default]
    Auto,
    RandomDark,
    RandomLight,
    /// Fade from background toward --ink as weight grows
    Weight,
    /// Every word in --ink
    Fixed,
}

fn parse_rgb(value: &str) -> Result<Rgb, String> {
    value.parse::<Rgb>().map_err(|err| err.to_string())
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "terminal-wordcloud",
    version,
    about = "Pack a weighted word list into a word cloud in the terminal"
)]
pub struct Cli {
    /// Word list file with `<weight> <text>` lines (`-` for stdin)
    pub input: Option<PathBuf>,

    /// Use the built-in demo word list
    #[arg(long, conflicts_with = "input")]
    pub demo: bool,

    /// Cloud silhouette
    #[arg(long, value_enum)]
    pub shape: Option<ShapeArg>,

    /// Number of sides for --shape polygon
    #[arg(long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(3..=64))]
    pub sides: u32,

    /// Grid cell edge in pixels (minimum 4)
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// Vertical squash of the cloud (0..1)
    #[arg(long)]
    pub ellipticity: Option<f64>,

    /// Cloud center x in pixels (requires --origin-y)
    #[arg(long)]
    pub origin_x: Option<f64>,

    /// Cloud center y in pixels (requires --origin-x)
    #[arg(long)]
    pub origin_y: Option<f64>,

    /// Try candidate points in generator order instead of shuffled
    #[arg(long)]
    pub no_shuffle: bool,

    /// Probability of turning a word 90° (0..1)
    #[arg(long)]
    pub rotate_ratio: Option<f64>,

    /// Abort the whole run when one word takes longer (0 disables)
    #[arg(long)]
    pub abort_threshold_ms: Option<u64>,

    /// Delay between words in interactive mode
    #[arg(long)]
    pub wait_ms: Option<u64>,

    /// Multiplier from weight to font size in pixels
    #[arg(long)]
    pub weight_factor: Option<f64>,

    /// How weight maps to font size
    #[arg(long, value_enum)]
    pub font_scale: Option<FontScaleArg>,

    /// Skip words whose font size is at or below this many pixels
    #[arg(long)]
    pub min_size: Option<f64>,

    /// Keep existing canvas content and pack around it
    #[arg(long)]
    pub preserve: bool,

    /// Background color (#rrggbb)
    #[arg(long, value_parser = parse_rgb)]
    pub background: Option<Rgb>,

    /// Word color strategy
    #[arg(long, value_enum)]
    pub color_scheme: Option<ColorSchemeArg>,

    /// Ink color for the fixed and weight schemes (#rrggbb)
    #[arg(long, value_parser = parse_rgb)]
    pub ink: Option<Rgb>,

    /// Color output policy
    #[arg(long, value_enum, default_value_t = ColorArg::Auto, conflicts_with = "no_color")]
    pub color: ColorArg,

    /// Alias for --color never
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,

    /// Seed for shuffling and rotation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Canvas width in pixels (default: terminal width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels (default: twice the terminal height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Target FPS for progress redraws (15..60)
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: u8,

    /// Print the finished cloud to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,

    /// Settings file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.origin_x, self.origin_y) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--origin-x and --origin-y must be provided together")
            }
            _ => {}
        }
        if let Some(value) = self.ellipticity
            && !(0.0..=1.0).contains(&value)
        {
            anyhow::bail!("--ellipticity must be within 0..1, got {value}");
        }
        if let Some(value) = self.rotate_ratio
            && !(0.0..=1.0).contains(&value)
        {
            anyhow::bail!("--rotate-ratio must be within 0..1, got {value}");
        }
        if self.input.is_none() && !self.demo {
            anyhow::bail!("provide a word list file (or `-` for stdin), or pass --demo");
        }
        Ok(())
    }

    #[must_use]
    pub fn origin(&self) -> Option<(f64, f64)> {
        self.origin_x.zip(self.origin_y)
    }

    #[must_use]
    pub fn effective_color_mode(&self) -> ColorArg {
        if self.no_color {
            ColorArg::Never
        } else {
            self.color
        }
    }
}
