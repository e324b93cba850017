use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    cli::{Cli, ColorSchemeArg, FontScaleArg, ShapeArg},
    domain::words::WordItem,
    layout::{FontScale, LayoutOptions, Rgb, Shape},
    render::ColorScheme,
};

const DEFAULT_WEIGHT_FACTOR: f64 = 1.0;

/// Defaults read from the settings file. Every field is optional; CLI flags
/// win over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct FileSettings {
    pub shape: Option<String>,
    pub sides: Option<u32>,
    pub grid_size: Option<u32>,
    pub ellipticity: Option<f64>,
    pub origin: Option<(f64, f64)>,
    pub shuffle: Option<bool>,
    pub rotate_ratio: Option<f64>,
    pub abort_threshold_ms: Option<u64>,
    pub wait_ms: Option<u64>,
    pub weight_factor: Option<f64>,
    pub font_scale: Option<FontScaleArg>,
    pub min_size: Option<f64>,
    pub clear_canvas: Option<bool>,
    pub background: Option<Rgb>,
    pub color_scheme: Option<ColorSchemeArg>,
    pub ink: Option<Rgb>,
    pub seed: Option<u64>,
}

/// Effective settings after merging the file with the command line.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub layout: LayoutOptions,
    pub color_scheme: ColorSchemeArg,
    pub ink: Option<Rgb>,
}

impl RuntimeSettings {
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self::resolve(cli, &FileSettings::default())
    }

    pub fn resolve(cli: &Cli, file: &FileSettings) -> Self {
        let defaults = LayoutOptions::default();

        let shape = match cli.shape {
            Some(arg) => arg.to_shape(cli.sides),
            None => file
                .shape
                .as_deref()
                .map_or(defaults.shape.clone(), |name| {
                    shape_from_file(name, file.sides.unwrap_or(cli.sides))
                }),
        };

        let factor = cli
            .weight_factor
            .or(file.weight_factor)
            .unwrap_or(DEFAULT_WEIGHT_FACTOR);
        let font_scale = match cli.font_scale.or(file.font_scale) {
            Some(FontScaleArg::Sqrt) => FontScale::Sqrt(factor),
            Some(FontScaleArg::Linear) | None => FontScale::Linear(factor),
        };

        let layout = LayoutOptions {
            grid_size: cli.grid_size.or(file.grid_size).unwrap_or(defaults.grid_size),
            ellipticity: cli
                .ellipticity
                .or(file.ellipticity)
                .unwrap_or(defaults.ellipticity),
            origin: cli.origin().or(file.origin),
            shuffle: if cli.no_shuffle {
                false
            } else {
                file.shuffle.unwrap_or(defaults.shuffle)
            },
            abort_threshold: cli
                .abort_threshold_ms
                .or(file.abort_threshold_ms)
                .map_or(defaults.abort_threshold, Duration::from_millis),
            wait: cli
                .wait_ms
                .or(file.wait_ms)
                .map_or(defaults.wait, Duration::from_millis),
            font_scale,
            min_size: cli.min_size.or(file.min_size).unwrap_or(defaults.min_size),
            rotate_ratio: cli
                .rotate_ratio
                .or(file.rotate_ratio)
                .unwrap_or(defaults.rotate_ratio),
            shape,
            clear_canvas: if cli.preserve {
                false
            } else {
                file.clear_canvas.unwrap_or(defaults.clear_canvas)
            },
            background: cli
                .background
                .or(file.background)
                .unwrap_or(defaults.background),
            seed: cli.seed.or(file.seed),
        };

        Self {
            layout,
            color_scheme: cli.color_scheme.or(file.color_scheme).unwrap_or_default(),
            ink: cli.ink.or(file.ink),
        }
    }

    /// Word colors for `words` on the configured background.
    #[must_use]
    pub fn color_scheme(&self, words: &[WordItem]) -> ColorScheme {
        let background = self.layout.background;
        let ink = self.ink.unwrap_or_else(|| contrasting_ink(background));
        match self.color_scheme {
            ColorSchemeArg::Auto => ColorScheme::for_background(background),
            ColorSchemeArg::RandomDark => ColorScheme::RandomDark,
            ColorSchemeArg::RandomLight => ColorScheme::RandomLight,
            ColorSchemeArg::Weight => {
                ColorScheme::by_weight(background.lerp(ink, 0.35), ink, words)
            }
            ColorSchemeArg::Fixed => ColorScheme::Fixed(ink),
        }
    }
}

fn contrasting_ink(background: Rgb) -> Rgb {
    match ColorScheme::for_background(background) {
        ColorScheme::RandomLight => Rgb::WHITE,
        _ => Rgb::BLACK,
    }
}

fn shape_from_file(name: &str, sides: u32) -> Shape {
    if name.trim().eq_ignore_ascii_case("polygon") {
        return ShapeArg::Polygon.to_shape(sides);
    }
    Shape::from_name(name).unwrap_or_else(|| {
        warn!(shape = name, "unknown shape in settings file, using circle");
        Shape::Circle
    })
}

/// Loads the settings file from `--config` or the default location. A missing
/// default file yields empty settings; a missing `--config` file is an error.
pub fn load_file_settings(cli: &Cli) -> anyhow::Result<FileSettings> {
    if let Some(path) = &cli.config {
        return read_file_settings(path);
    }
    match settings_path() {
        Some(path) if path.exists() => read_file_settings(&path),
        _ => Ok(FileSettings::default()),
    }
}

pub fn read_file_settings(path: &Path) -> anyhow::Result<FileSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {} failed", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing settings file {} failed", path.display()))
}

pub fn settings_path() -> Option<PathBuf> {
    settings_path_from(
        std::env::var_os("WORDCLOUD_CONFIG_DIR"),
        std::env::var_os("HOME"),
    )
}

fn settings_path_from(config_dir: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = config_dir {
        return Some(PathBuf::from(base).join("settings.json"));
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("terminal-wordcloud")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests;
