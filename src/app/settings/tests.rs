use std::{ffi::OsString, time::Duration};

use tempfile::NamedTempFile;

use super::{
    FileSettings, RuntimeSettings, load_file_settings, read_file_settings, settings_path_from,
};
use crate::{
    cli::{ColorSchemeArg, FontScaleArg},
    layout::{FontScale, Rgb, Shape},
    render::ColorScheme,
    test_support::default_test_cli,
};

#[test]
fn cli_defaults_match_layout_defaults() {
    let settings = RuntimeSettings::from_cli_defaults(&default_test_cli());
    assert_eq!(settings.layout.grid_size, 8);
    assert!((settings.layout.ellipticity - 0.65).abs() < f64::EPSILON);
    assert!(settings.layout.shuffle);
    assert!(settings.layout.clear_canvas);
    assert!(settings.layout.shape.is_circle());
    assert_eq!(settings.layout.abort_threshold, Duration::ZERO);
    assert_eq!(settings.color_scheme, ColorSchemeArg::Auto);
}

#[test]
fn file_values_fill_in_defaults() {
    let file = FileSettings {
        shape: Some("star".to_string()),
        grid_size: Some(6),
        shuffle: Some(false),
        wait_ms: Some(40),
        font_scale: Some(FontScaleArg::Sqrt),
        weight_factor: Some(3.0),
        background: Some(Rgb::BLACK),
        ..FileSettings::default()
    };
    let settings = RuntimeSettings::resolve(&default_test_cli(), &file);
    assert!(matches!(settings.layout.shape, Shape::Star));
    assert_eq!(settings.layout.grid_size, 6);
    assert!(!settings.layout.shuffle);
    assert_eq!(settings.layout.wait, Duration::from_millis(40));
    assert!(matches!(settings.layout.font_scale, FontScale::Sqrt(k) if (k - 3.0).abs() < 1e-12));
    assert_eq!(settings.layout.background, Rgb::BLACK);
}

#[test]
fn cli_flags_win_over_file() {
    let mut cli = default_test_cli();
    cli.grid_size = Some(12);
    cli.no_shuffle = true;
    cli.preserve = true;
    cli.seed = Some(99);
    cli.color_scheme = Some(ColorSchemeArg::Fixed);

    let file = FileSettings {
        grid_size: Some(6),
        shuffle: Some(true),
        clear_canvas: Some(true),
        seed: Some(1),
        color_scheme: Some(ColorSchemeArg::RandomLight),
        ..FileSettings::default()
    };
    let settings = RuntimeSettings::resolve(&cli, &file);
    assert_eq!(settings.layout.grid_size, 12);
    assert!(!settings.layout.shuffle);
    assert!(!settings.layout.clear_canvas);
    assert_eq!(settings.layout.seed, Some(99));
    assert_eq!(settings.color_scheme, ColorSchemeArg::Fixed);
}

#[test]
fn unknown_file_shape_falls_back_to_circle() {
    let file = FileSettings {
        shape: Some("hexagram".to_string()),
        ..FileSettings::default()
    };
    let settings = RuntimeSettings::resolve(&default_test_cli(), &file);
    assert!(settings.layout.shape.is_circle());
}

#[test]
fn polygon_in_file_uses_file_sides() {
    let file = FileSettings {
        shape: Some("polygon".to_string()),
        sides: Some(7),
        ..FileSettings::default()
    };
    let settings = RuntimeSettings::resolve(&default_test_cli(), &file);
    assert!(matches!(settings.layout.shape, Shape::Polygon { sides: 7, .. }));
}

#[test]
fn fixed_scheme_defaults_ink_to_contrast() {
    let mut cli = default_test_cli();
    cli.color_scheme = Some(ColorSchemeArg::Fixed);
    cli.background = Some(Rgb::BLACK);
    let settings = RuntimeSettings::resolve(&cli, &FileSettings::default());
    assert!(matches!(settings.color_scheme(&[]), ColorScheme::Fixed(c) if c == Rgb::WHITE));

    cli.ink = Some(Rgb::new(200, 10, 10));
    let settings = RuntimeSettings::resolve(&cli, &FileSettings::default());
    assert!(
        matches!(settings.color_scheme(&[]), ColorScheme::Fixed(c) if c == Rgb::new(200, 10, 10))
    );
}

#[test]
fn settings_file_reads_shape_and_origin() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(
        file.path(),
        r##"{ "shape": "cardioid", "origin": [120.0, 40.0], "background": "#102030", "color_scheme": "weight" }"##,
    )
    .expect("write settings");
    let restored = read_file_settings(file.path()).expect("read settings");
    assert_eq!(
        restored,
        FileSettings {
            shape: Some("cardioid".to_string()),
            origin: Some((120.0, 40.0)),
            background: Some(Rgb::new(16, 32, 48)),
            color_scheme: Some(ColorSchemeArg::Weight),
            ..FileSettings::default()
        }
    );
}

#[test]
fn colors_are_hex_strings_in_json() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(
        file.path(),
        r##"{ "background": "#000000", "color_scheme": "random-light", "font_scale": "sqrt" }"##,
    )
    .expect("write settings");
    let settings = read_file_settings(file.path()).expect("read settings");
    assert_eq!(settings.background, Some(Rgb::BLACK));
    assert_eq!(settings.color_scheme, Some(ColorSchemeArg::RandomLight));
    assert_eq!(settings.font_scale, Some(FontScaleArg::Sqrt));
}

#[test]
fn unknown_keys_are_rejected() {
    let file = NamedTempFile::new().expect("create temp settings file");
    std::fs::write(file.path(), r#"{ "gridsize": 4 }"#).expect("write settings");
    let err = read_file_settings(file.path()).expect_err("unknown key");
    assert!(err.to_string().contains("parsing settings file"), "{err}");
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut cli = default_test_cli();
    cli.config = Some(dir.path().join("missing.json"));
    assert!(load_file_settings(&cli).is_err());

    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{ "grid_size": 5 }"#).expect("write settings");
    cli.config = Some(path);
    let settings = load_file_settings(&cli).expect("load settings");
    assert_eq!(settings.grid_size, Some(5));
}

#[test]
fn settings_path_prefers_config_dir() {
    let path = settings_path_from(
        Some(OsString::from("/tmp/wordcloud")),
        Some(OsString::from("/home/user")),
    )
    .expect("path");
    assert_eq!(path, std::path::Path::new("/tmp/wordcloud/settings.json"));

    let path = settings_path_from(None, Some(OsString::from("/home/user"))).expect("path");
    assert!(path.ends_with(".config/terminal-wordcloud/settings.json"));

    assert!(settings_path_from(None, None).is_none());
}
