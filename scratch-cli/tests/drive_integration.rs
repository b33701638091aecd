//! Driver Integration Tests
//!
//! Runs complete replays the way the binary does and checks the report and
//! the exported frame.

use scratch_cli::{export_png, load_engine_config, run, Device, DriverConfig, DriverError, Pattern};
use scratch_core::{FeedbackSettings, ScratchConfig, ScratchState};

fn config(pattern: Pattern) -> DriverConfig {
    DriverConfig {
        pattern,
        engine: ScratchConfig::default().with_decoration_seed(77),
        ..DriverConfig::default()
    }
}

#[test]
fn test_dense_touch_replay_wins() {
    let (session, report) = run(&config(Pattern::Dense)).expect("valid config");
    assert_eq!(report.state, ScratchState::Won);
    assert_eq!(report.wins, 1);
    assert!(report.coverage > 0.85);
    assert_eq!(report.rub_time_secs, u64::from(report.ticks));
    assert!(session.is_won());
}

#[test]
fn test_dense_mouse_replay_from_offset_bounds() {
    let config = DriverConfig {
        device: Device::Mouse,
        bounds_origin: (25.0, 300.0),
        ..config(Pattern::Dense)
    };
    let (_, report) = run(&config).expect("valid config");
    assert_eq!(report.state, ScratchState::Won);
}

#[test]
fn test_center_replay_keeps_scratching() {
    let (_, report) = run(&config(Pattern::Center)).expect("valid config");
    assert_eq!(report.state, ScratchState::Scratching);
    assert_eq!(report.wins, 0);
    assert_eq!(report.ticks, 2);
    assert!(report.coverage > 0.0 && report.coverage < 0.05);
}

#[test]
fn test_cues_respect_settings() {
    let loud = run(&config(Pattern::Center)).expect("valid config").1;
    // One rub cue per event: each plays a sound and a pulse
    assert_eq!(loud.cues_played, 2 * loud.rubs as usize);

    let quiet = DriverConfig {
        settings: FeedbackSettings {
            sound_enabled: false,
            haptics_enabled: false,
        },
        ..config(Pattern::Center)
    };
    let (_, report) = run(&quiet).expect("valid config");
    assert_eq!(report.cues_played, 0);
    assert!(report.rubs > 0);
}

#[test]
fn test_export_png_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mask.png");

    let (session, _) = run(&config(Pattern::Center)).expect("valid config");
    export_png(&session.frame().expect("laid out"), &path).expect("export");

    let decoded = image::open(&path).expect("readable png").to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 300));
    assert_eq!(decoded.get_pixel(150, 150).0[3], 0);
    assert_eq!(decoded.get_pixel(2, 2).0[3], 255);
}

#[test]
fn test_zero_area_export_fails() {
    let config = DriverConfig {
        width: 0,
        ..config(Pattern::Center)
    };
    let (session, report) = run(&config).expect("valid config");
    assert_eq!(report.state, ScratchState::Idle);
    assert!(session.frame().is_err());
}

#[test]
fn test_config_file_loading() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engine.json");
    std::fs::write(&path, r#"{"win_threshold": 0.5, "erase_radius": 12.0}"#).expect("write");

    let engine = load_engine_config(&path).expect("valid file");
    assert!((engine.win_threshold - 0.5).abs() < f64::EPSILON);
    assert!((engine.erase_radius - 12.0).abs() < f32::EPSILON);

    std::fs::write(&path, r#"{"win_threshold": 2.0}"#).expect("write");
    assert!(matches!(
        load_engine_config(&path),
        Err(DriverError::Engine(_))
    ));
}
