//! # Scratch CLI
//!
//! Headless host for the scratch engine. It builds a session, replays a
//! scripted drag with synthetic timestamps, and can write the final mask
//! frame to a PNG.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p scratch-cli -- --pattern dense --out mask.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `DriverConfig` - Surface size, drag pattern and engine configuration
//! - `run` - Replays the drag and returns a `DriveReport`
//! - `export_png` - Writes a frame through the `image` crate

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use scratch_core::{
    Cue, CueFeedback, CueSink, FeedbackSettings, Frame, InputEvent, RecordingFeedback, RubStats,
    ScratchConfig, ScratchError, ScratchOutcome, ScratchSession, ScratchState, SurfaceBounds, Tee,
    TouchEvent,
};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Engine rejected the configuration or could not produce a frame.
    #[error(transparent)]
    Engine(#[from] ScratchError),

    /// Reading the config file failed.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Encoding or writing the PNG failed.
    #[error("Failed to export frame: {0}")]
    Export(String),
}

/// Scripted drag shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Back-and-forth rub across the whole surface.
    Dense,
    /// A single touch at the center.
    Center,
}

/// Which device the synthetic events imitate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Mouse drag with the primary button held.
    Mouse,
    /// Single-finger touch drag.
    Touch,
}

/// Command-line arguments for the scratch driver.
#[derive(Debug, Clone, Parser)]
#[command(name = "scratch-reveal")]
#[command(about = "Replay a scripted rub over a scratch-reveal mask")]
#[command(version)]
pub struct CliArgs {
    /// Surface width in pixels
    #[arg(long, default_value = "300")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "300")]
    pub height: u32,

    /// Drag to replay
    #[arg(long, value_enum, default_value = "dense")]
    pub pattern: Pattern,

    /// Input device to imitate
    #[arg(long, value_enum, default_value = "touch")]
    pub device: Device,

    /// Milliseconds between synthetic move events
    #[arg(long, default_value = "16")]
    pub frame_ms: u64,

    /// Engine configuration as JSON
    #[arg(long, env = "SCRATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fixed decoration seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the final mask frame as PNG
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Disable sound cues
    #[arg(long, env = "SCRATCH_MUTE")]
    pub mute: bool,

    /// Disable haptic cues
    #[arg(long, env = "SCRATCH_NO_HAPTICS")]
    pub no_haptics: bool,
}

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Drag to replay.
    pub pattern: Pattern,
    /// Device to imitate.
    pub device: Device,
    /// Milliseconds between move events.
    pub frame_ms: u64,
    /// Where the surface sits on screen.
    pub bounds_origin: (f32, f32),
    /// Engine configuration.
    pub engine: ScratchConfig,
    /// Sensory cue toggles.
    pub settings: FeedbackSettings,
    /// PNG output path.
    pub out: Option<PathBuf>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            pattern: Pattern::Dense,
            device: Device::Touch,
            frame_ms: 16,
            bounds_origin: (0.0, 0.0),
            engine: ScratchConfig::default(),
            settings: FeedbackSettings::default(),
            out: None,
        }
    }
}

impl DriverConfig {
    /// Build a driver configuration from parsed arguments, loading the
    /// engine config file if one was given.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is invalid.
    pub fn from_args(args: CliArgs) -> Result<Self, DriverError> {
        let mut engine = match &args.config {
            Some(path) => load_engine_config(path)?,
            None => ScratchConfig::default(),
        };
        if let Some(seed) = args.seed {
            engine = engine.with_decoration_seed(seed);
        }
        Ok(Self {
            width: args.width,
            height: args.height,
            pattern: args.pattern,
            device: args.device,
            frame_ms: args.frame_ms.max(1),
            bounds_origin: (0.0, 0.0),
            engine,
            settings: FeedbackSettings {
                sound_enabled: !args.mute,
                haptics_enabled: !args.no_haptics,
            },
            out: args.out,
        })
    }
}

/// Read and validate an engine configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_engine_config(path: &Path) -> Result<ScratchConfig, DriverError> {
    let json = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ScratchConfig::from_json(&json)?)
}

/// Cue sink that logs and keeps what it played.
#[derive(Debug, Default)]
pub struct CueLog {
    /// Cues in play order.
    pub played: Vec<Cue>,
}

impl CueSink for CueLog {
    fn play(&mut self, cue: Cue) {
        tracing::debug!("Cue: {:?}", cue);
        self.played.push(cue);
    }
}

/// The feedback stack the driver wires into its session.
pub type DriverFeedback = Tee<RubStats, Tee<RecordingFeedback, CueFeedback<CueLog>>>;

/// Summary of one replay.
#[derive(Debug, Clone, Serialize)]
pub struct DriveReport {
    /// Drag that was replayed.
    pub pattern: Pattern,
    /// Move events sent.
    pub events: usize,
    /// Final lifecycle state.
    pub state: ScratchState,
    /// Coverage at the last tick.
    pub coverage: f64,
    /// Progress ticks fired.
    pub ticks: u32,
    /// Wins fired.
    pub wins: u32,
    /// Rub cues fired.
    pub rubs: u32,
    /// Accrued rub time.
    pub rub_time_secs: u64,
    /// Sensory cues played.
    pub cues_played: usize,
    /// Synthetic time elapsed, in milliseconds.
    pub elapsed_ms: u64,
}

/// Surface-local points visited by a pattern.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn script(pattern: Pattern, width: u32, height: u32, radius: f32) -> Vec<(f32, f32)> {
    let (w, h) = (width as f32, height as f32);
    match pattern {
        Pattern::Center => vec![(w / 2.0, h / 2.0)],
        Pattern::Dense => {
            // Spacing keeps every pixel well inside some brush disc
            let step = (radius * 0.66).max(1.0);
            let mut points = Vec::new();
            let mut y = 0.0;
            let mut forward = true;
            while y <= h + step / 2.0 {
                let mut x = 0.0;
                while x <= w + step / 2.0 {
                    points.push(if forward { (x, y) } else { (w - x, y) });
                    x += step;
                }
                forward = !forward;
                y += step;
            }
            points
        }
    }
}

fn device_event(device: Device, x: f32, y: f32) -> InputEvent {
    match device {
        Device::Mouse => InputEvent::drag(x, y),
        Device::Touch => InputEvent::Touch(TouchEvent::moved(x, y)),
    }
}

/// Replay the configured drag and return the session and a report.
///
/// After the script, the last contact is held for one more tick interval so
/// the finished stroke gets measured.
///
/// # Errors
///
/// Returns an error if the engine configuration is invalid.
#[allow(clippy::cast_precision_loss)]
pub fn run(
    config: &DriverConfig,
) -> Result<(ScratchSession<DriverFeedback>, DriveReport), DriverError> {
    let feedback = Tee(
        RubStats::default(),
        Tee(
            RecordingFeedback::default(),
            CueFeedback::new(config.settings, CueLog::default()),
        ),
    );
    let mut session =
        ScratchSession::with_size(config.engine.clone(), feedback, config.width, config.height)?;

    let (left, top) = config.bounds_origin;
    let bounds = SurfaceBounds::new(left, top, config.width as f32, config.height as f32);
    let mut points = script(
        config.pattern,
        config.width,
        config.height,
        config.engine.erase_radius,
    );
    if let Some(&last) = points.last() {
        points.push(last);
    }

    let mut now = 0;
    let mut events = 0;
    let count = points.len();
    for (i, (x, y)) in points.into_iter().enumerate() {
        if i + 1 == count && count > 1 {
            now += config.engine.tick_interval_ms + 1;
        }
        let event = device_event(config.device, x + left, y + top);
        events += 1;
        match session.handle_input(&event, &bounds, now) {
            ScratchOutcome::Ticked(sample) => {
                tracing::debug!("t={now}ms coverage {:.3}", sample.coverage);
            }
            ScratchOutcome::Won(sample) => {
                tracing::info!("t={now}ms cleared at coverage {:.3}", sample.coverage);
            }
            ScratchOutcome::Erased | ScratchOutcome::Ignored => {}
        }
        if session.is_won() {
            break;
        }
        now += config.frame_ms;
    }

    let Tee(stats, Tee(recorded, cues)) = session.feedback();
    let report = DriveReport {
        pattern: config.pattern,
        events,
        state: session.state(),
        coverage: session.coverage(),
        ticks: recorded.ticks,
        wins: recorded.wins,
        rubs: recorded.rubs,
        rub_time_secs: stats.rub_time_secs,
        cues_played: cues.sink().played.len(),
        elapsed_ms: now,
    };
    Ok((session, report))
}

/// Write a frame to a PNG file.
///
/// # Errors
///
/// Returns an error if the buffer does not match its dimensions or the file
/// cannot be written.
pub fn export_png(frame: &Frame<'_>, path: &Path) -> Result<(), DriverError> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.pixels.to_vec())
        .ok_or_else(|| DriverError::Export("pixel buffer does not match frame size".to_string()))?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| DriverError::Export(e.to_string()))?;
    tracing::info!("Wrote {}x{} frame to {}", frame.width, frame.height, path.display());
    Ok(())
}
