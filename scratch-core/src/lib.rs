//! # Scratch Core
//!
//! Engine behind the "rub away the mask" mechanic: an erasable RGBA mask,
//! pointer mapping, sampled coverage, and a throttled session state machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  device event ──► event::to_local ──► LocalPoint    │
//! │                                          │          │
//! │                                          ▼          │
//! │  ScratchSession ──── erase ────►  MaskSurface       │
//! │     │  (every tick interval)          │             │
//! │     ├──── sampler::estimate ◄── AlphaChannel        │
//! │     │                                               │
//! │     └──► FeedbackPort: on_rub / on_progress_tick /  │
//! │                        on_win                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Everything runs on the caller's thread. Nothing blocks and nothing on the
//! erase path can fail.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decor;
pub mod error;
pub mod event;
pub mod feedback;
pub mod glyph;
pub mod sampler;
pub mod session;
pub mod surface;

pub use config::ScratchConfig;
pub use error::{ScratchError, ScratchResult};
pub use event::{
    to_local, InputEvent, LocalPoint, SurfaceBounds, TouchEvent, TouchPhase, TouchPoint,
};
pub use feedback::{
    Cue, CueFeedback, CueSink, FeedbackPort, FeedbackSettings, NoopFeedback, RecordingFeedback,
    RubStats, Tee,
};
pub use sampler::{estimate, SampleResult};
pub use session::{ScratchOutcome, ScratchSession, ScratchState, SessionStatus};
pub use surface::{AlphaChannel, DrawMode, Frame, MaskSurface};

/// Scratch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
