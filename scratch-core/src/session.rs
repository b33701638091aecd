//! The scratch session state machine.
//!
//! ```text
//!   reset ┌──────┐ first erase ┌────────────┐ tick, coverage > threshold ┌─────┐
//!  ──────►│ Idle ├────────────►│ Scratching ├───────────────────────────►│ Won │
//!         └──────┘             └────────────┘                            └─────┘
//!            ▲                        │ reset                               │
//!            └────────────────────────┴─────────────────────────────────────┘
//! ```
//!
//! Erasing is applied immediately on every event. Sampling and feedback are
//! throttled to one progress tick per tick interval, evaluated
//! opportunistically whenever an erase arrives; there is no timer.

use serde::{Deserialize, Serialize};

use crate::decor;
use crate::event::{self, InputEvent, LocalPoint, SurfaceBounds};
use crate::feedback::FeedbackPort;
use crate::sampler::{self, SampleResult};
use crate::surface::{Frame, MaskSurface};
use crate::{ScratchConfig, ScratchResult};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScratchState {
    /// Fresh or reset mask, nothing erased.
    Idle,
    /// At least one erase applied, not yet won.
    Scratching,
    /// Coverage passed the threshold. Erasing is ignored until reset.
    Won,
}

/// What a single erase request did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScratchOutcome {
    /// Nothing happened: not a drag, already won, or no surface yet.
    Ignored,
    /// Pixels were erased; no tick was due.
    Erased,
    /// Pixels were erased and a progress tick re-measured coverage.
    Ticked(SampleResult),
    /// The tick pushed coverage past the threshold.
    Won(SampleResult),
}

/// Snapshot of session state for hosts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Lifecycle state.
    pub state: ScratchState,
    /// Coverage measured at the last tick.
    pub coverage: f64,
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
}

/// Owns a mask surface and decides when to sample and when to fire feedback.
#[derive(Debug)]
pub struct ScratchSession<F> {
    config: ScratchConfig,
    surface: MaskSurface,
    feedback: F,
    state: ScratchState,
    coverage: f64,
    last_tick_at: Option<u64>,
    last_rub_at: Option<u64>,
    dirty: bool,
}

impl<F: FeedbackPort> ScratchSession<F> {
    /// Create a session with a zero-area surface.
    ///
    /// Call [`ScratchSession::resize`] once the container has a size.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ScratchConfig, feedback: F) -> ScratchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            surface: MaskSurface::empty(),
            feedback,
            state: ScratchState::Idle,
            coverage: 0.0,
            last_tick_at: None,
            last_rub_at: None,
            dirty: false,
        })
    }

    /// Create a session and lay out its surface in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_size(
        config: ScratchConfig,
        feedback: F,
        width: u32,
        height: u32,
    ) -> ScratchResult<Self> {
        let mut session = Self::new(config, feedback)?;
        session.resize(width, height);
        Ok(session)
    }

    /// Re-create the surface at a new size and start over.
    ///
    /// Safe mid-drag: nothing from the old bounds survives.
    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!("Scratch surface resized to {}x{}", width, height);
        self.restart(width, height);
    }

    /// Discard all progress and repaint the mask. Legal from every state.
    ///
    /// The tick gate and rub cooldown keep running, so resetting never
    /// earns an extra progress tick.
    pub fn reset(&mut self) {
        tracing::debug!("Scratch session reset from {:?}", self.state);
        self.restart(self.surface.width(), self.surface.height());
    }

    fn restart(&mut self, width: u32, height: u32) {
        let seed = self.config.decoration_seed.unwrap_or_else(decor::fresh_seed);
        self.surface.initialize(width, height, seed);
        self.state = ScratchState::Idle;
        self.coverage = 0.0;
        self.dirty = true;
    }

    /// Map a device event onto the surface and erase there.
    ///
    /// `bounds` is the surface's current on-screen rectangle and `now_ms` a
    /// monotonic timestamp in milliseconds. A surface shown at a different
    /// size than its buffer is scaled into buffer pixels.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        bounds: &SurfaceBounds,
        now_ms: u64,
    ) -> ScratchOutcome {
        match event::to_local(event, bounds) {
            Some(point) => {
                let point =
                    bounds.scale_to_surface(point, self.surface.width(), self.surface.height());
                self.scratch_at(point, now_ms)
            }
            None => ScratchOutcome::Ignored,
        }
    }

    /// Erase at a surface-local point, then fire a tick if one is due.
    pub fn scratch_at(&mut self, point: LocalPoint, now_ms: u64) -> ScratchOutcome {
        if self.state == ScratchState::Won || !self.surface.has_area() {
            return ScratchOutcome::Ignored;
        }

        if self
            .surface
            .erase(point.x, point.y, self.config.erase_radius)
        {
            self.dirty = true;
        }

        if self.state == ScratchState::Idle {
            tracing::debug!("Scratching started at ({}, {})", point.x, point.y);
            self.state = ScratchState::Scratching;
        }

        if Self::is_due(self.last_rub_at, now_ms, self.config.rub_cooldown_ms, true) {
            self.last_rub_at = Some(now_ms);
            self.feedback.on_rub();
        }

        if !Self::is_due(self.last_tick_at, now_ms, self.config.tick_interval_ms, false) {
            return ScratchOutcome::Erased;
        }
        self.tick(now_ms)
    }

    /// Whether enough time has passed since `last`. Ticks need strictly more
    /// than `interval`; rub cues accept exactly `interval`.
    fn is_due(last: Option<u64>, now_ms: u64, interval: u64, inclusive: bool) -> bool {
        let Some(last) = last else {
            return true;
        };
        let elapsed = now_ms.saturating_sub(last);
        if inclusive {
            elapsed >= interval
        } else {
            elapsed > interval
        }
    }

    fn tick(&mut self, now_ms: u64) -> ScratchOutcome {
        self.last_tick_at = Some(now_ms);
        let sample = self.measure();
        self.coverage = sample.coverage;
        self.feedback.on_progress_tick();

        tracing::trace!(
            "Tick at {now_ms}ms: {}/{} sampled clear ({:.3})",
            sample.transparent,
            sample.total,
            sample.coverage
        );

        if sample.coverage > self.config.win_threshold {
            self.state = ScratchState::Won;
            tracing::info!(
                "Mask cleared: coverage {:.3} > threshold {:.3}",
                sample.coverage,
                self.config.win_threshold
            );
            self.feedback.on_win();
            return ScratchOutcome::Won(sample);
        }

        ScratchOutcome::Ticked(sample)
    }

    /// Sample the surface now without touching session state or feedback.
    #[must_use]
    pub fn measure(&self) -> SampleResult {
        sampler::estimate(&self.surface.alpha_channel(), self.config.sample_stride)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScratchState {
        self.state
    }

    /// Coverage measured at the last tick (0 after reset).
    #[must_use]
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    /// Whether the mask has been cleared.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.state == ScratchState::Won
    }

    /// Snapshot of state, coverage and size.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.state,
            coverage: self.coverage,
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }

    /// The session's configuration.
    #[must_use]
    pub fn config(&self) -> &ScratchConfig {
        &self.config
    }

    /// The mask surface.
    #[must_use]
    pub fn surface(&self) -> &MaskSurface {
        &self.surface
    }

    /// The feedback collaborator.
    #[must_use]
    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Tear the session down, handing back the feedback collaborator.
    pub fn into_feedback(self) -> F {
        self.feedback
    }

    /// Whether pixels changed since the last call; clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Current pixels for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface has not been laid out.
    pub fn frame(&self) -> ScratchResult<Frame<'_>> {
        self.surface.frame()
    }
}
