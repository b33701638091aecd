//! Outbound feedback to audio, haptic and stat-counting collaborators.
//!
//! The session calls a [`FeedbackPort`] and ignores whatever happens next;
//! implementations must return promptly and may do nothing at all.

use serde::{Deserialize, Serialize};

/// Receiver of scratch session side effects.
pub trait FeedbackPort {
    /// A progress tick fired (at most once per tick interval).
    fn on_progress_tick(&mut self);

    /// The mask was cleared past the win threshold (once per win).
    fn on_win(&mut self);

    /// The brush touched the mask (at most once per rub cooldown).
    fn on_rub(&mut self) {}
}

impl<F: FeedbackPort + ?Sized> FeedbackPort for &mut F {
    fn on_progress_tick(&mut self) {
        (**self).on_progress_tick();
    }

    fn on_win(&mut self) {
        (**self).on_win();
    }

    fn on_rub(&mut self) {
        (**self).on_rub();
    }
}

impl<F: FeedbackPort + ?Sized> FeedbackPort for Box<F> {
    fn on_progress_tick(&mut self) {
        (**self).on_progress_tick();
    }

    fn on_win(&mut self) {
        (**self).on_win();
    }

    fn on_rub(&mut self) {
        (**self).on_rub();
    }
}

/// Feedback sink that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl FeedbackPort for NoopFeedback {
    fn on_progress_tick(&mut self) {}

    fn on_win(&mut self) {}
}

/// Counts every call. Handy for hosts that poll rather than react.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFeedback {
    /// Progress ticks received.
    pub ticks: u32,
    /// Wins received.
    pub wins: u32,
    /// Rub cues received.
    pub rubs: u32,
}

impl FeedbackPort for RecordingFeedback {
    fn on_progress_tick(&mut self) {
        self.ticks += 1;
    }

    fn on_win(&mut self) {
        self.wins += 1;
    }

    fn on_rub(&mut self) {
        self.rubs += 1;
    }
}

/// Accrued scratch statistics.
///
/// Each progress tick counts as one second of rub time, so the figure tracks
/// time spent actively erasing rather than area cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubStats {
    /// Seconds of active rubbing.
    pub rub_time_secs: u64,
    /// Masks cleared.
    pub masks_cleared: u64,
}

impl FeedbackPort for RubStats {
    fn on_progress_tick(&mut self) {
        self.rub_time_secs += 1;
    }

    fn on_win(&mut self) {
        self.masks_cleared += 1;
    }
}

/// Forwards every call to two collaborators, first `A` then `B`.
#[derive(Debug, Clone, Default)]
pub struct Tee<A, B>(pub A, pub B);

impl<A: FeedbackPort, B: FeedbackPort> FeedbackPort for Tee<A, B> {
    fn on_progress_tick(&mut self) {
        self.0.on_progress_tick();
        self.1.on_progress_tick();
    }

    fn on_win(&mut self) {
        self.0.on_win();
        self.1.on_win();
    }

    fn on_rub(&mut self) {
        self.0.on_rub();
        self.1.on_rub();
    }
}

/// User toggles for sensory feedback. Stat accounting ignores these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSettings {
    /// Play sounds.
    pub sound_enabled: bool,
    /// Fire haptic pulses.
    pub haptics_enabled: bool,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            haptics_enabled: true,
        }
    }
}

/// Vibration length for a rub cue, in milliseconds.
pub const RUB_PULSE_MS: u32 = 10;

/// Vibrate-pause-vibrate pattern played on a win, in milliseconds.
pub const WIN_PULSE_PATTERN: [u32; 3] = [100, 50, 100];

/// A concrete sensory effect for the host to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", rename_all = "snake_case")]
pub enum Cue {
    /// Short scratching sound.
    RubSound,
    /// Brief haptic tick.
    RubPulse {
        /// Duration in milliseconds.
        ms: u32,
    },
    /// Celebration sound.
    WinSound,
    /// Long haptic pattern.
    WinPulse {
        /// Alternating on/off durations in milliseconds.
        pattern: [u32; 3],
    },
}

/// Anything that can play cues: an audio service, a vibration API, a log.
pub trait CueSink {
    /// Play one cue. Must not block.
    fn play(&mut self, cue: Cue);
}

impl<T: FnMut(Cue)> CueSink for T {
    fn play(&mut self, cue: Cue) {
        self(cue);
    }
}

/// Translates port calls into [`Cue`]s, gated by [`FeedbackSettings`].
///
/// Progress ticks have no sensory cue.
#[derive(Debug, Clone)]
pub struct CueFeedback<S> {
    settings: FeedbackSettings,
    sink: S,
}

impl<S: CueSink> CueFeedback<S> {
    /// Create a cue translator.
    #[must_use]
    pub fn new(settings: FeedbackSettings, sink: S) -> Self {
        Self { settings, sink }
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> FeedbackSettings {
        self.settings
    }

    /// Change settings; takes effect from the next call.
    pub fn set_settings(&mut self, settings: FeedbackSettings) {
        self.settings = settings;
    }

    /// Borrow the sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&mut self, sound: Cue, pulse: Cue) {
        if self.settings.sound_enabled {
            self.sink.play(sound);
        }
        if self.settings.haptics_enabled {
            self.sink.play(pulse);
        }
    }
}

impl<S: CueSink> FeedbackPort for CueFeedback<S> {
    fn on_progress_tick(&mut self) {}

    fn on_win(&mut self) {
        self.emit(
            Cue::WinSound,
            Cue::WinPulse {
                pattern: WIN_PULSE_PATTERN,
            },
        );
    }

    fn on_rub(&mut self) {
        self.emit(Cue::RubSound, Cue::RubPulse { ms: RUB_PULSE_MS });
    }
}
