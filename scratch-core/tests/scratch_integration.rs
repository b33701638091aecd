//! Scratch Session Integration Tests
//!
//! Exercises the full input → erase → sample → feedback flow:
//! - Tick gating and the win-once guarantee
//! - Sampler exactness on forced coverage
//! - Reset idempotence from every state
//! - Bounds safety and coverage monotonicity (property tests)
//! - The reference 300x300 dense and sparse scenarios

use proptest::prelude::*;
use scratch_core::{
    estimate, AlphaChannel, InputEvent, LocalPoint, RecordingFeedback, ScratchConfig,
    ScratchOutcome, ScratchSession, ScratchState, SurfaceBounds, TouchEvent,
};

const SIZE: u32 = 300;

fn config() -> ScratchConfig {
    ScratchConfig::default().with_decoration_seed(2024)
}

fn session() -> ScratchSession<RecordingFeedback> {
    ScratchSession::with_size(config(), RecordingFeedback::default(), SIZE, SIZE)
        .expect("default config is valid")
}

/// Points on a 20px grid over the whole surface; every pixel lies within
/// 15px of one of them.
fn dense_sweep() -> Vec<LocalPoint> {
    let mut points = Vec::new();
    for row in 0..=15u16 {
        for col in 0..=15u16 {
            let x = f32::from(col) * 20.0;
            // Boustrophedon, like a real back-and-forth rub
            let y = f32::from(row) * 20.0;
            let x = if row % 2 == 0 { x } else { 300.0 - x };
            points.push(LocalPoint::new(x, y));
        }
    }
    points
}

// ============================================================================
// Tick Gating
// ============================================================================

#[test]
fn test_burst_within_half_interval_ticks_at_most_once() {
    let mut s = session();
    for i in 0..1000u64 {
        let x = (i % 300) as f32;
        s.scratch_at(LocalPoint::new(x, 150.0), i / 2);
    }
    assert!(s.feedback().ticks <= 1, "got {} ticks", s.feedback().ticks);
}

#[test]
fn test_two_events_spaced_past_interval_tick_twice() {
    let mut s = session();
    s.scratch_at(LocalPoint::new(100.0, 100.0), 10_000);
    s.scratch_at(LocalPoint::new(200.0, 200.0), 11_100);
    assert_eq!(s.feedback().ticks, 2);
}

#[test]
fn test_tick_cadence_over_long_drag() {
    let mut s = session();
    // One event every 16ms (a 60Hz pointer stream) for 5 seconds
    for frame in 0..=312u64 {
        s.scratch_at(LocalPoint::new(150.0, 150.0), frame * 16);
    }
    // Ticks at 0, then each time more than 1000ms has passed since the last
    let ticks = s.feedback().ticks;
    assert!((4..=5).contains(&ticks), "got {ticks} ticks");
}

// ============================================================================
// Sampler Exactness
// ============================================================================

#[test]
fn test_estimate_exact_on_forced_fraction_raw_buffer() {
    // 1000 pixels, stride 10 → 100 samples; force 37 of them transparent
    let mut rgba = vec![255u8; 1000 * 4];
    for sample in 0..37 {
        rgba[sample * 10 * 4 + 3] = 0;
    }
    // Unsampled transparent pixels must not count
    rgba[5 * 4 + 3] = 0;

    let result = estimate(&AlphaChannel::from_rgba(&rgba), 10);
    assert_eq!(result.total, 100);
    assert_eq!(result.transparent, 37);
    assert!((result.coverage - 0.37).abs() < 1e-12);
}

#[test]
fn test_estimate_exact_on_erased_rows() {
    let config = config().with_erase_radius(0.5);
    let mut s = ScratchSession::with_size(config, RecordingFeedback::default(), 100, 100)
        .expect("valid config");
    // Clear the top 30 rows one pixel at a time
    for row in 0..30u16 {
        for col in 0..100u16 {
            s.scratch_at(
                LocalPoint::new(f32::from(col) + 0.5, f32::from(row) + 0.5),
                0,
            );
        }
    }
    let result = s.measure();
    assert_eq!(result.total, 1000);
    assert_eq!(result.transparent, 300);
    assert!((result.coverage - 0.3).abs() < 1e-12);
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_is_idempotent_from_every_state() {
    let fresh = session();
    let fresh_pixels = fresh.surface().pixels().to_vec();
    let fresh_status = fresh.status();

    // Idle
    let mut idle = session();
    idle.reset();

    // Scratching
    let mut scratching = session();
    scratching.scratch_at(LocalPoint::new(150.0, 150.0), 0);
    assert_eq!(scratching.state(), ScratchState::Scratching);
    scratching.reset();

    // Won
    let mut won = session();
    for p in dense_sweep() {
        won.scratch_at(p, 0);
    }
    won.scratch_at(LocalPoint::new(0.0, 0.0), 2000);
    assert_eq!(won.state(), ScratchState::Won);
    won.reset();

    for s in [&idle, &scratching, &won] {
        assert_eq!(s.status(), fresh_status);
        assert_eq!(s.state(), ScratchState::Idle);
        assert!(s.coverage().abs() < f64::EPSILON);
        assert_eq!(s.surface().pixels(), fresh_pixels.as_slice());
    }
}

#[test]
fn test_reset_allows_second_win() {
    let mut s = session();
    for round in 0..2u64 {
        let base = round * 10_000;
        for p in dense_sweep() {
            s.scratch_at(p, base);
        }
        s.scratch_at(LocalPoint::new(0.0, 0.0), base + 1500);
        assert!(s.is_won());
        s.reset();
    }
    assert_eq!(s.feedback().wins, 2);
}

#[test]
fn test_reset_keeps_tick_cadence() {
    let mut s = session();
    for t in 0..10u64 {
        s.scratch_at(LocalPoint::new(150.0, 150.0), t * 10);
        s.reset();
    }
    assert_eq!(s.feedback().ticks, 1);

    // The next tick still waits out the interval from the first one
    assert_eq!(
        s.scratch_at(LocalPoint::new(150.0, 150.0), 1000),
        ScratchOutcome::Erased
    );
    assert!(matches!(
        s.scratch_at(LocalPoint::new(150.0, 150.0), 1001),
        ScratchOutcome::Ticked(_)
    ));
}

// ============================================================================
// Win Once
// ============================================================================

#[test]
fn test_win_fires_once_despite_continued_erasing() {
    let mut s = session();
    let mut now = 0;
    for _ in 0..3 {
        for p in dense_sweep() {
            s.scratch_at(p, now);
            now += 5;
        }
    }
    assert!(s.is_won());
    for t in 0..100 {
        assert_eq!(
            s.scratch_at(LocalPoint::new(10.0, 10.0), now + t * 2000),
            ScratchOutcome::Ignored
        );
    }
    assert_eq!(s.feedback().wins, 1);
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_dense_drag_wins() {
    let mut s = session();
    let bounds = SurfaceBounds::new(40.0, 120.0, 300.0, 300.0);

    let mut now = 0;
    for p in dense_sweep() {
        let event = InputEvent::Touch(TouchEvent::moved(p.x + 40.0, p.y + 120.0));
        s.handle_input(&event, &bounds, now);
        now += 3;
    }
    assert_eq!(s.state(), ScratchState::Scratching);

    // A later move, past one tick interval, re-measures the finished sweep
    let outcome = s.handle_input(&InputEvent::drag(190.0, 270.0), &bounds, 1500);
    assert!(matches!(outcome, ScratchOutcome::Won(_)), "{outcome:?}");
    assert!(s.coverage() >= 0.9);
    assert_eq!(s.state(), ScratchState::Won);
    assert_eq!(s.feedback().wins, 1);
}

#[test]
fn test_sparse_center_point_keeps_scratching() {
    let mut s = session();
    s.scratch_at(LocalPoint::new(150.0, 150.0), 0);
    s.scratch_at(LocalPoint::new(150.0, 150.0), 5000);

    assert_eq!(s.state(), ScratchState::Scratching);
    assert_eq!(s.feedback().wins, 0);
    let coverage = s.coverage();
    assert!(coverage > 0.0 && coverage < 0.05, "coverage {coverage}");

    for _ in 0..20 {
        assert!((s.measure().coverage - coverage).abs() < f64::EPSILON);
    }
}

#[test]
fn test_resize_mid_drag() {
    let mut s = session();
    let bounds = SurfaceBounds::at_origin(300.0, 300.0);
    s.handle_input(&InputEvent::drag(150.0, 150.0), &bounds, 0);

    s.resize(200, 100);
    let smaller = SurfaceBounds::at_origin(200.0, 100.0);
    assert_eq!(s.state(), ScratchState::Idle);
    assert_eq!(s.measure().transparent, 0);

    // The drag continues against the new bounds
    s.handle_input(&InputEvent::drag(250.0, 250.0), &smaller, 16);
    assert_eq!(s.measure().transparent, 0);
    s.handle_input(&InputEvent::drag(100.0, 50.0), &smaller, 32);
    assert!(s.measure().transparent > 0);
}

#[test]
fn test_zero_area_session_never_panics() {
    let mut s = ScratchSession::with_size(config(), RecordingFeedback::default(), 0, 0)
        .expect("valid config");
    let bounds = SurfaceBounds::default();
    for t in 0..50 {
        assert_eq!(
            s.handle_input(&InputEvent::drag(1.0, 1.0), &bounds, t * 700),
            ScratchOutcome::Ignored
        );
    }
    s.reset();
    assert!(s.coverage().abs() < f64::EPSILON);
    assert_eq!(*s.feedback(), RecordingFeedback::default());
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_stroke() -> impl Strategy<Value = Vec<(f32, f32, u64)>> {
    prop::collection::vec((-50.0f32..350.0, -50.0f32..350.0, 0u64..600), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_coverage_non_decreasing(stroke in arb_stroke()) {
        let mut s = session();
        let mut now = 0;
        let mut last = 0.0;
        for (x, y, dt) in stroke {
            now += dt;
            match s.scratch_at(LocalPoint::new(x, y), now) {
                ScratchOutcome::Ticked(r) | ScratchOutcome::Won(r) => {
                    prop_assert!(r.coverage >= last, "{} < {}", r.coverage, last);
                    last = r.coverage;
                }
                ScratchOutcome::Erased | ScratchOutcome::Ignored => {}
            }
        }
    }

    #[test]
    fn prop_far_outside_erase_changes_nothing(
        points in prop::collection::vec(
            (prop_oneof![-1.0e7f32..-400.0, 700.0f32..1.0e7], -1.0e7f32..1.0e7),
            1..30,
        )
    ) {
        let mut s = session();
        let before = s.surface().pixels().to_vec();
        for (i, (x, y)) in points.into_iter().enumerate() {
            s.scratch_at(LocalPoint::new(x, y), (i as u64) * 1100);
        }
        prop_assert!(s.coverage().abs() < f64::EPSILON);
        prop_assert_eq!(s.surface().pixels(), before.as_slice());
        prop_assert_eq!(s.feedback().wins, 0);
    }
}
