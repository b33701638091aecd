//! Cosmetic decoration layout for a freshly painted mask.
//!
//! Placement has no correctness contract. It is seedable so a fixed seed
//! repaints the same mask, which keeps resets reproducible in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Words lettered onto the mask.
pub const WORDS: [&str; 7] = ["KPI", "MONDAY", "BUG", "DEBT", "STRESS", "DEADLINE", "8AM"];

/// Distance kept between word centers and the surface edge, in pixels.
pub const EDGE_PADDING: f32 = 50.0;

/// Maximum absolute rotation of a word, in radians.
pub const MAX_TILT: f32 = 0.5;

/// Font cell size in pixels.
pub const GLYPH_SCALE: u32 = 4;

/// One word placed on the mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    /// Text to letter.
    pub text: &'static str,
    /// Center X in surface pixels.
    pub center_x: f32,
    /// Center Y in surface pixels.
    pub center_y: f32,
    /// Rotation in radians.
    pub angle: f32,
}

/// A seed nobody has used before.
#[must_use]
pub fn fresh_seed() -> u64 {
    rand::random()
}

/// Lay out every word for a surface of the given size.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn layout(width: u32, height: u32, seed: u64) -> Vec<Decoration> {
    let mut rng = StdRng::seed_from_u64(seed);
    WORDS
        .iter()
        .map(|&text| Decoration {
            text,
            center_x: padded(&mut rng, width as f32),
            center_y: padded(&mut rng, height as f32),
            angle: rng.gen_range(-MAX_TILT..=MAX_TILT),
        })
        .collect()
}

/// Position along one axis, keeping clear of the edges when there is room.
fn padded(rng: &mut impl Rng, extent: f32) -> f32 {
    if extent > EDGE_PADDING * 2.0 {
        rng.gen_range(EDGE_PADDING..extent - EDGE_PADDING)
    } else if extent > 0.0 {
        rng.gen_range(0.0..extent)
    } else {
        0.0
    }
}
