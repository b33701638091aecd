//! Input events and mapping them onto the mask surface.
//!
//! Device events carry absolute coordinates in the same space as the
//! surface's on-screen bounding rectangle. [`to_local`] turns an event into
//! a surface-local point, or `None` when the event is not part of an active
//! drag. No drag state is kept here; the session decides what to do with the
//! resulting stream of points.

use serde::{Deserialize, Serialize};

/// Bit set in [`InputEvent::Pointer::buttons`] while the primary button is held.
pub const PRIMARY_BUTTON: u8 = 0b0000_0001;

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled (e.g., palm rejection).
    Cancel,
}

impl TouchPhase {
    /// Whether a contact in this phase is still on the surface.
    #[must_use]
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Start | Self::Move)
    }
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    pub id: u32,
    /// Absolute X position.
    pub x: f32,
    /// Absolute Y position.
    pub y: f32,
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    /// Single-contact drag event at an absolute position.
    #[must_use]
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(TouchPhase::Move, vec![TouchPoint { id: 0, x, y }])
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}

/// Input events the scratch engine can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Raw touch event.
    Touch(TouchEvent),

    /// Pointer (mouse) move.
    Pointer {
        /// Absolute X coordinate.
        x: f32,
        /// Absolute Y coordinate.
        y: f32,
        /// Bitmask of held buttons ([`PRIMARY_BUTTON`] = left).
        buttons: u8,
    },
}

impl InputEvent {
    /// Mouse move with the primary button held.
    #[must_use]
    pub fn drag(x: f32, y: f32) -> Self {
        Self::Pointer {
            x,
            y,
            buttons: PRIMARY_BUTTON,
        }
    }

    /// Mouse move with no buttons held.
    #[must_use]
    pub fn hover(x: f32, y: f32) -> Self {
        Self::Pointer { x, y, buttons: 0 }
    }

    /// Absolute position of the contact driving this event, if it is part
    /// of an active drag.
    #[must_use]
    pub fn active_position(&self) -> Option<(f32, f32)> {
        match self {
            Self::Pointer { x, y, buttons } => {
                (buttons & PRIMARY_BUTTON != 0).then_some((*x, *y))
            }
            Self::Touch(touch) => {
                if !touch.phase.is_in_progress() {
                    return None;
                }
                touch.primary_touch().map(|p| (p.x, p.y))
            }
        }
    }
}

/// The surface's on-screen bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceBounds {
    /// Left edge in device coordinates.
    pub left: f32,
    /// Top edge in device coordinates.
    pub top: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SurfaceBounds {
    /// Create bounds from an origin and size.
    #[must_use]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bounds anchored at the device origin.
    #[must_use]
    pub fn at_origin(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Rescale a local point from on-screen units into a surface of
    /// `width` x `height` pixels, for when the surface is displayed at a
    /// different size than its buffer. Bounds without a positive size map
    /// one to one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn scale_to_surface(&self, point: LocalPoint, width: u32, height: u32) -> LocalPoint {
        let factor = |on_screen: f32, pixels: u32| {
            if on_screen.is_finite() && on_screen > 0.0 {
                pixels as f32 / on_screen
            } else {
                1.0
            }
        };
        LocalPoint::new(
            point.x * factor(self.width, width),
            point.y * factor(self.height, height),
        )
    }
}

/// A point in surface-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    /// X offset from the surface's left edge.
    pub x: f32,
    /// Y offset from the surface's top edge.
    pub y: f32,
}

impl LocalPoint {
    /// Create a local point.
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Map a device event into surface-local coordinates.
///
/// Returns `None` unless the event represents an active drag. The point is
/// not clipped; erasing handles out-of-bounds positions.
#[must_use]
pub fn to_local(event: &InputEvent, bounds: &SurfaceBounds) -> Option<LocalPoint> {
    let (x, y) = event.active_position()?;
    Some(LocalPoint::new(x - bounds.left, y - bounds.top))
}
