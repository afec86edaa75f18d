//! Platform-agnostic pointer event types.
//!
//! Every host maps its native pointer input to these events. The engine
//! never sees raw platform input, and it does not own dispatch policy
//! (intercept vs. pass-through); it consumes events the host has already
//! decided to deliver to the container.

use serde::{Deserialize, Serialize};

/// A resolved pointer event with absolute position and timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Pointer pressed.
    Down { x: f32, y: f32, time_ms: u64 },
    /// Pointer moved while pressed.
    Move { x: f32, y: f32, time_ms: u64 },
    /// Pointer released.
    Up { x: f32, y: f32, time_ms: u64 },
    /// Gesture cancelled by the host; treated like a release.
    Cancel { x: f32, y: f32, time_ms: u64 },
}

impl PointerEvent {
    /// The event's absolute position.
    pub fn position(&self) -> (f32, f32) {
        match *self {
            PointerEvent::Down { x, y, .. }
            | PointerEvent::Move { x, y, .. }
            | PointerEvent::Up { x, y, .. }
            | PointerEvent::Cancel { x, y, .. } => (x, y),
        }
    }

    /// The event's timestamp in milliseconds.
    pub fn time_ms(&self) -> u64 {
        match *self {
            PointerEvent::Down { time_ms, .. }
            | PointerEvent::Move { time_ms, .. }
            | PointerEvent::Up { time_ms, .. }
            | PointerEvent::Cancel { time_ms, .. } => time_ms,
        }
    }
}
