//! Gesture interpreter: pointer events to drag deltas and a release
//! velocity.
//!
//! A gesture locks onto one axis exactly once: drag recognition requires
//! movement from the down point that exceeds the slop along the active
//! axis AND strictly exceeds the orthogonal movement, so ties and
//! orthogonal-dominant gestures never start a drag. A pointer-down that
//! claims an in-flight motion skips recognition entirely and drags from
//! the first move.

use std::collections::VecDeque;

use loopview_types::config::Axis;

/// Milliseconds of movement history used for the release velocity.
const VELOCITY_WINDOW_MS: u64 = 1000;

/// Recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
}

/// One movement sample.
#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f32,
    y: f32,
    time_ms: u64,
}

impl Sample {
    fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Vertical => self.y,
            Axis::Horizontal => self.x,
        }
    }
}

/// Accumulates recent movement samples and estimates the release velocity.
#[derive(Debug, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Record one movement sample, dropping samples older than the window.
    pub fn push(&mut self, x: f32, y: f32, time_ms: u64) {
        while let Some(front) = self.samples.front() {
            if time_ms.saturating_sub(front.time_ms) > VELOCITY_WINDOW_MS {
                self.samples.pop_front();
            } else {
                break;
            }
        }
        self.samples.push_back(Sample { x, y, time_ms });
    }

    /// Estimated velocity along `axis` in px/s over the sample window,
    /// positive when the pointer moved toward larger coordinates.
    pub fn velocity(&self, axis: Axis) -> f32 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return 0.0;
        };
        let dt = last.time_ms.saturating_sub(first.time_ms);
        if dt == 0 {
            return 0.0;
        }
        (last.along(axis) - first.along(axis)) * 1000.0 / dt as f32
    }
}

/// Converts the pointer stream into per-event drag deltas and a release
/// velocity.
#[derive(Debug)]
pub struct GestureTracker {
    state: GestureState,
    down: (f32, f32),
    last: (f32, f32),
    velocity: VelocityTracker,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self {
            state: GestureState::Idle,
            down: (0.0, 0.0),
            last: (0.0, 0.0),
            velocity: VelocityTracker::default(),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Pointer down. `claim` forces an immediate drag: the caller aborted
    /// an in-flight motion and the gesture takes over from the frozen
    /// offset without waiting for the slop.
    pub fn begin(&mut self, x: f32, y: f32, time_ms: u64, claim: bool) {
        self.down = (x, y);
        self.last = (x, y);
        self.velocity.clear();
        if claim {
            self.state = GestureState::Dragging;
            self.velocity.push(x, y, time_ms);
        } else {
            self.state = GestureState::Idle;
        }
    }

    /// Pointer move. Once dragging, returns the per-event delta along
    /// `axis` in scroll direction: previous sample minus current, so a
    /// downward or rightward finger yields a negative delta.
    pub fn movement(
        &mut self,
        axis: Axis,
        slop: f32,
        x: f32,
        y: f32,
        time_ms: u64,
    ) -> Option<f32> {
        if self.state == GestureState::Idle {
            let dx = (x - self.down.0).abs();
            let dy = (y - self.down.1).abs();
            let locked = match axis {
                Axis::Vertical => dy > slop && dy > dx,
                Axis::Horizontal => dx > slop && dx > dy,
            };
            if !locked {
                return None;
            }
            self.state = GestureState::Dragging;
        }
        let delta = match axis {
            Axis::Vertical => self.last.1 - y,
            Axis::Horizontal => self.last.0 - x,
        };
        self.last = (x, y);
        self.velocity.push(x, y, time_ms);
        Some(delta)
    }

    /// Pointer up or cancel. Returns the release velocity (px/s, positive
    /// toward larger coordinates) if a drag was active.
    pub fn finish(&mut self, axis: Axis, x: f32, y: f32, time_ms: u64) -> Option<f32> {
        let was_dragging = self.state == GestureState::Dragging;
        self.state = GestureState::Idle;
        if !was_dragging {
            return None;
        }
        self.velocity.push(x, y, time_ms);
        Some(self.velocity.velocity(axis))
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}
