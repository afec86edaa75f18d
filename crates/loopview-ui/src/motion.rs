//! Motion driver: time-based scroll interpolation.
//!
//! The paging machine polls the driver once per frame; the driver never
//! advances on its own, so aborting is synchronous and simply freezes the
//! value wherever the last poll left it.

/// Standard easing functions.
///
/// Input `t` is clamped to `[0.0, 1.0]`. Output is the eased value.
pub mod easing {
    /// Linear easing (no acceleration).
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Quadratic ease-out (fast start, decelerating end).
    pub fn ease_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * (2.0 - t)
    }
}

/// A scroll interpolation between two scalar offsets.
///
/// The run starts timing at the first `tick` after `start`, so callers do
/// not need a clock when they schedule a motion. Values are scalar: the
/// paging machine runs the driver along whichever axis is active.
#[derive(Debug, Clone)]
pub struct Scroller {
    start: f32,
    end: f32,
    start_ms: Option<u64>,
    duration_ms: u64,
    current: f32,
    finished: bool,
    easing: fn(f32) -> f32,
}

impl Scroller {
    /// Create an idle driver (decelerating easing).
    pub fn new() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            start_ms: None,
            duration_ms: 0,
            current: 0.0,
            finished: true,
            easing: easing::ease_out_quad,
        }
    }

    /// Begin a new run from `from` to `to` over `duration_ms`.
    ///
    /// A zero duration finishes at the target on the next tick.
    pub fn start(&mut self, from: f32, to: f32, duration_ms: u64) {
        self.start = from;
        self.end = to;
        self.start_ms = None;
        self.duration_ms = duration_ms;
        self.current = from;
        self.finished = false;
    }

    /// Advance to `now_ms`, returning the interpolated value and whether
    /// the run finished.
    pub fn tick(&mut self, now_ms: u64) -> (f32, bool) {
        if self.finished {
            return (self.current, true);
        }
        let start_ms = *self.start_ms.get_or_insert(now_ms);
        let elapsed = now_ms.saturating_sub(start_ms);
        if elapsed >= self.duration_ms {
            self.current = self.end;
            self.finished = true;
            return (self.current, true);
        }
        let t = elapsed as f32 / self.duration_ms as f32;
        self.current = self.start + (self.end - self.start) * (self.easing)(t);
        (self.current, false)
    }

    /// Freeze at the current interpolated value; future ticks return it
    /// unchanged.
    pub fn abort(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f32 {
        self.current
    }

    /// The run's target value.
    pub fn final_value(&self) -> f32 {
        self.end
    }
}

impl Default for Scroller {
    fn default() -> Self {
        Self::new()
    }
}
