//! Paging state machine: the container core.
//!
//! `LoopView` owns the slot window, the motion driver and the gesture
//! interpreter. Drag deltas move a scalar offset and silently rotate the
//! window at the edges so the content appears endless; on release a
//! velocity-or-displacement decision commits to the previous page, the
//! next page, or rolls back; committed motions cross page boundaries one
//! rotation at a time until they settle, which is when the settle
//! notifier fires.
//!
//! Everything is single-threaded and pull-based: the host feeds pointer
//! events into `handle_event` and polls `tick` once per frame.

use log::{debug, trace};

use loopview_types::config::{Axis, LoopConfig};
use loopview_types::error::{LoopError, Result};
use loopview_types::input::PointerEvent;
use loopview_types::page::{PageHandle, PageId};

use crate::effects::{PageEffect, PageTransform};
use crate::gesture::GestureTracker;
use crate::motion::Scroller;
use crate::slots::{BoundaryState, Slot, SlotWindow};
use crate::two_page::TwoPageAdapter;

/// Release velocity (px/s) beyond which a fling commits regardless of
/// displacement.
pub const MAX_SPEED: f32 = 2000.0;

/// Velocity step (px/s) worth one extra page on a hard fling.
pub const MIN_SPEED: f32 = 800.0;

/// Transition state of the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// Resting, or mid-drag with no commitment yet.
    Normal,
    /// Committed toward the previous page.
    ToPrev,
    /// Committed toward the next page.
    ToNext,
}

/// Settle callback: receives the resting page and its logical index.
pub type SettleFn = Box<dyn FnMut(PageHandle, usize)>;

/// An infinitely-looping paged scroll container.
pub struct LoopView {
    window: SlotWindow,
    scroller: Scroller,
    gesture: GestureTracker,
    config: LoopConfig,
    state: TransitionState,
    /// Scroll offset along the active axis.
    offset: i32,
    /// Slot of the resting page; stays within `[1, len - 2]`.
    current: usize,
    /// Window rotations already applied during the in-flight motion.
    pending_rotations: u32,
    viewport_w: u32,
    viewport_h: u32,
    /// Logical page count: 2 in adapter mode, window length otherwise.
    page_count: usize,
    adapter: Option<Box<dyn TwoPageAdapter>>,
    effect: Option<Box<dyn PageEffect>>,
    on_settled: Option<SettleFn>,
}

impl std::fmt::Debug for LoopView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopView")
            .field("window", &self.window)
            .field("scroller", &self.scroller)
            .field("gesture", &self.gesture)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("current", &self.current)
            .field("pending_rotations", &self.pending_rotations)
            .field("viewport_w", &self.viewport_w)
            .field("viewport_h", &self.viewport_h)
            .field("page_count", &self.page_count)
            .field("adapter", &self.adapter.as_ref().map(|_| "<adapter>"))
            .field("effect", &self.effect.as_ref().map(|_| "<effect>"))
            .field("on_settled", &self.on_settled.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

fn axis_extent(axis: Axis, viewport_w: u32, viewport_h: u32) -> Result<i32> {
    let extent = match axis {
        Axis::Vertical => viewport_h,
        Axis::Horizontal => viewport_w,
    };
    if extent == 0 {
        return Err(LoopError::Config(
            "viewport extent along the scroll axis must not be zero".into(),
        ));
    }
    Ok(extent as i32)
}

fn check_clone(clone: &PageHandle, source: &PageHandle) -> Result<()> {
    if clone.id == source.id {
        return Err(LoopError::Adapter(
            "clone must not share the source page's id".into(),
        ));
    }
    Ok(())
}

impl LoopView {
    /// Build a container from the host's pages.
    ///
    /// `viewport_w`/`viewport_h` give the container size; the page extent
    /// along the configured axis is taken from it. Zero or one page is
    /// unsupported, and exactly two pages require [`Self::with_adapter`].
    pub fn new(
        pages: Vec<PageHandle>,
        viewport_w: u32,
        viewport_h: u32,
        config: LoopConfig,
    ) -> Result<Self> {
        match pages.len() {
            0 | 1 => Err(LoopError::UnsupportedPageCount(pages.len())),
            2 => Err(LoopError::MissingAdapter),
            _ => {
                let count = pages.len();
                let slots = pages
                    .into_iter()
                    .enumerate()
                    .map(|(i, handle)| Slot { handle, logical: i })
                    .collect();
                Self::build(slots, count, viewport_w, viewport_h, config, None)
            },
        }
    }

    /// Build a two-page container through a cloning adapter.
    ///
    /// The adapter produces one clone per page during setup; the engine
    /// then runs an ordinary four-slot window and reports only the logical
    /// indices 0 and 1.
    pub fn with_adapter(
        pages: Vec<PageHandle>,
        viewport_w: u32,
        viewport_h: u32,
        config: LoopConfig,
        mut adapter: Box<dyn TwoPageAdapter>,
    ) -> Result<Self> {
        if pages.len() != 2 {
            return Err(LoopError::Adapter(format!(
                "the two-page adapter path requires exactly 2 pages, got {}",
                pages.len()
            )));
        }
        let first = pages[0];
        let second = pages[1];
        let clone_first = adapter.clone_first(&first);
        check_clone(&clone_first, &first)?;
        let clone_second = adapter.clone_second(&second);
        check_clone(&clone_second, &second)?;
        let slots = vec![
            Slot {
                handle: first,
                logical: 0,
            },
            Slot {
                handle: second,
                logical: 1,
            },
            Slot {
                handle: clone_first,
                logical: 0,
            },
            Slot {
                handle: clone_second,
                logical: 1,
            },
        ];
        Self::build(slots, 2, viewport_w, viewport_h, config, Some(adapter))
    }

    fn build(
        slots: Vec<Slot>,
        page_count: usize,
        viewport_w: u32,
        viewport_h: u32,
        config: LoopConfig,
        adapter: Option<Box<dyn TwoPageAdapter>>,
    ) -> Result<Self> {
        config.validate()?;
        if config.start_index >= page_count {
            return Err(LoopError::IndexOutOfRange {
                index: config.start_index,
                count: page_count,
            });
        }
        let extent = axis_extent(config.axis, viewport_w, viewport_h)?;
        let mut view = Self {
            window: SlotWindow::new(slots, extent),
            scroller: Scroller::new(),
            gesture: GestureTracker::new(),
            config,
            state: TransitionState::Normal,
            offset: 0,
            current: 1,
            pending_rotations: 0,
            viewport_w,
            viewport_h,
            page_count,
            adapter,
            effect: None,
            on_settled: None,
        };
        view.apply_start_position();
        Ok(view)
    }

    /// Position the window on the configured start page. Assumes the
    /// window is in its original arrangement.
    fn apply_start_position(&mut self) {
        let band_hi = self.window.len() - 2;
        let start = self.config.start_index;
        let cur = start.clamp(1, band_hi);
        self.current = cur;
        self.offset = cur as i32 * self.window.extent();
        if start != cur {
            // Out-of-band start: rotate the requested page into the
            // resting slot.
            if start > cur {
                self.window.rotate_forward(start - cur);
            } else {
                self.window.rotate_backward(cur - start);
            }
        }
    }

    // -- Accessors --

    /// Slot of the resting page.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Logical index of the resting page.
    pub fn current_page_index(&self) -> usize {
        self.window.slot(self.current).logical
    }

    /// Handle of the resting page.
    pub fn current_page(&self) -> PageHandle {
        self.window.slot(self.current).handle
    }

    /// Scroll offset along the active axis.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Pixel length of one page along the active axis.
    pub fn extent(&self) -> i32 {
        self.window.extent()
    }

    /// Number of logical pages (clones excluded).
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Rotations applied so far by the in-flight motion.
    pub fn pending_rotations(&self) -> u32 {
        self.pending_rotations
    }

    pub fn is_animating(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// Snapshot of the current slot arrangement for the render loop.
    pub fn slots(&self) -> &[Slot] {
        self.window.slots()
    }

    /// Screen position of a slot along the active axis.
    pub fn slot_position(&self, slot_index: usize) -> i32 {
        self.window.position(slot_index)
    }

    /// Whether the host should consult the transform effect while drawing.
    pub fn effect_3d(&self) -> bool {
        self.config.effect_3d
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    // -- Configuration setters --

    /// Set the drag resistance; must be greater than 0.
    pub fn set_resistance(&mut self, resistance: f32) -> Result<()> {
        if resistance.is_nan() || resistance <= 0.0 {
            return Err(LoopError::Config(format!(
                "resistance must be greater than 0, got {resistance}"
            )));
        }
        self.config.resistance = resistance;
        Ok(())
    }

    /// Set the settle-back duration multiplier; must be at least 1.
    pub fn set_to_normal_offset(&mut self, offset: u32) -> Result<()> {
        if offset < 1 {
            return Err(LoopError::Config(
                "to_normal_offset must be at least 1".into(),
            ));
        }
        self.config.to_normal_offset = offset;
        Ok(())
    }

    /// Set the fling duration multiplier; must be at least 1.
    pub fn set_fling_offset(&mut self, offset: u32) -> Result<()> {
        if offset < 1 {
            return Err(LoopError::Config("fling_offset must be at least 1".into()));
        }
        self.config.fling_offset = offset;
        Ok(())
    }

    /// Switch the scroll axis. Any in-flight motion is abandoned and the
    /// container re-anchors on the resting page.
    pub fn set_axis(&mut self, axis: Axis) -> Result<()> {
        let extent = axis_extent(axis, self.viewport_w, self.viewport_h)?;
        self.interrupt_motion();
        self.config.axis = axis;
        self.window.set_extent(extent);
        self.offset = self.current as i32 * extent;
        Ok(())
    }

    /// Update the container size after a host resize.
    pub fn set_viewport(&mut self, viewport_w: u32, viewport_h: u32) -> Result<()> {
        let extent = axis_extent(self.config.axis, viewport_w, viewport_h)?;
        self.interrupt_motion();
        self.viewport_w = viewport_w;
        self.viewport_h = viewport_h;
        self.window.set_extent(extent);
        self.offset = self.current as i32 * extent;
        Ok(())
    }

    pub fn set_touch_enabled(&mut self, enabled: bool) {
        self.config.touch_enabled = enabled;
    }

    pub fn set_effect_3d(&mut self, enabled: bool) {
        self.config.effect_3d = enabled;
    }

    /// Install the draw-time transform effect.
    pub fn set_effect(&mut self, effect: Box<dyn PageEffect>) {
        self.effect = Some(effect);
    }

    /// Install the settle notifier.
    pub fn set_on_settled<F>(&mut self, callback: F)
    where
        F: FnMut(PageHandle, usize) + 'static,
    {
        self.on_settled = Some(Box::new(callback));
    }

    /// Update a page's visibility flag.
    pub fn set_page_visible(&mut self, id: PageId, visible: bool) -> Result<()> {
        if self.window.set_visible(id, visible) {
            Ok(())
        } else {
            Err(LoopError::Adapter(format!(
                "page {id:?} is not part of this container"
            )))
        }
    }

    // -- Event pipeline --

    /// Feed one resolved pointer event into the container.
    pub fn handle_event(&mut self, event: PointerEvent) {
        if !self.config.touch_enabled {
            return;
        }
        match event {
            PointerEvent::Down { x, y, time_ms } => {
                // Claim any in-flight motion: freeze it where it is so the
                // new gesture starts from exactly where the view sits.
                let claim = !self.scroller.is_finished();
                if claim {
                    self.interrupt_motion();
                }
                self.gesture.begin(x, y, time_ms, claim);
            },
            PointerEvent::Move { x, y, time_ms } => {
                let axis = self.config.axis;
                let slop = self.config.touch_slop;
                if let Some(delta) = self.gesture.movement(axis, slop, x, y, time_ms) {
                    self.drag_by(delta);
                }
            },
            PointerEvent::Up { x, y, time_ms } | PointerEvent::Cancel { x, y, time_ms } => {
                let axis = self.config.axis;
                if let Some(velocity) = self.gesture.finish(axis, x, y, time_ms) {
                    self.on_release(velocity);
                }
            },
        }
    }

    /// Apply one drag delta: reduce, divide by resistance, guard against
    /// delivery glitches, then scroll with boundary rotation.
    fn drag_by(&mut self, raw: f32) {
        let extent = self.window.extent();
        let reduced = (raw as i32) % extent;
        let delta = (reduced as f32 / self.config.resistance) as i32;
        if delta.abs() > extent / 4 {
            trace!("discarding noise delta {delta}");
            return;
        }
        self.offset += delta;
        self.apply_drag_boundary();
    }

    /// Rotate the window one page when a drag pushed the offset out of the
    /// safe band, compensating the offset so the screen does not move.
    fn apply_drag_boundary(&mut self) {
        let extent = self.window.extent();
        match self.window.boundary_state(self.offset) {
            BoundaryState::NeedPrev => {
                self.window.rotate_backward(1);
                self.offset += extent;
                self.current = (self.current + 1).min(self.window.len() - 2);
                trace!("drag rotated backward, offset {}", self.offset);
            },
            BoundaryState::NeedNext => {
                self.window.rotate_forward(1);
                self.offset -= extent;
                self.current = self.current.saturating_sub(1).max(1);
                trace!("drag rotated forward, offset {}", self.offset);
            },
            BoundaryState::None => {},
        }
    }

    /// Decide what a released gesture commits to.
    ///
    /// Velocity and displacement are independent: either a fast flick or a
    /// past-half drag commits, and velocity wins when the two disagree.
    fn on_release(&mut self, velocity: f32) {
        let extent = self.window.extent();
        let displacement = self.offset - self.current as i32 * extent;
        let half = extent / 2;
        debug!("release: velocity {velocity:.0} px/s, displacement {displacement}");
        if velocity > MAX_SPEED || -displacement > half {
            self.to_prev_action(velocity);
        } else if velocity < -MAX_SPEED || displacement > half {
            self.to_next_action(velocity);
        } else {
            self.to_normal_action();
        }
    }

    /// Pages a fling commits to: one, plus one per `MIN_SPEED` of excess
    /// velocity (scaled by resistance).
    fn add_count(&self, velocity: f32) -> i32 {
        let excess = (velocity.abs() - MAX_SPEED).max(0.0);
        (excess / MIN_SPEED / self.config.resistance) as i32 + 1
    }

    /// Synthetic velocity that commits to exactly `count` pages.
    fn speed_for_count(&self, count: i32) -> f32 {
        (count - 1) as f32 * self.config.resistance * MIN_SPEED + MAX_SPEED
    }

    /// Roll back to the resting position of the current page.
    fn to_normal_action(&mut self) {
        self.pending_rotations = 0;
        self.state = TransitionState::Normal;
        let target = self.current as i32 * self.window.extent();
        let travel = (target - self.offset).unsigned_abs() as u64;
        let duration = travel * u64::from(self.config.to_normal_offset);
        self.scroller.start(self.offset as f32, target as f32, duration);
    }

    /// Commit toward the previous page.
    fn to_prev_action(&mut self, velocity: f32) {
        self.pending_rotations = 0;
        self.state = TransitionState::ToPrev;
        let extent = self.window.extent();
        let add = self.add_count(velocity);
        // Displacement already dragged plus the committed pages; the
        // motion target stays an exact multiple of the extent.
        let travel = (self.offset - self.current as i32 * extent) + add * extent;
        if self.window.boundary_state(self.offset) == BoundaryState::NeedPrev {
            // The adjacent page is already due: swap it in before the
            // motion starts.
            self.window.rotate_backward(1);
            self.offset += extent;
            self.current = (self.current + 1).min(self.window.len() - 2);
        }
        let duration = travel.unsigned_abs() as u64 * u64::from(self.config.fling_offset);
        debug!("commit to_prev: pages {add}, travel {travel}");
        self.scroller
            .start(self.offset as f32, (self.offset - travel) as f32, duration);
    }

    /// Commit toward the next page.
    fn to_next_action(&mut self, velocity: f32) {
        self.pending_rotations = 0;
        self.state = TransitionState::ToNext;
        let extent = self.window.extent();
        let add = self.add_count(velocity);
        let travel = add * extent - (self.offset - self.current as i32 * extent);
        if self.window.boundary_state(self.offset) == BoundaryState::NeedNext {
            self.window.rotate_forward(1);
            self.offset -= extent;
            self.current = self.current.saturating_sub(1).max(1);
        }
        let duration = travel.unsigned_abs() as u64 * u64::from(self.config.fling_offset);
        debug!("commit to_next: pages {add}, travel {travel}");
        self.scroller
            .start(self.offset as f32, (self.offset + travel) as f32, duration);
    }

    /// Abandon an in-flight motion, freezing the offset where the last
    /// tick left it. The interrupted transition never completes, so no
    /// settle notification fires for it.
    fn interrupt_motion(&mut self) {
        if !self.scroller.is_finished() {
            self.scroller.abort();
            self.state = TransitionState::Normal;
            self.pending_rotations = 0;
            trace!("motion interrupted at offset {}", self.offset);
        }
    }

    // -- Frame tick --

    /// Advance the active motion to `now_ms`. Returns true while a motion
    /// is still running (the host should keep redrawing).
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.scroller.is_finished() {
            return false;
        }
        let (value, finished) = self.scroller.tick(now_ms);
        let value = value.round() as i32;
        let extent = self.window.extent();
        match self.state {
            TransitionState::ToPrev => {
                let mut applied = value + self.pending_rotations as i32 * extent;
                while applied < extent {
                    self.window.rotate_backward(1);
                    self.current = (self.current + 1).min(self.window.len() - 2);
                    self.pending_rotations += 1;
                    applied += extent;
                    trace!("flight rotation backward ({})", self.pending_rotations);
                }
                self.offset = applied;
            },
            TransitionState::ToNext => {
                let band_hi = (self.window.len() as i32 - 2) * extent;
                let mut applied = value - self.pending_rotations as i32 * extent;
                while applied > band_hi {
                    self.window.rotate_forward(1);
                    self.current = self.current.saturating_sub(1).max(1);
                    self.pending_rotations += 1;
                    applied -= extent;
                    trace!("flight rotation forward ({})", self.pending_rotations);
                }
                self.offset = applied;
            },
            TransitionState::Normal => {
                self.offset = value;
            },
        }
        if finished {
            self.finish_motion();
            false
        } else {
            true
        }
    }

    /// Settle bookkeeping once a motion completes.
    fn finish_motion(&mut self) {
        self.pending_rotations = 0;
        let moved = self.state != TransitionState::Normal;
        self.state = TransitionState::Normal;
        if moved {
            // Committed motions land on exact slot positions.
            self.current = (self.offset / self.window.extent()) as usize;
            self.notify_settled();
        }
    }

    fn notify_settled(&mut self) {
        let slot = *self.window.slot(self.current);
        debug!("settled on slot {} (page {})", self.current, slot.logical);
        if let Some(callback) = self.on_settled.as_mut() {
            callback(slot.handle, slot.logical);
        }
    }

    // -- Programmatic navigation --

    /// Advance one page. `smooth` animates through the fling path; an
    /// instant call rotates synchronously and notifies immediately.
    pub fn to_next(&mut self, smooth: bool) {
        self.interrupt_motion();
        if smooth {
            self.to_next_action(-MAX_SPEED);
        } else {
            self.window.rotate_forward(1);
            self.snap_to_resting();
            self.notify_settled();
        }
    }

    /// Go back one page.
    pub fn to_prev(&mut self, smooth: bool) {
        self.interrupt_motion();
        if smooth {
            self.to_prev_action(MAX_SPEED);
        } else {
            self.window.rotate_backward(1);
            self.snap_to_resting();
            self.notify_settled();
        }
    }

    /// Instant jumps land exactly on the resting position, even when they
    /// interrupted a motion frozen mid-page.
    fn snap_to_resting(&mut self) {
        self.offset = self.current as i32 * self.window.extent();
    }

    /// Navigate to a logical page index.
    ///
    /// Out-of-range indices fail without side effects. Navigating to the
    /// page already resting is a no-op.
    pub fn goto_index(&mut self, index: usize, smooth: bool) -> Result<()> {
        if index >= self.page_count {
            return Err(LoopError::IndexOutOfRange {
                index,
                count: self.page_count,
            });
        }
        self.interrupt_motion();
        if self.window.slot(self.current).logical == index {
            return Ok(());
        }
        let slot = match self.window.nearest_slot_of_logical(index, self.current) {
            Some(slot) => slot,
            None => {
                return Err(LoopError::IndexOutOfRange {
                    index,
                    count: self.page_count,
                });
            },
        };
        if slot > self.current {
            let pages = (slot - self.current) as i32;
            if smooth {
                self.to_next_action(-self.speed_for_count(pages));
            } else {
                self.window.rotate_forward(pages as usize);
                self.snap_to_resting();
                self.notify_settled();
            }
        } else {
            let pages = (self.current - slot) as i32;
            if smooth {
                self.to_prev_action(self.speed_for_count(pages));
            } else {
                self.window.rotate_backward(pages as usize);
                self.snap_to_resting();
                self.notify_settled();
            }
        }
        Ok(())
    }

    /// Restore the original page arrangement and starting position.
    pub fn reset(&mut self) {
        self.scroller.abort();
        self.state = TransitionState::Normal;
        self.pending_rotations = 0;
        self.window.reset();
        self.apply_start_position();
    }

    // -- Host integration --

    /// Transform for one slot, for hosts drawing with the 3D effect.
    ///
    /// Returns `None` when the effect mode is off, no effect is installed,
    /// the page is hidden, or the effect skips the slot.
    pub fn transform_for_slot(&mut self, slot_index: usize) -> Option<PageTransform> {
        if !self.config.effect_3d {
            return None;
        }
        let slot = *self.window.slot(slot_index);
        if !slot.handle.visible {
            return None;
        }
        let (viewport_w, viewport_h) = (self.viewport_w, self.viewport_h);
        let axis = self.config.axis;
        let offset = self.offset;
        self.effect
            .as_mut()?
            .transform(viewport_w, viewport_h, axis, slot_index, offset)
    }

    /// Tell the container a page's content changed so the two-page adapter
    /// can re-sync its clone partner.
    pub fn notify_page_changed(&mut self, id: PageId) -> Result<()> {
        if self.adapter.is_none() {
            return Err(LoopError::MissingAdapter);
        }
        let position = self.window.original_position(id).ok_or_else(|| {
            LoopError::Adapter(format!("page {id:?} is not part of this container"))
        })?;
        let partner = (position + 2) % self.window.len();
        let source = self.window.original_slot(position).handle;
        let clone = self.window.original_slot(partner).handle;
        if let Some(adapter) = self.adapter.as_mut() {
            adapter.bind_data(&source, &clone);
        }
        Ok(())
    }
}
