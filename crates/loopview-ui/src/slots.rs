//! Slot window: the fixed-size rotation buffer behind the infinite loop.
//!
//! The window holds exactly one slot per materialized page. Rotations move
//! handles between slots without creating or destroying them, and every
//! slot's screen position along the active axis is computed as
//! `slot_index * page_extent`, so a rotation plus an equal-and-opposite
//! offset compensation is invisible on screen.

use loopview_types::page::{PageHandle, PageId};

/// Pixel tolerance when testing the window edges, absorbing rounding in
/// drag deltas.
pub const EDGE_EPSILON: i32 = 5;

/// Result of an edge check against the current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    /// Offset is inside the window's safe band.
    None,
    /// The leading edge was crossed; a page must rotate in at the front.
    NeedPrev,
    /// The trailing edge was crossed; a page must rotate in at the back.
    NeedNext,
}

/// One materialized slot: a page handle plus the page's logical index in
/// the configured sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub handle: PageHandle,
    pub logical: usize,
}

/// Fixed-size window of page slots.
///
/// The window never grows or shrinks after construction; the caller
/// guarantees rotation counts stay below the window length (at most one
/// page is crossed per boundary check).
#[derive(Debug, Clone)]
pub struct SlotWindow {
    slots: Vec<Slot>,
    /// Original arrangement, kept for `reset` and clone-partner lookups.
    initial: Vec<Slot>,
    /// Pixel length of one page along the active axis.
    extent: i32,
}

impl SlotWindow {
    pub fn new(slots: Vec<Slot>, extent: i32) -> Self {
        let initial = slots.clone();
        Self {
            slots,
            initial,
            extent,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn extent(&self) -> i32 {
        self.extent
    }

    /// Update the page extent after an axis or viewport change.
    pub fn set_extent(&mut self, extent: i32) {
        self.extent = extent;
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    /// Screen position of a slot along the active axis.
    pub fn position(&self, index: usize) -> i32 {
        index as i32 * self.extent
    }

    /// Snapshot of the current arrangement for the render loop.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Move the first `k` slots to the end, preserving relative order.
    pub fn rotate_forward(&mut self, k: usize) {
        debug_assert!(k < self.slots.len());
        self.slots.rotate_left(k);
    }

    /// Move the last `k` slots to the front, preserving relative order.
    pub fn rotate_backward(&mut self, k: usize) {
        debug_assert!(k < self.slots.len());
        self.slots.rotate_right(k);
    }

    /// Check `offset` against the window edges.
    ///
    /// The leading threshold is slot 1's position and the trailing
    /// threshold slot `len - 2`'s, each padded by [`EDGE_EPSILON`]; the
    /// resting band between them always keeps one off-screen slot spare on
    /// either side.
    pub fn boundary_state(&self, offset: i32) -> BoundaryState {
        let n = self.slots.len() as i32;
        if offset < self.extent + EDGE_EPSILON {
            BoundaryState::NeedPrev
        } else if offset > (n - 2) * self.extent - EDGE_EPSILON {
            BoundaryState::NeedNext
        } else {
            BoundaryState::None
        }
    }

    /// Current slot of the first page with the given logical index.
    pub fn slot_of_logical(&self, logical: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.logical == logical)
    }

    /// Current slot of the page with the given logical index nearest to
    /// `from`; equidistant candidates resolve forward.
    pub fn nearest_slot_of_logical(&self, logical: usize, from: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.logical != logical {
                continue;
            }
            let dist = from.abs_diff(i);
            let replace = match best {
                None => true,
                Some((bd, _)) => dist < bd || (dist == bd && i > from),
            };
            if replace {
                best = Some((dist, i));
            }
        }
        best.map(|(_, slot)| slot)
    }

    /// Current slot of the page with the given id.
    pub fn slot_of_id(&self, id: PageId) -> Option<usize> {
        self.slots.iter().position(|s| s.handle.id == id)
    }

    /// Position of a page id in the original (unrotated) arrangement.
    pub fn original_position(&self, id: PageId) -> Option<usize> {
        self.initial.iter().position(|s| s.handle.id == id)
    }

    /// Slot descriptor at a position in the original arrangement.
    pub fn original_slot(&self, index: usize) -> &Slot {
        &self.initial[index]
    }

    /// Update a page's visibility flag. Returns false if the id is
    /// unknown.
    pub fn set_visible(&mut self, id: PageId, visible: bool) -> bool {
        let mut found = false;
        for slot in &mut self.slots {
            if slot.handle.id == id {
                slot.handle.visible = visible;
                found = true;
            }
        }
        for slot in &mut self.initial {
            if slot.handle.id == id {
                slot.handle.visible = visible;
            }
        }
        found
    }

    /// Restore the original arrangement.
    pub fn reset(&mut self) {
        self.slots.clone_from(&self.initial);
    }
}
