//! loopview-ui: the circular paging engine.
//!
//! A fixed window of page slots rotates in place to fake an unbounded
//! circular sequence: drag gestures and programmatic navigation move a
//! scalar scroll offset, a settle state machine commits or rolls back page
//! transitions, and a pluggable effect computes per-slot draw transforms.
//! All rendering and event dispatch stay with the host; the engine is
//! driven entirely by `LoopView::handle_event` and a per-frame
//! `LoopView::tick`.

pub mod effects;
pub mod gesture;
pub mod motion;
pub mod pager;
pub mod slots;
pub mod two_page;

#[cfg(test)]
pub(crate) mod test_utils;

pub use effects::{FadeEffect, FlipBoxEffect, PageEffect, PageTransform, Rotation3d, RotationAxis};
pub use gesture::GestureState;
pub use pager::{LoopView, TransitionState};
pub use slots::{BoundaryState, Slot, SlotWindow};
pub use two_page::TwoPageAdapter;
