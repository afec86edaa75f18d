//! Shared test fixtures for the engine tests.
//!
//! Provides standard page/container builders, a [`SettleLog`] recorder for
//! settle notifications, and helpers that feed gestures and run motions to
//! rest.

use std::cell::RefCell;
use std::rc::Rc;

use loopview_types::config::LoopConfig;
use loopview_types::input::PointerEvent;
use loopview_types::page::{PageHandle, PageId};

use crate::pager::LoopView;

/// Standard 100x100 page handles with sequential ids.
pub fn pages(n: usize) -> Vec<PageHandle> {
    (0..n)
        .map(|i| PageHandle::new(PageId(i as u32), 100, 100))
        .collect()
}

/// Vertical container over `n` pages with a 100px page extent and default
/// configuration (resting on logical page 1).
pub fn pager(n: usize) -> LoopView {
    LoopView::new(pages(n), 100, 100, LoopConfig::default()).unwrap()
}

/// Records settle notifications as `(page id, logical index)` pairs.
#[derive(Clone, Default)]
pub struct SettleLog {
    events: Rc<RefCell<Vec<(u32, usize)>>>,
}

impl SettleLog {
    pub fn attach(&self, view: &mut LoopView) {
        let events = Rc::clone(&self.events);
        view.set_on_settled(move |handle, logical| {
            events.borrow_mut().push((handle.id.0, logical));
        });
    }

    pub fn events(&self) -> Vec<(u32, usize)> {
        self.events.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.events.borrow().len()
    }
}

/// Press at `down`, drag through `moves`, release at `up`.
pub fn swipe(
    view: &mut LoopView,
    down: (f32, f32, u64),
    moves: &[(f32, f32, u64)],
    up: (f32, f32, u64),
) {
    view.handle_event(PointerEvent::Down {
        x: down.0,
        y: down.1,
        time_ms: down.2,
    });
    for &(x, y, time_ms) in moves {
        view.handle_event(PointerEvent::Move { x, y, time_ms });
    }
    view.handle_event(PointerEvent::Up {
        x: up.0,
        y: up.1,
        time_ms: up.2,
    });
}

/// Tick the view at 16ms frames until the motion settles; returns the
/// final timestamp.
pub fn run_to_rest(view: &mut LoopView, mut now_ms: u64) -> u64 {
    let mut frames = 0;
    while view.is_animating() {
        now_ms += 16;
        view.tick(now_ms);
        frames += 1;
        assert!(frames < 10_000, "motion never settled");
    }
    now_ms
}
