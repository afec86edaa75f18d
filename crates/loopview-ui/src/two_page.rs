//! Two-page adapter boundary.
//!
//! A two-page sequence cannot loop through the general window: the same
//! page would have to be both neighbours of the other. The host instead
//! supplies an adapter that clones each page once, the setup phase builds
//! an ordinary four-slot window out of originals and clones, and settle
//! notifications report only the logical indices 0 and 1, so the clones
//! stay invisible to the host. Cloning and content sync live entirely on
//! the host side; the engine invokes the adapter at setup and on explicit
//! change notifications, never from the paging state machine.

use loopview_types::page::PageHandle;

/// Host-side cloning capability for the two-page path.
pub trait TwoPageAdapter {
    /// Produce a renderable clone of the first page. The clone must be a
    /// distinct page (different id) showing the first page's content.
    fn clone_first(&mut self, first: &PageHandle) -> PageHandle;

    /// Produce a renderable clone of the second page.
    fn clone_second(&mut self, second: &PageHandle) -> PageHandle;

    /// Copy `source`'s content into `clone` after the host changed it.
    fn bind_data(&mut self, source: &PageHandle, clone: &PageHandle);
}
