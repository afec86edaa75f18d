//! Page handle types.
//!
//! A page's renderable content is owned by the host view tree. The engine
//! only carries an opaque id plus the geometry and visibility it needs for
//! slot placement and transform effects.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a page owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub u32);

/// Non-owning descriptor of one renderable page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageHandle {
    pub id: PageId,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
}

impl PageHandle {
    /// Create a visible handle with the given geometry.
    pub fn new(id: PageId, width: u32, height: u32) -> Self {
        Self {
            id,
            width,
            height,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_visible() {
        let h = PageHandle::new(PageId(3), 480, 272);
        assert_eq!(h.id, PageId(3));
        assert_eq!(h.width, 480);
        assert_eq!(h.height, 272);
        assert!(h.visible);
    }

    #[test]
    fn page_id_hash_distinct() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(PageId(0));
        set.insert(PageId(1));
        set.insert(PageId(0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn handle_copy_semantics() {
        let h = PageHandle::new(PageId(9), 10, 10);
        let h2 = h;
        assert_eq!(h, h2);
    }

    #[test]
    fn handle_serde_roundtrip() {
        let h = PageHandle::new(PageId(7), 320, 240);
        let json = serde_json::to_string(&h).unwrap();
        let h2: PageHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(h, h2);
    }
}
