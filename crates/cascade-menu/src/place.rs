//! Placement of nodes inside the viewport, and the open/close operations
//! that go with it.

use cascade_core::{Point, Range};

use crate::tree::{MenuTree, NodeId};

/// Where a node wants to appear before clamping.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// A root menu at an explicit top-left corner.
    At(Point),
    /// A submenu next to `parent`, top row aligned with screen row `row`.
    Beside { parent: Range, row: i32 },
}

/// Rectangle of a node of `size` placed at `anchor` and kept inside
/// `viewport` (a width/height pair).
///
/// A submenu that would overflow on the right flips to the left of its
/// parent; a root shifts left by the overflow. Both shift up by any bottom
/// overflow, and neither coordinate goes below zero.
pub fn place(size: Point, anchor: Anchor, viewport: Point) -> Range {
    let (x, mut y) = match anchor {
        Anchor::At(p) => {
            let overflow = p.x + size.x - viewport.x;
            (if overflow > 0 { p.x - overflow } else { p.x }, p.y)
        }
        Anchor::Beside { parent, row } => {
            if parent.max.x + size.x > viewport.x {
                (parent.min.x - size.x, row)
            } else {
                (parent.max.x, row)
            }
        }
    };
    if y + size.y > viewport.y {
        y -= y + size.y - viewport.y;
    }
    Range::with_size(Point::new(x.max(0), y.max(0)), size)
}

impl MenuTree {
    /// Open the root at `at` inside `viewport`. An already open tree is
    /// closed first, so the menu starts from a clean state.
    pub fn open(&mut self, at: Point, viewport: Point) {
        if self.is_open() {
            self.close_node(self.root);
        }
        self.viewport = viewport;
        let root = self.root;
        self.get_mut(root).anchor = at;
        self.open_node(root);
    }

    /// Close the whole tree.
    pub fn close(&mut self) {
        self.close_node(self.root);
    }

    /// Place `id` in the current viewport, mark it open and bring it to the
    /// front. Does nothing while the parent of `id` is closed.
    pub(crate) fn open_node(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            if !self.node(parent).open {
                log::debug!("menu: node {} not opened, parent is closed", id.index());
                return;
            }
        }
        let size = self.node(id).size;
        if !size.fits_in(self.viewport) {
            log::warn!(
                "menu: node {} of size {size} exceeds viewport {}",
                id.index(),
                self.viewport
            );
        }
        let rect = self.placement(id);
        let node = self.get_mut(id);
        node.rect = rect;
        node.open = true;
        self.raise(id);
        log::debug!("menu: open node {} at {rect}", id.index());
    }

    /// Close `id` and everything below it, clearing selection and hover.
    pub(crate) fn close_node(&mut self, id: NodeId) {
        let node = self.get_mut(id);
        let was_open = node.open;
        node.open = false;
        node.selection = None;
        for item in &mut node.items {
            item.hovered = false;
        }
        if self.pressed.is_some_and(|(p, _)| p == id) {
            self.pressed = None;
        }
        self.close_submenus(id);
        if was_open {
            log::debug!("menu: close node {}", id.index());
        }
    }

    /// Close the direct children of `id` (and so their descendants), leaving
    /// `id` itself open.
    pub(crate) fn close_submenus(&mut self, id: NodeId) {
        for k in 0..self.node(id).children.len() {
            let child = self.node(id).children[k];
            self.close_node(child);
        }
    }

    /// Collapse the whole chain `id` belongs to, root included.
    pub(crate) fn close_ancestor_chain(&mut self, id: NodeId) {
        let mut top = id;
        while let Some(parent) = self.node(top).parent {
            top = parent;
        }
        self.close_node(top);
    }

    /// Record a new viewport and re-place every open node, root first.
    pub fn set_viewport(&mut self, viewport: Point) {
        self.viewport = viewport;
        for id in self.open_chain() {
            let rect = self.placement(id);
            self.get_mut(id).rect = rect;
        }
    }

    fn placement(&self, id: NodeId) -> Range {
        let node = self.node(id);
        let anchor = match node.parent {
            None => Anchor::At(node.anchor),
            Some(p) => {
                let parent = self.node(p);
                let row = parent.selection.or_else(|| parent.owner_of(id)).unwrap_or(0);
                Anchor::Beside {
                    parent: parent.rect,
                    row: parent.rect.min.y + row as i32,
                }
            }
        };
        place(node.size, anchor, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ActionResult, MenuSpec};
    use crate::style::MenuStyle;

    fn noop() -> ActionResult {
        Ok(())
    }

    #[test]
    fn root_shifts_left_and_up() {
        // 10 wide, 4 tall, asked for (18, 18) in a 20x20 viewport
        let r = place(Point::new(10, 4), Anchor::At(Point::new(18, 18)), Point::new(20, 20));
        assert_eq!(r.min, Point::new(10, 16));
        assert!(r.in_range(Range::new(0, 0, 20, 20)));
    }

    #[test]
    fn root_that_fits_stays_put() {
        let r = place(Point::new(5, 3), Anchor::At(Point::new(2, 4)), Point::new(20, 20));
        assert_eq!(r, Range::new(2, 4, 7, 7));
    }

    #[test]
    fn submenu_opens_right_then_flips_left() {
        let parent = Range::new(2, 2, 10, 6);
        let right = place(Point::new(6, 2), Anchor::Beside { parent, row: 3 }, Point::new(40, 20));
        assert_eq!(right.min, Point::new(10, 3));

        let flipped = place(Point::new(6, 2), Anchor::Beside { parent, row: 3 }, Point::new(14, 20));
        assert_eq!(flipped.min, Point::new(0, 3));
        let parent = Range::new(30, 2, 38, 6);
        let flipped = place(Point::new(6, 2), Anchor::Beside { parent, row: 3 }, Point::new(40, 20));
        assert_eq!(flipped.min, Point::new(24, 3));
    }

    #[test]
    fn submenu_shifts_up_at_bottom() {
        let parent = Range::new(0, 15, 8, 20);
        let r = place(Point::new(6, 4), Anchor::Beside { parent, row: 19 }, Point::new(40, 20));
        assert_eq!(r.min, Point::new(8, 16));
    }

    #[test]
    fn never_negative() {
        let r = place(Point::new(30, 30), Anchor::At(Point::new(5, 5)), Point::new(20, 20));
        assert_eq!(r.min, Point::ZERO);
    }

    fn tree() -> MenuTree {
        let spec = MenuSpec::new()
            .action("a", noop)
            .submenu("sub", MenuSpec::new().action("x", noop).action("y", noop));
        MenuTree::build(&spec, &MenuStyle::default()).unwrap()
    }

    #[test]
    fn open_and_close_chain() {
        let mut t = tree();
        t.open(Point::new(1, 1), Point::new(40, 20));
        let root = t.root();
        assert!(t.is_open());
        assert_eq!(t.node(root).rect().min, Point::new(1, 1));

        let sub = t.node(root).items()[1].submenu().unwrap();
        t.get_mut(root).selection = Some(1);
        t.open_node(sub);
        // beside the parent, on the row of "sub"
        assert_eq!(t.node(sub).rect().min, Point::new(t.node(root).rect().max.x, 2));
        assert_eq!(t.open_chain(), vec![root, sub]);
        assert_eq!(t.draw_order().last(), Some(sub));

        t.close_ancestor_chain(sub);
        assert!(!t.is_open());
        assert!(!t.node(sub).is_open());
        assert_eq!(t.node(root).selection(), None);
    }

    #[test]
    fn submenu_of_a_closed_node_stays_closed() {
        let spec = MenuSpec::new().submenu(
            "a",
            MenuSpec::new().submenu("b", MenuSpec::new().action("x", noop)),
        );
        let mut t = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        let root = t.root();
        let a = t.node(root).items()[0].submenu().unwrap();
        let b = t.node(a).items()[0].submenu().unwrap();
        t.open_node(b);
        assert!(!t.node(b).is_open());
        assert!(t.open_chain().is_empty());

        // an open root is not enough for a grandchild
        t.open(Point::ZERO, Point::new(40, 20));
        t.open_node(b);
        assert!(!t.node(b).is_open());
        assert_eq!(t.open_chain(), vec![root]);
    }

    #[test]
    fn close_submenus_keeps_node_open() {
        let mut t = tree();
        t.open(Point::ZERO, Point::new(40, 20));
        let root = t.root();
        let sub = t.node(root).items()[1].submenu().unwrap();
        t.get_mut(root).selection = Some(1);
        t.open_node(sub);
        t.close_submenus(root);
        assert!(t.is_open());
        assert!(!t.node(sub).is_open());
        assert_eq!(t.node(root).selection(), Some(1));
    }

    #[test]
    fn resize_replaces_open_nodes() {
        let mut t = tree();
        t.open(Point::new(30, 15), Point::new(40, 20));
        let root = t.root();
        t.set_viewport(Point::new(20, 10));
        let vp = Range::new(0, 0, 20, 10);
        assert!(t.node(root).rect().in_range(vp));
        assert_eq!(t.viewport(), Point::new(20, 10));
    }

    #[test]
    fn reopening_resets_state() {
        let mut t = tree();
        t.open(Point::ZERO, Point::new(40, 20));
        let root = t.root();
        t.get_mut(root).selection = Some(0);
        t.open(Point::new(3, 3), Point::new(40, 20));
        assert_eq!(t.node(root).selection(), None);
        assert_eq!(t.node(root).rect().min, Point::new(3, 3));
    }
}
