//! Selection and highlight state of a node's items.
//!
//! Hover, un-hover and activation are what the pointer and keyboard paths
//! share, so they sit behind [`ItemBehavior`], implemented by the
//! [`NodeHandle`] borrowed from a tree.

use crate::error::MenuError;
use crate::tree::{MenuTree, NodeId};

/// What an item does when the pointer enters it, leaves it, or triggers it.
pub(crate) trait ItemBehavior {
    /// Highlight item `index`, make it the selection and open its submenu.
    /// A previously selected item loses its highlight and its submenus.
    fn on_hover_enter(&mut self, index: usize);

    /// Drop the hover highlight of `index`. Its open submenu survives only if
    /// the pointer went into it.
    fn on_hover_leave(&mut self, index: usize);

    /// Run a leaf's action, then collapse the chain up to the root. Items
    /// owning a submenu and inert items do nothing.
    fn on_activate(&mut self, index: usize) -> Result<(), MenuError>;
}

/// Mutable access to one node together with the tree it lives in.
pub(crate) struct NodeHandle<'a> {
    tree: &'a mut MenuTree,
    id: NodeId,
}

impl MenuTree {
    pub(crate) fn handle(&mut self, id: NodeId) -> NodeHandle<'_> {
        NodeHandle { tree: self, id }
    }

    /// Enable or disable item `index` of `id`. Disabling the selected item
    /// drops the selection and closes the item's submenu.
    pub fn set_disabled(&mut self, id: NodeId, index: usize, disabled: bool) {
        let Some(item) = self.get_mut(id).items.get_mut(index) else {
            return;
        };
        item.disabled = disabled;
        if !disabled {
            return;
        }
        item.hovered = false;
        let submenu = item.submenu;
        if let Some(sub) = submenu {
            self.close_node(sub);
        }
        let node = self.get_mut(id);
        if node.selection == Some(index) {
            node.selection = None;
        }
        if self.pressed == Some((id, index)) {
            self.pressed = None;
        }
    }
}

impl NodeHandle<'_> {
    /// Move the selection one enabled item in `dir` (+1 down, -1 up),
    /// wrapping around, and close this node's submenus. Without a selection
    /// the scan starts at the first (down) or last (up) item. Returns
    /// `false`, changing nothing, if every item is disabled.
    pub fn step(&mut self, dir: isize) -> bool {
        let node = self.tree.node(self.id);
        let len = node.items.len() as isize;
        let prev = node.selection;
        let mut i = match prev {
            None if dir > 0 => 0,
            None => len - 1,
            Some(s) => (s as isize + dir).rem_euclid(len),
        };
        for _ in 0..len {
            if !node.items[i as usize].disabled {
                let node = self.tree.get_mut(self.id);
                if let Some(j) = prev {
                    node.items[j].hovered = false;
                }
                node.items[i as usize].hovered = true;
                node.selection = Some(i as usize);
                self.tree.close_submenus(self.id);
                return true;
            }
            i = (i + dir).rem_euclid(len);
        }
        false
    }

    /// Select the first enabled item, closing anything it might own.
    pub fn select_first(&mut self) {
        let node = self.tree.get_mut(self.id);
        if let Some(i) = node.items.iter().position(|it| !it.disabled) {
            node.items[i].hovered = true;
            node.selection = Some(i);
        }
        self.tree.close_submenus(self.id);
    }
}

impl ItemBehavior for NodeHandle<'_> {
    fn on_hover_enter(&mut self, index: usize) {
        let id = self.id;
        if !self.tree.node(id).open {
            return;
        }
        let node = self.tree.get_mut(id);
        let Some(item) = node.items.get_mut(index) else {
            return;
        };
        if item.disabled {
            return;
        }
        item.hovered = true;
        let submenu = item.submenu;
        if let Some(prev) = node.selection.filter(|&j| j != index) {
            node.items[prev].hovered = false;
            self.tree.close_submenus(id);
        }
        self.tree.get_mut(id).selection = Some(index);
        if let Some(sub) = submenu {
            self.tree.open_node(sub);
        }
    }

    fn on_hover_leave(&mut self, index: usize) {
        let id = self.id;
        let pointer = self.tree.last_pointer;
        let Some(item) = self.tree.get_mut(id).items.get_mut(index) else {
            return;
        };
        item.hovered = false;
        let submenu = item.submenu;
        let open_sub = submenu.filter(|&s| self.tree.node(s).open);
        match open_sub {
            None => {
                let node = self.tree.get_mut(id);
                if node.selection == Some(index) {
                    node.selection = None;
                }
            }
            Some(sub) => {
                if !self.tree.node(sub).rect.contains(pointer) {
                    self.tree.close_node(sub);
                }
            }
        }
    }

    fn on_activate(&mut self, index: usize) -> Result<(), MenuError> {
        let Some(item) = self.tree.node(self.id).item(index) else {
            return Ok(());
        };
        if item.disabled || item.submenu.is_some() {
            return Ok(());
        }
        let Some(action) = item.action.clone() else {
            return Ok(());
        };
        let label = item.label.clone();
        log::debug!("menu: activate `{label}`");
        if let Err(source) = action() {
            log::warn!("menu: action `{label}` failed: {source}");
            return Err(MenuError::Action { label, source });
        }
        self.tree.close_ancestor_chain(self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ActionResult, MenuSpec};
    use crate::style::MenuStyle;
    use cascade_core::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    fn noop() -> ActionResult {
        Ok(())
    }

    fn tree(spec: MenuSpec) -> MenuTree {
        let mut t = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        t.open(Point::ZERO, Point::new(80, 24));
        t
    }

    fn two_submenus() -> MenuTree {
        tree(
            MenuSpec::new()
                .submenu("A", MenuSpec::new().action("a1", noop))
                .submenu("B", MenuSpec::new().action("b1", noop))
                .action("C", noop),
        )
    }

    #[test]
    fn hover_enter_opens_submenu_and_selects() {
        let mut t = two_submenus();
        let root = t.root();
        t.handle(root).on_hover_enter(0);
        let a = t.node(root).items()[0].submenu().unwrap();
        assert_eq!(t.node(root).selection(), Some(0));
        assert!(t.node(a).is_open());
        assert!(t.is_highlighted(root, 0));
    }

    #[test]
    fn hover_enter_on_sibling_closes_previous_branch() {
        let mut t = two_submenus();
        let root = t.root();
        let (a, b) = (t.node(root).children()[0], t.node(root).children()[1]);
        t.handle(root).on_hover_enter(0);
        t.handle(root).on_hover_enter(1);
        assert!(!t.node(a).is_open());
        assert!(t.node(b).is_open());
        assert!(!t.node(root).items()[0].is_hovered());
        assert_eq!(t.node(root).selection(), Some(1));
    }

    #[test]
    fn hover_leave_keeps_submenu_when_pointer_went_into_it() {
        let mut t = two_submenus();
        let root = t.root();
        t.handle(root).on_hover_enter(0);
        let a = t.node(root).children()[0];
        t.last_pointer = t.node(a).rect().min;
        t.handle(root).on_hover_leave(0);
        assert!(t.node(a).is_open());
        // still painted highlighted because its submenu is open
        assert!(t.is_highlighted(root, 0));
        assert!(!t.node(root).items()[0].is_hovered());
    }

    #[test]
    fn hover_leave_elsewhere_closes_submenu() {
        let mut t = two_submenus();
        let root = t.root();
        t.handle(root).on_hover_enter(0);
        let a = t.node(root).children()[0];
        t.last_pointer = Point::new(70, 20);
        t.handle(root).on_hover_leave(0);
        assert!(!t.node(a).is_open());
        assert!(!t.is_highlighted(root, 0));
    }

    #[test]
    fn hover_leave_on_leaf_clears_selection() {
        let mut t = two_submenus();
        let root = t.root();
        t.handle(root).on_hover_enter(2);
        t.handle(root).on_hover_leave(2);
        assert_eq!(t.node(root).selection(), None);
    }

    #[test]
    fn disabled_items_are_not_hovered() {
        let mut t = tree(MenuSpec::new().action("a", noop).action("b", noop).disable("b"));
        let root = t.root();
        t.handle(root).on_hover_enter(1);
        assert_eq!(t.node(root).selection(), None);
    }

    #[test]
    fn step_skips_disabled_and_wraps() {
        let mut t = tree(
            MenuSpec::new()
                .action("a", noop)
                .action("b", noop)
                .action("c", noop)
                .disable("a")
                .disable("b"),
        );
        let root = t.root();
        assert!(t.handle(root).step(1));
        assert_eq!(t.node(root).selection(), Some(2));
        // the only enabled item is found again after wrapping
        assert!(t.handle(root).step(1));
        assert_eq!(t.node(root).selection(), Some(2));
        assert!(t.handle(root).step(-1));
        assert_eq!(t.node(root).selection(), Some(2));
    }

    #[test]
    fn step_up_from_nothing_starts_at_bottom() {
        let mut t = tree(MenuSpec::new().action("a", noop).action("b", noop).action("c", noop));
        let root = t.root();
        assert!(t.handle(root).step(-1));
        assert_eq!(t.node(root).selection(), Some(2));
        assert!(t.handle(root).step(-1));
        assert_eq!(t.node(root).selection(), Some(1));
        assert!(!t.node(root).items()[2].is_hovered());
    }

    #[test]
    fn step_fails_when_everything_is_disabled() {
        let mut t = tree(MenuSpec::new().action("a", noop).disable("a"));
        let root = t.root();
        assert!(!t.handle(root).step(1));
        assert_eq!(t.node(root).selection(), None);
    }

    #[test]
    fn activate_runs_action_and_closes_chain() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut t = tree(MenuSpec::new().submenu(
            "File",
            MenuSpec::new().action("Open", move || {
                h.set(h.get() + 1);
                Ok(())
            }),
        ));
        let root = t.root();
        t.handle(root).on_hover_enter(0);
        let file = t.node(root).children()[0];
        t.handle(file).on_activate(0).unwrap();
        assert_eq!(hits.get(), 1);
        assert!(!t.is_open());
        assert!(!t.node(file).is_open());
    }

    #[test]
    fn failing_action_leaves_chain_open() {
        let mut t = tree(MenuSpec::new().action("Boom", || Err("nope".into())));
        let root = t.root();
        let err = t.handle(root).on_activate(0).unwrap_err();
        assert!(matches!(err, MenuError::Action { ref label, .. } if label == "Boom"));
        assert!(t.is_open());
    }

    #[test]
    fn inert_and_submenu_items_do_not_activate() {
        let mut t = tree(MenuSpec::new().inert("nothing").submenu("S", MenuSpec::new().inert("x")));
        let root = t.root();
        t.handle(root).on_activate(0).unwrap();
        t.handle(root).on_activate(1).unwrap();
        assert!(t.is_open());
    }

    #[test]
    fn disabling_the_selection_clears_it() {
        let mut t = two_submenus();
        let root = t.root();
        t.handle(root).on_hover_enter(1);
        let b = t.node(root).children()[1];
        t.set_disabled(root, 1, true);
        assert_eq!(t.node(root).selection(), None);
        assert!(!t.node(b).is_open());
        t.set_disabled(root, 1, false);
        assert!(!t.node(root).items()[1].is_disabled());
    }

    #[test]
    fn hover_on_a_closed_tree_changes_nothing() {
        let spec = MenuSpec::new().submenu("A", MenuSpec::new().action("a1", noop));
        let mut t = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        let root = t.root();
        let a = t.node(root).children()[0];
        t.handle(root).on_hover_enter(0);
        assert_eq!(t.node(root).selection(), None);
        assert!(!t.node(a).is_open());
        assert!(!t.node(root).items()[0].is_hovered());
    }
}
