//! Routing of pointer and key events through the open chain.

use cascade_core::Point;

use crate::error::MenuError;
use crate::select::ItemBehavior;
use crate::tree::{MenuTree, NodeId};

/// What the pointer did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// The pointer moved, with or without a button held.
    Move,
    /// A button went down.
    Press,
    /// A button went up.
    Release,
}

/// Mouse button of a press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Usually the left button.
    Main,
    /// Usually the right button.
    Secondary,
    /// Usually the middle button.
    Auxiliary,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerEvent {
    pub pos: Point,
    pub kind: PointerKind,
    /// The button pressed; `None` for moves and releases.
    pub button: Option<Button>,
}

impl PointerEvent {
    pub fn moved(pos: Point) -> Self {
        Self {
            pos,
            kind: PointerKind::Move,
            button: None,
        }
    }

    pub fn press(pos: Point, button: Button) -> Self {
        Self {
            pos,
            kind: PointerKind::Press,
            button: Some(button),
        }
    }

    pub fn release(pos: Point) -> Self {
        Self {
            pos,
            kind: PointerKind::Release,
            button: None,
        }
    }
}

/// The keys a menu reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
}

impl MenuTree {
    /// Feed a pointer event to the tree. Returns whether the menu consumed
    /// it.
    ///
    /// A press outside every open node closes the whole tree and is left for
    /// the rest of the UI. Otherwise the event is consumed when it lands on
    /// an open node.
    pub fn handle_pointer(&mut self, ev: PointerEvent) -> Result<bool, MenuError> {
        if !self.is_open() {
            return Ok(false);
        }
        self.last_pointer = ev.pos;
        let over = self.hit_node(ev.pos);

        if ev.kind == PointerKind::Press && over.is_none() {
            log::trace!("menu: press at {} outside open nodes, closing", ev.pos);
            self.close();
            return Ok(false);
        }

        match ev.kind {
            PointerKind::Move => self.route_hover(ev.pos),
            PointerKind::Press => {
                if ev.button == Some(Button::Main) {
                    self.pressed = self.hit_item(ev.pos);
                }
            }
            PointerKind::Release => {
                let pressed = self.pressed.take();
                if let Some((id, i)) = self.hit_item(ev.pos).filter(|&hit| pressed == Some(hit)) {
                    self.release_item(id, i)?;
                }
            }
        }
        Ok(over.is_some())
    }

    /// Update hover state of every item of every open node for a pointer now
    /// at `pos`. Only the front-most node under the pointer counts as hit.
    fn route_hover(&mut self, pos: Point) {
        let top = self.hit_node(pos);
        let snapshot: Vec<NodeId> = self.draw_order().collect();
        for id in snapshot {
            for i in 0..self.node(id).items.len() {
                let node = self.node(id);
                if !node.open {
                    break;
                }
                let inside = top == Some(id) && node.item_rect(i).contains(pos);
                let item = &node.items[i];
                if item.hovered && !inside {
                    self.handle(id).on_hover_leave(i);
                } else if !item.hovered && inside && !item.disabled {
                    self.handle(id).on_hover_enter(i);
                }
            }
        }
    }

    /// A click completed on item `i`: leaves activate, submenu items open.
    fn release_item(&mut self, id: NodeId, i: usize) -> Result<(), MenuError> {
        if self.node(id).items[i].submenu.is_some() {
            self.handle(id).on_hover_enter(i);
            Ok(())
        } else {
            self.handle(id).on_activate(i)
        }
    }

    /// Feed a navigation key to the tree. Returns whether it was consumed.
    pub fn handle_key(&mut self, key: NavKey) -> Result<bool, MenuError> {
        if !self.is_open() {
            return Ok(false);
        }
        self.key_at(self.root, key)
    }

    /// The open child gets the key first; if it passes, `id` handles it.
    fn key_at(&mut self, id: NodeId, key: NavKey) -> Result<bool, MenuError> {
        if let Some(child) = self.open_child(id) {
            if self.key_at(child, key)? {
                return Ok(true);
            }
            log::trace!("menu: node {} passed {key:?} up", child.index());
        }

        let selected = self.node(id).selection;
        let submenu = selected.and_then(|i| self.node(id).items[i].submenu);
        let consumed = match key {
            NavKey::Up => self.handle(id).step(-1),
            NavKey::Down => self.handle(id).step(1),
            NavKey::Left => match submenu {
                Some(sub) if self.node(sub).open => {
                    self.close_node(sub);
                    true
                }
                _ => false,
            },
            NavKey::Right => match submenu {
                Some(sub) if !self.node(sub).open => {
                    self.open_node(sub);
                    self.handle(sub).select_first();
                    true
                }
                _ => false,
            },
            NavKey::Enter => match selected {
                Some(i) if submenu.is_none() => {
                    self.handle(id).on_activate(i)?;
                    true
                }
                _ => false,
            },
        };
        Ok(consumed)
    }
}
