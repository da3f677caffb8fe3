//! The widget a host owns: a built [`MenuTree`] plus the style and key
//! bindings used to draw and drive it.

use cascade_core::messages::{MouseAction, Msg};
use cascade_core::{Grid, Point};

use crate::dispatch::{Button, NavKey, PointerEvent};
use crate::error::MenuError;
use crate::spec::MenuSpec;
use crate::style::{MenuKeys, MenuStyle};
use crate::tree::{MenuTree, NodeId};

/// Configuration for a [`ContextMenu`].
#[derive(Debug, Clone)]
pub struct ContextMenuConfig {
    /// Items of the root menu and, recursively, of every submenu.
    pub spec: MenuSpec,
    /// Colours, margins and the submenu indicator.
    pub style: MenuStyle,
    /// Keys mapped to menu navigation by [`ContextMenu::update`].
    pub keys: MenuKeys,
}

impl ContextMenuConfig {
    /// Default style and key bindings for `spec`.
    pub fn new(spec: MenuSpec) -> Self {
        Self {
            spec,
            style: MenuStyle::default(),
            keys: MenuKeys::default(),
        }
    }
}

/// A nested context menu, ready to be opened by the widget owning it.
#[derive(Debug)]
pub struct ContextMenu {
    tree: MenuTree,
    style: MenuStyle,
    keys: MenuKeys,
}

impl ContextMenu {
    /// Build the menu tree. Fails on an empty (sub)menu.
    pub fn new(config: ContextMenuConfig) -> Result<Self, MenuError> {
        let tree = MenuTree::build(&config.spec, &config.style)?;
        Ok(Self {
            tree,
            style: config.style,
            keys: config.keys,
        })
    }

    /// Open the root menu with its top-left corner at `at`, kept inside a
    /// `viewport` of width `viewport.x` and height `viewport.y`.
    pub fn open(&mut self, at: Point, viewport: Point) {
        self.tree.open(at, viewport);
    }

    pub fn close(&mut self) {
        self.tree.close();
    }

    pub fn is_open(&self) -> bool {
        self.tree.is_open()
    }

    /// Re-clamp the open menus after the host was resized.
    pub fn set_viewport(&mut self, viewport: Point) {
        self.tree.set_viewport(viewport);
    }

    pub fn handle_pointer(&mut self, ev: PointerEvent) -> Result<bool, MenuError> {
        self.tree.handle_pointer(ev)
    }

    pub fn handle_key(&mut self, key: NavKey) -> Result<bool, MenuError> {
        self.tree.handle_key(key)
    }

    /// Translate an input message through the key bindings and feed it to
    /// the menu. Returns whether the menu consumed it.
    pub fn update(&mut self, msg: &Msg) -> Result<bool, MenuError> {
        match msg {
            Msg::KeyDown { key, .. } => match self.keys.nav(key) {
                Some(nav) => self.handle_key(nav),
                None => Ok(false),
            },
            Msg::Mouse { action, pos, .. } => {
                let ev = match action {
                    MouseAction::Main => PointerEvent::press(*pos, Button::Main),
                    MouseAction::Secondary => PointerEvent::press(*pos, Button::Secondary),
                    MouseAction::Auxiliary => PointerEvent::press(*pos, Button::Auxiliary),
                    MouseAction::Release => PointerEvent::release(*pos),
                    MouseAction::Move => PointerEvent::moved(*pos),
                    MouseAction::WheelUp | MouseAction::WheelDown => return Ok(false),
                };
                self.handle_pointer(ev)
            }
            _ => Ok(false),
        }
    }

    /// Enable or disable item `index` of node `id` while the menu runs.
    pub fn set_disabled(&mut self, id: NodeId, index: usize, disabled: bool) {
        self.tree.set_disabled(id, index, disabled);
    }

    pub fn draw(&self, grid: &Grid) {
        self.tree.draw(grid, &self.style);
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }
}
