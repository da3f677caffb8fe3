//! Nested context menus for grid UIs.
//!
//! A [`ContextMenu`] is built from a declarative [`MenuSpec`] into a
//! [`MenuTree`] of nodes. Once opened it is driven by pointer and key events;
//! at any time exactly one chain of nodes, starting at the root, is open, and
//! every open node lies inside the viewport it was last placed in.
//!
//! ```
//! use cascade_core::Point;
//! use cascade_menu::{ContextMenu, ContextMenuConfig, MenuSpec, NavKey};
//!
//! let spec = MenuSpec::new()
//!     .submenu("File", MenuSpec::new().action("Open", || Ok(())))
//!     .action("Quit", || Ok(()));
//! let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
//! menu.open(Point::new(2, 2), Point::new(80, 24));
//! assert!(menu.handle_key(NavKey::Down).unwrap());
//! assert!(menu.handle_key(NavKey::Right).unwrap());
//! assert_eq!(menu.tree().open_chain().len(), 2);
//! ```

mod context_menu;
mod dispatch;
mod draw;
mod error;
mod place;
mod select;
mod spec;
mod style;
mod tree;

pub use context_menu::{ContextMenu, ContextMenuConfig};
pub use dispatch::{Button, NavKey, PointerEvent, PointerKind};
pub use error::MenuError;
pub use place::{Anchor, place};
pub use spec::{Action, ActionError, ActionResult, ActionTable, Entry, EntryKind, MenuSpec};
pub use style::{MenuKeys, MenuStyle};
pub use tree::{MenuItem, MenuNode, MenuTree, NodeId};
