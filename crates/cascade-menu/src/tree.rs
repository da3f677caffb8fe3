//! The menu tree: nodes in an arena, addressed by [`NodeId`].
//!
//! A node owns its children through the arena; the `parent` link is a plain
//! id used only for navigation.

use std::fmt;

use cascade_core::{Point, Range};
use unicode_width::UnicodeWidthStr;

use crate::error::MenuError;
use crate::spec::{Action, EntryKind, MenuSpec};
use crate::style::MenuStyle;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One row of a menu.
pub struct MenuItem {
    pub(crate) label: String,
    pub(crate) action: Option<Action>,
    pub(crate) submenu: Option<NodeId>,
    pub(crate) disabled: bool,
    pub(crate) hovered: bool,
}

impl MenuItem {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn submenu(&self) -> Option<NodeId> {
        self.submenu
    }

    pub fn is_leaf(&self) -> bool {
        self.submenu.is_none()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("action", &self.action.is_some())
            .field("submenu", &self.submenu)
            .field("disabled", &self.disabled)
            .field("hovered", &self.hovered)
            .finish()
    }
}

/// One menu level.
#[derive(Debug)]
pub struct MenuNode {
    pub(crate) items: Vec<MenuItem>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) selection: Option<usize>,
    pub(crate) open: bool,
    pub(crate) rect: Range,
    /// Requested top-left corner, used when the node is a root.
    pub(crate) anchor: Point,
    pub(crate) size: Point,
}

impl MenuNode {
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item(&self, i: usize) -> Option<&MenuItem> {
        self.items.get(i)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Last placed rectangle. Meaningful while the node is open.
    pub fn rect(&self) -> Range {
        self.rect
    }

    /// Natural size: widest label plus margins, one row per item.
    pub fn size(&self) -> Point {
        self.size
    }

    /// Screen rectangle of item `i`.
    pub fn item_rect(&self, i: usize) -> Range {
        self.rect.line(i as i32)
    }

    /// Index of the item under the screen position `p`.
    pub fn item_at(&self, p: Point) -> Option<usize> {
        if self.rect.contains(p) {
            Some((p.y - self.rect.min.y) as usize)
        } else {
            None
        }
    }

    /// Index of the item owning the submenu `child`.
    pub(crate) fn owner_of(&self, child: NodeId) -> Option<usize> {
        self.items.iter().position(|it| it.submenu == Some(child))
    }
}

/// A fully wired menu tree plus the interaction state shared by its nodes.
#[derive(Debug)]
pub struct MenuTree {
    pub(crate) nodes: Vec<MenuNode>,
    pub(crate) root: NodeId,
    /// Back to front; the last open entry is drawn on top.
    pub(crate) z_order: Vec<NodeId>,
    pub(crate) viewport: Point,
    pub(crate) last_pointer: Point,
    pub(crate) pressed: Option<(NodeId, usize)>,
}

impl MenuTree {
    /// Build a tree from `spec`, children first. Every node starts closed
    /// with no selection.
    pub fn build(spec: &MenuSpec, style: &MenuStyle) -> Result<Self, MenuError> {
        let mut nodes = Vec::new();
        let root = build_node(&mut nodes, spec, None, style)?;
        let z_order = (0..nodes.len()).map(NodeId).collect();
        Ok(Self {
            nodes,
            root,
            z_order,
            viewport: Point::ZERO,
            last_pointer: Point::ZERO,
            pressed: None,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node behind `id`. Ids are only minted by this tree.
    pub fn node(&self, id: NodeId) -> &MenuNode {
        &self.nodes[id.0]
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut MenuNode {
        &mut self.nodes[id.0]
    }

    /// Every node of the tree, submenus before the menus owning them.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MenuNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.node(self.root).open
    }

    /// The viewport of the last placement.
    pub fn viewport(&self) -> Point {
        self.viewport
    }

    /// The open child of `id`, if any.
    pub fn open_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).open)
    }

    /// The open nodes from the root down. Empty when the root is closed.
    pub fn open_chain(&self) -> Vec<NodeId> {
        let mut chain = Vec::new();
        if !self.is_open() {
            return chain;
        }
        let mut cur = Some(self.root);
        while let Some(id) = cur {
            chain.push(id);
            cur = self.open_child(id);
        }
        chain
    }

    /// Open nodes back to front.
    pub fn draw_order(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.z_order.iter().copied().filter(|&id| self.node(id).open)
    }

    /// Whether item `i` of `id` is painted highlighted: hovered, or owning a
    /// submenu that is still open.
    pub fn is_highlighted(&self, id: NodeId, i: usize) -> bool {
        self.node(id).item(i).is_some_and(|it| {
            it.hovered || it.submenu.is_some_and(|s| self.node(s).open)
        })
    }

    /// Every item as `(label path, is_leaf)`, in the order of
    /// [`MenuSpec::shape`].
    pub fn shape(&self) -> Vec<(Vec<String>, bool)> {
        let mut out = Vec::new();
        self.collect_shape(self.root, &mut Vec::new(), &mut out);
        out
    }

    fn collect_shape(&self, id: NodeId, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, bool)>) {
        for item in &self.node(id).items {
            path.push(item.label.clone());
            out.push((path.clone(), item.is_leaf()));
            if let Some(sub) = item.submenu {
                self.collect_shape(sub, path, out);
            }
            path.pop();
        }
    }

    /// Front-most open node containing `p`.
    pub fn hit_node(&self, p: Point) -> Option<NodeId> {
        self.z_order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.node(id).open && self.node(id).rect.contains(p))
    }

    /// The unobscured, enabled item under `p`.
    pub(crate) fn hit_item(&self, p: Point) -> Option<(NodeId, usize)> {
        let id = self.hit_node(p)?;
        let i = self.node(id).item_at(p)?;
        (!self.node(id).items[i].disabled).then_some((id, i))
    }

    /// Move `id` to the front of the draw order.
    pub(crate) fn raise(&mut self, id: NodeId) {
        self.z_order.retain(|&z| z != id);
        self.z_order.push(id);
    }
}

fn build_node(
    nodes: &mut Vec<MenuNode>,
    spec: &MenuSpec,
    owner: Option<&str>,
    style: &MenuStyle,
) -> Result<NodeId, MenuError> {
    if spec.is_empty() {
        return Err(MenuError::invalid(owner, "menu has no entries"));
    }

    let mut items = Vec::with_capacity(spec.len());
    let mut children = Vec::new();
    let mut width = 0;
    for entry in spec.entries() {
        let (action, submenu) = match &entry.kind {
            EntryKind::Action(a) => (Some(a.clone()), None),
            EntryKind::Submenu(sub) => {
                let child = build_node(nodes, sub, Some(entry.label.as_str()), style)?;
                children.push(child);
                (None, Some(child))
            }
            EntryKind::Inert => (None, None),
        };
        let indicator = if submenu.is_some() {
            style.indicator_width
        } else {
            0
        };
        width = width.max(entry.label.width() as i32 + style.margin + indicator);
        items.push(MenuItem {
            label: entry.label.clone(),
            action,
            submenu,
            disabled: entry.disabled,
            hovered: false,
        });
    }

    let id = NodeId(nodes.len());
    for &child in &children {
        nodes[child.0].parent = Some(id);
    }
    let size = Point::new(width, items.len() as i32);
    nodes.push(MenuNode {
        items,
        parent: None,
        children,
        selection: None,
        open: false,
        rect: Range::with_size(Point::ZERO, size),
        anchor: Point::ZERO,
        size,
    });
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::ActionResult;

    fn noop() -> ActionResult {
        Ok(())
    }

    fn sample() -> MenuSpec {
        MenuSpec::new()
            .submenu(
                "Top Spark",
                MenuSpec::new()
                    .action("total", noop)
                    .submenu("more", MenuSpec::new().action("user", noop)),
            )
            .action("Quit", noop)
    }

    #[test]
    fn wires_parents_and_children() {
        let tree = MenuTree::build(&sample(), &MenuStyle::default()).unwrap();
        assert_eq!(tree.len(), 3);
        let root = tree.node(tree.root());
        assert_eq!(root.parent(), None);
        assert_eq!(root.children().len(), 1);
        let top = root.items()[0].submenu().unwrap();
        assert_eq!(tree.node(top).parent(), Some(tree.root()));
        let more = tree.node(top).items()[1].submenu().unwrap();
        assert_eq!(tree.node(more).parent(), Some(top));
        assert_eq!(tree.node(top).children(), &[more]);
    }

    #[test]
    fn everything_starts_closed() {
        let tree = MenuTree::build(&sample(), &MenuStyle::default()).unwrap();
        for (_, n) in tree.nodes() {
            assert!(!n.is_open());
            assert_eq!(n.selection(), None);
        }
        assert!(tree.open_chain().is_empty());
    }

    #[test]
    fn natural_size() {
        let tree = MenuTree::build(&sample(), &MenuStyle::default()).unwrap();
        let root = tree.node(tree.root());
        // "Top Spark" (9) + margin 2 + indicator 2
        assert_eq!(root.size(), Point::new(13, 2));
        let top = tree.node(root.items()[0].submenu().unwrap());
        // "total" (5) + 2 vs "more" (4) + 2 + 2
        assert_eq!(top.size(), Point::new(8, 2));
    }

    #[test]
    fn wide_labels_use_display_width() {
        let spec = MenuSpec::new().action("日本", noop);
        let tree = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        assert_eq!(tree.node(tree.root()).size(), Point::new(6, 1));
    }

    #[test]
    fn flattened_nodes_list_children_first() {
        let tree = MenuTree::build(&sample(), &MenuStyle::default()).unwrap();
        let ids: Vec<_> = tree.nodes().map(|(id, _)| id).collect();
        assert_eq!(ids.last(), Some(&tree.root()));
    }

    #[test]
    fn shape_round_trips() {
        let spec = sample();
        let tree = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        assert_eq!(tree.shape(), spec.shape());
    }

    #[test]
    fn empty_specs_are_rejected() {
        let err = MenuTree::build(&MenuSpec::new(), &MenuStyle::default()).unwrap_err();
        assert!(matches!(err, MenuError::InvalidMenuSpec { label: None, .. }));

        let spec = MenuSpec::new().submenu("Empty", MenuSpec::new());
        let err = MenuTree::build(&spec, &MenuStyle::default()).unwrap_err();
        assert!(matches!(err, MenuError::InvalidMenuSpec { label: Some(l), .. } if l == "Empty"));
    }
}
