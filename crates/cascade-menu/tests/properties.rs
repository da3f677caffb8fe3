//! Invariants of the menu tree under arbitrary input sequences, plus a few
//! end-to-end scenarios driven through the public API only.

use std::cell::Cell;
use std::rc::Rc;

use cascade_core::{Point, Range};
use cascade_menu::{
    Button, ContextMenu, ContextMenuConfig, MenuSpec, MenuStyle, MenuTree, NavKey, PointerEvent,
};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

#[derive(Clone, Debug)]
enum Shape {
    Leaf { disabled: bool },
    Sub { disabled: bool, items: Vec<Shape> },
}

fn level() -> impl Strategy<Value = Vec<Shape>> {
    let leaf = any::<bool>().prop_map(|disabled| Shape::Leaf { disabled });
    let item = leaf.prop_recursive(3, 24, 4, |inner| {
        (any::<bool>(), prop::collection::vec(inner, 1..5))
            .prop_map(|(disabled, items)| Shape::Sub { disabled, items })
    });
    prop::collection::vec(item, 1..5)
}

fn to_spec(items: &[Shape], hits: &Rc<Cell<u32>>) -> MenuSpec {
    let mut spec = MenuSpec::new();
    for (i, shape) in items.iter().enumerate() {
        let label = format!("item{i}");
        let disabled = match shape {
            Shape::Leaf { disabled } => {
                let h = Rc::clone(hits);
                spec = spec.action(label.clone(), move || {
                    h.set(h.get() + 1);
                    Ok(())
                });
                *disabled
            }
            Shape::Sub { disabled, items } => {
                spec = spec.submenu(label.clone(), to_spec(items, hits));
                *disabled
            }
        };
        if disabled {
            spec = spec.disable(&label);
        }
    }
    spec
}

#[derive(Clone, Debug)]
enum Ev {
    Open(Point),
    Key(NavKey),
    Move(Point),
    Press(Point, Button),
    Release(Point),
    Resize(Point),
    /// Disable or enable an item, picked by index modulo the node count and
    /// then modulo the node's item count.
    Toggle(usize, usize, bool),
}

fn event() -> impl Strategy<Value = Ev> {
    let pos = || (0i32..40, 0i32..20).prop_map(|(x, y)| Point::new(x, y));
    let key = prop::sample::select(vec![
        NavKey::Up,
        NavKey::Down,
        NavKey::Left,
        NavKey::Right,
        NavKey::Enter,
    ]);
    let button = prop::sample::select(vec![Button::Main, Button::Secondary]);
    prop_oneof![
        1 => pos().prop_map(Ev::Open),
        4 => key.prop_map(Ev::Key),
        4 => pos().prop_map(Ev::Move),
        2 => (pos(), button).prop_map(|(p, b)| Ev::Press(p, b)),
        2 => pos().prop_map(Ev::Release),
        1 => (20i32..60, 8i32..30).prop_map(|(w, h)| Ev::Resize(Point::new(w, h))),
        2 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(n, i, d)| Ev::Toggle(n, i, d)),
    ]
}

fn apply(menu: &mut ContextMenu, ev: &Ev) {
    let viewport = menu.tree().viewport();
    let res = match *ev {
        Ev::Open(p) => {
            menu.open(p, viewport);
            Ok(true)
        }
        Ev::Key(k) => menu.handle_key(k),
        Ev::Move(p) => menu.handle_pointer(PointerEvent::moved(p)),
        Ev::Press(p, b) => menu.handle_pointer(PointerEvent::press(p, b)),
        Ev::Release(p) => menu.handle_pointer(PointerEvent::release(p)),
        Ev::Resize(vp) => {
            menu.set_viewport(vp);
            Ok(true)
        }
        Ev::Toggle(n, i, disabled) => {
            let tree = menu.tree();
            let target = tree
                .nodes()
                .nth(n % tree.len())
                .map(|(id, node)| (id, i % node.items().len()));
            if let Some((id, index)) = target {
                menu.set_disabled(id, index, disabled);
            }
            Ok(true)
        }
    };
    // every generated action succeeds
    assert!(res.is_ok());
}

fn check_tree(t: &MenuTree) -> Result<(), TestCaseError> {
    let vp = t.viewport();
    let screen = Range::new(0, 0, vp.x, vp.y);
    for (id, n) in t.nodes() {
        let open_children: Vec<_> = n
            .children()
            .iter()
            .copied()
            .filter(|&c| t.node(c).is_open())
            .collect();
        prop_assert!(open_children.len() <= 1, "node {:?} has several open children", id);

        if n.is_open() {
            if let Some(p) = n.parent() {
                prop_assert!(t.node(p).is_open(), "open node {:?} under a closed parent", id);
            }
            prop_assert!(
                n.rect().in_range(screen),
                "node {:?} at {} outside {}",
                id,
                n.rect(),
                screen
            );
            prop_assert_eq!(n.rect().size(), n.size());
        } else {
            prop_assert!(open_children.is_empty());
            prop_assert_eq!(n.selection(), None);
        }

        if let Some(i) = n.selection() {
            prop_assert!(i < n.items().len());
            prop_assert!(!n.items()[i].is_disabled());
        }
        if let Some(&child) = open_children.first() {
            let owner = n.items().iter().position(|it| it.submenu() == Some(child));
            prop_assert_eq!(n.selection(), owner);
        }
    }
    let chain = t.open_chain();
    let open = t.nodes().filter(|(_, n)| n.is_open()).count();
    prop_assert_eq!(chain.len(), open);
    Ok(())
}

proptest! {
    #[test]
    fn prop_single_open_chain_under_any_input(
        items in level(),
        at in (0i32..40, 0i32..20),
        events in prop::collection::vec(event(), 0..60),
    ) {
        let hits = Rc::new(Cell::new(0));
        let spec = to_spec(&items, &hits);
        let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
        menu.open(Point::new(at.0, at.1), Point::new(40, 20));
        check_tree(menu.tree())?;
        for ev in &events {
            let before = hits.get();
            apply(&mut menu, ev);
            check_tree(menu.tree())?;
            if hits.get() != before {
                prop_assert!(!menu.is_open(), "activation left the menu open after {:?}", ev);
            }
        }
    }

    #[test]
    fn prop_tree_shape_matches_spec(items in level()) {
        let hits = Rc::new(Cell::new(0));
        let spec = to_spec(&items, &hits);
        let tree = MenuTree::build(&spec, &MenuStyle::default()).unwrap();
        prop_assert_eq!(tree.shape(), spec.shape());
    }

    #[test]
    fn prop_outside_press_closes_everything(
        items in level(),
        keys in prop::collection::vec(
            prop::sample::select(vec![NavKey::Down, NavKey::Right, NavKey::Up]),
            0..12,
        ),
    ) {
        let hits = Rc::new(Cell::new(0));
        let mut menu = ContextMenu::new(ContextMenuConfig::new(to_spec(&items, &hits))).unwrap();
        menu.open(Point::ZERO, Point::new(200, 50));
        for k in keys {
            menu.handle_key(k).unwrap();
        }
        // every node is at most 9 wide and 4 chains deep
        let far = Point::new(199, 49);
        let consumed = menu.handle_pointer(PointerEvent::press(far, Button::Secondary)).unwrap();
        prop_assert!(!consumed);
        prop_assert!(menu.tree().nodes().all(|(_, n)| !n.is_open()));
    }
}

#[test]
fn activation_closes_the_chain() {
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    let spec = MenuSpec::new().submenu(
        "File",
        MenuSpec::new().action("Open", move || {
            h.set(h.get() + 1);
            Ok(())
        }),
    );
    let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
    menu.open(Point::new(5, 5), Point::new(80, 24));
    assert!(menu.handle_key(NavKey::Down).unwrap());
    assert!(menu.handle_key(NavKey::Right).unwrap());
    assert!(menu.handle_key(NavKey::Enter).unwrap());
    assert_eq!(hits.get(), 1);
    assert!(menu.tree().nodes().all(|(_, n)| !n.is_open()));
}

#[test]
fn root_is_clamped_into_the_viewport() {
    let spec = ["abcdefgh", "b", "c", "d"]
        .iter()
        .fold(MenuSpec::new(), |s, l| s.action(*l, || Ok(())));
    let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
    let root = menu.root();
    assert_eq!(menu.tree().node(root).size(), Point::new(10, 4));
    menu.open(Point::new(18, 18), Point::new(20, 20));
    assert_eq!(menu.tree().node(root).rect().min, Point::new(10, 16));
}

#[test]
fn lone_enabled_item_is_reselected_on_wrap() {
    let spec = MenuSpec::new()
        .action("a", || Ok(()))
        .action("b", || Ok(()))
        .action("c", || Ok(()))
        .disable("a")
        .disable("b");
    let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
    menu.open(Point::ZERO, Point::new(80, 24));
    let root = menu.root();
    assert!(menu.handle_key(NavKey::Down).unwrap());
    assert_eq!(menu.tree().node(root).selection(), Some(2));
    assert!(menu.handle_key(NavKey::Down).unwrap());
    assert_eq!(menu.tree().node(root).selection(), Some(2));
}

#[test]
fn disabling_an_open_branch_closes_it() {
    let spec = MenuSpec::new()
        .submenu("A", MenuSpec::new().submenu("B", MenuSpec::new().action("x", || Ok(()))))
        .action("C", || Ok(()));
    let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
    menu.open(Point::ZERO, Point::new(80, 24));
    for k in [NavKey::Down, NavKey::Right, NavKey::Right] {
        assert!(menu.handle_key(k).unwrap());
    }
    assert_eq!(menu.tree().open_chain().len(), 3);

    let root = menu.root();
    menu.set_disabled(root, 0, true);
    assert_eq!(menu.tree().open_chain(), vec![root]);
    assert_eq!(menu.tree().node(root).selection(), None);
    assert!(check_tree(menu.tree()).is_ok());

    // the disabled branch is skipped, and enabling it makes it reachable again
    assert!(menu.handle_key(NavKey::Down).unwrap());
    assert_eq!(menu.tree().node(root).selection(), Some(1));
    menu.set_disabled(root, 0, false);
    assert!(menu.handle_key(NavKey::Down).unwrap());
    assert!(menu.handle_key(NavKey::Right).unwrap());
    assert_eq!(menu.tree().open_chain().len(), 2);
}

#[test]
fn outside_click_is_left_for_the_host() {
    let spec = MenuSpec::new().submenu("A", MenuSpec::new().action("x", || Ok(())));
    let mut menu = ContextMenu::new(ContextMenuConfig::new(spec)).unwrap();
    menu.open(Point::ZERO, Point::new(80, 24));
    menu.handle_pointer(PointerEvent::moved(Point::new(1, 0))).unwrap();
    assert_eq!(menu.tree().open_chain().len(), 2);
    let consumed = menu
        .handle_pointer(PointerEvent::press(Point::new(50, 20), Button::Main))
        .unwrap();
    assert!(!consumed);
    assert!(!menu.is_open());
}
