//! Look and key bindings of a menu.

use cascade_core::messages::Key;
use cascade_core::{Color, Style};

use crate::dispatch::NavKey;

/// Visual parameters of a menu. Also drives node sizing, so it is needed at
/// build time.
#[derive(Debug, Clone)]
pub struct MenuStyle {
    pub fg: Color,
    pub normal_bg: Color,
    pub hover_bg: Color,
    pub disabled_fg: Color,
    /// Columns added around every label (one before, the rest after).
    pub margin: i32,
    /// Drawn at the right edge of items that own a submenu.
    pub indicator: char,
    /// Extra columns reserved for the indicator.
    pub indicator_width: i32,
}

impl Default for MenuStyle {
    fn default() -> Self {
        Self {
            fg: Color::from_rgb(0xff, 0xff, 0xfa),
            normal_bg: Color::from_rgb(0x00, 0x00, 0x00),
            hover_bg: Color::from_rgb(0x55, 0x55, 0x55),
            disabled_fg: Color::from_rgb(0x80, 0x80, 0x80),
            margin: 2,
            indicator: '▶',
            indicator_width: 2,
        }
    }
}

impl MenuStyle {
    /// Cell style of a row.
    pub fn row_style(&self, highlighted: bool, disabled: bool) -> Style {
        let bg = if highlighted {
            self.hover_bg
        } else {
            self.normal_bg
        };
        let fg = if disabled { self.disabled_fg } else { self.fg };
        Style::default().with_fg(fg).with_bg(bg)
    }
}

/// Physical keys bound to the five navigation keys.
#[derive(Debug, Clone)]
pub struct MenuKeys {
    pub up: Vec<Key>,
    pub down: Vec<Key>,
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub enter: Vec<Key>,
}

impl Default for MenuKeys {
    fn default() -> Self {
        Self {
            up: vec![Key::ArrowUp, Key::Char('k')],
            down: vec![Key::ArrowDown, Key::Char('j')],
            left: vec![Key::ArrowLeft, Key::Char('h')],
            right: vec![Key::ArrowRight, Key::Char('l')],
            enter: vec![Key::Enter],
        }
    }
}

impl MenuKeys {
    /// The navigation key `key` is bound to, if any.
    pub fn nav(&self, key: &Key) -> Option<NavKey> {
        [
            (&self.up, NavKey::Up),
            (&self.down, NavKey::Down),
            (&self.left, NavKey::Left),
            (&self.right, NavKey::Right),
            (&self.enter, NavKey::Enter),
        ]
        .into_iter()
        .find_map(|(keys, nav)| keys.contains(key).then_some(nav))
    }
}
