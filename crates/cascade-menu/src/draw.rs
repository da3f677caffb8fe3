//! Painting of the open nodes onto a grid.

use cascade_core::{Cell, Grid, Point, Range, Style};
use unicode_width::UnicodeWidthChar;

use crate::style::MenuStyle;
use crate::tree::MenuTree;

impl MenuTree {
    /// Paint every open node into `grid`, back to front. Node rectangles are
    /// taken as positions inside `grid`.
    pub fn draw(&self, grid: &Grid, style: &MenuStyle) {
        for id in self.draw_order() {
            let node = self.node(id);
            let area = grid.slice(node.rect);
            for (i, item) in node.items.iter().enumerate() {
                let y = i as i32;
                let row = area.slice(Range::new(0, y, area.width(), y + 1));
                let st = style.row_style(self.is_highlighted(id, i), item.disabled);
                row.fill(Cell::new(' ', st));
                draw_label(&row, &item.label, st);
                if item.submenu.is_some() {
                    let x = node.size.x - style.indicator_width;
                    row.set(Point::new(x, 0), Cell::new(style.indicator, st));
                }
            }
        }
    }
}

/// Label text from column 1; wide characters take two columns.
fn draw_label(row: &Grid, label: &str, st: Style) {
    let mut x = 1;
    for ch in label.chars() {
        let w = ch.width().unwrap_or(0) as i32;
        if w == 0 {
            continue;
        }
        row.set(Point::new(x, 0), Cell::new(ch, st));
        x += w;
    }
}
