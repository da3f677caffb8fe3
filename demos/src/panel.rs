use cascade_core::{Cell, Grid, Point, Range, Style};

/// Draw a single-line border around `grid` with `title` on the top edge.
/// Returns the inner range, relative to `grid`.
pub fn draw_border(grid: &Grid, title: &str, style: Style) -> Range {
    let (w, h) = (grid.width(), grid.height());
    if w < 2 || h < 2 {
        return grid.range();
    }

    grid.set(Point::new(0, 0), Cell::new('┌', style));
    grid.set(Point::new(w - 1, 0), Cell::new('┐', style));
    grid.set(Point::new(0, h - 1), Cell::new('└', style));
    grid.set(Point::new(w - 1, h - 1), Cell::new('┘', style));
    for x in 1..w - 1 {
        grid.set(Point::new(x, 0), Cell::new('─', style));
        grid.set(Point::new(x, h - 1), Cell::new('─', style));
    }
    for y in 1..h - 1 {
        grid.set(Point::new(0, y), Cell::new('│', style));
        grid.set(Point::new(w - 1, y), Cell::new('│', style));
    }

    if !title.is_empty() {
        let top = grid.slice(Range::new(2, 0, w - 2, 1));
        draw_text(&top, Point::ZERO, &format!(" {title} "), style);
    }
    Range::new(1, 1, w - 1, h - 1)
}

/// Write `text` from `at`, clipped to the grid. Returns the column after
/// the last character.
pub fn draw_text(grid: &Grid, at: Point, text: &str, style: Style) -> i32 {
    let mut x = at.x;
    for ch in text.chars() {
        grid.set(Point::new(x, at.y), Cell::new(ch, style));
        x += 1;
    }
    x
}

/// A horizontal gauge of `width` cells, `percent` of it filled.
pub fn draw_bar(grid: &Grid, at: Point, width: i32, percent: f32, fill: Style, empty: Style) {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f32).round() as i32;
    for i in 0..width {
        let cell = if i < filled {
            Cell::new('█', fill)
        } else {
            Cell::new('·', empty)
        };
        grid.set(Point::new(at.x + i, at.y), cell);
    }
}
