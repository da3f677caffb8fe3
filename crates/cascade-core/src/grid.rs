//! The [`Grid`] type: a view into a shared buffer of [`Cell`]s.
//!
//! Cloning a `Grid` or taking a [`slice`](Grid::slice) yields another view of
//! the **same** storage. Positions passed to a view are relative to its own
//! top-left corner, so a widget can draw at `(0, 0)` into whatever slice it
//! was handed.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::geom::{Point, Range};

#[derive(Debug)]
struct Buffer {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Buffer {
    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }
}

/// A 2D grid of cells backed by shared storage.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<Buffer>>,
    /// Absolute bounds of this view inside the buffer.
    bounds: Range,
}

impl Grid {
    /// A fresh grid filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            buffer: Rc::new(RefCell::new(Buffer {
                cells: vec![Cell::default(); (w * h) as usize],
                width: w,
                height: h,
            })),
            bounds: Range::new(0, 0, w, h),
        }
    }

    /// Absolute bounds of this view.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// The view's own coordinate space, `(0, 0)` to `size()`.
    #[inline]
    pub fn range(&self) -> Range {
        Range::with_size(Point::ZERO, self.size())
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether the relative position `p` is inside this view.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.range().contains(p)
    }

    /// A sub-view for the relative range `r`, clipped to this view.
    pub fn slice(&self, r: Range) -> Grid {
        Grid {
            buffer: Rc::clone(&self.buffer),
            bounds: self.bounds.intersect(r + self.bounds.min),
        }
    }

    /// The cell at relative position `p`, or the default cell outside.
    pub fn at(&self, p: Point) -> Cell {
        if !self.contains(p) {
            return Cell::default();
        }
        let buf = self.buffer.borrow();
        buf.index(p + self.bounds.min)
            .map(|i| buf.cells[i])
            .unwrap_or_default()
    }

    /// Set the cell at relative position `p`. No-op outside the view.
    pub fn set(&self, p: Point, cell: Cell) {
        if !self.contains(p) {
            return;
        }
        let mut buf = self.buffer.borrow_mut();
        if let Some(i) = buf.index(p + self.bounds.min) {
            buf.cells[i] = cell;
        }
    }

    /// Fill the whole view with `cell`.
    pub fn fill(&self, cell: Cell) {
        let mut buf = self.buffer.borrow_mut();
        for p in self.bounds.iter() {
            if let Some(i) = buf.index(p) {
                buf.cells[i] = cell;
            }
        }
    }

    /// Copy `src` into `self`, top-left aligned. Returns the size copied.
    pub fn copy_from(&self, src: &Grid) -> Point {
        let w = src.width().min(self.width());
        let h = src.height().min(self.height());
        for p in Range::new(0, 0, w, h).iter() {
            self.set(p, src.at(p));
        }
        Point::new(w, h)
    }
}

/// A single cell that changed between two frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// The cells to repaint since the previous frame.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Diff two same-sized grids. A `prev` of a different size yields a full
/// frame.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let full = prev.size() != curr.size();
    let cells = curr
        .range()
        .iter()
        .filter_map(|p| {
            let cell = curr.at(p);
            (full || prev.at(p) != cell).then_some(FrameCell { cell, pos: p })
        })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}
