//! Mouse-drag selection over the wrapped layout.
//!
//! A selection is two pixel points, the mouse-down anchor and the current
//! drag position. Resolution maps both through the cell grid's ceiling
//! division and normalizes them so the range always reads top-to-bottom,
//! left-to-right in document order: if the rows are inverted both points
//! swap wholesale (columns included), and on a single row only the columns
//! swap. The resolved start column is then pulled back by one cell to
//! compensate the ceiling division's bias at cell boundaries.
//!
//! The normalized drag answers, per visible screen row, which column span is
//! highlighted; the orchestrator turns those spans into absolute byte
//! offsets for clipboard extraction.

use crate::geometry::CellGrid;

/// Active drag state: anchor and current pointer, in pixels.
#[derive(Debug, Clone, Copy)]
struct DragPoints {
    start: (u32, u32),
    current: (u32, u32),
}

/// Tracks an in-progress mouse selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    points: Option<DragPoints>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a selection at the mouse-down position.
    pub fn begin(&mut self, x: u32, y: u32) {
        self.points = Some(DragPoints {
            start: (x, y),
            current: (x, y),
        });
    }

    /// Extends the selection to the current drag position.
    pub fn update(&mut self, x: u32, y: u32) {
        if let Some(points) = &mut self.points {
            points.current = (x, y);
        }
    }

    /// Drops the selection without resolving it.
    pub fn clear(&mut self) {
        self.points = None;
    }

    pub fn is_active(&self) -> bool {
        self.points.is_some()
    }

    /// Resolves the drag points into a normalized screen-cell range.
    pub fn normalized(&self, grid: &CellGrid) -> Option<NormalizedDrag> {
        let points = self.points?;
        let (start_row, start_col) = grid.cell_at(points.start.0, points.start.1);
        let (end_row, end_col) = grid.cell_at(points.current.0, points.current.1);

        let (first_row, last_row, mut begin_col, mut end_col) = if start_row > end_row {
            // Dragged upward: swap both points, columns included
            (end_row, start_row, end_col, start_col)
        } else {
            (start_row, end_row, start_col, end_col)
        };
        if first_row == last_row && begin_col > end_col {
            std::mem::swap(&mut begin_col, &mut end_col);
        }

        // Ceiling division lands one cell late at exact boundaries; pull the
        // start back to include the cell under the press.
        begin_col = begin_col.saturating_sub(1);

        Some(NormalizedDrag {
            first_row,
            last_row,
            begin_col,
            end_col,
        })
    }
}

/// A drag resolved to screen cells, ordered first-row-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDrag {
    /// Topmost selected screen row
    pub first_row: usize,
    /// Bottom-most selected screen row
    pub last_row: usize,
    /// Start column on the first row (already bias-adjusted)
    pub begin_col: usize,
    /// End column on the last row
    pub end_col: usize,
}

impl NormalizedDrag {
    /// The highlighted column span `[start, end)` of a screen row holding
    /// `cell_count` cells, or `None` when the row is outside the selection
    /// or the clamped span is empty.
    ///
    /// The first selected row is highlighted from the start column onward,
    /// the last up to the end column, rows in between entirely; a row that
    /// is both first and last combines both bounds.
    pub fn highlight(&self, screen_row: usize, cell_count: usize) -> Option<(usize, usize)> {
        if screen_row < self.first_row || screen_row > self.last_row {
            return None;
        }
        let start = if screen_row == self.first_row {
            self.begin_col.min(cell_count)
        } else {
            0
        };
        let end = if screen_row == self.last_row {
            self.end_col.min(cell_count)
        } else {
            cell_count
        };
        (start < end || (start == end && cell_count == 0)).then_some((start, end))
    }
}
