//! The immutable render handoff.
//!
//! `Snapshot` is everything the host renderer needs to paint one frame:
//! the visible rows broken into selected/unselected spans, the cursor cell
//! and its underline rectangle, and the scrollbar chrome rectangles. It is
//! produced on demand by the console model and never mutates model state;
//! a renderer holding a snapshot cannot observe a half-updated layout.

use crate::geometry::Rect;

/// A contiguous run of row text with one highlight state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSpan {
    pub text: String,
    /// True when the span is inside the active selection and should be
    /// painted with inverted colors
    pub selected: bool,
}

/// One visible physical row, positioned on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    /// Screen row index, 0 at the top of the viewport
    pub screen_row: usize,
    /// Top-left pixel of the row's first cell
    pub origin: (u32, u32),
    /// The row's text in drawing order; empty for an empty row
    pub spans: Vec<RowSpan>,
}

impl SnapshotRow {
    /// The row's full text with highlight boundaries erased.
    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }
}

/// The cursor's cell and the underline segment marking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Screen row of the cursor cell
    pub row: usize,
    /// Column of the cursor cell
    pub col: usize,
    /// Pixel rectangle of the underline drawn beneath the cell
    pub underline: Rect,
}

/// Scrollbar chrome, in absolute pixel rectangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarGeometry {
    pub up_button: Rect,
    pub down_button: Rect,
    pub track: Rect,
    pub thumb: Rect,
}

/// One frame's worth of console state for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Viewport pixel size the snapshot was laid out for
    pub width: u32,
    pub height: u32,
    /// Visible rows, top to bottom
    pub rows: Vec<SnapshotRow>,
    /// Cursor marker; absent while a selection is active, while input is
    /// disabled, or when the cursor row is scrolled out of view
    pub cursor: Option<Cursor>,
    pub scrollbar: ScrollbarGeometry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_text_joins_spans() {
        let row = SnapshotRow {
            screen_row: 0,
            origin: (2, 2),
            spans: vec![
                RowSpan {
                    text: "ab".to_string(),
                    selected: false,
                },
                RowSpan {
                    text: "cd".to_string(),
                    selected: true,
                },
            ],
        };
        assert_eq!(row.text(), "abcd");
    }
}
