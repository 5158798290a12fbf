//! Logical-to-physical line wrapping.
//!
//! The composed document text is split on `\n` into logical lines, and each
//! logical line is sliced into physical rows of at most `columns` character
//! cells. A logical line of N cells wraps into `ceil(N / columns)` rows; an
//! empty logical line still occupies exactly one row. Cells are grapheme
//! clusters, so a multi-byte filename in the transcript never splits mid
//! character; all recorded offsets are byte offsets into the source text.
//!
//! Wrapping is the single derived-layout pass: every mutation of the document
//! re-runs it, and scroll clamping, selection resolution, and cursor
//! positioning all read the resulting `Layout`.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

/// One physical row of the wrapped layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Byte offset of the row's first cell in the source text
    pub start: usize,
    /// Byte offset one past the row's last cell (the newline is excluded)
    pub end: usize,
    /// True for the first row of its logical line
    pub first: bool,
}

/// The wrapped layout of a document at a given column budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    rows: Vec<Row>,
    columns: usize,
}

/// Wraps `content` into physical rows of at most `columns` cells.
///
/// `columns` must be at least 1 (the viewport derivation guarantees this).
pub fn wrap(content: &str, columns: usize) -> Layout {
    debug_assert!(columns > 0);
    let mut rows = Vec::new();

    let mut line_start = 0;
    for line in content.split('\n') {
        let mut row_start = line_start;
        let mut cells_in_row = 0;
        let mut first = true;

        for (cluster_offset, _) in line.grapheme_indices(true) {
            if cells_in_row == columns {
                rows.push(Row {
                    start: row_start,
                    end: line_start + cluster_offset,
                    first,
                });
                first = false;
                row_start = line_start + cluster_offset;
                cells_in_row = 0;
            }
            cells_in_row += 1;
        }

        // Final row of the logical line: the remainder, a full row when the
        // length is an exact multiple of the budget, or the single empty row
        // of an empty line.
        if cells_in_row > 0 || first {
            rows.push(Row {
                start: row_start,
                end: line_start + line.len(),
                first,
            });
        }

        line_start += line.len() + 1;
    }

    Layout { rows, columns }
}

impl Layout {
    /// Total physical row count; the quantity scrolling is clamped against.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The column budget this layout was computed for.
    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn row(&self, index: usize) -> Row {
        self.rows[index]
    }

    /// The visible text of a row, sliced out of the source it was wrapped from.
    pub fn row_text<'a>(&self, content: &'a str, index: usize) -> &'a str {
        let row = self.rows[index];
        &content[row.start..row.end]
    }

    /// The layout rows visible in a viewport of `rows_per_screen` rows with
    /// `scroll_offset` rows hidden below the bottom. The document's last row
    /// is always the bottom-most on screen, so the range is anchored at
    /// `row_count - scroll_offset` and extends upward.
    pub fn visible_range(&self, rows_per_screen: usize, scroll_offset: usize) -> Range<usize> {
        let end = self.row_count().saturating_sub(scroll_offset);
        let start = end.saturating_sub(rows_per_screen);
        start..end
    }

    /// Finds the row whose half-open cell range contains the byte offset.
    ///
    /// An offset that lands exactly on a row boundary resolves to the row
    /// that starts there, so a cursor just past a full row appears at the
    /// head of the next row. Offsets pointing at a newline or past the end
    /// of the text have no row.
    pub fn row_containing(&self, offset: usize) -> Option<usize> {
        // Rows are sorted by start; find the last row starting at-or-before
        // the offset.
        let idx = match self.rows.binary_search_by(|row| row.start.cmp(&offset)) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        let row = self.rows[idx];
        (offset < row.end || (offset == row.start && row.start == row.end)).then_some(idx)
    }
}

/// Number of character cells in a text slice.
pub fn cell_count(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Byte offset of the cell at `column`, clamped to the end of the slice.
pub fn byte_at_column(text: &str, column: usize) -> usize {
    text.grapheme_indices(true)
        .nth(column)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Cell column containing the byte offset (assumed on a cluster boundary).
pub fn column_at_byte(text: &str, offset: usize) -> usize {
    cell_count(&text[..offset.min(text.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(layout: &Layout, content: &'a str) -> Vec<&'a str> {
        (0..layout.row_count())
            .map(|i| layout.row_text(content, i))
            .collect()
    }

    // ==================== row production ====================

    #[test]
    fn test_short_line_single_row() {
        let layout = wrap("hello", 10);
        assert_eq!(texts(&layout, "hello"), vec!["hello"]);
        assert!(layout.row(0).first);
    }

    #[test]
    fn test_exact_fit_no_empty_extra_row() {
        let layout = wrap("abcdefghij", 10);
        assert_eq!(layout.row_count(), 1);
        assert_eq!(layout.row_text("abcdefghij", 0), "abcdefghij");
    }

    #[test]
    fn test_wrap_with_remainder() {
        let content = "abcdefghijk";
        let layout = wrap(content, 4);
        assert_eq!(texts(&layout, content), vec!["abcd", "efgh", "ijk"]);
        assert!(layout.row(0).first);
        assert!(!layout.row(1).first);
        assert!(!layout.row(2).first);
    }

    #[test]
    fn test_empty_line_occupies_one_row() {
        let content = "a\n\nb";
        let layout = wrap(content, 10);
        assert_eq!(texts(&layout, content), vec!["a", "", "b"]);
        assert!(layout.row(1).first);
    }

    #[test]
    fn test_empty_content_single_empty_row() {
        let layout = wrap("", 10);
        assert_eq!(layout.row_count(), 1);
        assert_eq!(layout.row_text("", 0), "");
    }

    #[test]
    fn test_newline_excluded_from_rows() {
        let content = "ab\ncd";
        let layout = wrap(content, 10);
        assert_eq!(layout.row(0), Row { start: 0, end: 2, first: true });
        assert_eq!(layout.row(1), Row { start: 3, end: 5, first: true });
    }

    #[test]
    fn test_ceil_rule_across_lengths() {
        for len in 0..=25 {
            let content: String = "x".repeat(len);
            let layout = wrap(&content, 8);
            let expected = if len == 0 { 1 } else { len.div_ceil(8) };
            assert_eq!(layout.row_count(), expected, "len={len}");
            // Reconstruction: concatenating the rows restores the line
            let joined: String = texts(&layout, &content).concat();
            assert_eq!(joined, content);
        }
    }

    #[test]
    fn test_no_row_exceeds_width() {
        let content = "abcdefghijklmnopqrstuvwxyz\n0123456789";
        let layout = wrap(content, 7);
        for i in 0..layout.row_count() {
            assert!(layout.row_text(content, i).graphemes(true).count() <= 7);
        }
    }

    #[test]
    fn test_multibyte_clusters_stay_whole() {
        let content = "日本語のファイル名";
        let layout = wrap(content, 4);
        assert_eq!(texts(&layout, content), vec!["日本語の", "ファイル", "名"]);
    }

    // ==================== visible_range ====================

    #[test]
    fn test_visible_range_bottom_anchored() {
        let content = "a\nb\nc\nd\ne";
        let layout = wrap(content, 10);
        assert_eq!(layout.visible_range(3, 0), 2..5);
    }

    #[test]
    fn test_visible_range_scrolled() {
        let content = "a\nb\nc\nd\ne";
        let layout = wrap(content, 10);
        assert_eq!(layout.visible_range(3, 2), 0..3);
    }

    #[test]
    fn test_visible_range_content_shorter_than_screen() {
        let layout = wrap("a\nb", 10);
        assert_eq!(layout.visible_range(10, 0), 0..2);
    }

    #[test]
    fn test_visible_range_overscroll_clamps_to_empty_top() {
        let layout = wrap("a\nb", 10);
        assert_eq!(layout.visible_range(10, 5), 0..0);
    }

    // ==================== row_containing ====================

    #[test]
    fn test_row_containing_interior() {
        let content = "abcd\nefgh";
        let layout = wrap(content, 2);
        assert_eq!(layout.row_containing(0), Some(0));
        assert_eq!(layout.row_containing(1), Some(0));
        assert_eq!(layout.row_containing(2), Some(1));
        assert_eq!(layout.row_containing(5), Some(2));
    }

    #[test]
    fn test_row_containing_boundary_prefers_next_row() {
        // Offset 2 is both the end of row 0 and the start of row 1
        let layout = wrap("abcd", 2);
        assert_eq!(layout.row_containing(2), Some(1));
    }

    #[test]
    fn test_row_containing_newline_has_no_row() {
        let content = "ab\ncd";
        let layout = wrap(content, 10);
        assert_eq!(layout.row_containing(2), None);
    }

    #[test]
    fn test_row_containing_empty_row() {
        let content = "a\n\nb";
        let layout = wrap(content, 10);
        assert_eq!(layout.row_containing(2), Some(1));
    }

    // ==================== cell helpers ====================

    #[test]
    fn test_cell_helpers_ascii() {
        assert_eq!(cell_count("hello"), 5);
        assert_eq!(byte_at_column("hello", 2), 2);
        assert_eq!(byte_at_column("hello", 9), 5);
        assert_eq!(column_at_byte("hello", 3), 3);
    }

    #[test]
    fn test_cell_helpers_multibyte() {
        let text = "aä日b";
        assert_eq!(cell_count(text), 4);
        assert_eq!(byte_at_column(text, 1), 1);
        assert_eq!(byte_at_column(text, 2), 3);
        assert_eq!(byte_at_column(text, 3), 6);
        assert_eq!(column_at_byte(text, 6), 3);
    }
}
