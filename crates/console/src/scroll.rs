//! Scroll state and scrollbar arithmetic.
//!
//! The scroll offset counts physical rows hidden *below* the bottom of the
//! viewport: offset 0 means the document's last row is on screen, larger
//! offsets reveal older content. The offset is clamped to
//! `[0, total - visible]` after every layout pass, so a document that fits
//! the viewport can never scroll.
//!
//! A scrollbar thumb drag is tentative: the offset tracks the pointer live,
//! but the committed value (the basis for the thumb's resting position and
//! for the drag arithmetic) only changes on release. Step scrolls commit
//! immediately.

/// Thumb position along the inner track, measured from the track's top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbGeometry {
    /// Pixels between the track top and the thumb top
    pub offset: u32,
    /// Thumb length in pixels, never below the track breadth
    pub length: u32,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor_y: u32,
    delta_px: i64,
}

/// Scroll offset bookkeeping with commit/tentative drag semantics.
#[derive(Debug, Clone, Default)]
pub struct ScrollModel {
    offset: usize,
    committed: usize,
    drag: Option<Drag>,
}

impl ScrollModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently hidden below the viewport bottom.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Scrolls one row toward older content, saturating at the top.
    /// Commits immediately.
    pub fn scroll_up(&mut self, total_rows: usize, visible_rows: usize) {
        let max = total_rows.saturating_sub(visible_rows);
        self.offset = (self.offset + 1).min(max);
        self.committed = self.offset;
    }

    /// Scrolls one row toward newer content, saturating at the bottom.
    /// Commits immediately.
    pub fn scroll_down(&mut self) {
        self.offset = self.offset.saturating_sub(1);
        self.committed = self.offset;
    }

    /// Starts a thumb drag at the given pointer y.
    pub fn begin_drag(&mut self, y: u32) {
        self.drag = Some(Drag {
            anchor_y: y,
            delta_px: 0,
        });
    }

    /// Updates an active drag with the current pointer y. The new tentative
    /// offset takes effect on the next `clamp` (every reflow runs one).
    pub fn update_drag(&mut self, y: u32) {
        if let Some(drag) = &mut self.drag {
            drag.delta_px = i64::from(y) - i64::from(drag.anchor_y);
        }
    }

    /// Ends a drag, committing whatever offset it reached.
    pub fn end_drag(&mut self) {
        self.drag = None;
        self.committed = self.offset;
    }

    /// Recomputes the tentative offset from an active drag and clamps all
    /// state into `[0, total - visible]`. Called after every layout pass.
    ///
    /// With no scrollable range (content fits, or the thumb fills the
    /// track) an active drag moves nothing; the arithmetic is skipped
    /// entirely rather than dividing by zero.
    pub fn clamp(
        &mut self,
        total_rows: usize,
        visible_rows: usize,
        track_length: u32,
        thumb_length: u32,
    ) {
        let max = total_rows.saturating_sub(visible_rows);
        if let Some(drag) = &self.drag {
            let range = track_length.saturating_sub(thumb_length);
            if max > 0 && range > 0 {
                // Dragging the thumb down (positive delta) reveals newer
                // content, hence the sign flip.
                let scrolled =
                    (-(drag.delta_px as f64) / f64::from(range) * max as f64).round() as i64;
                let tentative = self.committed as i64 + scrolled;
                self.offset = tentative.clamp(0, max as i64) as usize;
            }
        }
        self.offset = self.offset.min(max);
        self.committed = self.committed.min(max);
    }

    /// Thumb length for a track: proportional to the visible share of the
    /// document, floored at the track breadth so it never collapses.
    pub fn thumb_length(
        track_length: u32,
        track_breadth: u32,
        total_rows: usize,
        visible_rows: usize,
    ) -> u32 {
        let total = total_rows.max(1);
        let share = total.min(visible_rows) as f64 / total as f64;
        let proportional = (f64::from(track_length) * share) as u32;
        proportional.max(track_breadth).min(track_length.max(track_breadth))
    }

    /// Thumb geometry along the inner track. Offset 0 rests the thumb at
    /// the bottom of the track; the maximum offset moves it to the top. An
    /// active drag shifts the thumb by its raw pixel delta, clamped to the
    /// track.
    pub fn thumb_geometry(
        &self,
        track_length: u32,
        track_breadth: u32,
        total_rows: usize,
        visible_rows: usize,
    ) -> ThumbGeometry {
        let length = Self::thumb_length(track_length, track_breadth, total_rows, visible_rows);
        let range = track_length.saturating_sub(length);
        let max = total_rows.saturating_sub(visible_rows);
        let progress = if max > 0 {
            self.committed as f64 / max as f64
        } else {
            0.0
        };
        let mut top = f64::from(range) * (1.0 - progress);
        if let Some(drag) = &self.drag {
            top += drag.delta_px as f64;
        }
        ThumbGeometry {
            offset: top.round().clamp(0.0, f64::from(range)) as u32,
            length,
        }
    }
}
