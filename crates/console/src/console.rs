//! The console orchestrator.
//!
//! `Console` owns the document and every sub-model, consumes host input
//! events one at a time, and keeps the derived layout consistent: every
//! mutating event ends in a `reflow()` that recomposes the document text,
//! re-wraps it, and re-clamps the scroll state. Reads (`snapshot()`) never
//! mutate, so a host can repaint at any moment between events.
//!
//! The event methods mirror the host's raw stream (key, mouse, wheel,
//! resize) rather than a command vocabulary; interpretation lives here so
//! the host shim stays a dumb translator.

use porthole_input::{Key, KeyEvent, MouseButton, MouseEvent, MouseEventKind, ScrollDelta};
use tracing::debug;

use crate::command::{refresh_listing, run_command};
use crate::command_line::CommandLine;
use crate::completion::{TabCompletion, TabOutcome};
use crate::config::Config;
use crate::geometry::{CellGrid, Rect, Region};
use crate::host::{
    AlertSink, Clipboard, DirListing, Filesystem, NullAlertSink, NullClipboard, SystemFilesystem,
};
use crate::scroll::ScrollModel;
use crate::selection::{NormalizedDrag, SelectionModel};
use crate::snapshot::{Cursor, RowSpan, ScrollbarGeometry, Snapshot, SnapshotRow};
use crate::wrap::{self, Layout};

/// The two-part document: an append-only transcript plus the live command
/// line. The text the layout operates on is always
/// `history + pending + " "`; the trailing separator keeps a wrappable
/// cell for the cursor at the end of the command.
#[derive(Debug, Clone)]
struct Document {
    history: String,
    pending: CommandLine,
}

impl Document {
    fn new() -> Self {
        Self {
            history: String::new(),
            pending: CommandLine::new(),
        }
    }

    fn compose(&self) -> String {
        let mut content =
            String::with_capacity(self.history.len() + self.pending.text().len() + 1);
        content.push_str(&self.history);
        content.push_str(self.pending.text());
        content.push(' ');
        content
    }

    /// Absolute byte offset of the cursor within the composed text.
    fn cursor_offset(&self) -> usize {
        self.history.len() + self.pending.cursor()
    }
}

/// The console model. See the crate docs for the event/snapshot contract.
pub struct Console {
    config: Config,
    grid: CellGrid,
    document: Document,
    scroll: ScrollModel,
    selection: SelectionModel,
    completion: TabCompletion,
    listing: DirListing,
    allow_input: bool,
    /// Composed document text, rebuilt by `reflow`
    content: String,
    /// Wrapped layout of `content`, rebuilt by `reflow`
    layout: Layout,
    fs: Box<dyn Filesystem>,
    clipboard: Box<dyn Clipboard>,
    alerts: Box<dyn AlertSink>,
}

impl Console {
    /// Creates a console wired to the given collaborators. The transcript
    /// starts with the prompt prefix and the completion cache is primed
    /// from the collaborator's working directory.
    pub fn new(
        config: Config,
        fs: Box<dyn Filesystem>,
        clipboard: Box<dyn Clipboard>,
        alerts: Box<dyn AlertSink>,
    ) -> Self {
        let mut listing = DirListing::default();
        refresh_listing(fs.as_ref(), &mut listing);

        let mut document = Document::new();
        document.history.push_str(&config.prompt);

        let grid = CellGrid::new(config.metrics(), 0, 0);
        let mut console = Self {
            config,
            grid,
            document,
            scroll: ScrollModel::new(),
            selection: SelectionModel::new(),
            completion: TabCompletion::new(),
            listing,
            allow_input: true,
            content: String::new(),
            layout: wrap::wrap("", 1),
            fs,
            clipboard,
            alerts,
        };
        console.reflow();
        console
    }

    /// Creates a console on the real filesystem with inert clipboard and
    /// alert collaborators, for hosts that wire those up later.
    pub fn with_system_defaults(config: Config) -> Self {
        Self::new(
            config,
            Box::new(SystemFilesystem),
            Box::new(NullClipboard),
            Box::new(NullAlertSink),
        )
    }

    // ==================== event intake ====================

    /// Reports a new viewport pixel size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.grid = CellGrid::new(self.config.metrics(), width, height);
        self.reflow();
    }

    /// Handles one key event.
    pub fn handle_key(&mut self, event: KeyEvent) {
        // Any keystroke ends an in-progress selection, and anything but Tab
        // ends a completion cycle (the inserted text stays).
        self.selection.clear();
        if event.key != Key::Tab {
            self.completion.reset();
        }

        match event.key {
            // View-control keys work even while input is disabled
            Key::PageUp => self.scroll_up_row(),
            Key::PageDown => self.scroll_down_row(),
            _ if !self.allow_input => {}
            Key::Char(ch) => self.document.pending.insert(ch),
            Key::Tab => {
                match self
                    .completion
                    .advance(&mut self.document.pending, &self.listing)
                {
                    TabOutcome::NoCandidates => self.alerts.alert(),
                    TabOutcome::Inserted => {}
                }
            }
            Key::Return => self.submit(),
            Key::Escape => self.document.pending.clear(),
            Key::Left => self.document.pending.move_left(),
            Key::Right => self.document.pending.move_right(),
            Key::Home => self.document.pending.move_home(),
            Key::End => self.document.pending.move_end(),
            Key::Delete => self.document.pending.delete_forward(),
            Key::Backspace => self.document.pending.delete_backward(),
        }
        self.reflow();
    }

    /// Handles one mouse event.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let (x, y) = event.position;
        match (event.kind, event.button) {
            (MouseEventKind::Down, MouseButton::Left) => match self.grid.region_at(x, y) {
                Region::Text => {
                    if !self.selection.is_active() && !self.scroll.is_dragging() {
                        self.selection.begin(x, y);
                    }
                }
                Region::ScrollUpButton => self.scroll_up_row(),
                Region::ScrollDownButton => self.scroll_down_row(),
                Region::ScrollTrack => {
                    if !self.scroll.is_dragging() {
                        self.scroll.begin_drag(y);
                    }
                }
            },
            (MouseEventKind::Moved, _) => {
                if self.selection.is_active() {
                    self.selection.update(x, y);
                } else if self.scroll.is_dragging() {
                    self.scroll.update_drag(y);
                }
            }
            (MouseEventKind::Up, MouseButton::Left) => {
                if self.selection.is_active() {
                    if let Some((_, begin, end)) = self.resolve_selection() {
                        let text = self.content[begin..end].to_owned();
                        self.clipboard.set_text(&text);
                    }
                    self.selection.clear();
                } else if self.scroll.is_dragging() {
                    self.scroll.end_drag();
                }
            }
            (MouseEventKind::Down, MouseButton::Right) => self.place_cursor(x, y),
            _ => {}
        }
        self.reflow();
    }

    /// Handles a wheel event: one row per event, away-from-user scrolls up.
    pub fn handle_scroll(&mut self, delta: ScrollDelta) {
        if delta.dy > 0.0 {
            self.scroll_up_row();
        } else if delta.dy < 0.0 {
            self.scroll_down_row();
        }
        self.reflow();
    }

    /// Gates keyboard input routing, e.g. while the host runs a
    /// long-lived external command. Scrolling stays available.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.allow_input = enabled;
    }

    pub fn input_enabled(&self) -> bool {
        self.allow_input
    }

    // ==================== read side ====================

    /// The transcript, including the trailing prompt prefix.
    pub fn history(&self) -> &str {
        &self.document.history
    }

    /// The editable command line.
    pub fn pending_command(&self) -> &str {
        self.document.pending.text()
    }

    /// Cursor byte offset within the pending command.
    pub fn cursor(&self) -> usize {
        self.document.pending.cursor()
    }

    /// Rows currently scrolled below the viewport bottom.
    pub fn scroll_offset(&self) -> usize {
        self.scroll.offset()
    }

    /// The cached completion listing.
    pub fn listing(&self) -> &DirListing {
        &self.listing
    }

    /// Builds the render handoff for the current state, or `None` when the
    /// viewport is below the minimum drawable size.
    pub fn snapshot(&self) -> Option<Snapshot> {
        if !self.grid.is_drawable() {
            return None;
        }

        let rows_per_screen = self.grid.rows();
        let visible = self
            .layout
            .visible_range(rows_per_screen, self.scroll.offset());
        let selection = self.resolve_selection();

        let mut rows = Vec::with_capacity(visible.len());
        for index in visible.clone() {
            let screen_row = rows_per_screen - (visible.end - index);
            let text = self.layout.row_text(&self.content, index);
            let spans = match &selection {
                Some((norm, _, _)) => {
                    split_spans(text, norm.highlight(screen_row, wrap::cell_count(text)))
                }
                None => split_spans(text, None),
            };
            rows.push(SnapshotRow {
                screen_row,
                origin: (
                    self.grid.col_origin_x(0),
                    self.grid.row_origin_y(screen_row),
                ),
                spans,
            });
        }

        Some(Snapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            rows,
            cursor: self.cursor_cell(),
            scrollbar: self.scrollbar_geometry(),
        })
    }

    // ==================== internals ====================

    fn scroll_up_row(&mut self) {
        self.scroll
            .scroll_up(self.layout.row_count(), self.grid.rows());
    }

    fn scroll_down_row(&mut self) {
        self.scroll.scroll_down();
    }

    /// Appends the submitted line to the transcript, runs it, and seeds
    /// the next prompt.
    fn submit(&mut self) {
        let input = self.document.pending.text().to_owned();
        debug!(%input, "command submitted");
        self.document.history.push_str(&input);
        self.document.history.push('\n');

        let output = run_command(&input, self.fs.as_mut(), &mut self.listing);
        self.document.history.push_str(&output);

        self.document.pending.clear();
        self.document.history.push_str(&self.config.prompt);
    }

    /// Right-click cursor placement: moves the cursor to the clicked cell
    /// when the click lands on the rows the command line occupies.
    fn place_cursor(&mut self, x: u32, y: u32) {
        if !self.allow_input || self.scroll.offset() != 0 {
            return;
        }
        if self.grid.region_at(x, y) != Region::Text {
            return;
        }

        let columns = self.grid.columns();
        let rows_per_screen = self.grid.rows();
        let pending = &self.document.pending;

        // The command's logical line starts after the last newline in the
        // transcript; the prompt prefix in front of it occupies cells too.
        let line_start = self.document.history.rfind('\n').map_or(0, |i| i + 1);
        let prefix_cells = wrap::cell_count(&self.document.history[line_start..]);
        let total_cells = prefix_cells + wrap::cell_count(pending.text());
        let command_rows = total_cells.div_ceil(columns).max(1);
        if command_rows > rows_per_screen {
            return;
        }

        let (row, col) = self.grid.cell_at_floor(x, y);
        let first_command_row = rows_per_screen - command_rows;
        if row < first_command_row {
            return;
        }

        let cell = (row - first_command_row) * columns + col;
        let offset = wrap::byte_at_column(pending.text(), cell.saturating_sub(prefix_cells));
        self.document.pending.set_cursor(offset);
    }

    /// Recomposes the document, re-wraps it, and re-clamps scrolling.
    /// Runs after every mutating event; all derived reads assume it has.
    fn reflow(&mut self) {
        self.content = self.document.compose();
        self.layout = wrap::wrap(&self.content, self.grid.columns());

        let total = self.layout.row_count();
        let visible = self.grid.rows();
        let track = self.grid.thumb_track_length();
        let thumb = ScrollModel::thumb_length(track, self.grid.thumb_breadth(), total, visible);
        self.scroll.clamp(total, visible, track, thumb);
    }

    /// Resolves the active selection against the visible rows, yielding the
    /// normalized cell range plus absolute byte offsets into the content.
    fn resolve_selection(&self) -> Option<(NormalizedDrag, usize, usize)> {
        let norm = self.selection.normalized(&self.grid)?;
        let rows_per_screen = self.grid.rows();
        let visible = self
            .layout
            .visible_range(rows_per_screen, self.scroll.offset());

        let mut begin = None;
        let mut end = None;
        for index in visible.clone() {
            let screen_row = rows_per_screen - (visible.end - index);
            let text = self.layout.row_text(&self.content, index);
            if let Some((from, to)) = norm.highlight(screen_row, wrap::cell_count(text)) {
                let row = self.layout.row(index);
                if begin.is_none() {
                    begin = Some(row.start + wrap::byte_at_column(text, from));
                }
                end = Some(row.start + wrap::byte_at_column(text, to));
            }
        }
        Some((norm, begin?, end?))
    }

    /// The cursor cell, if it should be drawn: input enabled, no active
    /// selection, and the cursor row on screen.
    fn cursor_cell(&self) -> Option<Cursor> {
        if !self.allow_input || self.selection.is_active() {
            return None;
        }
        let rows_per_screen = self.grid.rows();
        let visible = self
            .layout
            .visible_range(rows_per_screen, self.scroll.offset());
        let index = self.layout.row_containing(self.document.cursor_offset())?;
        if !visible.contains(&index) {
            return None;
        }

        let screen_row = rows_per_screen - (visible.end - index);
        let row = self.layout.row(index);
        let text = self.layout.row_text(&self.content, index);
        let col = wrap::column_at_byte(text, self.document.cursor_offset() - row.start);

        let metrics = self.grid.metrics();
        let x = self.grid.col_origin_x(col);
        let y = self.grid.row_origin_y(screen_row) + metrics.cell_height;
        Some(Cursor {
            row: screen_row,
            col,
            underline: Rect::new(x, y, metrics.cell_width, 1),
        })
    }

    fn scrollbar_geometry(&self) -> ScrollbarGeometry {
        let metrics = self.grid.metrics();
        let thumb = self.scroll.thumb_geometry(
            self.grid.thumb_track_length(),
            self.grid.thumb_breadth(),
            self.layout.row_count(),
            self.grid.rows(),
        );
        ScrollbarGeometry {
            up_button: self.grid.up_button(),
            down_button: self.grid.down_button(),
            track: self.grid.track(),
            thumb: Rect::new(
                self.grid.track().x + metrics.border,
                self.grid.thumb_track_top() + thumb.offset,
                self.grid.thumb_breadth(),
                thumb.length,
            ),
        }
    }
}

/// Splits a row's text into unselected/selected/unselected spans around a
/// highlighted cell range. Empty spans are dropped; an empty row yields no
/// spans at all.
fn split_spans(text: &str, highlight: Option<(usize, usize)>) -> Vec<RowSpan> {
    let mut spans = Vec::new();
    match highlight {
        None => {
            if !text.is_empty() {
                spans.push(RowSpan {
                    text: text.to_owned(),
                    selected: false,
                });
            }
        }
        Some((from, to)) => {
            let from_byte = wrap::byte_at_column(text, from);
            let to_byte = wrap::byte_at_column(text, to);
            for (range, selected) in [
                (0..from_byte, false),
                (from_byte..to_byte, true),
                (to_byte..text.len(), false),
            ] {
                if !range.is_empty() {
                    spans.push(RowSpan {
                        text: text[range].to_owned(),
                        selected,
                    });
                }
            }
        }
    }
    spans
}
