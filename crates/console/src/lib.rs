//! porthole-console: the backend-agnostic model of an embeddable console
//! widget.
//!
//! A scroll-back transcript plus a single editable command line, laid out
//! character-cell-wise for a host-owned renderer. This crate owns the hard
//! parts (logical-to-physical line wrapping, scroll bookkeeping and
//! scrollbar geometry, pixel-to-text selection resolution, command-line
//! editing, and prefix tab-completion cycling) and leaves pixels, windows,
//! and the clipboard to collaborators behind small traits.
//!
//! # Overview
//!
//! The main type is [`Console`]. A host feeds it input events and viewport
//! sizes, and reads back an immutable [`Snapshot`] to paint:
//!
//! ```
//! use porthole_console::{Config, Console};
//! use porthole_input::KeyEvent;
//!
//! let mut console = Console::with_system_defaults(Config::default());
//! console.resize(662, 244);
//!
//! for ch in "pwd".chars() {
//!     console.handle_key(KeyEvent::char(ch));
//! }
//! let snapshot = console.snapshot().expect("viewport is drawable");
//! assert!(snapshot.rows.last().unwrap().text().contains("pwd"));
//! ```
//!
//! # Derived state
//!
//! Every mutating event synchronously recomposes the document text, re-wraps
//! it at the current column budget, and re-clamps the scroll offset. There
//! is no cache to invalidate: a [`Snapshot`] taken between any two events is
//! consistent with the text it shows.
//!
//! # Collaborators
//!
//! The filesystem (`dir`/`cd`/`pwd` and completion candidates), the
//! clipboard, and the completion-failure alert are reached through the
//! traits in [`host`]; tests substitute in-process fakes.

mod command;
mod command_line;
mod completion;
mod config;
mod console;
mod geometry;
pub mod host;
mod scroll;
mod selection;
mod snapshot;
mod wrap;

pub use command_line::CommandLine;
pub use completion::{CompletionState, TabCompletion, TabOutcome};
pub use config::Config;
pub use console::Console;
pub use geometry::{CellGrid, CellMetrics, Rect, Region};
pub use host::{
    AlertSink, Clipboard, DirListing, Filesystem, FsError, NullAlertSink, NullClipboard,
    SystemFilesystem,
};
pub use scroll::{ScrollModel, ThumbGeometry};
pub use selection::{NormalizedDrag, SelectionModel};
pub use snapshot::{Cursor, RowSpan, ScrollbarGeometry, Snapshot, SnapshotRow};
pub use wrap::{wrap, Layout, Row};
