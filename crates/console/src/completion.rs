//! Prefix-based tab-completion cycling.
//!
//! A two-state machine. The first Tab press extracts the token under the
//! cursor, filters the cached directory listing by case-folded prefix
//! (directories first, then files, each in collaborator order), and splices
//! the first candidate over the token. Further Tab presses cycle through the
//! candidates in place, wrapping at the end. Any other key returns the
//! machine to idle and the last-inserted text stays in the line as ordinary
//! text.
//!
//! The cycling state carries its candidate list and replacement span as one
//! tagged payload, so a half-cleared state cannot exist.

use crate::command_line::CommandLine;
use crate::host::DirListing;

/// Completion state: either nothing in progress, or mid-cycle with the
/// bookkeeping needed to replace the previous candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CompletionState {
    #[default]
    Idle,
    Cycling {
        /// Matching names, directories before files, collaborator order
        candidates: Vec<String>,
        /// Index of the candidate currently spliced into the line
        index: usize,
        /// Byte offset in the command line where the replaced span starts
        span_start: usize,
        /// Byte length of the currently inserted candidate
        span_len: usize,
    },
}

/// What a Tab press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    /// A candidate was spliced into the command line
    Inserted,
    /// Nothing matched; the caller should raise the alert signal
    NoCandidates,
}

/// The tab-completion engine.
#[derive(Debug, Clone, Default)]
pub struct TabCompletion {
    state: CompletionState,
}

impl TabCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cycling(&self) -> bool {
        matches!(self.state, CompletionState::Cycling { .. })
    }

    /// Ends any cycle in progress. Called for every non-Tab key; the
    /// inserted text is left alone.
    pub fn reset(&mut self) {
        self.state = CompletionState::Idle;
    }

    /// Handles a Tab press against the cached listing.
    pub fn advance(&mut self, line: &mut CommandLine, listing: &DirListing) -> TabOutcome {
        if let CompletionState::Cycling {
            candidates,
            index,
            span_start,
            span_len,
        } = &mut self.state
        {
            *index = (*index + 1) % candidates.len();
            line.replace_range(*span_start, *span_len, &candidates[*index]);
            *span_len = candidates[*index].len();
            return TabOutcome::Inserted;
        }

        let (span_start, span_len, token) = Self::token_under_cursor(line);
        let candidates = Self::candidates(listing, &token);
        if candidates.is_empty() {
            return TabOutcome::NoCandidates;
        }

        line.replace_range(span_start, span_len, &candidates[0]);
        let span_len = candidates[0].len();
        self.state = CompletionState::Cycling {
            candidates,
            index: 0,
            span_start,
            span_len,
        };
        TabOutcome::Inserted
    }

    /// The token being completed: from just after the last space at-or-before
    /// the cursor (or the line start) up to the cursor, case-folded.
    fn token_under_cursor(line: &CommandLine) -> (usize, usize, String) {
        if line.is_empty() {
            return (0, 0, String::new());
        }
        let before = &line.text()[..line.cursor()];
        let span_start = before.rfind(' ').map_or(0, |i| i + 1);
        let token = before[span_start..].to_lowercase();
        (span_start, before.len() - span_start, token)
    }

    /// All directory names then all file names whose case-folded name starts
    /// with the token. An empty command line matches everything.
    fn candidates(listing: &DirListing, token: &str) -> Vec<String> {
        listing
            .directories
            .iter()
            .chain(listing.files.iter())
            .filter(|name| name.to_lowercase().starts_with(token))
            .cloned()
            .collect()
    }
}
