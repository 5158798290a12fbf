//! Collaborator interfaces at the host boundary.
//!
//! The console model never touches the OS directly. The clipboard, the
//! filesystem, and the completion-failure alert are reached through these
//! traits; the host wires in real implementations and tests substitute
//! in-process fakes. The traits are intentionally minimal ("humble object"
//! boundary) so no business logic can leak into platform code.

use std::env;
use std::fs;
use std::io;

use thiserror::Error;
use tracing::warn;

/// Receives the selected text when a mouse selection is released.
pub trait Clipboard {
    fn set_text(&mut self, text: &str);
}

/// Signals a user-visible failure with no text of its own, e.g. an audible
/// beep when tab completion has no candidates.
pub trait AlertSink {
    fn alert(&mut self);
}

/// A directory listing snapshot: plain entry names in the order the OS
/// enumeration returned them. That order is load-bearing: it is the
/// tab-completion cycling order, directories first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirListing {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

/// Failure modes of the filesystem collaborator.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to read directory {path}")]
    ReadDir {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to change directory to {path}")]
    ChangeDir {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Directory enumeration and working-directory access.
pub trait Filesystem {
    /// Lists `path`, splitting entries into directories and files.
    fn list_directory(&self, path: &str) -> Result<DirListing, FsError>;

    /// Changes the process working directory.
    fn set_working_directory(&mut self, path: &str) -> Result<(), FsError>;

    /// The current working directory as a display string.
    fn working_directory(&self) -> String;
}

/// The shipped `std::fs`-backed filesystem provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFilesystem;

impl Filesystem for SystemFilesystem {
    fn list_directory(&self, path: &str) -> Result<DirListing, FsError> {
        let entries = fs::read_dir(path).map_err(|source| FsError::ReadDir {
            path: path.to_owned(),
            source,
        })?;

        let mut listing = DirListing::default();
        for entry in entries {
            let entry = entry.map_err(|source| FsError::ReadDir {
                path: path.to_owned(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                listing.directories.push(name);
            } else {
                listing.files.push(name);
            }
        }
        Ok(listing)
    }

    fn set_working_directory(&mut self, path: &str) -> Result<(), FsError> {
        env::set_current_dir(path).map_err(|source| FsError::ChangeDir {
            path: path.to_owned(),
            source,
        })
    }

    fn working_directory(&self) -> String {
        match env::current_dir() {
            Ok(path) => path.display().to_string(),
            Err(error) => {
                warn!(%error, "working directory unavailable");
                String::new()
            }
        }
    }
}

/// A clipboard that discards everything; the default until the host wires
/// its own in.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn set_text(&mut self, _text: &str) {}
}

/// An alert sink that stays silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn alert(&mut self) {}
}
