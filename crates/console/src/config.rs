//! Console configuration persistence.
//!
//! A small JSON file under the platform config directory carries the
//! prompt string and the cell/chrome pixel sizes. The file includes a
//! schema version; a missing file, a parse failure, or a version mismatch
//! all degrade gracefully to the built-in defaults (a fresh start beats a
//! startup error for a widget).

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::CellMetrics;

/// Current schema version for the config file.
///
/// Increment this when making breaking changes to the config format.
const SCHEMA_VERSION: u32 = 1;

/// Application name used for the config directory.
const APP_NAME: &str = "porthole";

/// Config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Host-tunable console settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility.
    pub schema_version: u32,
    /// Prompt prefix seeded before every input line.
    pub prompt: String,
    /// Character cell width in pixels.
    pub cell_width: u32,
    /// Character cell height in pixels.
    pub cell_height: u32,
    /// Inset between the window edge and the text area.
    pub border: u32,
    /// Width of the scrollbar column.
    pub scrollbar_width: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            prompt: "> ".to_string(),
            cell_width: 8,
            cell_height: 12,
            border: 2,
            scrollbar_width: 16,
        }
    }
}

impl Config {
    /// The cell metrics the geometry layer consumes.
    pub fn metrics(&self) -> CellMetrics {
        CellMetrics {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            border: self.border,
            scrollbar_width: self.scrollbar_width,
        }
    }

    /// Loads the config file, falling back to defaults on any failure.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_json(&contents),
            Err(error) => {
                debug!(%error, path = %path.display(), "no config file, using defaults");
                Self::default()
            }
        }
    }

    /// Writes the config file, creating the directory as needed.
    pub fn save(&self) -> io::Result<()> {
        let path = Self::path()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no config directory"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, contents)
    }

    /// Parses a config document; schema mismatches degrade to defaults.
    fn from_json(contents: &str) -> Self {
        match serde_json::from_str::<Config>(contents) {
            Ok(config) if config.schema_version == SCHEMA_VERSION => config,
            Ok(config) => {
                debug!(
                    found = config.schema_version,
                    expected = SCHEMA_VERSION,
                    "config schema mismatch, using defaults"
                );
                Self::default()
            }
            Err(error) => {
                debug!(%error, "config parse failure, using defaults");
                Self::default()
            }
        }
    }

    fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join(APP_NAME).join(CONFIG_FILENAME))
    }
}
