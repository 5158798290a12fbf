//! Built-in command dispatch.
//!
//! A submitted line is dispatched on its first whitespace-delimited token.
//! Every outcome, success or failure, is a block of text appended to the
//! transcript; command errors never propagate past this module. A failed
//! collaborator call leaves all cached state exactly as it was, aside from
//! the error line.

use tracing::{debug, warn};

use crate::host::{DirListing, Filesystem};

/// Runs one submitted command line and returns the transcript text it
/// produced. `listing` is the completion cache: it is refreshed on a
/// successful `cd` and left untouched by everything else (a `dir <path>`
/// listing is transient).
pub fn run_command(
    input: &str,
    fs: &mut dyn Filesystem,
    listing: &mut DirListing,
) -> String {
    let command = input.split_whitespace().next().unwrap_or("");
    let argument = input
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty());

    debug!(command, ?argument, "dispatching command");
    match command {
        "pwd" => {
            let mut out = fs.working_directory();
            out.push('\n');
            out
        }
        "dir" => {
            let path = argument.map_or_else(|| fs.working_directory(), str::to_owned);
            match fs.list_directory(&path) {
                Ok(target) => {
                    let mut out = String::new();
                    for name in &target.directories {
                        out.push_str("[D] ");
                        out.push_str(name);
                        out.push('\n');
                    }
                    for name in &target.files {
                        out.push_str(name);
                        out.push('\n');
                    }
                    out
                }
                Err(error) => {
                    warn!(%error, "dir failed");
                    "Failed to read directory\n".to_string()
                }
            }
        }
        "cd" => {
            let Some(path) = argument else {
                return "Missing argument\n".to_string();
            };
            match fs.set_working_directory(path) {
                Ok(()) => {
                    refresh_listing(fs, listing);
                    String::new()
                }
                Err(error) => {
                    warn!(%error, "cd failed");
                    "Failed to change directory\n".to_string()
                }
            }
        }
        _ => "No such command\n".to_string(),
    }
}

/// Re-reads the working directory into the completion cache. On failure the
/// previous cache survives; completion over slightly stale names beats an
/// empty candidate list.
pub fn refresh_listing(fs: &dyn Filesystem, listing: &mut DirListing) {
    match fs.list_directory(&fs.working_directory()) {
        Ok(fresh) => *listing = fresh,
        Err(error) => warn!(%error, "listing refresh failed"),
    }
}
