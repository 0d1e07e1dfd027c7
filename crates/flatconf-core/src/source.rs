//! Line sources
//!
//! Produces the raw lines a store is built from. Reading happens once,
//! up front, and is the only place flatconf touches the filesystem.

use std::path::Path;

use crate::error::{Error, Result};

/// Read all lines of a text file
///
/// Line terminators (`\n` or `\r\n`) are removed. A last line without a
/// trailing newline is returned like any other.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    log::trace!("Loading configuration from file: {}", path.display());

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::from_open(path.display().to_string(), &e))?;
    let lines = split_lines(&content);

    log::debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Split a text blob into owned lines
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
