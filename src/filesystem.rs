//! Filesystem probes used while walking the layout.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Error, Result};

/// What currently occupies a path on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    Missing,
    Directory,
    /// A regular file, socket or anything else that is not a directory.
    Other,
}

/// Looks at `path`, following symlinks.
pub fn probe(path: &Path) -> Result<PathState> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(PathState::Directory),
        Ok(_) => Ok(PathState::Other),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(PathState::Missing),
        Err(e) => Err(Error::Filesystem {
            message: format!("unable to inspect {}: {}", path.display(), e),
        }),
    }
}

/// Creates `path` and any missing parents.
pub fn make_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::Filesystem {
        message: format!("unable to make cloning location {}: {}", path.display(), e),
    })
}
