//! Default values for myrepos configuration.
//!
//! This module centralises the file names and lookup order used to find a
//! layout file when none is given on the command line.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Base name of the layout file.
pub const CONFIG_FILE_STEM: &str = ".myrepos";

/// Extensions tried, in order.
pub const CONFIG_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Returns the user's home directory, or an empty path when unknown.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default()
}

/// Finds the layout file to load.
///
/// An explicit path must exist and be a regular file. Otherwise each
/// extension is tried first in `cwd` and then in `home`; the first existing
/// file wins.
pub fn locate_config(explicit: Option<&Path>, cwd: &Path, home: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return match std::fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Err(Error::ConfigIsDirectory {
                path: path.to_path_buf(),
            }),
            Ok(_) => Ok(path.to_path_buf()),
            Err(_) => Err(Error::ConfigNotFound {
                candidates: vec![path.to_path_buf()],
            }),
        };
    }

    let mut tried = Vec::new();
    for ext in CONFIG_EXTENSIONS {
        let name = format!("{}.{}", CONFIG_FILE_STEM, ext);
        let mut places = vec![cwd];
        if !home.as_os_str().is_empty() {
            places.push(home);
        }
        for dir in places {
            let candidate = dir.join(&name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            tried.push(candidate);
        }
    }
    Err(Error::ConfigNotFound { candidates: tried })
}
