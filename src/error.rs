//! # Error Handling
//!
//! This module defines the centralized error type for `myrepos`. It uses the
//! `thiserror` library to build one `Error` enum covering every failure the
//! library can report, each variant carrying enough context to print a useful
//! one-line (or, for unrecognised subprocess failures, multi-line) message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into four groups:
//!   - configuration errors (`ConfigParse`, `ConfigNotFound`,
//!     `ConfigIsDirectory`, `InvalidDuration`, `UnknownScheme`), raised before
//!     any traversal starts;
//!   - structural errors (`MissingRoot`, `NotADirectory`), which halt a run;
//!   - subprocess errors (`ProgramNotFound`, `Timeout`, `CommandSummary`,
//!     `CommandFailed`), isolated to the repository being processed;
//!   - wrapped foreign errors (`Io`, `Yaml`) and the remaining odds and ends.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for myrepos operations
#[derive(Error, Debug)]
pub enum Error {
    /// The layout file could not be parsed or failed validation.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// No layout file was found at any of the candidate locations.
    #[error("unable to open any of these: {}", display_paths(candidates))]
    ConfigNotFound { candidates: Vec<PathBuf> },

    /// The layout path names a directory rather than a file.
    #[error("{} found, but it's a directory, not a config file", path.display())]
    ConfigIsDirectory { path: PathBuf },

    /// A server timeout could not be parsed as a duration.
    #[error("bad duration {value:?} in server options: {message}")]
    InvalidDuration { value: String, message: String },

    /// A server scheme is neither `ssh` nor `https`.
    #[error("unknown scheme {scheme:?} in server options")]
    UnknownScheme { scheme: String },

    /// The program to run is not on the search path.
    #[error("no executable named {program:?} on path: {message}")]
    ProgramNotFound { program: String, message: String },

    /// A subprocess did not finish within its allotted time.
    #[error("hit {} timeout running '{command}'", humantime::format_duration(*duration))]
    Timeout { duration: Duration, command: String },

    /// A subprocess failed with a recognised, abbreviated cause.
    #[error("{summary} while running: {command}")]
    CommandSummary { summary: String, command: String },

    /// A subprocess failed and nothing in its output was recognised.
    #[error("in dir {} running {command:?} {message}\n{output}", dir.display())]
    CommandFailed {
        dir: PathBuf,
        command: String,
        message: String,
        output: String,
    },

    /// The root of the layout does not exist.
    #[error("if you want the root dir {}, make it first", path.display())]
    MissingRoot { path: PathBuf },

    /// A path that must be a directory is something else.
    #[error("{} exists but isn't a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// Creating a directory or probing a path failed.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// No usable credential agent is running.
    #[error("{message}")]
    CredentialAgent { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// True for errors that mean the rest of a run cannot proceed.
    pub fn is_structural(&self) -> bool {
        matches!(self, Error::MissingRoot { .. } | Error::NotADirectory { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    let names: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", names.join(" "))
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
