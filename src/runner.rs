//! # Subprocess Runner
//!
//! Runs an external program with a working directory and a hard timeout,
//! keeping the combined stdout/stderr of the latest run.
//!
//! The program is located once on the search path when the runner is built.
//! Each [`Runner::run`] spawns the program and drains both pipes on helper
//! threads. One deadline, measured from spawn, bounds both the wait for the
//! child and the wait for its output: a background process that inherited the
//! pipes cannot hold a run open past the timeout. A child that overruns is
//! killed and reaped before [`Error::Timeout`] is returned, so it cannot keep
//! writing into a directory a later command is about to use. Descendants that
//! still hold the pipes are left to their reader threads.
//!
//! Failures are classified with a caller-supplied list of
//! `(substring, summary)` pairs: the first substring found in the error text or
//! the captured output turns the failure into a one-line
//! [`Error::CommandSummary`]. Anything unrecognised is reported as
//! [`Error::CommandFailed`] with the working directory, command and output.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use wait_timeout::ChildExt;

use crate::error::{Error, Result};

/// Substring → one-line summary.
pub type Abbreviations = &'static [(&'static str, &'static str)];

/// The seam the orchestrator drives git through.
///
/// Implementations keep the output of the most recent command only; it must
/// be read before the next `run`.
pub trait CommandRunner {
    /// Directory later commands run in.
    fn set_work_dir(&mut self, dir: &Path);

    /// Upper bound for each later command.
    fn set_timeout(&mut self, timeout: Duration);

    /// Runs the program with `args`.
    fn run(&mut self, args: &[&str]) -> Result<()>;

    /// Combined stdout and stderr of the latest completed run.
    fn output(&self) -> &str;
}

/// Runs one program, see the module docs.
#[derive(Debug)]
pub struct Runner {
    program: PathBuf,
    work_dir: Option<PathBuf>,
    timeout: Duration,
    output: String,
    abbreviations: Abbreviations,
}

impl Runner {
    /// Looks `program` up on the search path.
    pub fn new(program: &str, timeout: Duration, abbreviations: Abbreviations) -> Result<Self> {
        let path = which::which(program).map_err(|e| Error::ProgramNotFound {
            program: program.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            program: path,
            work_dir: None,
            timeout,
            output: String::new(),
            abbreviations,
        })
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut line = self.program.display().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn summarize(&self, error_text: &str) -> Option<&'static str> {
        self.abbreviations
            .iter()
            .find(|(needle, _)| error_text.contains(needle) || self.output.contains(needle))
            .map(|(_, summary)| *summary)
    }

    fn failure(&self, command: String, message: String) -> Error {
        if let Some(summary) = self.summarize(&message) {
            return Error::CommandSummary {
                summary: summary.to_string(),
                command,
            };
        }
        let dir = self
            .work_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_default();
        Error::CommandFailed {
            dir,
            command,
            message,
            output: self.output.clone(),
        }
    }
}

impl CommandRunner for Runner {
    fn set_work_dir(&mut self, dir: &Path) {
        self.work_dir = Some(dir.to_path_buf());
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    fn run(&mut self, args: &[&str]) -> Result<()> {
        let command = self.describe(args);
        self.output.clear();

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.work_dir {
            cmd.current_dir(dir);
        }
        debug!(
            "running '{}' in {}",
            command,
            self.work_dir
                .as_deref()
                .unwrap_or_else(|| Path::new("."))
                .display()
        );

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => return Err(self.failure(command, e.to_string())),
        };
        let deadline = Instant::now() + self.timeout;
        let (tx, rx) = mpsc::channel();
        let pending = drain(child.stdout.take(), Stream::Stdout, &tx)
            + drain(child.stderr.take(), Stream::Stderr, &tx);
        drop(tx);

        let status = match child.wait_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok(Some(status)) => status,
            Ok(None) => {
                // Reap the child; the reader threads finish once its pipes close.
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::Timeout {
                    duration: self.timeout,
                    command,
                });
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.failure(command, e.to_string()));
            }
        };

        let Some((stdout, stderr)) = gather(&rx, pending, deadline) else {
            debug!("'{}' exited but its output stayed open past the deadline", command);
            return Err(Error::Timeout {
                duration: self.timeout,
                command,
            });
        };
        self.output = String::from_utf8_lossy(&stdout).into_owned();
        self.output.push_str(&String::from_utf8_lossy(&stderr));

        if status.success() {
            Ok(())
        } else {
            Err(self.failure(command, status.to_string()))
        }
    }

    fn output(&self) -> &str {
        &self.output
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, Vec<u8>);

/// Reads `pipe` to the end on a helper thread. Returns how many results will
/// arrive on `tx`.
fn drain<R: Read + Send + 'static>(pipe: Option<R>, stream: Stream, tx: &Sender<Chunk>) -> usize {
    let Some(mut reader) = pipe else {
        return 0;
    };
    let tx = tx.clone();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        let _ = tx.send((stream, buf));
    });
    1
}

/// Waits for `pending` pipe results until `deadline`. `None` when it passes.
fn gather(rx: &Receiver<Chunk>, mut pending: usize, deadline: Instant) -> Option<(Vec<u8>, Vec<u8>)> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    while pending > 0 {
        match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
            Ok((Stream::Stdout, bytes)) => stdout = bytes,
            Ok((Stream::Stderr, bytes)) => stderr = bytes,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => break,
        }
        pending -= 1;
    }
    Some((stdout, stderr))
}

/// Runs `program args...` once with no abbreviations, returning whether it
/// succeeded and its output. Only a missing program or a timeout is an error.
pub fn probe_output(program: &str, args: &[&str], timeout: Duration) -> Result<(bool, String)> {
    let mut runner = Runner::new(program, timeout, &[])?;
    let ok = match runner.run(args) {
        Ok(()) => true,
        Err(e @ Error::Timeout { .. }) => return Err(e),
        Err(_) => false,
    };
    Ok((ok, runner.output))
}
