//! # Clone Orchestration
//!
//! [`Cloner`] is the [`Visitor`] that brings the local tree in line with the
//! layout. For every repository it either clones (nothing on disk yet) or
//! rebases (a directory is already there), then reports one line with the
//! [`Outcome`] and the latest commit summary or the error.
//!
//! Two kinds of failure are kept apart in the [`RunReport`]:
//!
//! - a *fatal* error (missing root, or a file where a directory belongs) stops
//!   the walk; every later visit returns immediately;
//! - a failed git command only ends work on that repository. The error is kept
//!   as the run's last error, replacing any earlier one, and the walk moves on.
//!
//! Forks (origin org ≠ upstream org) get an `upstream` remote whose push URL
//! is deliberately broken, and are force-pushed to `origin` after a rebase.
//! Non-forks are rebased onto `origin` and never pushed.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::filesystem::{self, PathState};
use crate::output::{indent, OutputConfig, Tone};
use crate::runner::{Abbreviations, CommandRunner};
use crate::tree::{OrgNode, RepoNode, RootNode, ServerNode, Visitor};

/// The version control program driven by the orchestrator.
pub const GIT_PROGRAM: &str = "git";

/// Git failures worth a one-line summary.
pub const GIT_ABBREVIATIONS: Abbreviations = &[
    ("Could not resolve hostname", "cannot reach host"),
    ("Connection refused", "cannot reach host"),
    ("You have unstaged changes", "unstaged changes - commit or stash first"),
    ("Operation timed out", "timed out - is repo accessible?"),
];

const REMOTE_ORIGIN: &str = "origin";
const REMOTE_UPSTREAM: &str = "upstream";
const PUSH_DISABLED_PREFIX: &str = "disabled_push_";
const LOG_FORMAT: &str = "--pretty=format:%<(26)%ad%>(30)%an : %s";

/// What happened to one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Error,
    RebasedTo,
    ClonedAt,
    NoUpdate,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Error => "error",
            Outcome::RebasedTo => "rebased to",
            Outcome::ClonedAt => "cloned to latest at",
            Outcome::NoUpdate => "no change since",
        }
    }

    fn tone(&self) -> Tone {
        match self {
            Outcome::Error => Tone::Failure,
            Outcome::RebasedTo => Tone::Changed,
            Outcome::ClonedAt | Outcome::NoUpdate => Tone::Success,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The reported line for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub name: String,
    pub path: PathBuf,
    pub outcome: Outcome,
    /// Latest commit summary, or the error message.
    pub status: String,
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    repos: Vec<RepoReport>,
    last_error: Option<Error>,
    fatal_error: Option<Error>,
}

impl RunReport {
    /// One entry per repository reached, in traversal order.
    pub fn repos(&self) -> &[RepoReport] {
        &self.repos
    }

    /// The most recent per-repository failure.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// The error that halted the run, if one did.
    pub fn fatal_error(&self) -> Option<&Error> {
        self.fatal_error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.last_error.is_none() && self.fatal_error.is_none()
    }

    /// `Ok` when nothing failed; otherwise the fatal error, or else the last
    /// per-repository one.
    pub fn into_result(self) -> Result<Vec<RepoReport>> {
        match (self.fatal_error, self.last_error) {
            (Some(fatal), _) => Err(fatal),
            (None, Some(last)) => Err(last),
            (None, None) => Ok(self.repos),
        }
    }
}

/// Clones or rebases every repository in the tree, see the module docs.
pub struct Cloner<'a, R, W> {
    git: &'a mut R,
    out: &'a mut W,
    style: OutputConfig,
    report: RunReport,
}

impl<'a, R: CommandRunner, W: Write> Cloner<'a, R, W> {
    pub fn new(git: &'a mut R, out: &'a mut W, style: OutputConfig) -> Self {
        Self {
            git,
            out,
            style,
            report: RunReport::default(),
        }
    }

    /// Walks `root` and returns what happened.
    pub fn run(mut self, root: &RootNode) -> RunReport {
        root.accept(&mut self);
        self.report
    }

    fn halted(&self) -> bool {
        self.report.fatal_error.is_some()
    }

    fn fatal(&mut self, err: Error) {
        warn!("stopping: {}", err);
        self.report.fatal_error = Some(err);
    }

    fn emit(&mut self, line: String) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            warn!("unable to write report line: {}", e);
        }
    }

    /// Fails the run when `path` exists and is not a directory.
    fn require_dir_or_absent(&mut self, path: &Path) -> bool {
        match filesystem::probe(path) {
            Ok(PathState::Other) => {
                self.fatal(Error::NotADirectory {
                    path: path.to_path_buf(),
                });
                false
            }
            Ok(_) => true,
            Err(e) => {
                self.fatal(e);
                false
            }
        }
    }

    fn record(&mut self, node: &RepoNode, outcome: Outcome, status: String) {
        let label = self.style.paint(outcome.tone(), &format!("{:>30}", outcome.label()));
        self.emit(format!("{}{:>30}{} {}", indent(3), node.name(), label, status));
        self.report.repos.push(RepoReport {
            name: node.name().to_string(),
            path: node.abs_path().to_path_buf(),
            outcome,
            status,
        });
    }

    fn record_error(&mut self, node: &RepoNode, err: Error) {
        warn!("{}: {}", node.abs_path().display(), err);
        self.record(node, Outcome::Error, err.to_string());
        self.report.last_error = Some(err);
    }

    fn clone_repo(&mut self, node: &RepoNode) -> Result<Outcome> {
        let parent = node.abs_parent();
        filesystem::make_dir(parent)?;
        let origin = node.url_origin();
        info!("cloning {} into {}", origin, parent.display());

        self.git.set_work_dir(parent);
        self.git.run(&["clone", &origin])?;

        self.git.set_work_dir(node.abs_path());
        if node.is_fork() {
            let upstream = node.url_upstream();
            self.git.run(&["remote", "add", REMOTE_UPSTREAM, &upstream])?;
            let no_push = format!("{}{}", PUSH_DISABLED_PREFIX, upstream);
            self.git
                .run(&["remote", "set-url", "--push", REMOTE_UPSTREAM, &no_push])?;
        }
        self.git.run(&["remote", "-v"])?;
        Ok(Outcome::ClonedAt)
    }

    fn rebase_repo(&mut self, node: &RepoNode) -> Result<Outcome> {
        self.git.set_work_dir(node.abs_path());
        let branch = self.main_branch(node)?;
        self.git.run(&["checkout", &branch])?;

        let remote = if node.is_fork() {
            REMOTE_UPSTREAM
        } else {
            REMOTE_ORIGIN
        };
        let target = format!("{}/{}", remote, branch);
        info!("updating {} from {}", node.abs_path().display(), target);

        self.git.run(&["fetch", remote])?;
        self.git.run(&["diff", &target])?;
        if self.git.output().is_empty() {
            return Ok(Outcome::NoUpdate);
        }
        self.git.run(&["rebase", &target])?;
        if node.is_fork() {
            self.git.run(&["push", "-f", REMOTE_ORIGIN, &branch])?;
        }
        Ok(Outcome::RebasedTo)
    }

    /// The pinned branch, else `main` when it exists locally, else `master`.
    fn main_branch(&mut self, node: &RepoNode) -> Result<String> {
        if let Some(branch) = node.branch() {
            return Ok(branch.to_string());
        }
        self.git.run(&["branch", "--list", "main"])?;
        if self.git.output().is_empty() {
            Ok("master".to_string())
        } else {
            Ok("main".to_string())
        }
    }

    fn last_log(&mut self) -> Result<String> {
        self.git
            .run(&["log", LOG_FORMAT, "--date=human", "--abbrev=8", "--max-count=1"])?;
        Ok(first_line(self.git.output()))
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .next()
        .unwrap_or_default()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

impl<R: CommandRunner, W: Write> Visitor for Cloner<'_, R, W> {
    fn visit_root(&mut self, node: &RootNode) {
        if self.halted() {
            return;
        }
        let path = node.abs_path();
        match filesystem::probe(path) {
            Ok(PathState::Directory) => {
                let line = self.style.paint(Tone::Root, &path.display().to_string());
                self.emit(line);
            }
            Ok(PathState::Missing) => self.fatal(Error::MissingRoot {
                path: path.to_path_buf(),
            }),
            Ok(PathState::Other) => self.fatal(Error::NotADirectory {
                path: path.to_path_buf(),
            }),
            Err(e) => self.fatal(e),
        }
    }

    fn visit_server(&mut self, node: &ServerNode) {
        if self.halted() || !self.require_dir_or_absent(node.abs_path()) {
            return;
        }
        let line = self.style.paint(Tone::Server, &format!(" {} ", node.domain()));
        self.emit(format!("{}{}", indent(1), line));
    }

    fn visit_org(&mut self, node: &OrgNode) {
        if self.halted() || !self.require_dir_or_absent(node.abs_path()) {
            return;
        }
        let line = self.style.paint(Tone::Org, &format!(" {} ", node.dir_name()));
        self.emit(format!("{}{}", indent(2), line));
    }

    fn visit_repo(&mut self, node: &RepoNode) {
        if self.halted() {
            return;
        }
        let attempt = match filesystem::probe(node.abs_path()) {
            Ok(PathState::Missing) => {
                self.git.set_timeout(node.server_spec().timeout());
                self.clone_repo(node)
            }
            Ok(PathState::Directory) => {
                self.git.set_timeout(node.server_spec().timeout());
                self.rebase_repo(node)
            }
            Ok(PathState::Other) => Err(Error::NotADirectory {
                path: node.abs_path().to_path_buf(),
            }),
            Err(e) => Err(e),
        };
        match attempt.and_then(|outcome| Ok((outcome, self.last_log()?))) {
            Ok((outcome, status)) => self.record(node, outcome, status),
            Err(e) if e.is_structural() => {
                self.record(node, Outcome::Error, e.to_string());
                self.fatal(e);
            }
            Err(e) => self.record_error(node, e),
        }
    }
}
