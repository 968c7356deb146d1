//! # myrepos
//!
//! Clone or fast-forward a whole set of git repositories described by one
//! declarative layout file, mirroring `server domain / organization /
//! repository` onto local disk.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use myrepos::config;
//! use myrepos::tree::RootNode;
//!
//! let layout = config::parse(r#"
//! path: src
//! layout:
//!   example.com:
//!     org1: [repoA]
//!     dir1|origin1|upstream1: [repoB]
//! "#).unwrap();
//!
//! let root = RootNode::build(&layout, Path::new("/home/alice")).unwrap();
//! let repos: Vec<_> = root.repos().collect();
//! assert_eq!(repos[0].abs_path(), Path::new("/home/alice/src/example.com/dir1/repoB"));
//! assert!(repos[0].is_fork());
//! assert_eq!(repos[1].url_origin(), "git@example.com:org1/repoA.git");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`, `names`, `server_spec`)**: the layout file,
//!   the compact `dir|origin|upstream` org notation and per-server settings.
//! - **Layout tree (`tree`)**: the sorted Root → Server → Org → Repo tree and
//!   the `Visitor` trait used to walk it.
//! - **Orchestration (`cloner`)**: the visitor that clones or rebases each
//!   repository and collects a `RunReport`.
//! - **Subprocesses (`runner`)**: bounded-time execution of `git` with error
//!   abbreviation.
//! - **Dry run (`printer`)**: renders the tree without touching the disk.
//!
//! ## Execution Flow
//!
//! 1.  **Locate and parse** the layout file (`defaults`, `config`).
//! 2.  **Build** the layout tree (`tree::RootNode::build`).
//! 3.  **Check** for a usable ssh agent when any server is reached over ssh
//!     (`ssh`).
//! 4.  **Walk** the tree with a `cloner::Cloner`, one repository at a time.
//! 5.  **Exit** non-zero when the report holds any error.

pub mod cloner;
pub mod config;
pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod names;
pub mod output;
pub mod printer;
pub mod runner;
pub mod server_spec;
pub mod ssh;
pub mod tree;

#[cfg(test)]
mod names_proptest;
