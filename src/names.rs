//! Names used in the layout: server domains, organization specs and
//! repository specs.
//!
//! Org and repo entries in the layout are compact strings that may carry extra
//! information after `|` characters. The types here decode them; decoding is
//! total and never fails, validation happens in [`crate::config`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// The domain of a git server, e.g. `github.com`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerDomain(pub String);

impl ServerDomain {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The domain with `:port` appended when the port is not the default.
    pub fn with_port(&self, port: u16) -> String {
        if port > 0 {
            format!("{}:{}", self.0, port)
        } else {
            self.0.clone()
        }
    }
}

impl fmt::Display for ServerDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerDomain {
    fn from(s: &str) -> Self {
        ServerDomain(s.to_string())
    }
}

/// An organization entry, `dirName[|origin[|upstream]]`.
///
/// `sigs.k8s.io|monopole|kubernetes-sigs` clones into a directory named
/// `sigs.k8s.io`, with the `origin` remote in the `monopole` org and the
/// `upstream` remote in `kubernetes-sigs`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgSpec(pub String);

/// The decoded form of an [`OrgSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNames {
    pub directory: String,
    pub origin: String,
    pub upstream: String,
}

impl OrgSpec {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the spec on `|`.
    ///
    /// One segment names all three; two segments give the directory and a
    /// shared origin/upstream; three give all of them. Segments past the
    /// third are ignored and empty segments come back as empty strings.
    pub fn parse(&self) -> OrgNames {
        let parts: Vec<&str> = self.0.split('|').collect();
        let (directory, origin, upstream) = match parts.as_slice() {
            [dir] => (*dir, *dir, *dir),
            [dir, origin] => (*dir, *origin, *origin),
            [dir, origin, upstream, ..] => (*dir, *origin, *upstream),
            [] => ("", "", ""),
        };
        OrgNames {
            directory: directory.to_string(),
            origin: origin.to_string(),
            upstream: upstream.to_string(),
        }
    }
}

impl fmt::Display for OrgSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrgSpec {
    fn from(s: &str) -> Self {
        OrgSpec(s.to_string())
    }
}

/// A repository entry, `name[|branch]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoSpec(pub String);

impl RepoSpec {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the repository name and the branch given after the first `|`,
    /// if any. An empty branch counts as none.
    pub fn parse(&self) -> (String, Option<String>) {
        match self.0.split_once('|') {
            Some((name, branch)) if !branch.is_empty() => {
                (name.to_string(), Some(branch.to_string()))
            }
            Some((name, _)) => (name.to_string(), None),
            None => (self.0.clone(), None),
        }
    }
}

impl From<&str> for RepoSpec {
    fn from(s: &str) -> Self {
        RepoSpec(s.to_string())
    }
}
