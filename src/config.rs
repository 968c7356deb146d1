//! # Layout Configuration
//!
//! This module defines the data structures that represent a `.myrepos.yaml`
//! layout file and the logic for parsing and validating it.
//!
//! ## Format
//!
//! ```yaml
//! path: src
//! layout:
//!   github.com:
//!     monopole: [myrepos]
//!     sigs.k8s.io|monopole|kubernetes-sigs: [kustomize, "cli-utils|master"]
//! serverOpts:
//!   git.corp.example:
//!     scheme: https
//!     port: 8443
//!     timeout: 80s
//! ```
//!
//! - **`path`**: the local root below which everything is cloned. Empty means
//!   the home directory; a relative path is taken relative to the home
//!   directory.
//! - **`layout`**: server domain → org spec → repository list. Org specs and
//!   repository entries are decoded by [`crate::names`].
//! - **`serverOpts`**: optional per-domain overrides, resolved into a
//!   [`crate::server_spec::ServerSpec`] when the layout tree is built.

use crate::error::{Error, Result};
use crate::names::{OrgSpec, RepoSpec, ServerDomain};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Org spec → repositories for one server.
pub type OrgMap = BTreeMap<OrgSpec, Vec<RepoSpec>>;

/// The whole layout file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root of all local clones.
    #[serde(default)]
    pub path: PathBuf,

    /// The directory layout below `path`.
    #[serde(default)]
    pub layout: BTreeMap<ServerDomain, OrgMap>,

    /// Per-server connection overrides.
    #[serde(default, rename = "serverOpts", alias = "server_opts")]
    pub server_opts: BTreeMap<ServerDomain, ServerOpts>,
}

/// Serialized form of a server's connection settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerOpts {
    /// Port to put in https clone URLs; 0 keeps the scheme default.
    #[serde(default)]
    pub port: u16,
    /// `ssh` or `https`.
    #[serde(default)]
    pub scheme: Option<String>,
    /// How long one git command may take, e.g. `80s` or `10m`.
    #[serde(default)]
    pub timeout: Option<String>,
}

impl Config {
    /// Resolves the configured root against a home directory.
    pub fn root_dir(&self, home: &Path) -> PathBuf {
        if self.path.as_os_str().is_empty() {
            home.to_path_buf()
        } else if self.path.is_absolute() {
            self.path.clone()
        } else {
            home.join(&self.path)
        }
    }

    /// Number of repositories named anywhere in the layout.
    pub fn repo_count(&self) -> usize {
        self.layout
            .values()
            .flat_map(|orgs| orgs.values())
            .map(Vec::len)
            .sum()
    }

    /// Checks the names in the layout for values that cannot become paths.
    pub fn validate(&self) -> Result<()> {
        for (domain, orgs) in &self.layout {
            if domain.as_str().is_empty() {
                return Err(invalid(
                    "empty server domain in layout",
                    "every key directly under 'layout' must be a host name",
                ));
            }
            for (org, repos) in orgs {
                let names = org.parse();
                if names.directory.is_empty() {
                    return Err(invalid(
                        format!("org spec {:?} under {} has an empty directory name", org.as_str(), domain),
                        "org specs take the form dirName[|origin[|upstream]]",
                    ));
                }
                if !is_plain_name(&names.directory) {
                    return Err(invalid(
                        format!("org directory {:?} under {} is not a plain directory name", names.directory, domain),
                        "use a single directory name; nesting comes from the layout",
                    ));
                }
                for repo in repos {
                    let (name, _) = repo.parse();
                    if !is_plain_name(&name) {
                        return Err(invalid(
                            format!("bad repository name {:?} under {}/{}", repo.as_str(), domain, names.directory),
                            "repository entries take the form name[|branch]",
                        ));
                    }
                }
            }
        }
        for domain in self.server_opts.keys() {
            if domain.as_str().is_empty() {
                return Err(invalid(
                    "empty server domain in serverOpts",
                    "every key directly under 'serverOpts' must be a host name",
                ));
            }
        }
        Ok(())
    }
}

/// One path component that names a child directory: no separators, not `.` or `..`.
fn is_plain_name(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains('/') && !s.contains('\\')
}

fn invalid(message: impl Into<String>, hint: &str) -> Error {
    Error::ConfigParse {
        message: message.into(),
        hint: Some(hint.to_string()),
    }
}

/// Parse and validate a layout from YAML text.
pub fn parse(yaml_content: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(yaml_content)?;
    config.validate()?;
    Ok(config)
}

/// Parse a layout from a YAML file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
