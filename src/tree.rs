//! # Layout Tree
//!
//! The layout file becomes a four-level tree, built once per run and read-only
//! afterwards:
//!
//! ```text
//! RootNode            <path>
//! └── ServerNode      <path>/<domain>
//!     └── OrgNode     <path>/<domain>/<org dir>
//!         └── RepoNode <path>/<domain>/<org dir>/<repo>
//! ```
//!
//! Children are sorted at every level (servers by domain, orgs by directory,
//! repos by name) so every walk visits nodes in the same order. Each node
//! stores the absolute path its position implies; nothing points back up the
//! tree. A server's [`ServerSpec`] is shared with everything below it.
//!
//! Behaviour lives outside the tree in [`Visitor`] implementations; `accept`
//! visits a node and then its children depth-first.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Config, OrgMap};
use crate::error::Result;
use crate::names::{OrgSpec, RepoSpec, ServerDomain};
use crate::server_spec::{Scheme, ServerSpec};

/// One callback per node kind.
pub trait Visitor {
    fn visit_root(&mut self, node: &RootNode);
    fn visit_server(&mut self, node: &ServerNode);
    fn visit_org(&mut self, node: &OrgNode);
    fn visit_repo(&mut self, node: &RepoNode);
}

/// The local root holding one directory per server.
#[derive(Debug, Clone, PartialEq)]
pub struct RootNode {
    abs_path: PathBuf,
    servers: Vec<ServerNode>,
}

/// A git server domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerNode {
    domain: ServerDomain,
    spec: Arc<ServerSpec>,
    abs_path: PathBuf,
    orgs: Vec<OrgNode>,
}

/// An organization directory, possibly naming a fork relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgNode {
    spec_text: OrgSpec,
    dir_name: String,
    origin: String,
    upstream: String,
    abs_path: PathBuf,
    repos: Vec<RepoNode>,
}

/// A single repository to clone or rebase.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoNode {
    name: String,
    branch: Option<String>,
    abs_path: PathBuf,
    domain: ServerDomain,
    spec: Arc<ServerSpec>,
    origin: String,
    upstream: String,
}

impl RootNode {
    /// Builds the tree for `config`, resolving a relative or empty root
    /// against `home`.
    ///
    /// Every domain with server options gets its spec resolved first, so a
    /// malformed option fails the build even for a domain the layout never
    /// mentions. Domains without options use the defaults.
    pub fn build(config: &Config, home: &Path) -> Result<Self> {
        let abs_path = config.root_dir(home);

        let mut specs = std::collections::BTreeMap::new();
        for (domain, opts) in &config.server_opts {
            specs.insert(domain, Arc::new(ServerSpec::from_server_opts(opts)?));
        }

        let mut servers: Vec<ServerNode> = config
            .layout
            .iter()
            .map(|(domain, orgs)| {
                let spec = specs
                    .get(domain)
                    .cloned()
                    .unwrap_or_else(|| Arc::new(ServerSpec::default()));
                ServerNode::build(&abs_path, domain, spec, orgs)
            })
            .collect();
        servers.sort_by(|a, b| a.domain.cmp(&b.domain));

        Ok(Self { abs_path, servers })
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_root(self);
        for server in &self.servers {
            server.accept(visitor);
        }
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn servers(&self) -> &[ServerNode] {
        &self.servers
    }

    /// Every repository in traversal order.
    pub fn repos(&self) -> impl Iterator<Item = &RepoNode> {
        self.servers
            .iter()
            .flat_map(|s| s.orgs.iter())
            .flat_map(|o| o.repos.iter())
    }
}

impl ServerNode {
    fn build(root: &Path, domain: &ServerDomain, spec: Arc<ServerSpec>, orgs: &OrgMap) -> Self {
        let abs_path = root.join(domain.as_str());
        let mut children: Vec<OrgNode> = orgs
            .iter()
            .map(|(org, repos)| OrgNode::build(&abs_path, domain, &spec, org, repos))
            .collect();
        // Two specs may share a directory; the spec text keeps the order stable.
        children.sort_by(|a, b| {
            a.dir_name
                .cmp(&b.dir_name)
                .then_with(|| a.spec_text.cmp(&b.spec_text))
        });
        Self {
            domain: domain.clone(),
            spec,
            abs_path,
            orgs: children,
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_server(self);
        for org in &self.orgs {
            org.accept(visitor);
        }
    }

    pub fn domain(&self) -> &ServerDomain {
        &self.domain
    }

    pub fn server_spec(&self) -> &ServerSpec {
        &self.spec
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn orgs(&self) -> &[OrgNode] {
        &self.orgs
    }
}

impl OrgNode {
    fn build(
        server_path: &Path,
        domain: &ServerDomain,
        spec: &Arc<ServerSpec>,
        org: &OrgSpec,
        repos: &[RepoSpec],
    ) -> Self {
        let names = org.parse();
        let abs_path = server_path.join(&names.directory);
        let mut children: Vec<RepoNode> = repos
            .iter()
            .map(|repo| {
                let (name, branch) = repo.parse();
                RepoNode {
                    abs_path: abs_path.join(&name),
                    name,
                    branch,
                    domain: domain.clone(),
                    spec: Arc::clone(spec),
                    origin: names.origin.clone(),
                    upstream: names.upstream.clone(),
                }
            })
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.branch.cmp(&b.branch)));
        Self {
            spec_text: org.clone(),
            dir_name: names.directory,
            origin: names.origin,
            upstream: names.upstream,
            abs_path,
            repos: children,
        }
    }

    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_org(self);
        for repo in &self.repos {
            repo.accept(visitor);
        }
    }

    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    pub fn repos(&self) -> &[RepoNode] {
        &self.repos
    }
}

impl RepoNode {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_repo(self);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Branch pinned in the layout, if any.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    /// The org directory the clone lands in.
    pub fn abs_parent(&self) -> &Path {
        self.abs_path.parent().unwrap_or(self.abs_path.as_path())
    }

    pub fn server_spec(&self) -> &ServerSpec {
        &self.spec
    }

    /// Forks have an origin org different from their upstream org.
    pub fn is_fork(&self) -> bool {
        self.origin != self.upstream
    }

    pub fn url_origin(&self) -> String {
        self.url_for(&self.origin)
    }

    pub fn url_upstream(&self) -> String {
        self.url_for(&self.upstream)
    }

    fn url_for(&self, org: &str) -> String {
        let path = format!("{}/{}.git", org, self.name);
        match self.spec.scheme() {
            Scheme::Https => format!("https://{}/{}", self.domain.with_port(self.spec.port()), path),
            Scheme::Ssh => format!("git@{}:{}", self.domain, path),
        }
    }
}
