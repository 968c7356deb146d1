//! Dry-run rendering of the layout tree.
//!
//! [`Printer`] walks the same tree as the orchestrator but only collects
//! labels, which [`ptree`] then draws. Nothing on disk is inspected or changed.

use std::borrow::Cow;
use std::io::{self, Write};

use ptree::{Style, TreeItem};

use crate::tree::{OrgNode, RepoNode, RootNode, ServerNode, Visitor};

/// A labelled node ready for `ptree`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub children: Vec<Label>,
}

impl Label {
    fn new(text: String) -> Self {
        Self {
            text,
            children: Vec::new(),
        }
    }

    fn last_child(&mut self) -> Option<&mut Label> {
        self.children.last_mut()
    }
}

impl TreeItem for Label {
    type Child = Label;

    fn write_self<W: Write>(&self, f: &mut W, _style: &Style) -> io::Result<()> {
        write!(f, "{}", self.text)
    }

    fn children(&self) -> Cow<'_, [Self::Child]> {
        Cow::Borrowed(&self.children)
    }
}

/// Builds a [`Label`] tree, one node per layout node.
///
/// Visits arrive depth-first, so each server hangs off the root, each org off
/// the latest server and each repo off the latest org.
#[derive(Debug, Default)]
pub struct Printer {
    root: Label,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks `root` and returns the collected labels.
    pub fn collect(root: &RootNode) -> Label {
        let mut printer = Self::new();
        root.accept(&mut printer);
        printer.root
    }

    /// Draws the tree for `root` onto `out`.
    pub fn write_to<W: Write>(root: &RootNode, out: W) -> io::Result<()> {
        ptree::write_tree(&Self::collect(root), out)
    }
}

impl Visitor for Printer {
    fn visit_root(&mut self, node: &RootNode) {
        self.root = Label::new(node.abs_path().display().to_string());
    }

    fn visit_server(&mut self, node: &ServerNode) {
        self.root
            .children
            .push(Label::new(format!("{} ({})", node.domain(), node.server_spec())));
    }

    fn visit_org(&mut self, node: &OrgNode) {
        if let Some(server) = self.root.last_child() {
            server.children.push(Label::new(format!(
                "{}|{}|{}",
                node.dir_name(),
                node.origin(),
                node.upstream()
            )));
        }
    }

    fn visit_repo(&mut self, node: &RepoNode) {
        let mut text = format!("{} <- {}", node.name(), node.url_origin());
        if let Some(branch) = node.branch() {
            text.push_str(&format!(" [{}]", branch));
        }
        if let Some(org) = self.root.last_child().and_then(Label::last_child) {
            org.children.push(Label::new(text));
        }
    }
}
