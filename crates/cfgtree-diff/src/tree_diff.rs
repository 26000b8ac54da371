//! Tree-level diff: pair two configuration trees by path and classify nodes.
//!
//! Children are matched by name at each level. A child present on one side
//! only is `Added` or `Deleted` and is not descended into: its descendants
//! are implied. A child present on both sides is `Changed` when its value
//! set, comment or deactivation differ, `Unchanged` otherwise, and is always
//! descended into.
//!
//! Sibling order is the old tree's child order followed by children only
//! present in the new tree, in the new tree's order.
//!
//! The result borrows both inputs and never modifies them.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use cfgtree_types::Node;

use crate::error::{DiffError, DiffResult};

/// The result of comparing two trees, rooted at `base_path`.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeDiff<'a> {
    /// Path of `root` within both trees. Empty for a whole-tree comparison.
    pub base_path: Vec<String>,
    pub root: NodeDiff<'a>,
}

impl<'a> TreeDiff<'a> {
    /// Returns `true` if no node differs.
    pub fn is_unchanged(&self) -> bool {
        !self.root.has_changes()
    }

    /// Count of added, deleted and changed nodes.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        self.root.tally(&mut summary);
        summary
    }

    /// Every path whose status is not `Unchanged`, in pre-order.
    pub fn changed_paths(&self) -> Vec<(Vec<String>, ChangeKind)> {
        let mut out = Vec::new();
        let mut path = self.base_path.clone();
        self.root.collect_changes(&mut path, &mut out);
        out
    }
}

/// Diff of one node and, for nodes present on both sides, its children.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDiff<'a> {
    pub name: &'a str,
    pub status: DiffStatus<'a>,
    /// Child diffs in sibling order. Always empty for `Added`/`Deleted`.
    pub children: Vec<NodeDiff<'a>>,
}

/// Four-way node classification, holding the nodes it was derived from.
#[derive(Clone, Debug, PartialEq)]
pub enum DiffStatus<'a> {
    Unchanged { old: &'a Node, new: &'a Node },
    Added(&'a Node),
    Deleted(&'a Node),
    Changed {
        old: &'a Node,
        new: &'a Node,
        change: NodeChange,
    },
}

/// Status without the borrowed nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Unchanged,
    Added,
    Deleted,
    Changed,
}

/// What changed in a node's own state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeChange {
    /// Values only in the old node, in old order.
    pub values_removed: Vec<String>,
    /// Values only in the new node, in new order.
    pub values_added: Vec<String>,
    pub comment: Option<CommentChange>,
    /// The new deactivation state, when it flipped.
    pub deactivated: Option<bool>,
}

impl NodeChange {
    pub fn is_empty(&self) -> bool {
        self.values_removed.is_empty()
            && self.values_added.is_empty()
            && self.comment.is_none()
            && self.deactivated.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentChange {
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Node counts by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub deleted: usize,
    pub changed: usize,
}

impl DiffSummary {
    pub fn total(&self) -> usize {
        self.added + self.deleted + self.changed
    }
}

impl<'a> NodeDiff<'a> {
    fn terminal(name: &'a str, status: DiffStatus<'a>) -> Self {
        Self {
            name,
            status,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self.status {
            DiffStatus::Unchanged { .. } => ChangeKind::Unchanged,
            DiffStatus::Added(_) => ChangeKind::Added,
            DiffStatus::Deleted(_) => ChangeKind::Deleted,
            DiffStatus::Changed { .. } => ChangeKind::Changed,
        }
    }

    /// The node on the old side, if present.
    pub fn old(&self) -> Option<&'a Node> {
        match self.status {
            DiffStatus::Unchanged { old, .. }
            | DiffStatus::Changed { old, .. }
            | DiffStatus::Deleted(old) => Some(old),
            DiffStatus::Added(_) => None,
        }
    }

    /// The node on the new side, if present.
    pub fn new(&self) -> Option<&'a Node> {
        match self.status {
            DiffStatus::Unchanged { new, .. }
            | DiffStatus::Changed { new, .. }
            | DiffStatus::Added(new) => Some(new),
            DiffStatus::Deleted(_) => None,
        }
    }

    /// The node to display: the new one, or the old one when deleted.
    pub fn node(&self) -> &'a Node {
        match self.status {
            DiffStatus::Unchanged { new, .. }
            | DiffStatus::Changed { new, .. }
            | DiffStatus::Added(new) => new,
            DiffStatus::Deleted(old) => old,
        }
    }

    /// The own-state change, for `Changed` nodes.
    pub fn change(&self) -> Option<&NodeChange> {
        match &self.status {
            DiffStatus::Changed { change, .. } => Some(change),
            _ => None,
        }
    }

    /// Returns `true` if this node or anything below it differs.
    pub fn has_changes(&self) -> bool {
        self.kind() != ChangeKind::Unchanged || self.children.iter().any(NodeDiff::has_changes)
    }

    /// Find the child diff with the given name.
    pub fn child(&self, name: &str) -> Option<&NodeDiff<'a>> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follow `path` through child diffs.
    pub fn descend<S: AsRef<str>>(&self, path: &[S]) -> Option<&NodeDiff<'a>> {
        path.iter().try_fold(self, |diff, name| diff.child(name.as_ref()))
    }

    fn tally(&self, summary: &mut DiffSummary) {
        match self.kind() {
            ChangeKind::Added => summary.added += 1,
            ChangeKind::Deleted => summary.deleted += 1,
            ChangeKind::Changed => summary.changed += 1,
            ChangeKind::Unchanged => {}
        }
        for child in &self.children {
            child.tally(summary);
        }
    }

    fn collect_changes(&self, path: &mut Vec<String>, out: &mut Vec<(Vec<String>, ChangeKind)>) {
        let kind = self.kind();
        if kind != ChangeKind::Unchanged {
            out.push((path.clone(), kind));
        }
        for child in &self.children {
            path.push(child.name.to_string());
            child.collect_changes(path, out);
            path.pop();
        }
    }
}

/// Compare two whole trees. The roots are always paired.
pub fn diff_trees<'a>(old: &'a Node, new: &'a Node) -> TreeDiff<'a> {
    let diff = TreeDiff {
        base_path: Vec::new(),
        root: diff_nodes(old, new),
    };
    log_summary(&diff);
    diff
}

/// Compare the subtrees found at `path` in both trees.
///
/// A path present on only one side yields an `Added` or `Deleted` root.
/// A path present on neither side is an invalid argument.
pub fn diff_subtrees<'a, S: AsRef<str>>(
    old: &'a Node,
    new: &'a Node,
    path: &[S],
) -> DiffResult<TreeDiff<'a>> {
    let base_path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();

    let root = match (old.descend(path), new.descend(path)) {
        (Some(o), Some(n)) => diff_nodes(o, n),
        (Some(o), None) => NodeDiff::terminal(o.name(), DiffStatus::Deleted(o)),
        (None, Some(n)) => NodeDiff::terminal(n.name(), DiffStatus::Added(n)),
        (None, None) => return Err(DiffError::PathNotFound { path: base_path }),
    };

    let diff = TreeDiff { base_path, root };
    log_summary(&diff);
    Ok(diff)
}

/// Compare the own state of two nodes. Returns `None` when they match.
pub fn node_change(old: &Node, new: &Node) -> Option<NodeChange> {
    let change = NodeChange {
        values_removed: old
            .values()
            .iter()
            .filter(|v| !new.has_value(v))
            .cloned()
            .collect(),
        values_added: new
            .values()
            .iter()
            .filter(|v| !old.has_value(v))
            .cloned()
            .collect(),
        comment: (old.comment() != new.comment()).then(|| CommentChange {
            old: old.comment().map(str::to_string),
            new: new.comment().map(str::to_string),
        }),
        deactivated: (old.is_deactivated() != new.is_deactivated())
            .then_some(new.is_deactivated()),
    };
    (!change.is_empty()).then_some(change)
}

fn diff_nodes<'a>(old: &'a Node, new: &'a Node) -> NodeDiff<'a> {
    let status = match node_change(old, new) {
        Some(change) => {
            trace!(node = new.name(), "node state changed");
            DiffStatus::Changed { old, new, change }
        }
        None => DiffStatus::Unchanged { old, new },
    };
    NodeDiff {
        name: new.name(),
        status,
        children: diff_children(old, new),
    }
}

fn diff_children<'a>(old: &'a Node, new: &'a Node) -> Vec<NodeDiff<'a>> {
    let mut children = Vec::with_capacity(old.child_count().max(new.child_count()));

    for old_child in old.children() {
        let diff = match new.child(old_child.name()) {
            Some(new_child) => diff_nodes(old_child, new_child),
            None => NodeDiff::terminal(old_child.name(), DiffStatus::Deleted(old_child)),
        };
        children.push(diff);
    }

    for new_child in new.children() {
        if old.child(new_child.name()).is_none() {
            children.push(NodeDiff::terminal(
                new_child.name(),
                DiffStatus::Added(new_child),
            ));
        }
    }

    children
}

fn log_summary(diff: &TreeDiff<'_>) {
    let summary = diff.summary();
    debug!(
        base = %diff.base_path.join(" "),
        added = summary.added,
        deleted = summary.deleted,
        changed = summary.changed,
        "compared configuration trees"
    );
}
