//! The configuration tree vertex.
//!
//! A [`Node`] exclusively owns its children, so a configuration is a plain
//! tree: no back-references and nothing shared between two trees. Children
//! keep their insertion order, which is the display order used by every
//! renderer and command extractor. Sources without an explicit order call
//! [`Node::sort_children`] to canonicalise to lexicographic order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A vertex in a configuration tree.
///
/// # Invariants
///
/// - Child names are unique among siblings (enforced by the map key).
/// - `values` holds no duplicates; order is insertion order.
/// - An empty comment is stored as `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    values: Vec<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    children: IndexMap<String, Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(default)]
    deactivated: bool,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    secret: bool,
}

impl Node {
    /// Create an empty node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an unnamed root node.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ---------------------------------------------------------------
    // Values
    // ---------------------------------------------------------------

    /// Leaf values in insertion order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    /// Append a value. Returns `false` if it was already present.
    pub fn add_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.has_value(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Remove a value, keeping the order of the rest. Returns `true` if it
    /// was present.
    pub fn remove_value(&mut self, value: &str) -> bool {
        let before = self.values.len();
        self.values.retain(|v| v != value);
        self.values.len() != before
    }

    /// Compare values as sets: order does not matter.
    pub fn values_match(&self, other: &Node) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|v| other.has_value(v))
    }

    // ---------------------------------------------------------------
    // Comment and flags
    // ---------------------------------------------------------------

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the comment. `None` or an empty string removes it.
    pub fn set_comment(&mut self, comment: Option<&str>) {
        self.comment = comment.filter(|c| !c.is_empty()).map(str::to_string);
    }

    pub fn is_deactivated(&self) -> bool {
        self.deactivated
    }

    pub fn set_deactivated(&mut self, deactivated: bool) {
        self.deactivated = deactivated;
    }

    /// Whether this node carries a system-supplied default rather than an
    /// explicitly configured value.
    pub fn is_default(&self) -> bool {
        self.default
    }

    pub fn set_default(&mut self, default: bool) {
        self.default = default;
    }

    /// Whether this node's values must be redacted in human-readable output.
    pub fn is_secret(&self) -> bool {
        self.secret
    }

    pub fn set_secret(&mut self, secret: bool) {
        self.secret = secret;
    }

    // ---------------------------------------------------------------
    // Children
    // ---------------------------------------------------------------

    /// Children in display order.
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.get_mut(name)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Insert a child, keyed by its name. A child with the same name is
    /// replaced in place and returned.
    pub fn insert_child(&mut self, child: Node) -> Option<Node> {
        self.children.insert(child.name.clone(), child)
    }

    /// Remove a child by name, preserving the order of its siblings.
    pub fn remove_child(&mut self, name: &str) -> Option<Node> {
        self.children.shift_remove(name)
    }

    /// Return the named child, appending an empty one if it does not exist.
    pub fn get_or_insert_child(&mut self, name: &str) -> &mut Node {
        self.children
            .entry(name.to_string())
            .or_insert_with(|| Node::new(name))
    }

    /// Sort children lexicographically by name, recursively.
    pub fn sort_children(&mut self) {
        self.children.sort_keys();
        for child in self.children.values_mut() {
            child.sort_children();
        }
    }

    /// A node with neither values nor children.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.values().map(Node::len).sum::<usize>()
    }

    // ---------------------------------------------------------------
    // Paths
    // ---------------------------------------------------------------

    /// Follow `path` from this node. An empty path returns `self`.
    pub fn descend<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, name| node.child(name.as_ref()))
    }

    pub fn descend_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, name| node.child_mut(name.as_ref()))
    }

    /// Follow `path`, creating any missing nodes along the way.
    pub fn get_or_insert_path<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Node {
        path.iter()
            .fold(self, |node, name| node.get_or_insert_child(name.as_ref()))
    }

    /// Detach the node at `path`. The root itself cannot be removed.
    pub fn remove_path<S: AsRef<str>>(&mut self, path: &[S]) -> Option<Node> {
        let (last, parent) = path.split_last()?;
        self.descend_mut(parent)?.remove_child(last.as_ref())
    }

    // ---------------------------------------------------------------
    // Comparison
    // ---------------------------------------------------------------

    /// Whether the node's own comparable state matches: the value set, the
    /// comment and the deactivation flag. Children are not considered.
    pub fn same_state(&self, other: &Node) -> bool {
        self.values_match(other)
            && self.comment == other.comment
            && self.deactivated == other.deactivated
    }

    /// Tree equality: same child names at every path and [`same_state`] at
    /// every node. Child order, default and secret flags are ignored.
    ///
    /// [`same_state`]: Node::same_state
    pub fn is_equivalent(&self, other: &Node) -> bool {
        self.same_state(other)
            && self.children.len() == other.children.len()
            && self.children.iter().all(|(name, child)| {
                other
                    .child(name)
                    .is_some_and(|theirs| child.is_equivalent(theirs))
            })
    }

    // ---------------------------------------------------------------
    // Builders
    // ---------------------------------------------------------------

    /// Return this node under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.add_value(value);
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_value(value);
        }
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.insert_child(child);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.set_comment(Some(comment));
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.deactivated = true;
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn default_valued(mut self) -> Self {
        self.default = true;
        self
    }
}
