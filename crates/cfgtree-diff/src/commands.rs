//! Command extraction: turn a diff, or a whole tree, into edit commands.
//!
//! Commands are emitted in pre-order of the diff walk. Within the resulting
//! [`CommandList`] the four sequences are independent and are applied in
//! order: deletes, sets, comments, activations. Secret values are emitted
//! verbatim; redaction only ever happens in rendered text.

use tracing::debug;

use cfgtree_types::{Command, CommandList, Node};

use crate::config::ExtractOptions;
use crate::error::{DiffError, DiffResult};
use crate::tree_diff::{DiffStatus, NodeChange, NodeDiff, TreeDiff};

/// Commands that transform the diff's old tree into its new tree.
///
/// - `Deleted` node: one delete for its path, nothing for its subtree.
/// - `Added` node: its full content, then every descendant as added.
/// - `Changed` node: value deletes and sets, comment and activation
///   updates, then its children.
/// - `Unchanged` node: nothing for itself, then its children.
///
/// The root's own state is only emitted for a subtree diff, since a
/// command needs a non-empty path.
pub fn diff_commands(diff: &TreeDiff<'_>, options: &ExtractOptions) -> CommandList {
    let mut extractor = Extractor::new(diff.base_path.clone(), options);
    extractor.visit(&diff.root, !diff.base_path.is_empty());
    extractor.finish()
}

/// Commands that build `tree` from nothing: sets, comments and
/// deactivations for every node.
pub fn tree_commands(tree: &Node, options: &ExtractOptions) -> CommandList {
    let mut extractor = Extractor::new(Vec::new(), options);
    extractor.added(tree, false);
    extractor.finish()
}

/// [`tree_commands`] for the subtree at `path`, with fully qualified paths.
pub fn subtree_commands<S: AsRef<str>>(
    tree: &Node,
    path: &[S],
    options: &ExtractOptions,
) -> DiffResult<CommandList> {
    let base_path: Vec<String> = path.iter().map(|s| s.as_ref().to_string()).collect();
    let node = tree
        .descend(path)
        .ok_or_else(|| DiffError::PathNotFound { path: base_path.clone() })?;

    let emit_root = !base_path.is_empty();
    let mut extractor = Extractor::new(base_path, options);
    extractor.added(node, emit_root);
    Ok(extractor.finish())
}

struct Extractor<'o> {
    options: &'o ExtractOptions,
    path: Vec<String>,
    commands: CommandList,
}

impl<'o> Extractor<'o> {
    fn new(path: Vec<String>, options: &'o ExtractOptions) -> Self {
        Self {
            options,
            path,
            commands: CommandList::new(),
        }
    }

    fn finish(self) -> CommandList {
        debug!(
            deletes = self.commands.deletes.len(),
            sets = self.commands.sets.len(),
            comments = self.commands.comments.len(),
            activations = self.commands.activations.len(),
            "extracted commands"
        );
        self.commands
    }

    /// Default nodes are skipped like unchanged ones unless requested.
    fn includes(&self, node: &Node) -> bool {
        self.options.show_def || !node.is_default()
    }

    /// Whether `node` or any of its descendants is included.
    fn has_content(&self, node: &Node) -> bool {
        self.includes(node) || node.children().any(|c| self.has_content(c))
    }

    fn visit(&mut self, diff: &NodeDiff<'_>, emit_self: bool) {
        match &diff.status {
            DiffStatus::Deleted(old) => {
                if emit_self && self.has_content(old) {
                    self.push(Command::delete(self.path.clone(), None));
                }
            }
            DiffStatus::Added(new) => self.added(new, emit_self),
            DiffStatus::Changed { new, change, .. } => {
                if emit_self && self.includes(new) {
                    self.changed(change);
                }
                self.children(diff);
            }
            DiffStatus::Unchanged { .. } => self.children(diff),
        }
    }

    fn children(&mut self, diff: &NodeDiff<'_>) {
        for child in &diff.children {
            self.path.push(child.name.to_string());
            self.visit(child, true);
            self.path.pop();
        }
    }

    fn added(&mut self, node: &Node, emit_self: bool) {
        if emit_self && self.includes(node) {
            if node.values().is_empty() {
                // Nothing below creates the path, so create it here.
                if !node.children().any(|c| self.has_content(c)) {
                    self.push(Command::set(self.path.clone(), None));
                }
            } else {
                for value in node.values() {
                    self.push(Command::set(self.path.clone(), Some(value.clone())));
                }
            }
            if let Some(comment) = node.comment() {
                self.push(Command::comment(self.path.clone(), comment));
            }
            if node.is_deactivated() {
                self.push(Command::deactivate(self.path.clone()));
            }
        }

        for child in node.children() {
            self.path.push(child.name().to_string());
            self.added(child, true);
            self.path.pop();
        }
    }

    fn changed(&mut self, change: &NodeChange) {
        for value in &change.values_removed {
            self.push(Command::delete(self.path.clone(), Some(value.clone())));
        }
        for value in &change.values_added {
            self.push(Command::set(self.path.clone(), Some(value.clone())));
        }
        if let Some(comment) = &change.comment {
            let text = comment.new.clone().unwrap_or_default();
            self.push(Command::comment(self.path.clone(), text));
        }
        match change.deactivated {
            Some(true) => self.push(Command::deactivate(self.path.clone())),
            Some(false) => self.push(Command::activate(self.path.clone())),
            None => {}
        }
    }

    fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}
