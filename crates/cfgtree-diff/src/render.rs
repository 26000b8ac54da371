//! Diff rendering: markered full-tree dumps and `[edit ...]` context diffs.
//!
//! Rendering produces structured [`DiffLine`]s first and formats them last,
//! so callers can inspect what was reported independently of layout. A line
//! is formatted as a status marker, a `!` column for deactivated nodes, then
//! the indented text:
//!
//! ```text
//!   interfaces {
//!       eth0 {
//! -         address 10.0.0.1/24
//! +         address 10.0.0.2/24
//!       }
//!   }
//! ```
//!
//! Secret redaction and default suppression are applied here and only
//! here; the diff itself is presentation-agnostic.

use std::fmt;

use serde::{Deserialize, Serialize};

use cfgtree_types::{CommandList, Node};

use crate::config::RenderOptions;
use crate::tree_diff::{diff_trees, DiffStatus, NodeChange, NodeDiff, TreeDiff};

/// Replaces secret values in rendered text when hiding is requested.
pub const SECRET_PLACEHOLDER: &str = "********";

/// Per-line status marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    Unchanged,
    Added,
    Deleted,
    Changed,
}

impl Marker {
    pub fn symbol(&self) -> char {
        match self {
            Self::Unchanged => ' ',
            Self::Added => '+',
            Self::Deleted => '-',
            Self::Changed => '>',
        }
    }
}

/// What a rendered line represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// `[edit path]` hunk header (context mode only).
    Header,
    /// `/* text */` above a node.
    Comment,
    /// `name value`, or `name` for a valueless leaf.
    Leaf,
    /// `name {`
    Open,
    /// `}`
    Close,
    /// `name { ... }` for an unchanged container shown as context.
    Collapsed,
}

/// One rendered line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub marker: Marker,
    pub deactivated: bool,
    pub depth: usize,
    /// Path of the node the line belongs to (the hunk path for headers).
    pub path: Vec<String>,
    pub kind: LineKind,
    pub text: String,
}

impl DiffLine {
    /// Format the line with `indent` spaces per depth level.
    pub fn format(&self, indent: usize) -> String {
        if self.kind == LineKind::Header {
            return self.text.clone();
        }
        format!(
            "{}{}{}{}",
            self.marker.symbol(),
            if self.deactivated { '!' } else { ' ' },
            " ".repeat(indent * self.depth),
            self.text
        )
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(RenderOptions::default().indent))
    }
}

/// Render a diff to structured lines.
pub fn render_lines(diff: &TreeDiff<'_>, options: &RenderOptions) -> Vec<DiffLine> {
    let mut renderer = Renderer::new(diff.base_path.clone(), options);
    if options.context_diff {
        renderer.context_root(diff);
    } else {
        renderer.full_root(diff);
    }
    renderer.lines
}

/// Render a diff to text, one line per entry.
pub fn render_diff(diff: &TreeDiff<'_>, options: &RenderOptions) -> String {
    join_lines(&render_lines(diff, options), options.indent)
}

/// Render a single tree without markers.
///
/// Context mode is ignored: with nothing changed it would print nothing.
pub fn render_tree(tree: &Node, options: &RenderOptions) -> String {
    let options = RenderOptions {
        context_diff: false,
        ..options.clone()
    };
    render_diff(&diff_trees(tree, tree), &options)
}

/// Render commands one per line. Values are never redacted.
pub fn render_commands(commands: &CommandList) -> String {
    commands.to_string()
}

fn join_lines(lines: &[DiffLine], indent: usize) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.format(indent));
        out.push('\n');
    }
    out
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '{' | '}' | ';'))
}

struct Renderer<'o> {
    options: &'o RenderOptions,
    path: Vec<String>,
    lines: Vec<DiffLine>,
}

impl<'o> Renderer<'o> {
    fn new(path: Vec<String>, options: &'o RenderOptions) -> Self {
        Self {
            options,
            path,
            lines: Vec::new(),
        }
    }

    /// A hidden node's own lines are suppressed. Its braces are still
    /// rendered when something below it is shown.
    fn hidden(&self, node: &Node) -> bool {
        node.is_default() && !self.options.show_def
    }

    /// Whether `node` or any of its descendants is not hidden.
    fn shown(&self, node: &Node) -> bool {
        !self.hidden(node) || node.children().any(|c| self.shown(c))
    }

    fn shown_diff(&self, diff: &NodeDiff<'_>) -> bool {
        match diff.status {
            DiffStatus::Added(node) | DiffStatus::Deleted(node) => self.shown(node),
            _ => !self.hidden(diff.node()) || diff.children.iter().any(|c| self.shown_diff(c)),
        }
    }

    fn push(
        &mut self,
        marker: Marker,
        deactivated: bool,
        depth: usize,
        kind: LineKind,
        text: String,
    ) {
        self.lines.push(DiffLine {
            marker,
            deactivated,
            depth,
            path: self.path.clone(),
            kind,
            text,
        });
    }

    fn value_text(&self, node: &Node, value: &str) -> String {
        if self.options.hide_secret && node.is_secret() {
            SECRET_PLACEHOLDER.to_string()
        } else if needs_quotes(value) {
            format!("\"{}\"", value.replace('"', "\\\""))
        } else {
            value.to_string()
        }
    }

    fn comment_line(&mut self, node: &Node, comment: &str, marker: Marker, depth: usize) {
        // A literal terminator would end the comment early.
        let text = format!("/* {} */", comment.replace("*/", "* /"));
        self.push(marker, node.is_deactivated(), depth, LineKind::Comment, text);
    }

    fn value_line(&mut self, node: &Node, value: &str, marker: Marker, depth: usize) {
        let text = format!("{} {}", node.name(), self.value_text(node, value));
        self.push(marker, node.is_deactivated(), depth, LineKind::Leaf, text);
    }

    fn bare_line(&mut self, node: &Node, marker: Marker, depth: usize) {
        let text = node.name().to_string();
        self.push(marker, node.is_deactivated(), depth, LineKind::Leaf, text);
    }

    fn open(&mut self, node: &Node, marker: Marker, depth: usize) {
        let text = format!("{} {{", node.name());
        self.push(marker, node.is_deactivated(), depth, LineKind::Open, text);
    }

    fn close(&mut self, node: &Node, marker: Marker, depth: usize) {
        self.push(marker, node.is_deactivated(), depth, LineKind::Close, "}".to_string());
    }

    fn collapsed(&mut self, node: &Node, marker: Marker, depth: usize) {
        let text = format!("{} {{ ... }}", node.name());
        self.push(marker, node.is_deactivated(), depth, LineKind::Collapsed, text);
    }

    // ---------------------------------------------------------------
    // Shared pieces
    // ---------------------------------------------------------------

    /// A whole subtree under one marker (added, deleted or unchanged).
    fn subtree(&mut self, node: &Node, marker: Marker, depth: usize) {
        let hidden = self.hidden(node);
        if hidden && !self.shown(node) {
            return;
        }
        if !hidden {
            if let Some(comment) = node.comment() {
                self.comment_line(node, comment, marker, depth);
            }
            for value in node.values() {
                self.value_line(node, value, marker, depth);
            }
            if !node.has_children() {
                if node.values().is_empty() {
                    self.bare_line(node, marker, depth);
                }
                return;
            }
        }

        self.open(node, marker, depth);
        for child in node.children() {
            if !self.shown(child) {
                continue;
            }
            self.path.push(child.name().to_string());
            self.subtree(child, marker, depth + 1);
            self.path.pop();
        }
        self.close(node, marker, depth);
    }

    /// Comment and value lines of a node present on both sides. Returns the
    /// marker for the node's structural lines: `Changed` when its
    /// deactivation flipped.
    fn own_lines(
        &mut self,
        old: &Node,
        new: &Node,
        change: Option<&NodeChange>,
        depth: usize,
    ) -> Marker {
        let head = match change.and_then(|c| c.deactivated) {
            Some(_) => Marker::Changed,
            None => Marker::Unchanged,
        };

        match change.and_then(|c| c.comment.as_ref()) {
            Some(comment) => {
                if let Some(text) = &comment.old {
                    self.comment_line(old, text, Marker::Deleted, depth);
                }
                if let Some(text) = &comment.new {
                    self.comment_line(new, text, Marker::Added, depth);
                }
            }
            None => {
                if let Some(text) = new.comment() {
                    self.comment_line(new, text, head, depth);
                }
            }
        }

        if let Some(change) = change {
            for value in &change.values_removed {
                self.value_line(old, value, Marker::Deleted, depth);
            }
        }
        for value in new.values() {
            let added = change.is_some_and(|c| c.values_added.contains(value));
            let marker = if added { Marker::Added } else { head };
            self.value_line(new, value, marker, depth);
        }

        head
    }

    // ---------------------------------------------------------------
    // Full-tree mode
    // ---------------------------------------------------------------

    fn full_root(&mut self, diff: &TreeDiff<'_>) {
        if diff.base_path.is_empty() {
            self.full_children(&diff.root, 0);
        } else {
            self.full_node(&diff.root, 0);
        }
    }

    fn full_children(&mut self, diff: &NodeDiff<'_>, depth: usize) {
        for child in &diff.children {
            if !self.shown_diff(child) {
                continue;
            }
            self.path.push(child.name.to_string());
            self.full_node(child, depth);
            self.path.pop();
        }
    }

    fn full_node(&mut self, diff: &NodeDiff<'_>, depth: usize) {
        let (old, new, change) = match &diff.status {
            DiffStatus::Added(new) => return self.subtree(new, Marker::Added, depth),
            DiffStatus::Deleted(old) => return self.subtree(old, Marker::Deleted, depth),
            DiffStatus::Unchanged { old, new } => (*old, *new, None),
            DiffStatus::Changed { old, new, change } => (*old, *new, Some(change)),
        };

        let hidden = self.hidden(new);
        if hidden && !self.shown_diff(diff) {
            return;
        }
        let head = if hidden {
            Marker::Unchanged
        } else {
            self.own_lines(old, new, change, depth)
        };
        if diff.children.is_empty() {
            if new.values().is_empty() {
                self.bare_line(new, head, depth);
            }
            return;
        }

        self.open(new, head, depth);
        self.full_children(diff, depth + 1);
        self.close(new, head, depth);
    }

    // ---------------------------------------------------------------
    // Context mode
    // ---------------------------------------------------------------

    fn context_root(&mut self, diff: &TreeDiff<'_>) {
        let root = &diff.root;
        let parent = diff.base_path[..diff.base_path.len().saturating_sub(1)].to_vec();

        match &root.status {
            DiffStatus::Added(new) => {
                self.header(parent);
                self.subtree(new, Marker::Added, 1);
            }
            DiffStatus::Deleted(old) => {
                self.header(parent);
                self.subtree(old, Marker::Deleted, 1);
            }
            DiffStatus::Changed { old, new, change } if !diff.base_path.is_empty() => {
                self.header(parent);
                self.local_item(root, old, new, Some(change), 1);
                self.hunks(root);
            }
            _ => self.hunks(root),
        }
    }

    fn header(&mut self, path: Vec<String>) {
        let text = if path.is_empty() {
            "[edit]".to_string()
        } else {
            format!("[edit {}]", path.join(" "))
        };
        self.lines.push(DiffLine {
            marker: Marker::Unchanged,
            deactivated: false,
            depth: 0,
            path,
            kind: LineKind::Header,
            text,
        });
    }

    /// One hunk for the changes directly below `diff`, then the hunks of
    /// its children in order.
    fn hunks(&mut self, diff: &NodeDiff<'_>) {
        let visible: Vec<&NodeDiff<'_>> = diff
            .children
            .iter()
            .filter(|c| self.shown_diff(c))
            .collect();
        let local: Vec<usize> = visible
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.old().is_none()
                    || c.new().is_none()
                    || (c.change().is_some() && !self.hidden(c.node()))
            })
            .map(|(i, _)| i)
            .collect();

        if !local.is_empty() {
            self.header(self.path.clone());
            let window = self.options.context_lines;
            for (i, child) in visible.iter().enumerate() {
                if !local.iter().any(|&l| i.abs_diff(l) <= window) {
                    continue;
                }
                self.path.push(child.name.to_string());
                match &child.status {
                    DiffStatus::Added(new) => self.subtree(new, Marker::Added, 1),
                    DiffStatus::Deleted(old) => self.subtree(old, Marker::Deleted, 1),
                    DiffStatus::Changed { old, new, change } => {
                        self.local_item(child, old, new, Some(change), 1)
                    }
                    DiffStatus::Unchanged { old, new } => self.local_item(child, old, new, None, 1),
                }
                self.path.pop();
            }
        }

        for child in visible {
            if child.old().is_some() && child.new().is_some() && child.has_changes() {
                self.path.push(child.name.to_string());
                self.hunks(child);
                self.path.pop();
            }
        }
    }

    /// A node present on both sides, shown inside its parent's hunk with
    /// its children collapsed.
    fn local_item(
        &mut self,
        diff: &NodeDiff<'_>,
        old: &Node,
        new: &Node,
        change: Option<&NodeChange>,
        depth: usize,
    ) {
        let hidden = self.hidden(new);
        let head = if hidden {
            Marker::Unchanged
        } else if change.is_some() {
            self.own_lines(old, new, change, depth)
        } else {
            for value in new.values() {
                self.value_line(new, value, Marker::Unchanged, depth);
            }
            Marker::Unchanged
        };

        if !diff.children.is_empty() {
            self.collapsed(new, head, depth);
        } else if !hidden && new.values().is_empty() {
            self.bare_line(new, head, depth);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_diff::diff_subtrees;

    fn eth0(address: &str) -> Node {
        Node::root().with_child(
            Node::new("interfaces").with_child(
                Node::new("eth0").with_child(Node::new("address").with_value(address)),
            ),
        )
    }

    fn marked(lines: &[DiffLine]) -> Vec<(String, char)> {
        lines
            .iter()
            .filter(|l| l.marker != Marker::Unchanged)
            .map(|l| (l.text.clone(), l.marker.symbol()))
            .collect()
    }

    #[test]
    fn full_mode_address_change() {
        let a = eth0("10.0.0.1/24");
        let b = eth0("10.0.0.2/24");
        let text = render_diff(&diff_trees(&a, &b), &RenderOptions::default());
        assert_eq!(
            text,
            "  interfaces {\n\
             \x20     eth0 {\n\
             -         address 10.0.0.1/24\n\
             +         address 10.0.0.2/24\n\
             \x20     }\n\
             \x20 }\n"
        );
    }

    #[test]
    fn render_tree_has_no_markers() {
        let tree = eth0("10.0.0.1/24");
        let text = render_tree(&tree, &RenderOptions::context());
        assert_eq!(
            text,
            "  interfaces {\n      eth0 {\n          address 10.0.0.1/24\n      }\n  }\n"
        );
    }

    #[test]
    fn added_subtree_is_all_plus() {
        let a = Node::root();
        let b = Node::root().with_child(
            Node::new("firewall").with_child(Node::new("rule").with_value("1")),
        );
        let lines = render_lines(&diff_trees(&a, &b), &RenderOptions::default());
        assert!(lines.iter().all(|l| l.marker == Marker::Added));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "rule 1");
        assert_eq!(lines[1].path, ["firewall", "rule"]);
    }

    #[test]
    fn deleted_subtree_is_all_minus() {
        let lines = render_lines(
            &diff_trees(&eth0("10.0.0.1/24"), &Node::root()),
            &RenderOptions::default(),
        );
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| l.marker == Marker::Deleted));
    }

    #[test]
    fn multi_value_leaf_marks_each_value() {
        let a = Node::root().with_child(Node::new("dns").with_values(["a", "b", "c"]));
        let b = Node::root().with_child(Node::new("dns").with_values(["b", "c", "d"]));
        let lines = render_lines(&diff_trees(&a, &b), &RenderOptions::default());
        assert_eq!(
            lines.iter().map(|l| (l.text.as_str(), l.marker.symbol())).collect::<Vec<_>>(),
            [("dns a", '-'), ("dns b", ' '), ("dns c", ' '), ("dns d", '+')]
        );
    }

    #[test]
    fn secrets_hidden_only_when_requested() {
        let a = Node::root();
        let b = Node::root().with_child(Node::new("password").with_value("hunter2").secret());
        let diff = diff_trees(&a, &b);

        let shown = render_diff(&diff, &RenderOptions::default());
        assert!(shown.contains("password hunter2"));

        let hidden = render_diff(
            &diff,
            &RenderOptions {
                hide_secret: true,
                ..Default::default()
            },
        );
        assert!(hidden.contains(&format!("password {SECRET_PLACEHOLDER}")));
        assert!(!hidden.contains("hunter2"));
    }

    #[test]
    fn defaults_suppressed_unless_shown() {
        let tree = Node::root()
            .with_child(Node::new("mtu").with_value("1500").default_valued())
            .with_child(Node::new("description").with_value("lan"));

        let text = render_tree(&tree, &RenderOptions::default());
        assert!(!text.contains("mtu"));
        assert!(text.contains("description lan"));

        let text = render_tree(
            &tree,
            &RenderOptions {
                show_def: true,
                ..Default::default()
            },
        );
        assert!(text.contains("mtu 1500"));
    }

    #[test]
    fn default_container_still_shows_explicit_changes() {
        let tree = |host: &str| {
            Node::root().with_child(
                Node::new("system")
                    .default_valued()
                    .with_value("on")
                    .with_child(Node::new("host-name").with_value(host))
                    .with_child(Node::new("time-zone").with_value("UTC").default_valued()),
            )
        };
        let (t1, t2) = (tree("r1"), tree("r2"));
        let diff = diff_trees(&t1, &t2);

        let text = render_diff(&diff, &RenderOptions::default());
        assert_eq!(
            text,
            "  system {\n-     host-name r1\n+     host-name r2\n  }\n"
        );

        let text = render_diff(&diff, &RenderOptions::context());
        assert_eq!(text, "[edit system]\n-     host-name r1\n+     host-name r2\n");
    }

    #[test]
    fn default_subtree_without_explicit_nodes_is_hidden() {
        let a = Node::root();
        let b = Node::root().with_child(
            Node::new("system")
                .default_valued()
                .with_child(Node::new("time-zone").with_value("UTC").default_valued()),
        );
        let diff = diff_trees(&a, &b);
        assert_eq!(render_diff(&diff, &RenderOptions::default()), "");
        assert_eq!(render_diff(&diff, &RenderOptions::context()), "");
    }

    #[test]
    fn comment_terminator_is_broken_up() {
        let tree = Node::root().with_child(Node::new("ssh").with_comment("see */ below"));
        assert_eq!(
            render_tree(&tree, &RenderOptions::default()),
            "  /* see * / below */\n  ssh\n"
        );
    }

    #[test]
    fn values_with_spaces_are_quoted() {
        let tree = Node::root().with_child(Node::new("description").with_value("core uplink"));
        assert_eq!(
            render_tree(&tree, &RenderOptions::default()),
            "  description \"core uplink\"\n"
        );
    }

    #[test]
    fn comments_and_deactivation() {
        let a = Node::root().with_child(Node::new("ssh").with_value("22").with_comment("old"));
        let b = Node::root().with_child(
            Node::new("ssh")
                .with_value("22")
                .with_comment("new")
                .deactivated(),
        );
        let text = render_diff(&diff_trees(&a, &b), &RenderOptions::default());
        assert_eq!(text, "- /* old */\n+!/* new */\n>!ssh 22\n");
    }

    #[test]
    fn context_mode_shows_only_hunks() {
        let mut a = Node::root();
        let mut system = Node::new("system");
        for name in ["a", "b", "c", "d", "e", "f", "g", "h"] {
            system.insert_child(Node::new(name).with_value("1"));
        }
        a.insert_child(system);
        a.insert_child(Node::new("service").with_child(Node::new("ssh")));

        let mut b = a.clone();
        b.descend_mut(&["system", "e"]).unwrap().add_value("2");

        let options = RenderOptions {
            context_diff: true,
            context_lines: 1,
            ..Default::default()
        };
        let text = render_diff(&diff_trees(&a, &b), &options);
        assert_eq!(
            text,
            "[edit system]\n      d 1\n      e 1\n+     e 2\n      f 1\n"
        );
    }

    #[test]
    fn context_mode_collapses_unchanged_containers() {
        let a = Node::root()
            .with_child(Node::new("interfaces").with_child(Node::new("eth0")))
            .with_child(Node::new("system"));
        let b = Node::root()
            .with_child(Node::new("interfaces").with_child(Node::new("eth0")))
            .with_child(Node::new("system"))
            .with_child(Node::new("service").with_child(Node::new("ssh")));

        let text = render_diff(&diff_trees(&a, &b), &RenderOptions::context());
        assert_eq!(
            text,
            "[edit]\n      interfaces { ... }\n      system\n\
             +     service {\n+         ssh\n+     }\n"
        );
    }

    #[test]
    fn context_mode_nested_hunks_in_preorder() {
        let a = Node::root()
            .with_child(Node::new("a").with_child(Node::new("x").with_value("1")))
            .with_child(Node::new("b").with_child(Node::new("y").with_value("1")));
        let mut b = a.clone();
        b.descend_mut(&["a", "x"]).unwrap().add_value("2");
        b.descend_mut(&["b", "y"]).unwrap().remove_value("1");

        let lines = render_lines(&diff_trees(&a, &b), &RenderOptions::context());
        let headers: Vec<_> = lines
            .iter()
            .filter(|l| l.kind == LineKind::Header)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(headers, ["[edit a]", "[edit b]"]);
    }

    #[test]
    fn context_and_full_report_the_same_changes() {
        let a = eth0("10.0.0.1/24");
        let b = eth0("10.0.0.2/24");
        let diff = diff_trees(&a, &b);
        let full = render_lines(&diff, &RenderOptions::default());
        let context = render_lines(&diff, &RenderOptions::context());
        assert_eq!(marked(&full), marked(&context));
    }

    #[test]
    fn subtree_full_mode_renders_root_node() {
        let a = eth0("10.0.0.1/24");
        let b = eth0("10.0.0.2/24");
        let diff = diff_subtrees(&a, &b, &["interfaces", "eth0"]).unwrap();
        let text = render_diff(&diff, &RenderOptions::default());
        assert_eq!(
            text,
            "  eth0 {\n-     address 10.0.0.1/24\n+     address 10.0.0.2/24\n  }\n"
        );
    }

    #[test]
    fn subtree_context_mode_added_root() {
        let a = Node::root().with_child(Node::new("interfaces"));
        let b = eth0("10.0.0.1/24");
        let diff = diff_subtrees(&a, &b, &["interfaces", "eth0"]).unwrap();
        let text = render_diff(&diff, &RenderOptions::context());
        assert_eq!(
            text,
            "[edit interfaces]\n+     eth0 {\n+         address 10.0.0.1/24\n+     }\n"
        );
    }

    #[test]
    fn commands_render_unredacted() {
        let a = Node::root();
        let b = Node::root().with_child(Node::new("password").with_value("hunter2").secret());
        let commands = crate::commands::diff_commands(&diff_trees(&a, &b), &Default::default());
        assert_eq!(render_commands(&commands), "set password 'hunter2'\n");
    }
}
