//! Property tests over randomly generated configuration trees.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use cfgtree_types::{CommandList, Node};

use crate::commands::diff_commands;
use crate::config::{ExtractOptions, RenderOptions};
use crate::render::{render_lines, DiffLine, Marker};
use crate::tree_diff::{diff_trees, ChangeKind, NodeDiff};

/// Values, comment, deactivated, secret and default.
type State = (Vec<String>, Option<String>, bool, bool, bool);

fn arb_state() -> impl Strategy<Value = State> {
    (
        prop::collection::vec("[a-d]", 0..3),
        prop::option::of("[xy]{1,2}"),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.2),
        prop::bool::weighted(0.1),
    )
}

fn build(
    (values, comment, deactivated, secret, default): State,
    children: BTreeMap<String, Node>,
) -> Node {
    let mut node = Node::new("").with_values(values);
    node.set_comment(comment.as_deref());
    node.set_deactivated(deactivated);
    node.set_secret(secret);
    node.set_default(default);
    for (name, child) in children {
        node.insert_child(child.renamed(name));
    }
    node
}

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = arb_state().prop_map(|state| build(state, BTreeMap::new()));
    leaf.prop_recursive(3, 32, 4, |inner| {
        (arb_state(), prop::collection::btree_map("[p-t]", inner, 0..4))
            .prop_map(|(state, children)| build(state, children))
    })
}

fn arb_tree() -> impl Strategy<Value = Node> {
    prop::collection::btree_map("[p-t]", arb_node(), 0..4).prop_map(|children| {
        let mut root = Node::root();
        for (name, child) in children {
            root.insert_child(child.renamed(name));
        }
        root
    })
}

/// Copy of `node` without its default flag, recursively.
fn explicit(node: &Node) -> Node {
    let mut out = own_state(node);
    out.set_secret(node.is_secret());
    for child in node.children() {
        out.insert_child(explicit(child));
    }
    out
}

/// Values, comment and deactivation of `node`, without children or flags.
fn own_state(node: &Node) -> Node {
    let mut out = Node::new(node.name()).with_values(node.values().iter().cloned());
    out.set_comment(node.comment());
    out.set_deactivated(node.is_deactivated());
    out
}

/// The tree that applying default-suppressed commands to `old` produces,
/// where `old` has no default nodes. A default node keeps its old state,
/// or is created bare when something explicit lies below it.
fn without_defaults(old: Option<&Node>, new: &Node) -> Option<Node> {
    let mut out = match (new.is_default(), old) {
        (false, _) => own_state(new),
        (true, Some(old)) => own_state(old),
        (true, None) => Node::new(new.name()),
    };
    for child in new.children() {
        if let Some(kept) = without_defaults(old.and_then(|o| o.child(child.name())), child) {
            out.insert_child(kept);
        }
    }
    let keep = !new.is_default() || old.is_some() || out.has_children();
    keep.then_some(out)
}

fn command_paths(commands: &CommandList) -> BTreeSet<Vec<String>> {
    commands.iter().map(|c| c.path.clone()).collect()
}

fn all_unchanged(diff: &NodeDiff<'_>) -> bool {
    diff.kind() == ChangeKind::Unchanged && diff.children.iter().all(all_unchanged)
}

fn value_deltas(
    diff: &NodeDiff<'_>,
    path: &mut Vec<String>,
    out: &mut BTreeMap<Vec<String>, (BTreeSet<String>, BTreeSet<String>)>,
) {
    if let Some(change) = diff.change() {
        out.insert(
            path.clone(),
            (
                change.values_removed.iter().cloned().collect(),
                change.values_added.iter().cloned().collect(),
            ),
        );
    }
    for child in &diff.children {
        path.push(child.name.to_string());
        value_deltas(child, path, out);
        path.pop();
    }
}

fn marked(lines: &[DiffLine]) -> BTreeSet<(Vec<String>, char)> {
    lines
        .iter()
        .filter(|l| l.marker != Marker::Unchanged)
        .map(|l| (l.path.clone(), l.marker.symbol()))
        .collect()
}

proptest! {
    #[test]
    fn identity_is_unchanged(tree in arb_tree()) {
        let diff = diff_trees(&tree, &tree);
        let options = ExtractOptions { show_def: true };
        prop_assert!(all_unchanged(&diff.root));
        prop_assert!(diff_commands(&diff, &options).is_empty());
    }

    #[test]
    fn value_deltas_swap_when_reversed(a in arb_tree(), b in arb_tree()) {
        let forward = diff_trees(&a, &b);
        let backward = diff_trees(&b, &a);

        let mut fwd = BTreeMap::new();
        value_deltas(&forward.root, &mut Vec::new(), &mut fwd);
        let mut bwd = BTreeMap::new();
        value_deltas(&backward.root, &mut Vec::new(), &mut bwd);

        prop_assert_eq!(fwd.len(), bwd.len());
        for (path, (removed, added)) in &fwd {
            let (back_removed, back_added) = &bwd[path];
            prop_assert_eq!(removed, back_added);
            prop_assert_eq!(added, back_removed);
        }
    }

    #[test]
    fn applying_commands_round_trips(a in arb_tree(), b in arb_tree()) {
        let options = ExtractOptions { show_def: true };
        let commands = diff_commands(&diff_trees(&a, &b), &options);
        let mut applied = a.clone();
        prop_assert!(applied.apply(&commands).is_ok());
        prop_assert!(applied.is_equivalent(&b));
    }

    #[test]
    fn applying_commands_without_defaults(a in arb_tree(), b in arb_tree()) {
        let a = explicit(&a);
        let commands = diff_commands(&diff_trees(&a, &b), &ExtractOptions::default());
        let mut applied = a.clone();
        prop_assert!(applied.apply(&commands).is_ok());

        let expected = without_defaults(Some(&a), &b);
        prop_assert!(expected.is_some());
        if let Some(expected) = expected {
            prop_assert!(applied.is_equivalent(&expected));
        }
    }

    #[test]
    fn text_and_commands_agree(a in arb_tree(), b in arb_tree(), show_def in any::<bool>()) {
        let diff = diff_trees(&a, &b);
        let render = RenderOptions { show_def, ..Default::default() };
        let extract = ExtractOptions { show_def };

        let text: BTreeSet<Vec<String>> = marked(&render_lines(&diff, &render))
            .into_iter()
            .map(|(path, _)| path)
            .collect();
        let commands = command_paths(&diff_commands(&diff, &extract));

        prop_assert!(commands.is_subset(&text));
        prop_assert_eq!(text.is_empty(), commands.is_empty());
    }

    #[test]
    fn hiding_secrets_only_changes_text(a in arb_tree(), b in arb_tree()) {
        let diff = diff_trees(&a, &b);
        let plain = RenderOptions::default();
        let hidden = RenderOptions { hide_secret: true, ..Default::default() };

        let plain_lines = render_lines(&diff, &plain);
        let hidden_lines = render_lines(&diff, &hidden);
        prop_assert_eq!(plain_lines.len(), hidden_lines.len());
        prop_assert_eq!(marked(&plain_lines), marked(&hidden_lines));
        for (p, h) in plain_lines.iter().zip(&hidden_lines) {
            prop_assert_eq!(p.marker, h.marker);
            prop_assert_eq!(p.kind, h.kind);
        }
    }

    #[test]
    fn context_reports_exactly_the_full_changes(
        a in arb_tree(),
        b in arb_tree(),
        window in 0usize..3,
        show_def in any::<bool>(),
    ) {
        let diff = diff_trees(&a, &b);
        let full = RenderOptions { show_def, ..Default::default() };
        let context = RenderOptions {
            show_def,
            context_diff: true,
            context_lines: window,
            ..Default::default()
        };

        prop_assert_eq!(
            marked(&render_lines(&diff, &full)),
            marked(&render_lines(&diff, &context))
        );
    }
}
