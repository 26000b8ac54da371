//! Showing configurations and the differences between them.
//!
//! [`show_config`] is the one-call entry point: it loads two named
//! configurations from a [`TreeSource`] and prints either a single tree
//! (same name twice) or their difference, as annotated text or as the
//! commands that would produce it. The `show_*` and `get_*` helpers do the
//! same for trees the caller already holds.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cfgtree_diff::{
    diff_commands, diff_subtrees, render_commands, render_diff, subtree_commands,
    ExtractOptions, RenderOptions,
};
use cfgtree_store::TreeSource;
use cfgtree_types::{CommandList, Node};

use crate::error::SdkResult;

/// Settings for [`show_config`] and the `show_*` helpers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowOptions {
    /// Text rendering settings. `show_def` also governs command output.
    pub render: RenderOptions,
    /// Print commands instead of annotated configuration text.
    pub show_cmds: bool,
}

impl ShowOptions {
    /// Command output with otherwise default settings.
    pub fn commands() -> Self {
        Self {
            show_cmds: true,
            ..Default::default()
        }
    }

    fn extract(&self) -> ExtractOptions {
        ExtractOptions {
            show_def: self.render.show_def,
        }
    }
}

/// Show configuration `cfg2` against `cfg1`, restricted to `path`.
///
/// Both configurations are loaded before anything is compared, so a load
/// failure returns an error and no output. When `cfg1` and `cfg2` name the
/// same configuration a single tree is shown instead of a diff.
pub fn show_config<T, S>(
    source: &T,
    cfg1: &str,
    cfg2: &str,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<String>
where
    T: TreeSource + ?Sized,
    S: AsRef<str>,
{
    let old = source.load(cfg1)?;
    if cfg1 == cfg2 {
        debug!(config = cfg1, show_cmds = options.show_cmds, "showing configuration");
        return if options.show_cmds {
            show_cmds(&old, path, options)
        } else {
            show_cfg(&old, path, options)
        };
    }

    let new = source.load(cfg2)?;
    debug!(
        old = cfg1,
        new = cfg2,
        show_cmds = options.show_cmds,
        context_diff = options.render.context_diff,
        "showing configuration diff"
    );
    if options.show_cmds {
        show_cmds_diff(&old, &new, path, options)
    } else {
        show_cfg_diff(&old, &new, path, options)
    }
}

/// Render the difference between two trees at `path`.
pub fn show_cfg_diff<S: AsRef<str>>(
    old: &Node,
    new: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<String> {
    let diff = diff_subtrees(old, new, path)?;
    Ok(render_diff(&diff, &options.render))
}

/// Render the subtree of `tree` at `path` without change markers.
///
/// Context mode does not apply to a single tree and is ignored.
pub fn show_cfg<S: AsRef<str>>(
    tree: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<String> {
    let diff = diff_subtrees(tree, tree, path)?;
    let render = RenderOptions {
        context_diff: false,
        ..options.render.clone()
    };
    Ok(render_diff(&diff, &render))
}

/// Commands that turn `old` into `new` below `path`.
pub fn get_cmds_diff<S: AsRef<str>>(
    old: &Node,
    new: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<CommandList> {
    let diff = diff_subtrees(old, new, path)?;
    Ok(diff_commands(&diff, &options.extract()))
}

/// Commands that build the subtree of `tree` at `path` from nothing.
pub fn get_cmds<S: AsRef<str>>(
    tree: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<CommandList> {
    Ok(subtree_commands(tree, path, &options.extract())?)
}

/// [`get_cmds_diff`] printed one command per line.
pub fn show_cmds_diff<S: AsRef<str>>(
    old: &Node,
    new: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<String> {
    Ok(render_commands(&get_cmds_diff(old, new, path, options)?))
}

/// [`get_cmds`] printed one command per line.
pub fn show_cmds<S: AsRef<str>>(
    tree: &Node,
    path: &[S],
    options: &ShowOptions,
) -> SdkResult<String> {
    Ok(render_commands(&get_cmds(tree, path, options)?))
}
