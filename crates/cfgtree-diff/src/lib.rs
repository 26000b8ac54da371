//! Diff engine for cfgtree.
//!
//! Compares an active and a working configuration tree and turns the
//! structural result into either rendered text or executable commands.
//!
//! # Key Types
//!
//! - [`TreeDiff`] / [`NodeDiff`] / [`DiffStatus`] -- Structural diff borrowing both input trees
//! - [`CommandList`] via [`diff_commands`] / [`tree_commands`] -- Delete, set and comment sequences
//! - [`DiffLine`] via [`render_lines`] -- Full-tree or context rendering with markers
//! - [`RenderOptions`] / [`ExtractOptions`] -- Presentation and extraction settings
//!
//! [`CommandList`]: cfgtree_types::CommandList

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod tree_diff;

#[cfg(test)]
mod properties;

pub use commands::{diff_commands, subtree_commands, tree_commands};
pub use config::{ExtractOptions, RenderOptions};
pub use error::{DiffError, DiffResult};
pub use render::{
    render_commands, render_diff, render_lines, render_tree, DiffLine, LineKind, Marker,
    SECRET_PLACEHOLDER,
};
pub use tree_diff::{
    diff_subtrees, diff_trees, ChangeKind, CommentChange, DiffStatus, DiffSummary, NodeChange,
    NodeDiff, TreeDiff,
};
