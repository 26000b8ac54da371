//! High-level API for cfgtree.
//!
//! Ties a [`TreeSource`], the differ and the renderers together behind one
//! call, [`show_config`], plus helpers that work on trees the caller
//! already holds. This is the main entry point for tools embedding cfgtree.

pub mod error;
pub mod show;

pub use error::{SdkError, SdkResult};
pub use show::{
    get_cmds, get_cmds_diff, show_cfg, show_cfg_diff, show_cmds, show_cmds_diff, show_config,
    ShowOptions,
};

// Re-export key types
pub use cfgtree_diff::{ExtractOptions, RenderOptions, TreeDiff};
pub use cfgtree_store::{InMemoryTreeSource, TreeSource, ACTIVE_CFG, WORKING_CFG};
pub use cfgtree_types::{Command, CommandList, CommandOp, Node};
