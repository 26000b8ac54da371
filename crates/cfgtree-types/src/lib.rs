//! Foundation types for cfgtree.
//!
//! This crate provides the configuration tree and command types shared by
//! every other cfgtree crate. A configuration is a tree of named [`Node`]s;
//! a [`CommandList`] is an ordered set of operations that edits such a tree.
//!
//! # Key Types
//!
//! - [`Node`] -- A configuration tree vertex: values, children, comment, flags
//! - [`Command`] / [`CommandOp`] -- A single path-qualified edit operation
//! - [`CommandList`] -- Delete, set, comment and activation sequences
//! - [`TypeError`] -- Failures while applying commands to a tree

pub mod apply;
pub mod command;
pub mod error;
pub mod node;

pub use command::{Command, CommandList, CommandOp};
pub use error::{TypeError, TypeResult};
pub use node::Node;
