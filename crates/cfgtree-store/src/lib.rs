//! Named configuration sources for cfgtree.
//!
//! A comparison needs two already-built trees. This crate defines where
//! they come from: a [`TreeSource`] hands out a [`Node`] for a
//! configuration name, and the two well-known names [`ACTIVE_CFG`] and
//! [`WORKING_CFG`] identify the committed and the edited configuration.
//! How a source materializes its trees (from disk, a running daemon or a
//! session overlay) is left to the implementation.
//!
//! # Modules
//!
//! - [`error`] -- Error types for source lookups
//! - [`traits`] -- The [`TreeSource`] trait and the well-known names
//! - [`memory`] -- In-memory [`InMemoryTreeSource`] for tests and embedding
//!
//! [`Node`]: cfgtree_types::Node

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryTreeSource;
pub use traits::{TreeSource, ACTIVE_CFG, WORKING_CFG};
