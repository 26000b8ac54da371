//! In-memory application of a [`CommandList`] to a [`Node`] tree.
//!
//! This mirrors what a command executor does against a live system and is
//! what makes generated command lists verifiable: applying the commands of
//! `diff(a, b)` to a copy of `a` must produce a tree equivalent to `b`.

use tracing::debug;

use crate::command::{Command, CommandList, CommandOp};
use crate::error::{TypeError, TypeResult};
use crate::node::Node;

impl Node {
    /// Apply every command in `commands`: deletes, then sets, then comments,
    /// then activations.
    ///
    /// Stops at the first failing command; earlier commands stay applied.
    pub fn apply(&mut self, commands: &CommandList) -> TypeResult<()> {
        for command in commands.iter() {
            self.apply_command(command)?;
        }
        debug!(count = commands.len(), "applied command list");
        Ok(())
    }

    /// Apply a single command.
    ///
    /// - `delete` without a value removes the node; with a value it removes
    ///   only that value and keeps the node.
    /// - `set` creates missing nodes along the path and adds the value.
    /// - `comment` replaces the comment; empty text removes it.
    /// - `deactivate` / `activate` toggle the deactivation flag.
    pub fn apply_command(&mut self, command: &Command) -> TypeResult<()> {
        if command.path.is_empty() {
            return Err(TypeError::EmptyPath {
                op: command.op.to_string(),
            });
        }

        match command.op {
            CommandOp::Set => {
                let node = self.get_or_insert_path(&command.path);
                if let Some(value) = &command.arg {
                    node.add_value(value.as_str());
                }
            }
            CommandOp::Delete => match &command.arg {
                Some(value) => {
                    let node = self.existing(&command.path)?;
                    node.remove_value(value);
                }
                None => {
                    self.remove_path(&command.path)
                        .ok_or_else(|| not_found(&command.path))?;
                }
            },
            CommandOp::Comment => {
                let node = self.existing(&command.path)?;
                node.set_comment(command.arg.as_deref());
            }
            CommandOp::Deactivate => self.existing(&command.path)?.set_deactivated(true),
            CommandOp::Activate => self.existing(&command.path)?.set_deactivated(false),
        }
        Ok(())
    }

    fn existing(&mut self, path: &[String]) -> TypeResult<&mut Node> {
        self.descend_mut(path).ok_or_else(|| not_found(path))
    }
}

fn not_found(path: &[String]) -> TypeError {
    TypeError::PathNotFound {
        path: path.to_vec(),
    }
}
