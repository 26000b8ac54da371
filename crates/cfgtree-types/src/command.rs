//! Path-qualified edit commands.
//!
//! A [`Command`] names a node by its path from the root and optionally
//! carries one argument: the value for `set`/`delete`, or the comment text
//! for `comment`. Commands are grouped into a [`CommandList`] whose four
//! sequences are applied in order: deletes, sets, comments, activations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The operation a [`Command`] performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOp {
    Delete,
    Set,
    Comment,
    Deactivate,
    Activate,
}

impl CommandOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Set => "set",
            Self::Comment => "comment",
            Self::Deactivate => "deactivate",
            Self::Activate => "activate",
        }
    }
}

impl fmt::Display for CommandOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single edit operation on a configuration tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    pub op: CommandOp,
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
}

impl Command {
    pub fn new(op: CommandOp, path: Vec<String>, arg: Option<String>) -> Self {
        Self { op, path, arg }
    }

    /// Set `path`, adding `value` when given.
    pub fn set(path: Vec<String>, value: Option<String>) -> Self {
        Self::new(CommandOp::Set, path, value)
    }

    /// Delete the node at `path`, or only `value` from it when given.
    pub fn delete(path: Vec<String>, value: Option<String>) -> Self {
        Self::new(CommandOp::Delete, path, value)
    }

    /// Replace the comment at `path`. Empty text removes the comment.
    pub fn comment(path: Vec<String>, text: impl Into<String>) -> Self {
        Self::new(CommandOp::Comment, path, Some(text.into()))
    }

    pub fn deactivate(path: Vec<String>) -> Self {
        Self::new(CommandOp::Deactivate, path, None)
    }

    pub fn activate(path: Vec<String>) -> Self {
        Self::new(CommandOp::Activate, path, None)
    }

    /// The path followed by the argument, if any.
    pub fn words(&self) -> Vec<String> {
        let mut words = self.path.clone();
        words.extend(self.arg.iter().cloned());
        words
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op)?;
        for segment in &self.path {
            if needs_quotes(segment) {
                write!(f, " {}", single_quoted(segment))?;
            } else {
                write!(f, " {segment}")?;
            }
        }
        match (&self.op, &self.arg) {
            (CommandOp::Comment, Some(text)) => write!(f, " {}", double_quoted(text)),
            (_, Some(value)) => write!(f, " {}", single_quoted(value)),
            (_, None) => Ok(()),
        }
    }
}

fn needs_quotes(word: &str) -> bool {
    word.is_empty()
        || word
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'))
}

/// Shell-style single quoting: an embedded `'` becomes `'\''`.
fn single_quoted(word: &str) -> String {
    format!("'{}'", word.replace('\'', "'\\''"))
}

fn double_quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// The ordered command sequences that turn one tree into another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandList {
    pub deletes: Vec<Command>,
    pub sets: Vec<Command>,
    pub comments: Vec<Command>,
    pub activations: Vec<Command>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no sequence holds a command.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of commands across all sequences.
    pub fn len(&self) -> usize {
        self.deletes.len() + self.sets.len() + self.comments.len() + self.activations.len()
    }

    /// All commands in application order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.deletes
            .iter()
            .chain(&self.sets)
            .chain(&self.comments)
            .chain(&self.activations)
    }

    /// Route a command to the sequence its operation belongs to.
    pub fn push(&mut self, command: Command) {
        match command.op {
            CommandOp::Delete => self.deletes.push(command),
            CommandOp::Set => self.sets.push(command),
            CommandOp::Comment => self.comments.push(command),
            CommandOp::Deactivate | CommandOp::Activate => self.activations.push(command),
        }
    }
}

impl fmt::Display for CommandList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for command in self.iter() {
            writeln!(f, "{command}")?;
        }
        Ok(())
    }
}
