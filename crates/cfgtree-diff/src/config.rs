use serde::{Deserialize, Serialize};

/// Presentation settings for rendered diffs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Include nodes flagged as system defaults.
    pub show_def: bool,
    /// Replace values of secret nodes with a placeholder.
    pub hide_secret: bool,
    /// Render only changed regions instead of the whole tree.
    pub context_diff: bool,
    /// Unchanged siblings shown on each side of a change in context mode.
    pub context_lines: usize,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_def: false,
            hide_secret: false,
            context_diff: false,
            context_lines: 3,
            indent: 4,
        }
    }
}

impl RenderOptions {
    /// Context-diff rendering with the default window.
    pub fn context() -> Self {
        Self {
            context_diff: true,
            ..Default::default()
        }
    }
}

/// Settings for command extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Emit commands for nodes flagged as system defaults.
    pub show_def: bool,
}
