//! Compile options
//!
//! Options can be built in code or deserialized next to a template
//! (`{"shouldReturnArray": true, "pruneArrayHoles": false}`).

use serde::{Deserialize, Serialize};

/// Options for a compile call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Report primitive results as `(value, removeEmpty)` pairs.
    pub should_return_array: bool,

    /// Drop undefined entries from homogeneous arrays instead of rendering
    /// them as `null`.
    pub prune_array_holes: bool,
}

impl CompileOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the omit-signal pair from the top-level call
    pub fn with_omit_signal(mut self, enabled: bool) -> Self {
        self.should_return_array = enabled;
        self
    }

    /// Drop undefined array elements instead of rendering them as `null`
    pub fn with_prune_array_holes(mut self, enabled: bool) -> Self {
        self.prune_array_holes = enabled;
        self
    }
}
