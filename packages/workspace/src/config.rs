use folio_editor::DEFAULT_MAX_HISTORY;
use serde::{Deserialize, Serialize};

/// Tunables for a [`Workspace`](crate::Workspace)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Undo/redo entries kept per document (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

fn default_history_depth() -> usize {
    DEFAULT_MAX_HISTORY
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
        }
    }
}
