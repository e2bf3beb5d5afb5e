use serde::{Deserialize, Serialize};

use crate::models::files::FileNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    FileAdded,
    FileRemoved,
    FileChanged,
}

/// A change notification pushed to WebSocket subscribers. Fire-and-forget:
/// events are never replayed to clients that connect later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<FileNode>,
}
