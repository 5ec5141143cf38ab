use serde::{Deserialize, Serialize};

use crate::uri::ResourceUri;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Untracked,
}

impl FileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FileStatus::Added => "A",
            FileStatus::Modified => "M",
            FileStatus::Deleted => "D",
            FileStatus::Renamed => "R",
            FileStatus::Copied => "C",
            FileStatus::Untracked => "?",
        }
    }

    /// True when the file has no version on the "from" side.
    pub fn is_addition(&self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Untracked)
    }
}

/// One changed file between two revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub uri: ResourceUri,
    /// Source of a rename or copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_uri: Option<ResourceUri>,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FromRevision {
    /// Explicit revision expression.
    Id(String),
    /// N commits before the "to" revision.
    Back(u32),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRange {
    /// `None` compares against the working tree.
    #[serde(default)]
    pub to_revision: Option<String>,
    /// `None` means one commit before `to_revision`.
    #[serde(default)]
    pub from_revision: Option<FromRevision>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLineOrigin {
    Context,
    Addition,
    Deletion,
}

#[derive(Debug, Clone)]
pub struct DiffLine {
    pub origin: DiffLineOrigin,
    pub old_lineno: Option<u32>,
    pub new_lineno: Option<u32>,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Hunk {
    pub header: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<DiffLine>,
}
