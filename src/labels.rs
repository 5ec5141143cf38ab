use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::git::types::ChangeEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// File name, with the containing directory as a dimmed suffix.
    #[default]
    Name,
    /// Full path relative to the work tree.
    Path,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLabel {
    pub name: String,
    pub detail: String,
}

/// Display names for change entries.
#[derive(Debug, Clone)]
pub struct LabelProvider {
    workdir: PathBuf,
    mode: LabelMode,
}

impl LabelProvider {
    pub fn new(workdir: PathBuf, mode: LabelMode) -> Self {
        Self { workdir, mode }
    }

    pub fn mode(&self) -> LabelMode {
        self.mode
    }

    /// Switch modes. Callers treat this as a label change event.
    pub fn toggle(&mut self) -> LabelMode {
        self.mode = match self.mode {
            LabelMode::Name => LabelMode::Path,
            LabelMode::Path => LabelMode::Name,
        };
        self.mode
    }

    pub fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.workdir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string()
    }

    pub fn label(&self, entry: &ChangeEntry) -> EntryLabel {
        let rel = self.relative(&entry.uri.fs_path());
        let renamed_from = entry
            .old_uri
            .as_ref()
            .map(|old| self.relative(&old.fs_path()));

        match self.mode {
            LabelMode::Name => {
                let (dir, name) = match rel.rsplit_once('/') {
                    Some((dir, name)) => (dir.to_string(), name.to_string()),
                    None => (String::new(), rel.clone()),
                };
                let detail = match renamed_from {
                    Some(from) => format!("\u{2190} {from}"),
                    None => dir,
                };
                EntryLabel { name, detail }
            }
            LabelMode::Path => EntryLabel {
                name: rel,
                detail: renamed_from
                    .map(|from| format!("\u{2190} {from}"))
                    .unwrap_or_default(),
            },
        }
    }
}
