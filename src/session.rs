use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::git::types::ChangeEntry;
use crate::state::{ChangeList, DiffOptions};

const STATE_VERSION: u32 = 1;

/// Save/restore hooks for a widget whose lifetime is managed by the host.
pub trait StatefulWidget {
    type State;

    fn store_state(&self) -> Self::State;
    fn restore_state(&mut self, state: Self::State);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeListSnapshot {
    pub version: u32,
    pub saved_at: String,
    pub options: Option<DiffOptions>,
    pub entries: Vec<ChangeEntry>,
}

impl StatefulWidget for ChangeList {
    type State = ChangeListSnapshot;

    fn store_state(&self) -> ChangeListSnapshot {
        ChangeListSnapshot {
            version: STATE_VERSION,
            saved_at: chrono::Local::now().to_rfc3339(),
            options: self.options().cloned(),
            entries: self.entries().to_vec(),
        }
    }

    fn restore_state(&mut self, state: ChangeListSnapshot) {
        self.restore(state.options, state.entries);
    }
}

fn state_dir(repo_path: &Path) -> PathBuf {
    repo_path.join(".revdiff")
}

fn state_file(repo_path: &Path) -> PathBuf {
    state_dir(repo_path).join("state.json")
}

/// Ensure `.revdiff/` is listed in `.gitignore`.
fn ensure_gitignore(repo_path: &Path) {
    let gitignore_path = repo_path.join(".gitignore");
    let entry = ".revdiff/";

    if let Ok(contents) = fs::read_to_string(&gitignore_path) {
        if contents.lines().any(|line| line.trim() == entry) {
            return;
        }
        if let Ok(mut f) = fs::OpenOptions::new().append(true).open(&gitignore_path) {
            if !contents.ends_with('\n') {
                let _ = writeln!(f);
            }
            let _ = writeln!(f, "{entry}");
        }
    } else {
        let _ = fs::write(&gitignore_path, format!("{entry}\n"));
    }
}

/// Load the saved change list for `repo_path`. Snapshots taken for another
/// repository or in an unknown format are ignored.
pub fn load_state(repo_path: &Path) -> Option<ChangeListSnapshot> {
    let contents = fs::read_to_string(state_file(repo_path)).ok()?;
    let snapshot: ChangeListSnapshot = serde_json::from_str(&contents).ok()?;

    if snapshot.version != STATE_VERSION {
        return None;
    }
    let same_repo = snapshot
        .options
        .as_ref()
        .is_some_and(|o| o.repository == repo_path);
    if !same_repo {
        return None;
    }
    tracing::info!(
        saved_at = %snapshot.saved_at,
        entries = snapshot.entries.len(),
        "restoring change list"
    );
    Some(snapshot)
}

pub fn save_state(repo_path: &Path, snapshot: &ChangeListSnapshot) {
    if fs::create_dir_all(state_dir(repo_path)).is_err() {
        return;
    }

    ensure_gitignore(repo_path);

    match serde_json::to_string_pretty(snapshot) {
        Ok(json) => {
            if let Err(e) = fs::write(state_file(repo_path), json) {
                tracing::warn!(error = %e, "failed to save change list");
            } else {
                tracing::info!(entries = snapshot.entries.len(), "saved change list");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode change list"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_diff::DiffResult;
    use crate::git::types::{FileStatus, FromRevision, RevisionRange};
    use crate::uri::ResourceUri;

    fn populated(repo: &Path) -> ChangeList {
        let mut list = ChangeList::new();
        let mut options = DiffOptions::new(repo.to_path_buf());
        options.range = Some(RevisionRange {
            to_revision: Some("main".into()),
            from_revision: Some(FromRevision::Back(2)),
        });
        let req = list.set_options(options);
        list.apply_result(DiffResult {
            generation: req.generation,
            entries: Ok(vec![ChangeEntry {
                uri: ResourceUri::file(&repo.join("b.txt")),
                old_uri: Some(ResourceUri::file(&repo.join("a.txt"))),
                status: FileStatus::Renamed,
            }]),
        });
        list
    }

    #[test]
    fn snapshot_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let list = populated(dir.path());

        save_state(dir.path(), &list.store_state());
        let snapshot = load_state(dir.path()).unwrap();

        let mut restored = ChangeList::new();
        restored.restore_state(snapshot);
        assert_eq!(restored.options(), list.options());
        assert_eq!(restored.entries(), list.entries());
        assert_eq!(restored.selected(), None);

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.lines().any(|l| l == ".revdiff/"));
    }

    #[test]
    fn snapshot_from_other_repository_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let list = populated(other.path());

        save_state(dir.path(), &list.store_state());
        assert!(load_state(dir.path()).is_none());
    }

    #[test]
    fn gitignore_entry_is_added_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "target").unwrap();
        ensure_gitignore(dir.path());
        ensure_gitignore(dir.path());
        let contents = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(contents, "target\n.revdiff/\n");
    }
}
