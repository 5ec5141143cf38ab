//! Maps a changed file and the active revision range onto the resources the
//! editor has to load to show it.

use crate::git::types::{ChangeEntry, FileStatus, FromRevision, RevisionRange};
use crate::uri::{DiffUris, ResourceUri, GIT_REVISION_SCHEME};

pub const HEAD: &str = "HEAD";

/// Revision expression of the comparison base.
pub fn base_revision(range: Option<&RevisionRange>) -> String {
    let to = range
        .and_then(|r| r.to_revision.as_deref())
        .unwrap_or(HEAD);
    match range.and_then(|r| r.from_revision.as_ref()) {
        Some(FromRevision::Id(id)) => id.clone(),
        Some(FromRevision::Back(n)) => format!("{to}~{n}"),
        None => format!("{to}~1"),
    }
}

pub fn from_uri(entry: &ChangeEntry, range: Option<&RevisionRange>) -> ResourceUri {
    entry
        .old_uri
        .as_ref()
        .unwrap_or(&entry.uri)
        .with_scheme(GIT_REVISION_SCHEME)
        .with_query(base_revision(range))
}

pub fn to_uri(entry: &ChangeEntry, range: Option<&RevisionRange>) -> ResourceUri {
    match range.and_then(|r| r.to_revision.as_deref()) {
        Some(rev) => entry.uri.with_scheme(GIT_REVISION_SCHEME).with_query(rev),
        None => entry.uri.clone(),
    }
}

/// The resource to open for `entry`: the surviving side for additions and
/// deletions, a combined diff otherwise.
pub fn resolve(entry: &ChangeEntry, range: Option<&RevisionRange>) -> ResourceUri {
    let from = from_uri(entry, range);
    if entry.status == FileStatus::Deleted {
        return from;
    }
    let to = to_uri(entry, range);
    if entry.status.is_addition() {
        return to;
    }
    let label = diff_label(&from, &to, range);
    DiffUris::encode(&from, &to, &label)
}

/// Short description of a range, e.g. `HEAD~1 ⟷ Working Tree`.
pub fn range_label(range: Option<&RevisionRange>) -> String {
    let to = range
        .and_then(|r| r.to_revision.as_deref())
        .unwrap_or("Working Tree");
    format!("{} \u{27f7} {}", base_revision(range), to)
}

fn diff_label(from: &ResourceUri, to: &ResourceUri, range: Option<&RevisionRange>) -> String {
    let name = if from.file_name() == to.file_name() {
        to.file_name().to_string()
    } else {
        format!("{} \u{2192} {}", from.file_name(), to.file_name())
    };
    format!("{name} ({})", range_label(range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::{DiffUris, FILE_SCHEME};
    use std::path::Path;

    fn entry(path: &str, status: FileStatus) -> ChangeEntry {
        ChangeEntry {
            uri: ResourceUri::file(Path::new(path)),
            old_uri: None,
            status,
        }
    }

    fn range(to: Option<&str>, from: Option<FromRevision>) -> RevisionRange {
        RevisionRange {
            to_revision: to.map(str::to_string),
            from_revision: from,
        }
    }

    #[test]
    fn default_base_is_parent_of_target() {
        let r = range(Some("abc123"), None);
        let from = from_uri(&entry("/r/a.txt", FileStatus::Modified), Some(&r));
        assert_eq!(from.query(), Some("abc123~1"));
        assert_eq!(from.scheme(), GIT_REVISION_SCHEME);
    }

    #[test]
    fn numeric_base_counts_back_from_head() {
        let r = range(None, Some(FromRevision::Back(3)));
        let from = from_uri(&entry("/r/a.txt", FileStatus::Modified), Some(&r));
        assert_eq!(from.query(), Some("HEAD~3"));
    }

    #[test]
    fn explicit_base_is_used_verbatim() {
        let r = range(Some("main"), Some(FromRevision::Id("v1.0".into())));
        assert_eq!(base_revision(Some(&r)), "v1.0");
    }

    #[test]
    fn missing_range_diffs_head_parent_against_working_tree() {
        assert_eq!(base_revision(None), "HEAD~1");
        let to = to_uri(&entry("/r/a.txt", FileStatus::Modified), None);
        assert_eq!(to.scheme(), FILE_SCHEME);
        assert_eq!(to.query(), None);
    }

    #[test]
    fn target_revision_tags_to_side() {
        let r = range(Some("abc123"), None);
        let to = to_uri(&entry("/r/a.txt", FileStatus::Modified), Some(&r));
        assert_eq!(to.scheme(), GIT_REVISION_SCHEME);
        assert_eq!(to.query(), Some("abc123"));
    }

    #[test]
    fn rename_diffs_old_path_against_new_path() {
        let mut e = entry("/r/b.txt", FileStatus::Renamed);
        e.old_uri = Some(ResourceUri::file(Path::new("/r/a.txt")));

        let resolved = resolve(&e, None);
        let (from, to) = DiffUris::decode(&resolved).unwrap();
        assert_eq!(from.path(), "/r/a.txt");
        assert_eq!(to.path(), "/r/b.txt");
    }

    #[test]
    fn added_file_opens_target_only() {
        let r = range(Some("abc123"), None);
        let e = entry("/r/new.txt", FileStatus::Added);
        assert_eq!(resolve(&e, Some(&r)), to_uri(&e, Some(&r)));

        let untracked = entry("/r/scratch.txt", FileStatus::Untracked);
        assert_eq!(resolve(&untracked, None), untracked.uri);
    }

    #[test]
    fn deleted_file_opens_base_only() {
        let r = range(Some("abc123"), None);
        let e = entry("/r/gone.txt", FileStatus::Deleted);
        let resolved = resolve(&e, Some(&r));
        assert_eq!(resolved, from_uri(&e, Some(&r)));
        assert!(!DiffUris::is_diff(&resolved));
    }

    #[test]
    fn modified_file_opens_both_sides() {
        let r = range(Some("abc123"), None);
        let e = entry("/r/a.txt", FileStatus::Modified);
        let resolved = resolve(&e, Some(&r));
        let (from, to) = DiffUris::decode(&resolved).unwrap();
        assert_eq!(from, from_uri(&e, Some(&r)));
        assert_eq!(to, to_uri(&e, Some(&r)));
        assert!(resolved.path().starts_with("a.txt"));
    }
}
