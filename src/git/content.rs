use anyhow::{bail, Result};
use std::io::ErrorKind;
use std::path::Path;

use super::repository::RepoCache;
use crate::uri::{ResourceUri, FILE_SCHEME, GIT_REVISION_SCHEME};

pub const BINARY_PLACEHOLDER: &str = "<binary file>";

/// Text of a `file:` or `gitrev:` resource.
///
/// A path that does not exist on the requested side reads as empty text, so
/// diffs of added and deleted files still render.
pub fn read_resource(cache: &RepoCache, uri: &ResourceUri) -> Result<String> {
    match uri.scheme() {
        FILE_SCHEME => read_working_tree(&uri.fs_path()),
        GIT_REVISION_SCHEME => {
            let revision = uri.query().unwrap_or(crate::resolver::HEAD);
            read_at_revision(cache, &uri.fs_path(), revision)
        }
        other => bail!("Cannot read {other}: resources"),
    }
}

fn read_working_tree(path: &Path) -> Result<String> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(decode(&bytes, bytes.contains(&0))),
        Err(e) if e.kind() == ErrorKind::NotFound => missing(path),
        Err(e) => Err(e.into()),
    }
}

fn read_at_revision(cache: &RepoCache, path: &Path, revision: &str) -> Result<String> {
    let Some(tree) = cache.tree_at(revision) else {
        return Ok(String::new());
    };
    let rel = cache.relative(path)?;
    let entry = match tree.get_path(rel) {
        Ok(entry) => entry,
        Err(_) => return missing(path),
    };
    let blob = entry.to_object(cache.repo())?.peel_to_blob()?;
    Ok(decode(blob.content(), blob.is_binary()))
}

/// An absent path reads as empty text, unless its name went through a lossy
/// UTF-8 conversion; then the real file is unreachable and that is an error.
fn missing(path: &Path) -> Result<String> {
    if path.to_string_lossy().contains(char::REPLACEMENT_CHARACTER) {
        bail!("Cannot read {}: file name is not valid UTF-8", path.display());
    }
    Ok(String::new())
}

fn decode(bytes: &[u8], binary: bool) -> String {
    if binary {
        BINARY_PLACEHOLDER.to_string()
    } else {
        String::from_utf8_lossy(bytes).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::diff::test_repo::*;

    #[test]
    fn reads_both_historical_and_live_content() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path());
        write(dir.path(), "a.txt", "v1\n");
        commit_all(&repo, "first");
        write(dir.path(), "a.txt", "v2\n");
        commit_all(&repo, "second");
        write(dir.path(), "a.txt", "v3\n");

        let cache = RepoCache::open(dir.path()).unwrap();
        let live = ResourceUri::file(&cache.workdir().join("a.txt"));
        let old = live.with_scheme(GIT_REVISION_SCHEME).with_query("HEAD~1");
        let head = live.with_scheme(GIT_REVISION_SCHEME).with_query("HEAD");

        assert_eq!(read_resource(&cache, &live).unwrap(), "v3\n");
        assert_eq!(read_resource(&cache, &head).unwrap(), "v2\n");
        assert_eq!(read_resource(&cache, &old).unwrap(), "v1\n");
    }

    #[test]
    fn missing_sides_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path());
        write(dir.path(), "a.txt", "v1\n");
        commit_all(&repo, "first");

        let cache = RepoCache::open(dir.path()).unwrap();
        let absent = ResourceUri::file(&cache.workdir().join("nope.txt"));
        assert_eq!(read_resource(&cache, &absent).unwrap(), "");

        let before_root = ResourceUri::file(&cache.workdir().join("a.txt"))
            .with_scheme(GIT_REVISION_SCHEME)
            .with_query("HEAD~1");
        assert_eq!(read_resource(&cache, &before_root).unwrap(), "");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_errors_not_empty_files() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let repo = init(dir.path());
        write(dir.path(), "a.txt", "v1\n");
        commit_all(&repo, "first");

        let cache = RepoCache::open(dir.path()).unwrap();
        let raw = cache.workdir().join(OsStr::from_bytes(b"bad\xff.txt"));
        std::fs::write(&raw, "content\n").unwrap();

        let live = ResourceUri::file(&raw);
        let err = read_resource(&cache, &live).unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));

        let at_head = live.with_scheme(GIT_REVISION_SCHEME).with_query("HEAD");
        assert!(read_resource(&cache, &at_head).is_err());
    }
}
