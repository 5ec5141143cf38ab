use anyhow::{Context, Result};
use git2::{Delta, Diff, DiffFindOptions, DiffOptions as GitDiffOptions};
use std::path::Path;

use super::repository::RepoCache;
use super::types::{ChangeEntry, FileStatus, RevisionRange};
use crate::resolver;
use crate::uri::ResourceUri;

/// Parameters of one change-list query.
#[derive(Debug, Clone, Default)]
pub struct DiffQuery {
    pub range: Option<RevisionRange>,
    /// Restrict the diff to this file or directory.
    pub scope: Option<ResourceUri>,
}

/// Source of change lists for a repository.
pub trait VcsClient: Send + Sync {
    fn diff(&self, repository: &Path, query: &DiffQuery) -> Result<Vec<ChangeEntry>>;
}

/// `VcsClient` backed by libgit2.
pub struct GitClient;

impl VcsClient for GitClient {
    fn diff(&self, repository: &Path, query: &DiffQuery) -> Result<Vec<ChangeEntry>> {
        let cache = RepoCache::open(repository)?;
        let repo = cache.repo();

        let mut opts = GitDiffOptions::new();
        opts.include_untracked(true);
        opts.recurse_untracked_dirs(true);
        if let Some(ref scope) = query.scope {
            let scope_path = scope.fs_path();
            let rel = cache.relative(&scope_path)?;
            if !rel.as_os_str().is_empty() {
                opts.pathspec(rel);
            }
        }

        // An unresolvable base (e.g. HEAD~1 on the first commit) diffs against nothing
        let base = resolver::base_revision(query.range.as_ref());
        let base_tree = cache.tree_at(&base);

        let mut diff = match query.range.as_ref().and_then(|r| r.to_revision.as_deref()) {
            Some(to) => {
                let to_tree = repo
                    .revparse_single(to)
                    .and_then(|obj| obj.peel_to_tree())
                    .with_context(|| format!("Could not resolve: {to}"))?;
                repo.diff_tree_to_tree(base_tree.as_ref(), Some(&to_tree), Some(&mut opts))?
            }
            None => repo.diff_tree_to_workdir_with_index(base_tree.as_ref(), Some(&mut opts))?,
        };

        let mut find = DiffFindOptions::new();
        find.renames(true);
        find.copies(true);
        find.for_untracked(true);
        diff.find_similar(Some(&mut find))?;

        Ok(Self::collect_entries(&diff, cache.workdir()))
    }
}

impl GitClient {
    fn collect_entries(diff: &Diff<'_>, workdir: &Path) -> Vec<ChangeEntry> {
        diff.deltas()
            .filter_map(|delta| {
                let status = match delta.status() {
                    Delta::Added => FileStatus::Added,
                    Delta::Deleted => FileStatus::Deleted,
                    Delta::Modified | Delta::Typechange | Delta::Conflicted => {
                        FileStatus::Modified
                    }
                    Delta::Renamed => FileStatus::Renamed,
                    Delta::Copied => FileStatus::Copied,
                    Delta::Untracked => FileStatus::Untracked,
                    _ => return None,
                };

                let path = delta.new_file().path().or_else(|| delta.old_file().path())?;
                let old_uri = match status {
                    FileStatus::Renamed | FileStatus::Copied => delta
                        .old_file()
                        .path()
                        .map(|p| ResourceUri::file(&workdir.join(p))),
                    _ => None,
                };

                Some(ChangeEntry {
                    uri: ResourceUri::file(&workdir.join(path)),
                    old_uri,
                    status,
                })
            })
            .collect()
    }
}
