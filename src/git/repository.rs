use anyhow::{Context, Result};
use git2::{Repository, Tree};
use std::path::{Path, PathBuf};

/// An opened repository together with its work tree root.
pub struct RepoCache {
    repo: Repository,
    workdir: PathBuf,
}

impl RepoCache {
    pub fn open(path: &Path) -> Result<Self> {
        let repo =
            Repository::discover(path).context("Not a git repository (or any parent directory)")?;
        let workdir = repo
            .workdir()
            .context("Bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, workdir })
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Path of `path` relative to the work tree. Relative inputs pass through.
    pub fn relative<'p>(&self, path: &'p Path) -> Result<&'p Path> {
        if path.is_relative() {
            return Ok(path);
        }
        path.strip_prefix(&self.workdir)
            .with_context(|| format!("{} is outside the work tree", path.display()))
    }

    /// Tree of a revision expression, or `None` when it does not resolve.
    pub fn tree_at(&self, revision: &str) -> Option<Tree<'_>> {
        match self
            .repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_tree())
        {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::debug!(revision, error = %e, "revision does not resolve");
                None
            }
        }
    }
}
