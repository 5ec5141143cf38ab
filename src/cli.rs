use clap::Parser;
use std::path::PathBuf;

use crate::git::types::{FromRevision, RevisionRange};

#[derive(Parser, Debug)]
#[command(
    name = "revdiff",
    version,
    about = "Browse the files changed in a git revision range"
)]
pub struct Cli {
    /// Revision to compare to (default: the working tree)
    pub to: Option<String>,

    /// Base revision to compare from
    #[arg(long, conflicts_with = "back")]
    pub from: Option<String>,

    /// Compare from N commits before the target revision
    #[arg(short = 'n', long, value_name = "N")]
    pub back: Option<u32>,

    /// Only list changes under this path
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Don't refresh on repository changes
    #[arg(long)]
    pub no_watch: bool,

    /// Ignore the saved change list
    #[arg(long)]
    pub fresh: bool,

    /// Color theme (one-dark, github-dark, dracula)
    #[arg(long)]
    pub theme: Option<String>,

    /// Log file or directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Range given on the command line, if any part of one was.
    pub fn range(&self) -> Option<RevisionRange> {
        let from_revision = match (&self.from, self.back) {
            (Some(rev), _) => Some(FromRevision::Id(rev.clone())),
            (None, Some(n)) => Some(FromRevision::Back(n)),
            (None, None) => None,
        };
        if self.to.is_none() && from_revision.is_none() {
            return None;
        }
        Some(RevisionRange {
            to_revision: self.to.clone(),
            from_revision,
        })
    }

    /// True when the invocation names what to diff, so a saved list must not
    /// replace it.
    pub fn is_explicit(&self) -> bool {
        self.range().is_some() || self.path.is_some()
    }
}
