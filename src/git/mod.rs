pub mod content;
pub mod diff;
pub mod hunks;
pub mod repository;
pub mod types;

pub use diff::{DiffQuery, GitClient, VcsClient};
pub use repository::RepoCache;
