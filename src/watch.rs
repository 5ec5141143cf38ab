use anyhow::Result;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// Work tree, index, or refs changed.
    RepositoryChanged,
    /// Display labels changed.
    LabelsChanged,
}

/// Debounced watcher over a repository's work tree.
pub struct RepoWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl RepoWatcher {
    pub fn new(root: &Path, debounce_ms: u64, tx: mpsc::Sender<WatchEvent>) -> Result<Self> {
        let mut debouncer = new_debouncer(
            Duration::from_millis(debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    let relevant = events
                        .iter()
                        .filter(|e| e.kind == DebouncedEventKind::Any)
                        .any(|e| is_relevant(&e.path));
                    if relevant {
                        let _ = tx.send(WatchEvent::RepositoryChanged);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "repository watcher error"),
            },
        )?;

        debouncer.watcher().watch(root, RecursiveMode::Recursive)?;
        tracing::debug!(root = %root.display(), "watching repository");

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}

/// Inside `.git/` only the index, HEAD and refs affect change lists. Our own
/// state directory never does.
fn is_relevant(path: &Path) -> bool {
    let mut components = path.components().map(|c| c.as_os_str());
    while let Some(component) = components.next() {
        if component == ".revdiff" {
            return false;
        }
        if component == ".git" {
            return matches!(
                components.next().and_then(|c| c.to_str()),
                Some("index" | "HEAD" | "refs" | "packed-refs")
            );
        }
    }
    true
}
