use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::async_diff::{DiffRequest, DiffResult};
use crate::git::types::{ChangeEntry, RevisionRange};
use crate::navigation::Direction;
use crate::resolver;
use crate::uri::ResourceUri;

/// What the change list is showing: which repository, which part of it, and
/// which revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    pub repository: PathBuf,
    #[serde(default)]
    pub scope: Option<ResourceUri>,
    #[serde(default)]
    pub range: Option<RevisionRange>,
}

impl DiffOptions {
    pub fn new(repository: PathBuf) -> Self {
        Self {
            repository,
            scope: None,
            range: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Result of a superseded request; nothing changed.
    Stale,
    Loaded(usize),
    Failed(String),
}

/// Ordered changed files for the active options plus the selection over them.
#[derive(Debug, Default)]
pub struct ChangeList {
    options: Option<DiffOptions>,
    entries: Vec<ChangeEntry>,
    selected: Option<usize>,
    generation: u64,
    pub loading: bool,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(&self) -> Option<&DiffOptions> {
        self.options.as_ref()
    }

    pub fn range(&self) -> Option<&RevisionRange> {
        self.options.as_ref().and_then(|o| o.range.as_ref())
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&ChangeEntry> {
        self.selected.and_then(|i| self.entries.get(i))
    }

    /// Resource the editor opens for the selected entry.
    pub fn selected_target(&self) -> Option<ResourceUri> {
        self.selected_entry()
            .map(|entry| resolver::resolve(entry, self.range()))
    }

    /// True when some entry opens as `uri` under the current range.
    pub fn contains_target(&self, uri: &ResourceUri) -> bool {
        self.entries
            .iter()
            .any(|entry| resolver::resolve(entry, self.range()) == *uri)
    }

    /// Replace the active options. The old list is dropped immediately and
    /// exactly one refetch is issued.
    pub fn set_options(&mut self, options: DiffOptions) -> DiffRequest {
        self.entries.clear();
        self.selected = None;
        self.generation += 1;
        self.loading = true;
        let request = DiffRequest {
            generation: self.generation,
            options: options.clone(),
        };
        self.options = Some(options);
        request
    }

    /// Refetch for the active options, if any.
    pub fn refresh(&mut self) -> Option<DiffRequest> {
        let options = self.options.clone()?;
        self.generation += 1;
        self.loading = true;
        Some(DiffRequest {
            generation: self.generation,
            options,
        })
    }

    pub fn on_repository_changed(&mut self) -> Option<DiffRequest> {
        self.refresh()
    }

    pub fn on_labels_changed(&mut self) -> Option<DiffRequest> {
        self.refresh()
    }

    /// Install a worker result. The selection follows the previously selected
    /// file if it is still in the new list.
    pub fn apply_result(&mut self, result: DiffResult) -> ApplyOutcome {
        if result.generation < self.generation {
            tracing::debug!(
                stale = result.generation,
                current = self.generation,
                "dropping stale change list"
            );
            return ApplyOutcome::Stale;
        }
        self.loading = false;
        match result.entries {
            Ok(entries) => {
                let previous = self.selected_entry().map(|e| e.uri.clone());
                self.entries = entries;
                self.selected = previous
                    .and_then(|uri| self.entries.iter().position(|e| e.uri == uri));
                ApplyOutcome::Loaded(self.entries.len())
            }
            Err(e) => {
                self.entries.clear();
                self.selected = None;
                ApplyOutcome::Failed(e)
            }
        }
    }

    /// Select `index` directly. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Move without wrapping, as list cursor keys do.
    pub fn select_up(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        } else if !self.entries.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_down(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(last)));
    }

    /// Step with wraparound; returns the new index when the selection moved.
    pub fn step(&mut self, direction: Direction) -> Option<usize> {
        let next = step_index(self.selected, self.entries.len(), direction)?;
        self.selected = Some(next);
        Some(next)
    }

    pub(crate) fn restore(&mut self, options: Option<DiffOptions>, entries: Vec<ChangeEntry>) {
        self.options = options;
        self.entries = entries;
        self.selected = None;
        self.loading = false;
    }
}

/// Wraparound stepping over a list of `len` entries.
///
/// `Next` from nothing seeds the first entry; `Previous` from nothing stays put.
pub fn step_index(current: Option<usize>, len: usize, direction: Direction) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match (direction, current) {
        (Direction::Next, None) => Some(0),
        (Direction::Next, Some(i)) if i + 1 >= len => Some(0),
        (Direction::Next, Some(i)) => Some(i + 1),
        (Direction::Previous, None) => None,
        (Direction::Previous, Some(0)) => Some(len - 1),
        (Direction::Previous, Some(i)) => Some((i - 1).min(len - 1)),
    }
}
