//! Next/previous change navigation across the change list and, inside an
//! already-open diff, across its hunks.

use anyhow::Result;
use async_trait::async_trait;

use crate::state::ChangeList;
use crate::uri::ResourceUri;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Bring an already-open document to front as is.
    #[default]
    Reveal,
    /// Re-read the document's content before showing it.
    Reload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenOptions {
    pub mode: OpenMode,
}

impl OpenOptions {
    pub fn reveal() -> Self {
        Self {
            mode: OpenMode::Reveal,
        }
    }

    pub fn reload() -> Self {
        Self {
            mode: OpenMode::Reload,
        }
    }
}

/// Host editor area.
#[async_trait(?Send)]
pub trait EditorManager {
    type Widget: Clone;

    /// Already-open editor for `uri`. Lookup misses are not errors.
    async fn get_by_uri(&self, uri: &ResourceUri) -> Option<Self::Widget>;

    async fn open(&self, uri: &ResourceUri, options: OpenOptions) -> Result<Self::Widget>;
}

/// Cursor over the hunks of one open diff.
pub trait DiffNavigator {
    fn can_navigate(&self) -> bool;
    fn has_next(&self) -> bool;
    fn has_previous(&self) -> bool;
    fn next(&mut self);
    fn previous(&mut self);
}

pub trait DiffNavigatorProvider<W> {
    type Navigator: DiffNavigator;

    fn navigator_for(&self, widget: &W) -> Self::Navigator;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to a hunk inside the open diff; the selection is unchanged.
    Hunk,
    /// Selected and opened another entry.
    Entry(usize),
    Stayed,
}

pub struct NavigationController<'a, E, P> {
    changes: &'a mut ChangeList,
    editors: &'a E,
    navigators: &'a P,
}

impl<'a, E, P> NavigationController<'a, E, P>
where
    E: EditorManager,
    P: DiffNavigatorProvider<E::Widget>,
{
    pub fn new(changes: &'a mut ChangeList, editors: &'a E, navigators: &'a P) -> Self {
        Self {
            changes,
            editors,
            navigators,
        }
    }

    pub async fn advance(&mut self, direction: Direction) -> Result<Advance> {
        if let Some(target) = self.changes.selected_target() {
            if let Some(widget) = self.editors.get_by_uri(&target).await {
                let mut navigator = self.navigators.navigator_for(&widget);
                if navigator.can_navigate() {
                    match direction {
                        Direction::Next if navigator.has_next() => {
                            navigator.next();
                            return Ok(Advance::Hunk);
                        }
                        Direction::Previous if navigator.has_previous() => {
                            navigator.previous();
                            return Ok(Advance::Hunk);
                        }
                        _ => {}
                    }
                }
            }
        }

        let Some(index) = self.changes.step(direction) else {
            return Ok(Advance::Stayed);
        };
        self.open_selected(OpenOptions::reveal()).await?;
        Ok(Advance::Entry(index))
    }

    /// Open the selected entry's diff, if anything is selected.
    pub async fn open_selected(&mut self, options: OpenOptions) -> Result<Option<E::Widget>> {
        let Some(target) = self.changes.selected_target() else {
            return Ok(None);
        };
        let widget = self.editors.open(&target, options).await?;
        Ok(Some(widget))
    }

    pub async fn select_and_open(&mut self, index: usize) -> Result<Option<E::Widget>> {
        if !self.changes.select(index) {
            return Ok(None);
        }
        self.open_selected(OpenOptions::reload()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::async_diff::DiffResult;
    use crate::git::types::{ChangeEntry, FileStatus};
    use crate::state::DiffOptions;
    use anyhow::bail;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    #[derive(Clone)]
    struct FakeEditor {
        hunks: usize,
        cursor: Rc<Cell<Option<usize>>>,
    }

    #[derive(Default)]
    struct FakeEditors {
        open: RefCell<HashMap<ResourceUri, FakeEditor>>,
        opened: RefCell<Vec<ResourceUri>>,
        hunks_per_file: usize,
        fail_open: bool,
    }

    #[async_trait(?Send)]
    impl EditorManager for FakeEditors {
        type Widget = FakeEditor;

        async fn get_by_uri(&self, uri: &ResourceUri) -> Option<FakeEditor> {
            self.open.borrow().get(uri).cloned()
        }

        async fn open(&self, uri: &ResourceUri, _options: OpenOptions) -> Result<FakeEditor> {
            if self.fail_open {
                bail!("file not found");
            }
            self.opened.borrow_mut().push(uri.clone());
            let editor = self
                .open
                .borrow_mut()
                .entry(uri.clone())
                .or_insert_with(|| FakeEditor {
                    hunks: self.hunks_per_file,
                    cursor: Rc::new(Cell::new(None)),
                })
                .clone();
            Ok(editor)
        }
    }

    struct FakeNavigator(FakeEditor);

    impl DiffNavigator for FakeNavigator {
        fn can_navigate(&self) -> bool {
            self.0.hunks > 0
        }
        fn has_next(&self) -> bool {
            self.0.cursor.get().map_or(0, |c| c + 1) < self.0.hunks
        }
        fn has_previous(&self) -> bool {
            self.0.cursor.get().is_some_and(|c| c > 0)
        }
        fn next(&mut self) {
            let next = self.0.cursor.get().map_or(0, |c| c + 1);
            self.0.cursor.set(Some(next));
        }
        fn previous(&mut self) {
            let prev = self.0.cursor.get().map_or(0, |c| c.saturating_sub(1));
            self.0.cursor.set(Some(prev));
        }
    }

    struct FakeNavigators;

    impl DiffNavigatorProvider<FakeEditor> for FakeNavigators {
        type Navigator = FakeNavigator;

        fn navigator_for(&self, widget: &FakeEditor) -> FakeNavigator {
            FakeNavigator(widget.clone())
        }
    }

    fn changes(names: &[&str]) -> ChangeList {
        let mut list = ChangeList::new();
        let req = list.set_options(DiffOptions::new(PathBuf::from("/repo")));
        list.apply_result(DiffResult {
            generation: req.generation,
            entries: Ok(names
                .iter()
                .map(|n| ChangeEntry {
                    uri: ResourceUri::file(&Path::new("/repo").join(n)),
                    old_uri: None,
                    status: FileStatus::Modified,
                })
                .collect()),
        });
        list
    }

    #[tokio::test]
    async fn crosses_files_and_opens_each() {
        let mut list = changes(&["a", "b"]);
        let editors = FakeEditors::default();
        let mut nav = NavigationController::new(&mut list, &editors, &FakeNavigators);

        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Entry(0));
        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Entry(1));
        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Entry(0));

        let opened = editors.opened.borrow();
        assert_eq!(opened.len(), 3);
        assert!(opened[1].path().starts_with("b"));
    }

    #[tokio::test]
    async fn previous_without_selection_does_nothing() {
        let mut list = changes(&["a", "b"]);
        let editors = FakeEditors::default();
        let mut nav = NavigationController::new(&mut list, &editors, &FakeNavigators);

        assert_eq!(nav.advance(Direction::Previous).await.unwrap(), Advance::Stayed);
        assert!(editors.opened.borrow().is_empty());
    }

    #[tokio::test]
    async fn walks_hunks_before_leaving_file() {
        let mut list = changes(&["a", "b"]);
        let editors = FakeEditors {
            hunks_per_file: 2,
            ..Default::default()
        };
        let mut nav = NavigationController::new(&mut list, &editors, &FakeNavigators);

        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Entry(0));
        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Hunk);
        assert_eq!(nav.advance(Direction::Next).await.unwrap(), Advance::Hunk);
        assert_eq!(nav.advance(Direction::Previous).await.unwrap(), Advance::Hunk);
        // first hunk has nothing before it: wrap to the last file
        assert_eq!(
            nav.advance(Direction::Previous).await.unwrap(),
            Advance::Entry(1)
        );
        drop(nav);
        assert_eq!(list.selected(), Some(1));
    }

    #[tokio::test]
    async fn open_failure_propagates_after_selection_moves() {
        let mut list = changes(&["a"]);
        let editors = FakeEditors {
            fail_open: true,
            ..Default::default()
        };
        let mut nav = NavigationController::new(&mut list, &editors, &FakeNavigators);

        assert!(nav.advance(Direction::Next).await.is_err());
        drop(nav);
        assert_eq!(list.selected(), Some(0));
    }

    #[tokio::test]
    async fn select_and_open_ignores_bad_index() {
        let mut list = changes(&["a", "b"]);
        let editors = FakeEditors::default();
        let mut nav = NavigationController::new(&mut list, &editors, &FakeNavigators);

        assert!(nav.select_and_open(9).await.unwrap().is_none());
        assert!(nav.select_and_open(1).await.unwrap().is_some());
        assert_eq!(editors.opened.borrow().len(), 1);
    }
}
