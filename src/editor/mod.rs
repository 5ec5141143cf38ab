pub mod document;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::cell::{Ref, RefCell, RefMut};
use std::path::PathBuf;
use std::rc::Rc;

use crate::git::content::read_resource;
use crate::git::RepoCache;
use crate::navigation::{
    DiffNavigator, DiffNavigatorProvider, EditorManager, OpenMode, OpenOptions,
};
use crate::uri::{DiffUris, ResourceUri};

pub use document::Document;

/// Handle to a document open in the workbench.
#[derive(Debug, Clone)]
pub struct EditorWidget {
    document: Rc<RefCell<Document>>,
}

impl EditorWidget {
    pub fn document(&self) -> Ref<'_, Document> {
        self.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.document.borrow_mut()
    }
}

/// In-process editor area: the open documents and which one is in front.
pub struct Workbench {
    repo_path: PathBuf,
    editors: RefCell<Vec<EditorWidget>>,
    active: RefCell<Option<EditorWidget>>,
}

impl Workbench {
    pub fn new(repo_path: PathBuf) -> Self {
        Self {
            repo_path,
            editors: RefCell::new(Vec::new()),
            active: RefCell::new(None),
        }
    }

    pub fn active(&self) -> Option<EditorWidget> {
        self.active.borrow().clone()
    }

    pub fn open_count(&self) -> usize {
        self.editors.borrow().len()
    }

    pub fn close_all(&self) {
        self.editors.borrow_mut().clear();
        *self.active.borrow_mut() = None;
    }

    /// Drop every document except the one in front; their content may be stale.
    pub fn close_inactive(&self) {
        let active = self.active();
        self.editors.borrow_mut().retain(|w| {
            active
                .as_ref()
                .is_some_and(|a| Rc::ptr_eq(&a.document, &w.document))
        });
    }

    /// Close every document whose resource `keep` rejects.
    pub fn retain(&self, keep: impl Fn(&ResourceUri) -> bool) {
        self.editors
            .borrow_mut()
            .retain(|w| keep(&w.document.borrow().uri));
        let active_gone = self
            .active
            .borrow()
            .as_ref()
            .is_some_and(|a| !keep(&a.document.borrow().uri));
        if active_gone {
            *self.active.borrow_mut() = None;
        }
    }

    /// Re-read the front document; the repository changed under it.
    pub async fn reload_active(&self) -> Result<()> {
        let Some(widget) = self.active() else {
            return Ok(());
        };
        let uri = widget.document().uri.clone();
        self.open(&uri, OpenOptions::reload()).await?;
        Ok(())
    }

    fn find(&self, uri: &ResourceUri) -> Option<EditorWidget> {
        self.editors
            .borrow()
            .iter()
            .find(|w| w.document.borrow().uri == *uri)
            .cloned()
    }

    fn activate(&self, widget: &EditorWidget) {
        *self.active.borrow_mut() = Some(widget.clone());
    }

    async fn load(&self, uri: &ResourceUri) -> Result<Document> {
        let repo_path = self.repo_path.clone();
        let target = uri.clone();
        tokio::task::spawn_blocking(move || load_document(&repo_path, target))
            .await
            .context("Document loader panicked")?
    }
}

#[async_trait(?Send)]
impl EditorManager for Workbench {
    type Widget = EditorWidget;

    async fn get_by_uri(&self, uri: &ResourceUri) -> Option<EditorWidget> {
        self.find(uri)
    }

    async fn open(&self, uri: &ResourceUri, options: OpenOptions) -> Result<EditorWidget> {
        if let Some(widget) = self.find(uri) {
            if options.mode == OpenMode::Reload {
                let fresh = self.load(uri).await?;
                widget.document_mut().replace_content(fresh);
            }
            self.activate(&widget);
            return Ok(widget);
        }

        let document = self
            .load(uri)
            .await
            .with_context(|| format!("Failed to open {uri}"))?;
        let widget = EditorWidget {
            document: Rc::new(RefCell::new(document)),
        };
        self.editors.borrow_mut().push(widget.clone());
        self.activate(&widget);
        Ok(widget)
    }
}

fn load_document(repo_path: &std::path::Path, uri: ResourceUri) -> Result<Document> {
    let cache = RepoCache::open(repo_path)?;
    if DiffUris::is_diff(&uri) {
        let (from, to) = DiffUris::decode(&uri)?;
        let old = read_resource(&cache, &from)?;
        let new = read_resource(&cache, &to)?;
        let title = uri.path().to_string();
        return Ok(Document::diff(uri, title, &old, &new));
    }
    let content = read_resource(&cache, &uri)?;
    let title = match uri.query() {
        Some(rev) => format!("{} ({rev})", uri.file_name()),
        None => uri.file_name().to_string(),
    };
    Ok(Document::single(uri, title, &content))
}

/// Hunk cursor over a workbench document.
pub struct DocumentNavigator {
    widget: EditorWidget,
}

impl DiffNavigator for DocumentNavigator {
    fn can_navigate(&self) -> bool {
        let doc = self.widget.document();
        doc.is_diff() && doc.hunk_count() > 0
    }

    fn has_next(&self) -> bool {
        self.widget.document().has_next_hunk()
    }

    fn has_previous(&self) -> bool {
        self.widget.document().has_previous_hunk()
    }

    fn next(&mut self) {
        self.widget.document_mut().next_hunk();
    }

    fn previous(&mut self) {
        self.widget.document_mut().previous_hunk();
    }
}

pub struct DocumentNavigators;

impl DiffNavigatorProvider<EditorWidget> for DocumentNavigators {
    type Navigator = DocumentNavigator;

    fn navigator_for(&self, widget: &EditorWidget) -> DocumentNavigator {
        DocumentNavigator {
            widget: widget.clone(),
        }
    }
}
