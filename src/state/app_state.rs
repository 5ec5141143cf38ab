use std::path::PathBuf;

use super::ChangeList;
use crate::editor::Workbench;
use crate::labels::LabelProvider;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    ChangeList,
    Editor,
}

pub struct AppState {
    pub focus: FocusPanel,
    pub changes: ChangeList,
    pub workbench: Workbench,
    pub labels: LabelProvider,
    pub theme: Theme,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
    /// Rows visible in the editor pane, updated every frame.
    pub editor_height: usize,
}

impl AppState {
    pub fn new(repo_path: PathBuf, labels: LabelProvider, theme: Theme) -> Self {
        Self {
            focus: FocusPanel::ChangeList,
            changes: ChangeList::new(),
            workbench: Workbench::new(repo_path),
            labels,
            theme,
            should_quit: false,
            status_message: None,
            editor_height: 20,
        }
    }
}
