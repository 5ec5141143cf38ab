use anyhow::Result;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use crate::action::Action;
use crate::async_diff::DiffWorker;
use crate::components::change_list::ChangeListView;
use crate::components::editor_pane::EditorPane;
use crate::components::status_bar::StatusBar;
use crate::components::Component;
use crate::config::RevdiffConfig;
use crate::editor::DocumentNavigators;
use crate::event::{map_key_to_action, Event, EventReader};
use crate::git::GitClient;
use crate::labels::LabelProvider;
use crate::navigation::{Advance, Direction, EditorManager, NavigationController, OpenOptions};
use crate::session::{self, ChangeListSnapshot, StatefulWidget};
use crate::state::app_state::FocusPanel;
use crate::state::{AppState, ApplyOutcome, DiffOptions};
use crate::tui::Tui;
use crate::watch::{RepoWatcher, WatchEvent};

/// Ticks a status message stays up (50ms per tick).
const STATUS_TICKS: u32 = 60;

pub struct App {
    state: AppState,
    worker: DiffWorker,
    navigators: DocumentNavigators,
    watch_tx: mpsc::Sender<WatchEvent>,
    watch_rx: mpsc::Receiver<WatchEvent>,
    _watcher: Option<RepoWatcher>,
    status_clear_countdown: u32,
    repo_path: PathBuf,
}

impl App {
    pub fn new(repo_path: PathBuf, config: &RevdiffConfig) -> Self {
        let labels = LabelProvider::new(repo_path.clone(), config.label_mode);
        let state = AppState::new(repo_path.clone(), labels, config.theme.clone());
        let worker = DiffWorker::new(Arc::new(GitClient));

        let (watch_tx, watch_rx) = mpsc::channel();
        let watcher = if config.watch {
            match RepoWatcher::new(&repo_path, config.debounce_ms, watch_tx.clone()) {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!(error = %e, "live refresh disabled");
                    None
                }
            }
        } else {
            None
        };

        Self {
            state,
            worker,
            navigators: DocumentNavigators,
            watch_tx,
            watch_rx,
            _watcher: watcher,
            status_clear_countdown: 0,
            repo_path,
        }
    }

    /// Make `options` the active options and fetch their change list.
    pub fn set_options(&mut self, options: DiffOptions) {
        self.state.workbench.close_all();
        let request = self.state.changes.set_options(options);
        self.worker.request(request);
    }

    /// Show a saved change list right away, then refetch it.
    pub fn restore(&mut self, snapshot: ChangeListSnapshot) {
        self.state.changes.restore_state(snapshot);
        if let Some(request) = self.state.changes.refresh() {
            self.worker.request(request);
        }
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventReader::new(Duration::from_millis(50));

        let change_list = ChangeListView;
        let editor_pane = EditorPane;
        let status_bar = StatusBar;

        loop {
            self.poll_diff_results();
            self.poll_watch_events().await;

            let term_size = terminal.size()?;
            // status bar + borders
            self.state.editor_height = term_size.height.saturating_sub(3) as usize;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(LayoutDirection::Vertical)
                    .constraints([Constraint::Min(3), Constraint::Length(1)])
                    .split(frame.area());
                let main = Layout::default()
                    .direction(LayoutDirection::Horizontal)
                    .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
                    .split(outer[0]);

                change_list.render(frame, main[0], &self.state);
                editor_pane.render(frame, main[1], &self.state);
                status_bar.render(frame, outer[1], &self.state);
            })?;

            // Wait for at least one event, then drain the rest so key
            // repeats don't lag behind rendering.
            let mut pending = Vec::new();
            if let Some(ev) = events.next().await {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            for event in pending {
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, self.state.focus),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                if let Some(action) = action {
                    self.update(action).await;
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        if self.state.changes.options().is_some() {
            session::save_state(&self.repo_path, &self.state.changes.store_state());
        }

        Ok(())
    }

    fn poll_diff_results(&mut self) {
        while let Some(result) = self.worker.try_recv() {
            match self.state.changes.apply_result(result) {
                ApplyOutcome::Stale => {}
                ApplyOutcome::Loaded(count) => {
                    tracing::debug!(count, "change list loaded");
                    let changes = &self.state.changes;
                    self.state
                        .workbench
                        .retain(|uri| changes.contains_target(uri));
                }
                ApplyOutcome::Failed(e) => {
                    self.state.workbench.close_all();
                    self.set_status(format!("Diff failed: {e}"), true);
                }
            }
        }
    }

    /// Any burst of watcher events turns into at most one refetch.
    async fn poll_watch_events(&mut self) {
        let mut repository_changed = false;
        let mut labels_changed = false;
        while let Ok(event) = self.watch_rx.try_recv() {
            match event {
                WatchEvent::RepositoryChanged => repository_changed = true,
                WatchEvent::LabelsChanged => labels_changed = true,
            }
        }

        if repository_changed {
            self.refresh_repository().await;
        } else if labels_changed {
            if let Some(request) = self.state.changes.on_labels_changed() {
                self.worker.request(request);
            }
        }
    }

    /// Refetch the list and re-read the document in front. Entries that
    /// disappear get their document closed once the new list arrives.
    async fn refresh_repository(&mut self) {
        let Some(request) = self.state.changes.on_repository_changed() else {
            return;
        };
        self.worker.request(request);
        self.state.workbench.close_inactive();
        if let Err(e) = self.state.workbench.reload_active().await {
            tracing::warn!(error = %e, "failed to reload open change");
        }
    }

    async fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.state.should_quit = true;
            }
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }
            Action::Resize => {}
            Action::NextChange => self.navigate(Direction::Next).await,
            Action::PreviousChange => self.navigate(Direction::Previous).await,
            Action::ListUp => self.state.changes.select_up(),
            Action::ListDown => self.state.changes.select_down(),
            Action::ListTop => self.jump_to(0).await,
            Action::ListBottom => {
                let last = self.state.changes.len().saturating_sub(1);
                self.jump_to(last).await;
            }
            Action::OpenSelected => {
                self.open_selected().await;
            }
            Action::ScrollUp => self.scroll_editor(-1),
            Action::ScrollDown => self.scroll_editor(1),
            Action::ScrollPageUp => self.scroll_editor(-(self.state.editor_height as isize)),
            Action::ScrollPageDown => self.scroll_editor(self.state.editor_height as isize),
            Action::FocusList => {
                self.state.focus = FocusPanel::ChangeList;
            }
            Action::FocusEditor => {
                if self.state.workbench.active().is_some() {
                    self.state.focus = FocusPanel::Editor;
                }
            }
            Action::Refresh => self.refresh_repository().await,
            Action::ToggleLabels => {
                self.state.labels.toggle();
                let _ = self.watch_tx.send(WatchEvent::LabelsChanged);
            }
        }
    }

    async fn navigate(&mut self, direction: Direction) {
        let state = &mut self.state;
        let mut nav =
            NavigationController::new(&mut state.changes, &state.workbench, &self.navigators);
        match nav.advance(direction).await {
            Ok(Advance::Stayed) if state.changes.is_empty() => {
                self.set_status("No changes".to_string(), false);
            }
            Ok(Advance::Hunk) => {
                // The moved diff may be open behind another document.
                if let Some(target) = state.changes.selected_target() {
                    if let Err(e) = state.workbench.open(&target, OpenOptions::reveal()).await {
                        tracing::warn!(error = %e, "failed to reveal change");
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to open change");
                self.set_status(format!("Open failed: {e:#}"), true);
            }
        }
    }

    async fn open_selected(&mut self) {
        let state = &mut self.state;
        let mut nav =
            NavigationController::new(&mut state.changes, &state.workbench, &self.navigators);
        match nav.open_selected(OpenOptions::reload()).await {
            Ok(Some(_)) => self.state.focus = FocusPanel::Editor,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to open change");
                self.set_status(format!("Open failed: {e:#}"), true);
            }
        }
    }

    /// From the list this only moves the selection; from the editor it also
    /// opens the entry.
    async fn jump_to(&mut self, index: usize) {
        if self.state.focus == FocusPanel::ChangeList {
            self.state.changes.select(index);
            return;
        }
        let state = &mut self.state;
        let mut nav =
            NavigationController::new(&mut state.changes, &state.workbench, &self.navigators);
        if let Err(e) = nav.select_and_open(index).await {
            tracing::warn!(error = %e, index, "failed to open change");
            self.set_status(format!("Open failed: {e:#}"), true);
        }
    }

    fn scroll_editor(&mut self, delta: isize) {
        if let Some(widget) = self.state.workbench.active() {
            widget.document_mut().scroll_by(delta);
        }
    }

    fn set_status(&mut self, message: String, is_error: bool) {
        self.state.status_message = Some((message, is_error));
        self.status_clear_countdown = STATUS_TICKS;
    }
}
