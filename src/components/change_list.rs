use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::git::types::FileStatus;
use crate::state::{app_state::FocusPanel, AppState};
use crate::theme::Theme;

use super::Component;

pub struct ChangeListView;

fn status_color(status: FileStatus, theme: &Theme) -> ratatui::style::Color {
    match status {
        FileStatus::Added | FileStatus::Untracked => theme.diff_add_fg,
        FileStatus::Deleted => theme.diff_del_fg,
        FileStatus::Renamed | FileStatus::Copied => theme.accent,
        FileStatus::Modified => theme.warning,
    }
}

impl Component for ChangeListView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let changes = &state.changes;

        let border_style = if state.focus == FocusPanel::ChangeList {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let title = if changes.loading {
            " Changes (loading\u{2026}) ".to_string()
        } else {
            format!(" Changes ({}) ", changes.len())
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        if changes.is_empty() {
            let msg = if changes.loading { "" } else { " No changes" };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let selected = changes.selected();
        let scroll = match selected {
            Some(i) if i >= inner_height => i - inner_height + 1,
            _ => 0,
        };

        let lines: Vec<Line> = changes
            .entries()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, entry)| {
                let is_selected = selected == Some(idx);
                let name_style = if is_selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else {
                    Style::default().fg(theme.text)
                };
                let prefix = if is_selected { "\u{25b6}" } else { " " };
                let label = state.labels.label(entry);

                let mut spans = vec![
                    Span::styled(format!("{prefix} "), name_style),
                    Span::styled(
                        format!("{} ", entry.status.label()),
                        Style::default().fg(status_color(entry.status, theme)),
                    ),
                    Span::styled(label.name, name_style),
                ];
                if !label.detail.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", label.detail),
                        Style::default().fg(theme.text_muted),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        let position = match selected {
            Some(i) if changes.len() > inner_height => format!(" {}/{} ", i + 1, changes.len()),
            _ => String::new(),
        };
        let block = block.title_bottom(Line::from(position).right_aligned());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
