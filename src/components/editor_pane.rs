use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::editor::document::{Document, DocumentRow, RowKind};
use crate::git::types::DiffLineOrigin;
use crate::state::{app_state::FocusPanel, AppState};
use crate::theme::Theme;

use super::Component;

pub struct EditorPane;

fn lineno(n: Option<u32>) -> String {
    n.map_or_else(|| "    ".to_string(), |n| format!("{n:>4}"))
}

fn render_row<'a>(row: &'a DocumentRow, in_current_hunk: bool, theme: &Theme) -> Line<'a> {
    let bg = if in_current_hunk {
        Style::default().bg(theme.current_hunk_bg)
    } else {
        Style::default()
    };

    match row.kind {
        RowKind::HunkHeader(_) => Line::from(Span::styled(
            row.text.as_str(),
            bg.fg(theme.diff_hunk_header_fg)
                .add_modifier(Modifier::BOLD),
        )),
        RowKind::Line(ref origin) => {
            let (marker, color) = match origin {
                DiffLineOrigin::Addition => ("+", theme.diff_add_fg),
                DiffLineOrigin::Deletion => ("-", theme.diff_del_fg),
                DiffLineOrigin::Context => (" ", theme.diff_context_fg),
            };
            Line::from(vec![
                Span::styled(
                    format!("{} {} ", lineno(row.old_lineno), lineno(row.new_lineno)),
                    bg.fg(theme.text_muted),
                ),
                Span::styled(marker, bg.fg(color)),
                Span::styled(row.text.as_str(), bg.fg(color)),
            ])
        }
    }
}

fn title(doc: &Document) -> String {
    match doc.current_hunk() {
        Some(i) => format!(" {} [{}/{}] ", doc.title, i + 1, doc.hunk_count()),
        None if doc.is_diff() => format!(" {} [{} hunks] ", doc.title, doc.hunk_count()),
        None => format!(" {} ", doc.title),
    }
}

impl Component for EditorPane {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let border_style = if state.focus == FocusPanel::Editor {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let block = Block::default().borders(Borders::ALL).border_style(border_style);

        let Some(widget) = state.workbench.active() else {
            let hint = Paragraph::new(" Press n to open the first change")
                .style(Style::default().fg(theme.text_muted))
                .block(block.title(" Editor "));
            frame.render_widget(hint, area);
            return;
        };

        let doc = widget.document();
        let block = block.title(title(&doc));
        let inner_height = area.height.saturating_sub(2) as usize;
        let span = doc.current_span();

        if doc.rows().is_empty() {
            let msg = if doc.is_diff() { " No differences" } else { " Empty file" };
            let paragraph = Paragraph::new(msg)
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let lines: Vec<Line> = doc
            .rows()
            .iter()
            .enumerate()
            .skip(doc.scroll)
            .take(inner_height)
            .map(|(idx, row)| {
                let in_hunk = span.is_some_and(|s| idx >= s.first_row && idx <= s.last_row);
                render_row(row, in_hunk, theme)
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
