use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::labels::LabelMode;
use crate::resolver;
use crate::state::AppState;

use super::Component;

pub struct StatusBar;

const HINTS: &str = "n/p change  j/k move  enter open  tab focus  r refresh  L labels  q quit";

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let range = resolver::range_label(state.changes.range());
        let labels = match state.labels.mode() {
            LabelMode::Name => "[names]",
            LabelMode::Path => "[paths]",
        };

        let mut spans = vec![
            Span::styled(" revdiff ", Style::default().fg(Color::Black).bg(theme.accent)),
            Span::raw("  "),
            Span::styled(
                range,
                Style::default()
                    .fg(theme.warning)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(labels, Style::default().fg(theme.text_muted)),
            Span::raw("  "),
        ];
        let open = state.workbench.open_count();
        if open > 1 {
            spans.push(Span::styled(
                format!("{open} open  "),
                Style::default().fg(theme.text_muted),
            ));
        }

        match state.status_message {
            Some((ref msg, is_error)) => {
                let color = if is_error { theme.error } else { theme.success };
                spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
            }
            None => spans.push(Span::styled(HINTS, Style::default().fg(theme.text_muted))),
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
