use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::state::app_state::FocusPanel;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Resize,
    Tick,
}

pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                let event = match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                    Some(Err(_)) | None => break,
                    _ => continue,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Map a key event to an action based on which panel has focus.
pub fn map_key_to_action(key: KeyEvent, focus: FocusPanel) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Action::Quit),
            _ => None,
        };
    }

    // Global bindings
    match key.code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('n') | KeyCode::Char(']') => return Some(Action::NextChange),
        KeyCode::Char('p') | KeyCode::Char('[') => return Some(Action::PreviousChange),
        KeyCode::Char('r') => return Some(Action::Refresh),
        KeyCode::Char('L') => return Some(Action::ToggleLabels),
        _ => {}
    }

    match focus {
        FocusPanel::ChangeList => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
            KeyCode::Char('g') => Some(Action::ListTop),
            KeyCode::Char('G') => Some(Action::ListBottom),
            KeyCode::Enter | KeyCode::Char('l') => Some(Action::OpenSelected),
            KeyCode::Tab | KeyCode::Right => Some(Action::FocusEditor),
            _ => None,
        },
        FocusPanel::Editor => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::ScrollPageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::ScrollPageDown),
            KeyCode::Char('g') => Some(Action::ListTop),
            KeyCode::Char('G') => Some(Action::ListBottom),
            KeyCode::Tab | KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc => {
                Some(Action::FocusList)
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn change_navigation_works_from_either_panel() {
        for focus in [FocusPanel::ChangeList, FocusPanel::Editor] {
            assert_eq!(
                map_key_to_action(key(KeyCode::Char('n')), focus),
                Some(Action::NextChange)
            );
            assert_eq!(
                map_key_to_action(key(KeyCode::Char('[')), focus),
                Some(Action::PreviousChange)
            );
        }
    }

    #[test]
    fn arrows_depend_on_focus() {
        assert_eq!(
            map_key_to_action(key(KeyCode::Down), FocusPanel::ChangeList),
            Some(Action::ListDown)
        );
        assert_eq!(
            map_key_to_action(key(KeyCode::Down), FocusPanel::Editor),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            map_key_to_action(key(KeyCode::Tab), FocusPanel::Editor),
            Some(Action::FocusList)
        );
    }

    #[test]
    fn ctrl_c_quits_and_other_chords_are_ignored() {
        let ctrl = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL);
        assert_eq!(map_key_to_action(ctrl('c'), FocusPanel::Editor), Some(Action::Quit));
        assert_eq!(map_key_to_action(ctrl('n'), FocusPanel::Editor), None);
    }
}
