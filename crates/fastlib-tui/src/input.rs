use fastlib_client::Medium;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::ForceQuit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::TextInput => map_key_text_input(key),
                InputMode::RawEdit => map_key_raw_edit(key),
            }
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => Action::SaveConfig,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab => Action::Tab,
        KeyCode::Char('h') => Action::GoHome,
        KeyCode::Char('1') => Action::GoAuthors,
        KeyCode::Char('2') => Action::GoBooks,
        KeyCode::Char('3') => Action::GoSeries,
        KeyCode::Char(',') => Action::OpenConfig,
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Char('R') => Action::RefreshAuthorBooks,
        KeyCode::Char('n') => Action::Create,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('e') => Action::OpenDropdown(Medium::Ebook),
        KeyCode::Char('u') => Action::OpenDropdown(Medium::Audio),
        KeyCode::Char('p') => Action::OpenDropdown(Medium::Physical),
        KeyCode::Char(' ') => Action::Toggle,
        KeyCode::Char('x') => Action::ResetConfig,
        KeyCode::Char('L') => Action::ReloadConfig,
        KeyCode::Char('t') => Action::RawEditor,
        KeyCode::Char('d') | KeyCode::Delete => Action::Remove,
        KeyCode::Char('y') => Action::Yes,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_text_input(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

fn map_key_raw_edit(key: &KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => Action::SaveConfig,
        KeyCode::Char('v') if ctrl => Action::Validate,
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Enter => Action::InputNewline,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Tab => Action::InputChar('\t'),
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_c_force_quits_in_every_mode() {
        let evt = press(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for mode in [InputMode::Normal, InputMode::TextInput, InputMode::RawEdit] {
            assert_eq!(map_event(&evt, &mode), Action::ForceQuit);
        }
    }

    #[test]
    fn medium_keys_open_dropdowns() {
        let none = KeyModifiers::NONE;
        assert_eq!(
            map_event(&press(KeyCode::Char('e'), none), &InputMode::Normal),
            Action::OpenDropdown(Medium::Ebook)
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('u'), none), &InputMode::Normal),
            Action::OpenDropdown(Medium::Audio)
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('p'), none), &InputMode::Normal),
            Action::OpenDropdown(Medium::Physical)
        );
    }

    #[test]
    fn letters_are_text_while_typing() {
        let evt = press(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_event(&evt, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&evt, &InputMode::TextInput), Action::InputChar('q'));
        assert_eq!(map_event(&evt, &InputMode::RawEdit), Action::InputChar('q'));
    }

    #[test]
    fn raw_editor_keys() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(
            map_event(&press(KeyCode::Char('s'), ctrl), &InputMode::RawEdit),
            Action::SaveConfig
        );
        assert_eq!(
            map_event(&press(KeyCode::Char('v'), ctrl), &InputMode::RawEdit),
            Action::Validate
        );
        assert_eq!(
            map_event(&press(KeyCode::Enter, KeyModifiers::NONE), &InputMode::RawEdit),
            Action::InputNewline
        );
        assert_eq!(
            map_event(&press(KeyCode::Enter, KeyModifiers::NONE), &InputMode::TextInput),
            Action::InputConfirm
        );
    }
}
