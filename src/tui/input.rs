use std::time::Duration;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crate::shared::{Focus, InputEvent};
use super::mode::TuiState;

// poll for input from the terminal and resolve keys into semantic input
// events for the middle layer, depending on which pane has focus
pub fn poll_input(timeout: Duration, ts: &TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key, ts));
    }
    Ok(vec![])
}

pub fn handle_key(key: KeyEvent, ts: &TuiState) -> Vec<InputEvent> {
    // global keys first, these work from either pane
    match key.code {
        KeyCode::Esc => return vec![InputEvent::Quit],
        KeyCode::F(5) => return vec![InputEvent::Preprocess],
        KeyCode::F(6) => return vec![InputEvent::PreprocessAndPlay],
        KeyCode::F(7) => return vec![InputEvent::Play],
        KeyCode::F(8) => return vec![InputEvent::Stop],
        KeyCode::Tab => return vec![InputEvent::FocusNext],
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return vec![InputEvent::ResetTemplate];
        }
        _ => {}
    }

    match ts.focus {
        Focus::Template => resolve_template_key(key),
        Focus::Controls => resolve_controls_key(key.code),
    }
}

fn resolve_template_key(key: KeyEvent) -> Vec<InputEvent> {
    // other ctrl/alt chords are not text
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return vec![];
    }
    match key.code {
        KeyCode::Char(c) => vec![InputEvent::InsertChar(c)],
        KeyCode::Enter => vec![InputEvent::InsertNewline],
        KeyCode::Backspace => vec![InputEvent::Backspace],
        KeyCode::Delete => vec![InputEvent::Delete],
        KeyCode::Left => vec![InputEvent::CursorLeft],
        KeyCode::Right => vec![InputEvent::CursorRight],
        KeyCode::Up => vec![InputEvent::CursorUp],
        KeyCode::Down => vec![InputEvent::CursorDown],
        KeyCode::Home => vec![InputEvent::CursorHome],
        KeyCode::End => vec![InputEvent::CursorEnd],
        _ => vec![],
    }
}

fn resolve_controls_key(code: KeyCode) -> Vec<InputEvent> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => vec![InputEvent::SelectPrevControl],
        KeyCode::Down | KeyCode::Char('j') => vec![InputEvent::SelectNextControl],
        KeyCode::Left | KeyCode::Char('h') => vec![InputEvent::NudgeControl(-1)],
        KeyCode::Right | KeyCode::Char('l') => vec![InputEvent::NudgeControl(1)],
        KeyCode::Char(' ') | KeyCode::Enter => vec![InputEvent::ToggleControl],
        KeyCode::Char('x') => vec![InputEvent::DismissAlert],
        _ => vec![],
    }
}
