// The middle layer: owns the session, turns semantic input events into state
// changes and editor commands, and builds the DisplayState the TUI draws.

use std::collections::VecDeque;

use tracing::debug;

use crate::editor::EngineOutput;
use crate::editor_api::{DrawFrame, EditorCommand, EditorState};
use crate::pipeline::controls::ControlKind;
use crate::pipeline::session::SessionState;
use crate::pipeline::template::placeholders_in;
use crate::pipeline::tunes::DEFAULT_TUNE;
use crate::shared::{ControlRow, DisplayState, Focus, InputEvent, CONSOLE_LINES};

pub struct Middle {
    pub state: SessionState,
    tune: &'static str, // what ResetTemplate restores
    cursor: usize,
    selected: usize,
    focus: Focus,
    show_alert: bool,
    editor_state: EditorState,
    loaded_code: String,
    draw_frame: Option<DrawFrame>,
    console: VecDeque<String>,
}

impl Middle {
    pub fn with_state(state: SessionState) -> Self {
        Self {
            state,
            tune: DEFAULT_TUNE,
            cursor: 0,
            selected: 0,
            focus: Focus::Template,
            show_alert: false,
            editor_state: EditorState::Uninitialized,
            loaded_code: String::new(),
            draw_frame: None,
            console: VecDeque::with_capacity(CONSOLE_LINES),
        }
    }

    pub fn with_tune(mut self, tune: &'static str) -> Self {
        self.tune = tune;
        self
    }

    pub fn handle_input(&mut self, event: InputEvent) -> Vec<EditorCommand> {
        match event {
            InputEvent::Quit => vec![],
            InputEvent::Preprocess => self.preprocess(false),
            InputEvent::PreprocessAndPlay => self.preprocess(true),
            InputEvent::Play => vec![EditorCommand::Play],
            InputEvent::Stop => vec![EditorCommand::Stop],
            InputEvent::FocusNext => {
                self.focus = self.focus.next();
                vec![]
            }
            InputEvent::DismissAlert => {
                self.show_alert = false;
                vec![]
            }
            InputEvent::ResetTemplate => {
                self.state.set_template(self.tune);
                self.cursor = 0;
                self.show_alert = false;
                vec![]
            }
            InputEvent::SelectPrevControl => {
                self.selected = self.selected.saturating_sub(1);
                vec![]
            }
            InputEvent::SelectNextControl => {
                let last = self.state.controls().len().saturating_sub(1);
                self.selected = (self.selected + 1).min(last);
                vec![]
            }
            InputEvent::NudgeControl(direction) => {
                self.nudge_selected(direction);
                vec![]
            }
            InputEvent::ToggleControl => {
                let is_toggle = self
                    .state
                    .controls()
                    .get(self.selected)
                    .is_some_and(|s| s.kind == ControlKind::Toggle);
                if is_toggle {
                    self.nudge_selected(1);
                }
                vec![]
            }
            edit => {
                self.edit_template(edit);
                vec![]
            }
        }
    }

    /// Mirror the adapter's state after commands have been applied.
    pub fn sync_editor(&mut self, state: EditorState, code: &str) {
        self.editor_state = state;
        self.state.set_playing(state == EditorState::Running);
        if self.loaded_code != code {
            self.loaded_code = code.to_string();
        }
    }

    pub fn on_engine_output(&mut self, output: EngineOutput) {
        match output {
            EngineOutput::Draw(frame) => self.draw_frame = Some(frame),
            EngineOutput::Console(line) => self.push_console(line),
            EngineOutput::Exited => self.push_console("engine exited".to_string()),
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let values = self.state.values();
        let controls = self
            .state
            .controls()
            .specs
            .iter()
            .map(|spec| ControlRow {
                label: spec.name.label(),
                value: values.display(spec.name),
                ratio: spec.ratio(values.get(spec.name)),
            })
            .collect();
        let tags: Vec<String> = placeholders_in(self.state.template())
            .into_iter()
            .map(|p| p.tag())
            .collect();
        let hint = if tags.is_empty() {
            "No placeholder tags in template".to_string()
        } else {
            format!("Tags in use: {}", tags.join(" "))
        };

        DisplayState {
            template: self.state.template().to_string(),
            cursor: self.cursor,
            hint,
            focus: self.focus,
            controls,
            selected_control: self.selected,
            show_alert: self.show_alert,
            editor_state: self.editor_state,
            playing: self.state.is_playing(),
            loaded_code: self.loaded_code.clone(),
            tempo: values.tempo,
            tempo_range: self.state.controls().tempo_range(),
            tempo_samples: self.state.history().samples().to_vec(),
            draw_frame: self.draw_frame.clone(),
            console: self.console.iter().cloned().collect(),
        }
    }

    fn preprocess(&mut self, play_after: bool) -> Vec<EditorCommand> {
        if self.editor_state == EditorState::Uninitialized {
            debug!("preprocess before editor is ready, ignored");
            return vec![];
        }
        self.show_alert = true;
        let mut cmds = vec![EditorCommand::Load(self.state.processed_text())];
        if play_after {
            cmds.push(EditorCommand::Play);
        }
        cmds
    }

    // Only real changes count as an interaction, like a slider's change event.
    fn nudge_selected(&mut self, direction: i32) {
        let Some(spec) = self.state.controls().get(self.selected).copied() else {
            return;
        };
        let current = self.state.values().get(spec.name);
        let next = spec.nudge(current, direction);
        if next != current {
            self.state.apply(spec.name, next);
        }
    }

    fn edit_template(&mut self, event: InputEvent) {
        let mut text = self.state.template().to_string();
        let mut cursor = self.cursor.min(text.len());
        let changed = match event {
            InputEvent::InsertChar(c) => {
                text.insert(cursor, c);
                cursor += c.len_utf8();
                true
            }
            InputEvent::InsertNewline => {
                text.insert(cursor, '\n');
                cursor += 1;
                true
            }
            InputEvent::Backspace => match text[..cursor].chars().next_back() {
                Some(c) => {
                    cursor -= c.len_utf8();
                    text.remove(cursor);
                    true
                }
                None => false,
            },
            InputEvent::Delete => {
                if cursor < text.len() {
                    text.remove(cursor);
                    true
                } else {
                    false
                }
            }
            InputEvent::CursorLeft => {
                cursor -= text[..cursor].chars().next_back().map_or(0, char::len_utf8);
                false
            }
            InputEvent::CursorRight => {
                cursor += text[cursor..].chars().next().map_or(0, char::len_utf8);
                false
            }
            InputEvent::CursorHome => {
                cursor = line_start(&text, cursor);
                false
            }
            InputEvent::CursorEnd => {
                cursor = line_end(&text, cursor);
                false
            }
            InputEvent::CursorUp => {
                let start = line_start(&text, cursor);
                if start > 0 {
                    let col = text[start..cursor].chars().count();
                    let prev = line_start(&text, start - 1);
                    cursor = offset_at_column(&text, prev, start - 1, col);
                }
                false
            }
            InputEvent::CursorDown => {
                let end = line_end(&text, cursor);
                if end < text.len() {
                    let col = text[line_start(&text, cursor)..cursor].chars().count();
                    let next = end + 1;
                    cursor = offset_at_column(&text, next, line_end(&text, next), col);
                }
                false
            }
            _ => false,
        };
        self.cursor = cursor;
        if changed {
            self.state.set_template(text);
            self.show_alert = false;
        }
    }

    fn push_console(&mut self, line: String) {
        if self.console.len() == CONSOLE_LINES {
            self.console.pop_front();
        }
        self.console.push_back(line);
    }
}

fn line_start(text: &str, cursor: usize) -> usize {
    text[..cursor].rfind('\n').map_or(0, |i| i + 1)
}

fn line_end(text: &str, cursor: usize) -> usize {
    text[cursor..].find('\n').map_or(text.len(), |i| cursor + i)
}

// Byte offset `col` chars into the line spanning start..end, clamped to end.
fn offset_at_column(text: &str, start: usize, end: usize, col: usize) -> usize {
    text[start..end]
        .char_indices()
        .nth(col)
        .map_or(end, |(i, _)| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor_api::Hap;
    use crate::pipeline::controls::ControlSet;
    use crate::pipeline::history::tests::ManualClock;
    use crate::pipeline::tunes::POP_TUNE;
    use std::time::Duration;

    fn middle_with(template: &str) -> (Middle, ManualClock) {
        let clock = ManualClock::default();
        let state = SessionState::with_clock(ControlSet::part_b(), Box::new(clock.clone()))
            .with_template(template);
        let mut m = Middle::with_state(state);
        m.sync_editor(EditorState::Ready, "");
        (m, clock)
    }

    fn type_text(m: &mut Middle, text: &str) {
        for c in text.chars() {
            m.handle_input(InputEvent::InsertChar(c));
        }
    }

    #[test]
    fn preprocess_loads_substituted_text() {
        let (mut m, _) = middle_with("setcps(<tempo>)");
        let cmds = m.handle_input(InputEvent::Preprocess);
        assert_eq!(cmds, vec![EditorCommand::Load("setcps(1.00)".into())]);
        assert!(m.display_state().show_alert);
    }

    #[test]
    fn preprocess_and_play_loads_first() {
        let (mut m, _) = middle_with("<drums2_gain>-<pattern_index>-<tempo>");
        let cmds = m.handle_input(InputEvent::PreprocessAndPlay);
        assert_eq!(
            cmds,
            vec![EditorCommand::Load("1-0-1.00".into()), EditorCommand::Play]
        );
    }

    #[test]
    fn preprocess_before_editor_ready_does_nothing() {
        let (mut m, _) = middle_with("<tempo>");
        m.sync_editor(EditorState::Uninitialized, "");
        assert!(m.handle_input(InputEvent::Preprocess).is_empty());
        assert!(!m.display_state().show_alert);
    }

    #[test]
    fn tempo_nudges_feed_history() {
        let (mut m, clock) = middle_with("");
        m.handle_input(InputEvent::SelectNextControl); // tempo
        for _ in 0..3 {
            clock.advance(Duration::from_millis(250));
            m.handle_input(InputEvent::NudgeControl(1));
        }
        let ds = m.display_state();
        assert_eq!(ds.tempo_samples.len(), 3);
        assert_eq!(format!("{:.2}", ds.tempo), "1.15");
        assert_eq!(format!("{:.2}", ds.tempo_samples[2].tempo), "1.15");
        assert!(ds.tempo_samples.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn clamped_nudge_is_not_an_interaction() {
        let (mut m, _) = middle_with("");
        m.handle_input(InputEvent::SelectNextControl);
        for _ in 0..40 {
            m.handle_input(InputEvent::NudgeControl(1));
        }
        let ds = m.display_state();
        assert_eq!(ds.tempo, 2.0);
        // 1.00 -> 2.00 in 0.05 steps
        assert_eq!(ds.tempo_samples.len(), 20);
    }

    #[test]
    fn toggle_only_flips_toggles() {
        let (mut m, _) = middle_with("<p1_Radio>x");
        m.handle_input(InputEvent::ToggleControl);
        assert_eq!(m.state.processed_text(), "_x");
        m.handle_input(InputEvent::SelectNextControl);
        m.handle_input(InputEvent::ToggleControl);
        assert!(m.state.history().is_empty());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let (mut m, _) = middle_with("");
        m.handle_input(InputEvent::SelectPrevControl);
        assert_eq!(m.display_state().selected_control, 0);
        for _ in 0..10 {
            m.handle_input(InputEvent::SelectNextControl);
        }
        assert_eq!(m.display_state().selected_control, 5);
    }

    #[test]
    fn typing_edits_template_and_clears_alert() {
        let (mut m, _) = middle_with("");
        m.handle_input(InputEvent::Preprocess);
        type_text(&mut m, "s(<tempo>)");
        assert_eq!(m.state.template(), "s(<tempo>)");
        assert!(!m.display_state().show_alert);
        m.handle_input(InputEvent::Backspace);
        assert_eq!(m.state.template(), "s(<tempo>");
        assert_eq!(m.state.processed_text(), "s(1.00");
    }

    #[test]
    fn cursor_moves_across_lines() {
        let (mut m, _) = middle_with("");
        type_text(&mut m, "abcd");
        m.handle_input(InputEvent::InsertNewline);
        type_text(&mut m, "xy");
        m.handle_input(InputEvent::CursorUp);
        assert_eq!(m.display_state().cursor, 2);
        m.handle_input(InputEvent::CursorEnd);
        m.handle_input(InputEvent::CursorDown);
        assert_eq!(m.display_state().cursor, 7);
        m.handle_input(InputEvent::CursorHome);
        m.handle_input(InputEvent::Delete);
        assert_eq!(m.state.template(), "abcd\ny");
    }

    #[test]
    fn multibyte_cursor_steps() {
        let (mut m, _) = middle_with("");
        type_text(&mut m, "é<");
        m.handle_input(InputEvent::CursorLeft);
        m.handle_input(InputEvent::CursorLeft);
        assert_eq!(m.display_state().cursor, 0);
        m.handle_input(InputEvent::CursorRight);
        assert_eq!(m.display_state().cursor, 'é'.len_utf8());
    }

    #[test]
    fn reset_restores_default_tune() {
        let (mut m, _) = middle_with("scratch");
        m.handle_input(InputEvent::ResetTemplate);
        assert_eq!(m.state.template(), DEFAULT_TUNE);
    }

    #[test]
    fn reset_restores_the_chosen_tune() {
        let (m, _) = middle_with("scratch");
        let mut m = m.with_tune(POP_TUNE);
        m.handle_input(InputEvent::ResetTemplate);
        assert_eq!(m.state.template(), POP_TUNE);
    }

    #[test]
    fn draw_frames_pass_through_unchanged() {
        let (mut m, _) = middle_with("");
        let frame = DrawFrame {
            haps: vec![Hap { begin: 0.5, end: 1.0, note: 64.0, sound: Some("sine".into()) }],
            time: 0.75,
        };
        m.on_engine_output(EngineOutput::Draw(frame.clone()));
        assert_eq!(m.display_state().draw_frame, Some(frame));
    }

    #[test]
    fn console_is_bounded() {
        let (mut m, _) = middle_with("");
        for i in 0..(CONSOLE_LINES + 5) {
            m.on_engine_output(EngineOutput::Console(format!("line {i}")));
        }
        let console = m.display_state().console;
        assert_eq!(console.len(), CONSOLE_LINES);
        assert_eq!(console[0], "line 5");
    }

    #[test]
    fn playing_mirrors_editor() {
        let (mut m, _) = middle_with("");
        m.sync_editor(EditorState::Running, "code");
        let ds = m.display_state();
        assert!(ds.playing);
        assert_eq!(ds.loaded_code, "code");
        m.sync_editor(EditorState::Ready, "code");
        assert!(!m.display_state().playing);
    }
}
