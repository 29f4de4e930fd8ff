// Keys, as resolved by tui/input.rs:
//
// Anywhere:
//   F5            //  Preprocess (load the substituted text into the engine)
//   F6            //  Preprocess & Play
//   F7            //  Play
//   F8            //  Stop
//   Tab           //  FocusNext (template editor <-> controls)
//   Ctrl+L        //  ResetTemplate (back to the --tune choice)
//   Esc           //  Quit
//
// Template focus:
//   printable     //  InsertChar
//   Enter         //  InsertNewline
//   Backspace/Del //  Backspace / Delete
//   arrows, Home, End move the cursor
//
// Controls focus:
//   Up / Down     //  SelectPrevControl / SelectNextControl
//   Left / Right  //  NudgeControl(-1 / +1), slider step, clamped to range
//   Space / Enter //  ToggleControl
//   x             //  DismissAlert
//
// As in the rest of the app, the middle layer owns all state and hands the
// TUI a DisplayState to draw each frame. The TUI never interprets values.

use crate::editor_api::{DrawFrame, EditorState};
use crate::pipeline::history::TempoSample;

pub const CONSOLE_LINES: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Template,
    Controls,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Template => Focus::Controls,
            Focus::Controls => Focus::Template,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Quit,

    // buttons
    Preprocess,
    PreprocessAndPlay,
    Play,
    Stop,

    FocusNext,
    DismissAlert,
    ResetTemplate,

    // template editing
    InsertChar(char),
    InsertNewline,
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // controls panel
    SelectPrevControl,
    SelectNextControl,
    NudgeControl(i32),
    ToggleControl,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlRow {
    pub label: &'static str,
    pub value: String,
    pub ratio: f64, // position within the declared range, for the gauge
}

#[derive(Clone, Debug)]
pub struct DisplayState {
    pub template: String,
    pub cursor: usize, // byte offset into template
    pub hint: String,  // which placeholders the template uses
    pub focus: Focus,
    pub controls: Vec<ControlRow>,
    pub selected_control: usize,
    pub show_alert: bool,
    pub editor_state: EditorState,
    pub playing: bool,
    pub loaded_code: String,
    pub tempo: f64,
    pub tempo_range: (f64, f64),
    pub tempo_samples: Vec<TempoSample>,
    pub draw_frame: Option<DrawFrame>,
    pub console: Vec<String>,
}
