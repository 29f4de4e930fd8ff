use crate::shared::Focus;

// state local to tui, used to resolve raw keys into semantic inputevents
// focus is synced from DisplayState each loop
#[derive(Clone, Debug)]
pub struct TuiState {
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self { focus: Focus::Template }
    }
}
