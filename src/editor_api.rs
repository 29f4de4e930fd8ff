pub use crate::editor::{DrawFrame, EditorState, Hap};

// What the middle layer asks of the editor. A single user action can yield
// several commands; they are applied in order, so a Load always lands before
// the Play that follows it.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorCommand {
    Load(String),
    Play,
    Stop,
}
