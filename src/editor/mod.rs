use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::editor_api::EditorCommand;

mod engine;
mod frame;
mod repl;

pub use engine::{EngineOutput, LiveEngine};
pub use frame::{DrawFrame, Hap};
pub use repl::{ReplConfig, ReplEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    Uninitialized,
    Ready,
    Running,
}

impl EditorState {
    pub fn label(self) -> &'static str {
        match self {
            EditorState::Uninitialized => "Not ready",
            EditorState::Ready => "Stopped",
            EditorState::Running => "Running",
        }
    }
}

// Wraps the external engine in the Uninitialized -> Ready <-> Running state
// machine. Every request is applied in arrival order on the UI thread, so a
// play and a stop can never overlap.
pub struct EditorSession {
    engine: Option<Box<dyn LiveEngine>>,
    state: EditorState,
    audio_unlocked: bool,
    code: String,
    output_tx: Sender<EngineOutput>,
    output_rx: Receiver<EngineOutput>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorSession {
    pub fn new() -> Self {
        let (output_tx, output_rx) = crossbeam_channel::bounded::<EngineOutput>(1024);
        Self {
            engine: None,
            state: EditorState::Uninitialized,
            audio_unlocked: false,
            code: String::new(),
            output_tx,
            output_rx,
        }
    }

    /// Where an engine should send its draw frames and console output.
    pub fn output_sender(&self) -> Sender<EngineOutput> {
        self.output_tx.clone()
    }

    /// Attach the engine. Happens once per session; later calls are ignored.
    pub fn initialize(&mut self, engine: Box<dyn LiveEngine>) {
        if self.state != EditorState::Uninitialized {
            debug!("editor already initialized, ignoring");
            return;
        }
        self.engine = Some(engine);
        self.state = EditorState::Ready;
        info!("editor ready");
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EditorState::Running
    }

    /// Source most recently loaded into the engine.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn send(&mut self, cmd: EditorCommand) {
        match cmd {
            EditorCommand::Load(code) => self.load(code),
            EditorCommand::Play => self.play(),
            EditorCommand::Stop => self.stop(),
        }
    }

    /// Replace the engine source. Does not stop a running evaluation.
    pub fn load(&mut self, code: String) {
        let Some(engine) = self.engine.as_mut() else {
            debug!("load before engine is ready, ignored");
            return;
        };
        match engine.set_code(&code) {
            Ok(()) => {
                debug!(bytes = code.len(), "code loaded");
                self.code = code;
            }
            Err(e) => warn!("loading code failed: {e:#}"),
        }
    }

    pub fn play(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            debug!("play before engine is ready, ignored");
            return;
        };
        if !self.audio_unlocked {
            match engine.unlock_audio() {
                Ok(true) => {
                    self.audio_unlocked = true;
                    info!("audio unlocked");
                }
                Ok(false) => warn!("audio unlock refused, retrying on next play"),
                Err(e) => warn!("audio unlock failed: {e:#}"),
            }
        }
        match engine.evaluate() {
            Ok(()) => {
                self.state = EditorState::Running;
                info!("playing");
            }
            Err(e) => warn!("evaluate failed: {e:#}"),
        }
    }

    pub fn stop(&mut self) {
        if self.state != EditorState::Running {
            return;
        }
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        match engine.stop() {
            Ok(()) => {
                self.state = EditorState::Ready;
                info!("stopped");
            }
            Err(e) => warn!("stop failed: {e:#}"),
        }
    }

    /// Next pending engine output, if any. An engine exit drops a running
    /// session back to Ready.
    pub fn poll_output(&mut self) -> Option<EngineOutput> {
        let out = self.output_rx.try_recv().ok()?;
        if out == EngineOutput::Exited && self.state == EditorState::Running {
            warn!("engine exited while running");
            self.state = EditorState::Ready;
        }
        Some(out)
    }
}
