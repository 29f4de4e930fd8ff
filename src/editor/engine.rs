use super::frame::DrawFrame;

/// What the engine reports back. Delivered over a channel so the UI thread
/// only ever drains it, never blocks on it.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineOutput {
    Draw(DrawFrame),
    Console(String),
    Exited,
}

/// The narrow surface the session needs from a live-coding engine.
pub trait LiveEngine {
    /// One-time audio bring-up. Returns `Ok(false)` if the platform refused;
    /// the caller retries on the next play.
    fn unlock_audio(&mut self) -> anyhow::Result<bool>;

    /// Replace the engine's current source.
    fn set_code(&mut self, code: &str) -> anyhow::Result<()>;

    /// Evaluate the current source and start playing it.
    fn evaluate(&mut self) -> anyhow::Result<()>;

    fn stop(&mut self) -> anyhow::Result<()>;
}
