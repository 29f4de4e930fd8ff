// The session's state: template text, control values, tempo history, and
// whether the engine is playing. Lives as long as the UI and is never saved.

use tracing::debug;

use crate::pipeline::controls::{ControlId, ControlSet, ControlValue, ControlValues};
use crate::pipeline::history::{Clock, MonotonicClock, TempoHistory};
use crate::pipeline::template;
use crate::pipeline::tunes::DEFAULT_TUNE;

pub struct SessionState {
    template: String,
    controls: ControlSet,
    values: ControlValues,
    history: TempoHistory,
    playing: bool,
    clock: Box<dyn Clock>,
}

impl SessionState {
    pub fn new(controls: ControlSet) -> Self {
        Self::with_clock(controls, Box::new(MonotonicClock::new()))
    }

    pub fn with_clock(controls: ControlSet, clock: Box<dyn Clock>) -> Self {
        Self {
            template: DEFAULT_TUNE.to_string(),
            controls,
            values: ControlValues::default(),
            history: TempoHistory::new(),
            playing: false,
            clock,
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    pub fn controls(&self) -> &ControlSet {
        &self.controls
    }

    pub fn values(&self) -> &ControlValues {
        &self.values
    }

    pub fn history(&self) -> &TempoHistory {
        &self.history
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// The template with the current values substituted. Recomputed on every
    /// call, so it can never mix stale and fresh inputs.
    pub fn processed_text(&self) -> String {
        template::process(&self.template, &self.values)
    }

    pub fn set_p1_hush(&mut self, hush: bool) {
        self.values.p1_hush = hush;
    }

    /// Updates the tempo and logs a sample in the same step.
    pub fn set_tempo(&mut self, tempo: f64) {
        self.values.tempo = tempo;
        self.history.record(self.clock.now(), tempo);
    }

    pub fn set_master_gain(&mut self, gain: f64) {
        self.values.master_gain = gain;
    }

    pub fn set_reverb_amount(&mut self, amount: f64) {
        self.values.reverb_amount = amount;
    }

    pub fn set_pattern_index(&mut self, index: i64) {
        self.values.pattern_index = index;
    }

    pub fn set_extra_drums(&mut self, on: bool) {
        self.values.extra_drums = on;
    }

    /// Route a generic control value to its setter. Returns false if the
    /// value's kind does not fit the control.
    pub fn apply(&mut self, id: ControlId, value: ControlValue) -> bool {
        match (id, value) {
            (ControlId::P1Radio, ControlValue::Toggle(v)) => self.set_p1_hush(v),
            (ControlId::Tempo, ControlValue::Float(v)) => self.set_tempo(v),
            (ControlId::MasterGain, ControlValue::Float(v)) => self.set_master_gain(v),
            (ControlId::ReverbAmount, ControlValue::Float(v)) => self.set_reverb_amount(v),
            (ControlId::PatternIndex, ControlValue::Int(v)) => self.set_pattern_index(v),
            (ControlId::ExtraDrums, ControlValue::Toggle(v)) => self.set_extra_drums(v),
            (id, value) => {
                debug!(?id, ?value, "control value does not match control kind");
                return false;
            }
        }
        true
    }
}
