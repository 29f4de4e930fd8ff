// Named controls: what each one is, what range the UI lets it move in, and
// the values currently held for them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlId {
    P1Radio,
    Tempo,
    MasterGain,
    ReverbAmount,
    PatternIndex,
    ExtraDrums,
}

impl ControlId {
    pub fn label(self) -> &'static str {
        match self {
            ControlId::P1Radio => "p1 Radio",
            ControlId::Tempo => "Tempo",
            ControlId::MasterGain => "Master Gain",
            ControlId::ReverbAmount => "Reverb",
            ControlId::PatternIndex => "Pattern",
            ControlId::ExtraDrums => "Extra Drums",
        }
    }
}

/// How a control moves. Ranges are inclusive and only bind the UI; values
/// handed to the template processor are never clamped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    Toggle,
    Float { min: f64, max: f64, step: f64 },
    Int { min: i64, max: i64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Toggle(bool),
    Float(f64),
    Int(i64),
}

/// One `{name, kind, range}` entry of a control set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlSpec {
    pub name: ControlId,
    #[serde(flatten)]
    pub kind: ControlKind,
}

impl ControlSpec {
    pub fn toggle(name: ControlId) -> Self {
        Self { name, kind: ControlKind::Toggle }
    }

    pub fn float(name: ControlId, min: f64, max: f64, step: f64) -> Self {
        Self { name, kind: ControlKind::Float { min, max, step } }
    }

    pub fn int(name: ControlId, min: i64, max: i64) -> Self {
        Self { name, kind: ControlKind::Int { min, max } }
    }

    /// Move `current` one step in `direction` (sign only), the way a slider
    /// or select would: clamped to the declared range and snapped to the step
    /// grid. Toggles flip regardless of direction.
    pub fn nudge(&self, current: ControlValue, direction: i32) -> ControlValue {
        let dir = direction.signum();
        match (self.kind, current) {
            (ControlKind::Toggle, ControlValue::Toggle(on)) => ControlValue::Toggle(!on),
            (ControlKind::Float { min, max, step }, ControlValue::Float(v)) => {
                let moved = v + dir as f64 * step;
                let snapped = if step > 0.0 {
                    min + ((moved - min) / step).round() * step
                } else {
                    moved
                };
                ControlValue::Float(snapped.clamp(min, max))
            }
            (ControlKind::Int { min, max }, ControlValue::Int(v)) => {
                ControlValue::Int(v.saturating_add(dir as i64).clamp(min, max))
            }
            // kind/value mismatch: leave it alone
            (_, other) => other,
        }
    }

    /// Position of `value` within the range as 0.0..=1.0, for gauges.
    pub fn ratio(&self, value: ControlValue) -> f64 {
        let r = match (self.kind, value) {
            (ControlKind::Toggle, ControlValue::Toggle(on)) => if on { 1.0 } else { 0.0 },
            (ControlKind::Float { min, max, .. }, ControlValue::Float(v)) if max > min => {
                (v - min) / (max - min)
            }
            // in f64: a full i64 range overflows the subtraction
            (ControlKind::Int { min, max }, ControlValue::Int(v)) if max > min => {
                (v as f64 - min as f64) / (max as f64 - min as f64)
            }
            _ => 0.0,
        };
        r.clamp(0.0, 1.0)
    }
}

/// Ordered list of the controls a UI variant exposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlSet {
    pub specs: Vec<ControlSpec>,
}

pub const DEFAULT_TEMPO_RANGE: (f64, f64) = (0.5, 2.0);

impl ControlSet {
    pub fn new(specs: Vec<ControlSpec>) -> Self {
        Self { specs }
    }

    /// The smaller variant: p1 radio and tempo only.
    pub fn part_a() -> Self {
        Self::new(vec![
            ControlSpec::toggle(ControlId::P1Radio),
            ControlSpec::float(ControlId::Tempo, 0.5, 2.0, 0.05),
        ])
    }

    /// The extended variant with mix and arrangement controls.
    pub fn part_b() -> Self {
        Self::new(vec![
            ControlSpec::toggle(ControlId::P1Radio),
            ControlSpec::float(ControlId::Tempo, 0.5, 2.0, 0.05),
            ControlSpec::float(ControlId::MasterGain, 0.3, 2.0, 0.05),
            ControlSpec::float(ControlId::ReverbAmount, 0.0, 1.0, 0.05),
            ControlSpec::int(ControlId::PatternIndex, 0, 3),
            ControlSpec::toggle(ControlId::ExtraDrums),
        ])
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn get(&self, idx: usize) -> Option<&ControlSpec> {
        self.specs.get(idx)
    }

    pub fn spec(&self, id: ControlId) -> Option<&ControlSpec> {
        self.specs.iter().find(|s| s.name == id)
    }

    /// Vertical domain for the tempo chart.
    pub fn tempo_range(&self) -> (f64, f64) {
        match self.spec(ControlId::Tempo).map(|s| s.kind) {
            Some(ControlKind::Float { min, max, .. }) => (min, max),
            _ => DEFAULT_TEMPO_RANGE,
        }
    }
}

/// Current value of every known control. Controls a variant does not show
/// keep these defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlValues {
    pub p1_hush: bool,
    pub tempo: f64,
    pub master_gain: f64,
    pub reverb_amount: f64,
    pub pattern_index: i64,
    pub extra_drums: bool,
}

impl Default for ControlValues {
    fn default() -> Self {
        Self {
            p1_hush: false,
            tempo: 1.0,
            master_gain: 1.0,
            reverb_amount: 0.6,
            pattern_index: 0,
            extra_drums: true,
        }
    }
}

impl ControlValues {
    pub fn get(&self, id: ControlId) -> ControlValue {
        match id {
            ControlId::P1Radio => ControlValue::Toggle(self.p1_hush),
            ControlId::Tempo => ControlValue::Float(self.tempo),
            ControlId::MasterGain => ControlValue::Float(self.master_gain),
            ControlId::ReverbAmount => ControlValue::Float(self.reverb_amount),
            ControlId::PatternIndex => ControlValue::Int(self.pattern_index),
            ControlId::ExtraDrums => ControlValue::Toggle(self.extra_drums),
        }
    }

    /// Text shown next to a control in the panel.
    pub fn display(&self, id: ControlId) -> String {
        match id {
            ControlId::P1Radio => (if self.p1_hush { "HUSH" } else { "ON" }).to_string(),
            ControlId::Tempo => format!("{:.2}x", self.tempo),
            ControlId::MasterGain => format!("{:.2}", self.master_gain),
            ControlId::ReverbAmount => format!("{:.2}", self.reverb_amount),
            ControlId::PatternIndex => self.pattern_index.to_string(),
            ControlId::ExtraDrums => (if self.extra_drums { "ON" } else { "OFF" }).to_string(),
        }
    }
}
