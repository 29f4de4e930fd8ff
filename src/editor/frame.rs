use serde::{Deserialize, Serialize};

// One scheduled note event, as reported by the engine for drawing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hap {
    pub begin: f64, // seconds, engine clock
    pub end: f64,
    pub note: f64,  // midi note number
    #[serde(default)]
    pub sound: Option<String>,
}

impl Hap {
    pub fn is_active_at(&self, time: f64) -> bool {
        self.begin <= time && time < self.end
    }
}

// Everything one draw callback carries: the event set and the playback time.
// Passed through to the piano roll as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawFrame {
    pub haps: Vec<Hap>,
    pub time: f64,
}
