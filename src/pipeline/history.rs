// Append-only log of tempo changes, feeds the tempo chart.

use std::time::{Duration, Instant};

/// Source of monotonic timestamps, relative to session start.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TempoSample {
    pub time: Duration,
    pub tempo: f64,
}

impl TempoSample {
    pub fn seconds(&self) -> f64 {
        self.time.as_secs_f64()
    }
}

/// Samples in insertion order. Only the session appends; nothing edits,
/// removes or reorders.
#[derive(Clone, Debug, Default)]
pub struct TempoHistory {
    samples: Vec<TempoSample>,
}

impl TempoHistory {
    pub fn new() -> Self {
        Self::default()
    }

    // time never runs backwards inside the log, whatever the clock says
    pub(super) fn record(&mut self, time: Duration, tempo: f64) {
        let time = match self.samples.last() {
            Some(last) if last.time > time => last.time,
            _ => time,
        };
        self.samples.push(TempoSample { time, tempo });
    }

    pub fn samples(&self) -> &[TempoSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&TempoSample> {
        self.samples.last()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Clock the test moves by hand. Clones share the same time.
    #[derive(Clone, Default)]
    pub struct ManualClock(Rc<Cell<Duration>>);

    impl ManualClock {
        pub fn set(&self, t: Duration) {
            self.0.set(t);
        }

        pub fn advance(&self, by: Duration) {
            self.0.set(self.0.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    #[test]
    fn record_keeps_insertion_order() {
        let mut h = TempoHistory::new();
        h.record(Duration::from_millis(10), 1.0);
        h.record(Duration::from_millis(20), 1.5);
        assert_eq!(h.len(), 2);
        assert_eq!(h.latest().map(|s| s.tempo), Some(1.5));
        assert_eq!(h.samples()[0].time, Duration::from_millis(10));
    }

    #[test]
    fn time_does_not_go_backwards() {
        let mut h = TempoHistory::new();
        h.record(Duration::from_millis(50), 1.0);
        h.record(Duration::from_millis(40), 1.1);
        assert_eq!(h.samples()[1].time, Duration::from_millis(50));
        assert_eq!(h.samples()[1].tempo, 1.1);
    }

    #[test]
    fn monotonic_clock_advances() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
