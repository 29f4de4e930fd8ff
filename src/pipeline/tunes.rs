// Built-in templates. Angle-bracket mini notation like `<0 2 4>` is part of
// the pattern language and passes through preprocessing untouched.

pub const DEFAULT_TUNE: &str = r#"setcps(<tempo>)

samples('github:tidalcycles/dirt-samples')

const progressions = [
  "<c3 eb3 g3 bb3>",
  "<c3 [eb3 g3] f3 bb2>",
  "<g2 bb2 c3 d3>",
  "<ab2 eb3 c3 g2>",
]

<p1_Radio>bass: note(progressions[<pattern_index>])
  .sound("sawtooth")
  .lpf(700)
  .gain(0.8)

lead: n("<0 2 4 <6 7>>*4")
  .scale("C4:minor")
  .sound("square")
  .gain(0.4)

drums: s("bd*2 [~ sd] hh*4")
  .gain(1)

drums2: s("~ cp ~ [cp cp]")
  .gain(<drums2_gain>)

all(x => x.room(<reverb_amount>).postgain(<master_gain>))
"#;

/// A brighter four-chord tune in G with a square lead.
pub const POP_TUNE: &str = r#"setcps(1.1 * <tempo>)

<p1_Radio>lead: n("g5 fs5 d5 g5 fs5 d5")
  .sound("square")
  .gain(1.2)

bass: note("<g2 d2 e2 c2>")
  .sound("sawtooth")
  .gain(0.9)

chords: chord("<Gmaj7 Dmaj7 Em7 Cmaj7>").voicing()
  .sound("supersaw")
  .slow(2)
  .gain(0.7)

drums: stack(
  s("bd*2").gain(1.1),
  s("~ sd"),
  s("hh*4").gain(0.6),
  s("~ cp").gain(<drums2_gain>),
)

all(x => x.room(<reverb_amount>).postgain(<master_gain>))
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::template::{placeholders_in, Placeholder, PLACEHOLDERS};

    #[test]
    fn default_tune_uses_every_placeholder() {
        let used = placeholders_in(DEFAULT_TUNE);
        for p in PLACEHOLDERS {
            assert!(used.contains(&p), "missing {:?}", p);
        }
    }

    #[test]
    fn pop_tune_ignores_pattern_index() {
        let used = placeholders_in(POP_TUNE);
        assert_eq!(used.len(), PLACEHOLDERS.len() - 1);
        assert!(!used.contains(&Placeholder::PatternIndex));
    }
}
