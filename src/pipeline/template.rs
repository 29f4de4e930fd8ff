// Placeholder substitution. Turns the annotated template plus the current
// control values into the text handed to the live-coding engine.

use crate::pipeline::controls::ControlValues;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placeholder {
    P1Radio,
    Tempo,
    MasterGain,
    ReverbAmount,
    PatternIndex,
    Drums2Gain,
}

pub const PLACEHOLDERS: [Placeholder; 6] = [
    Placeholder::P1Radio,
    Placeholder::Tempo,
    Placeholder::MasterGain,
    Placeholder::ReverbAmount,
    Placeholder::PatternIndex,
    Placeholder::Drums2Gain,
];

impl Placeholder {
    /// Name between the angle brackets.
    pub fn name(self) -> &'static str {
        match self {
            Placeholder::P1Radio => "p1_Radio",
            Placeholder::Tempo => "tempo",
            Placeholder::MasterGain => "master_gain",
            Placeholder::ReverbAmount => "reverb_amount",
            Placeholder::PatternIndex => "pattern_index",
            Placeholder::Drums2Gain => "drums2_gain",
        }
    }

    pub fn tag(self) -> String {
        format!("<{}>", self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        PLACEHOLDERS.into_iter().find(|p| p.name() == name)
    }

    /// Replacement text for this placeholder. `_` is the pattern language's
    /// silence prefix, so a hushed p1 mutes the voice it precedes.
    pub fn render(self, values: &ControlValues) -> String {
        match self {
            Placeholder::P1Radio => (if values.p1_hush { "_" } else { "" }).to_string(),
            Placeholder::Tempo => format!("{:.2}", values.tempo),
            Placeholder::MasterGain => format!("{:.2}", values.master_gain),
            Placeholder::ReverbAmount => format!("{:.2}", values.reverb_amount),
            Placeholder::PatternIndex => values.pattern_index.to_string(),
            Placeholder::Drums2Gain => (if values.extra_drums { "1" } else { "0" }).to_string(),
        }
    }
}

/// Substitute every known `<name>` tag in `template`.
///
/// The template is scanned once, left to right, so replacement text is never
/// rescanned and the result does not depend on the order placeholders are
/// listed in. Anything in angle brackets that is not a known name (mini
/// notation like `<c3 e3>` included) is copied through unchanged.
pub fn process(template: &str, values: &ControlValues) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match match_tag(tail) {
            Some((placeholder, len)) => {
                out.push_str(&placeholder.render(values));
                rest = &tail[len..];
            }
            None => {
                out.push('<');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Known placeholders used by `template`, in order of first appearance.
pub fn placeholders_in(template: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('<') {
        let tail = &rest[open..];
        match match_tag(tail) {
            Some((placeholder, len)) => {
                if !found.contains(&placeholder) {
                    found.push(placeholder);
                }
                rest = &tail[len..];
            }
            None => rest = &tail[1..],
        }
    }
    found
}

// `tail` starts with '<'. Returns the placeholder and the byte length of its tag.
fn match_tag(tail: &str) -> Option<(Placeholder, usize)> {
    let close = tail[1..].find(|c: char| c == '>' || c == '<')? + 1;
    if tail.as_bytes()[close] != b'>' {
        return None;
    }
    Placeholder::from_name(&tail[1..close]).map(|p| (p, close + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> ControlValues {
        ControlValues::default()
    }

    #[test]
    fn formats_floats_with_two_decimals() {
        let mut v = values();
        v.tempo = 1.0;
        assert_eq!(process("<tempo>", &v), "1.00");
        v.tempo = 0.5;
        assert_eq!(process("<tempo>", &v), "0.50");
        v.master_gain = 2.0;
        assert_eq!(process("<master_gain>", &v), "2.00");
        v.reverb_amount = 0.6;
        assert_eq!(process("<reverb_amount>", &v), "0.60");
    }

    #[test]
    fn pattern_index_is_a_plain_integer() {
        let mut v = values();
        v.pattern_index = 2;
        assert_eq!(process("<pattern_index>", &v), "2");
    }

    #[test]
    fn drum_toggle_and_p1_radio() {
        let mut v = values();
        v.extra_drums = true;
        assert_eq!(process("<drums2_gain>", &v), "1");
        v.extra_drums = false;
        assert_eq!(process("<drums2_gain>", &v), "0");
        v.p1_hush = true;
        assert_eq!(process("<p1_Radio>", &v), "_");
        v.p1_hush = false;
        assert_eq!(process("<p1_Radio>", &v), "");
    }

    #[test]
    fn replaces_every_occurrence() {
        let mut v = values();
        v.tempo = 1.5;
        assert_eq!(
            process("<tempo> <tempo>\n<tempo>", &v),
            "1.50 1.50\n1.50"
        );
    }

    #[test]
    fn unknown_tags_pass_through() {
        let t = "<foo> n(\"<c3 e3 g3>\") <Tempo> <tempo";
        assert_eq!(process(t, &values()), t);
    }

    #[test]
    fn nested_bracket_before_tag() {
        assert_eq!(process("<<tempo>>", &values()), "<1.00>");
        assert_eq!(process("<a <tempo>", &values()), "<a 1.00");
    }

    #[test]
    fn out_of_range_values_are_not_clamped() {
        let mut v = values();
        v.tempo = 7.1;
        v.master_gain = -1.0;
        v.pattern_index = -3;
        assert_eq!(
            process("<tempo>|<master_gain>|<pattern_index>", &v),
            "7.10|-1.00|-3"
        );
    }

    #[test]
    fn deterministic() {
        let t = "setcps(<tempo>) <p1_Radio>x <unknown> <drums2_gain>";
        let v = values();
        assert_eq!(process(t, &v), process(t, &v));
    }

    #[test]
    fn end_to_end_hushed_voice() {
        let mut v = values();
        v.tempo = 1.25;
        v.p1_hush = true;
        v.master_gain = 0.8;
        let t = "setcps(<tempo>) # <p1_Radio>sound(\"bd\") # gain <master_gain>";
        assert_eq!(
            process(t, &v),
            "setcps(1.25) # _sound(\"bd\") # gain 0.80"
        );
    }

    #[test]
    fn end_to_end_defaults() {
        assert_eq!(
            process("<drums2_gain>-<pattern_index>-<tempo>", &values()),
            "1-0-1.00"
        );
    }

    #[test]
    fn multibyte_text_survives() {
        let t = "✅ <tempo> é";
        assert_eq!(process(t, &values()), "✅ 1.00 é");
    }

    #[test]
    fn lists_used_placeholders_once() {
        let found = placeholders_in("<tempo><foo><p1_Radio> <tempo>");
        assert_eq!(found, vec![Placeholder::Tempo, Placeholder::P1Radio]);
        assert_eq!(Placeholder::Drums2Gain.tag(), "<drums2_gain>");
    }
}
