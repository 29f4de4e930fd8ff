// Loads the control-set config and template files named on the command line.
// Session state itself is never written back; each run starts fresh.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context};

use crate::pipeline::controls::{ControlId, ControlKind, ControlSet};

/// Read a JSON array of `{name, kind, ...range}` entries.
pub fn load_controls(path: &Path) -> anyhow::Result<ControlSet> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading control config {}", path.display()))?;
    let set: ControlSet = serde_json::from_str(&data)
        .with_context(|| format!("parsing control config {}", path.display()))?;
    validate(&set)?;
    Ok(set)
}

pub fn load_template(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}

/// The control set as pretty JSON, a starting point for a config file.
pub fn controls_to_json(set: &ControlSet) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(set)?)
}

pub fn validate(set: &ControlSet) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for spec in &set.specs {
        if !seen.insert(spec.name) {
            bail!("control {:?} is declared twice", spec.name);
        }
        if !kind_fits(spec.name, &spec.kind) {
            bail!("control {:?} cannot be a {} control", spec.name, kind_name(&spec.kind));
        }
        match spec.kind {
            ControlKind::Toggle => {}
            ControlKind::Float { min, max, step } => {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    bail!("control {:?}: bad range {}..{}", spec.name, min, max);
                }
                if !(step.is_finite() && step > 0.0) {
                    bail!("control {:?}: step must be positive", spec.name);
                }
            }
            ControlKind::Int { min, max } => {
                if min > max {
                    bail!("control {:?}: bad range {}..{}", spec.name, min, max);
                }
            }
        }
    }
    Ok(())
}

// Each control feeds one placeholder format, so its kind is fixed.
fn kind_fits(id: ControlId, kind: &ControlKind) -> bool {
    matches!(
        (id, kind),
        (ControlId::P1Radio | ControlId::ExtraDrums, ControlKind::Toggle)
            | (
                ControlId::Tempo | ControlId::MasterGain | ControlId::ReverbAmount,
                ControlKind::Float { .. }
            )
            | (ControlId::PatternIndex, ControlKind::Int { .. })
    )
}

fn kind_name(kind: &ControlKind) -> &'static str {
    match kind {
        ControlKind::Toggle => "toggle",
        ControlKind::Float { .. } => "float",
        ControlKind::Int { .. } => "int",
    }
}
