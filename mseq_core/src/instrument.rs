use hashbrown::HashMap;

use crate::{OutChannel, SymbolMapper, Timbre};

/// Which playback algorithm a `Part`'s patterns use (spec §4.9, supplemental: see SPEC_FULL.md
/// §4 "Instrument-level pattern-type tag").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    /// The default: symbol-sequence patterns expanded through a [`crate::SymbolPattern`] (spec
    /// §4.5/§4.6).
    Symbol,
    /// A plain gate/trigger pattern: retrigger the instrument's single configured note on every
    /// `x` step, silence on every `.` (grounded in `original_source/midi/sequencing.py`'s
    /// `GatePattern`).
    Gate,
}

impl PatternType {
    /// Parse the config-time `pattern_type` string. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "symbol" => Some(Self::Symbol),
            "gate" => Some(Self::Gate),
            _ => None,
        }
    }
}

/// A configured instrument: its default out-channel, default symbol mapper, and named timbres
/// (spec §3).
pub struct Instrument {
    /// Instrument name, as referenced by `parts[].instrument` in the project config.
    pub name: String,
    /// Which pattern algorithm this instrument's parts use.
    pub pattern_type: PatternType,
    /// The channel every note this instrument plays is ultimately routed through, absent
    /// per-pattern overrides.
    pub default_out: OutChannel,
    /// The instrument-wide default symbol mapper every timbre's mapper merges onto.
    pub default_symbol_mapper: SymbolMapper,
    /// Named timbre variants.
    pub timbres: HashMap<String, Timbre>,
}

impl Instrument {
    /// Look up a named timbre.
    pub fn timbre(&self, name: &str) -> Option<&Timbre> {
        self.timbres.get(name)
    }
}
