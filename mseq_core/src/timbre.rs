use crate::SymbolMapper;

/// A named variant of an instrument with its own symbol-to-`(note, velocity)` map (spec §3).
///
/// A timbre's mapper is built from its own symbols and defaults, then merged
/// (`apply_defaults`) with the owning instrument's default mapper, so a timbre only needs to
/// specify what differs from the instrument-wide defaults.
#[derive(Debug, Clone)]
pub struct Timbre {
    /// The timbre's name, used as a key in an [`crate::Instrument`]'s `timbres` map and as the
    /// config-time key for the `patterns:` entries bound to it.
    pub name: String,
    /// This timbre's resolved symbol mapper.
    pub symbol_mapper: SymbolMapper,
}

impl Timbre {
    /// Build a timbre, merging `symbol_mapper` onto `instrument_default`.
    pub fn new(name: impl Into<String>, mut symbol_mapper: SymbolMapper, instrument_default: &SymbolMapper) -> Self {
        symbol_mapper.apply_defaults(instrument_default);
        Self {
            name: name.into(),
            symbol_mapper,
        }
    }
}
