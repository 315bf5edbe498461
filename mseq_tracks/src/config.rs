use std::collections::BTreeMap;

use serde::Deserialize;

/// One symbol-to-mapping entry as it appears in `symbols:` lists throughout the project config
/// (spec §6).
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolMappingConfig {
    /// The pattern token this entry resolves.
    pub symbol: String,
    /// MIDI note number, if this entry fixes one.
    pub note: Option<u8>,
    /// Velocity, if this entry fixes one. Unset or `0` means "rest".
    pub velocity: Option<u8>,
}

/// An instrument's `defaults:` block: symbols shared by every timbre that doesn't override them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DefaultsConfig {
    /// Default symbol entries.
    #[serde(default)]
    pub symbols: Vec<SymbolMappingConfig>,
}

/// One `timbres[]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TimbreConfig {
    /// Timbre name, referenced as a key in a part's `patterns:` map.
    pub name: String,
    /// This timbre's own default note, used both to fill its symbol entries and, for a
    /// gate-type instrument, as the fixed note every trigger step plays.
    pub note: Option<u8>,
    /// This timbre's own default velocity, analogous to `note`.
    pub velocity: Option<u8>,
    /// Symbol entries local to this timbre.
    #[serde(default)]
    pub symbols: Vec<SymbolMappingConfig>,
}

/// One `instruments[]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct InstrumentConfig {
    /// Instrument name, referenced by `parts[].instrument`.
    pub name: String,
    /// `"symbol"` (default) or `"gate"`.
    pub pattern_type: Option<String>,
    /// Logical output port name.
    pub port: String,
    /// MIDI channel, 0-15.
    pub channel: u8,
    /// Instrument-wide symbol defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Named timbre variants.
    #[serde(default)]
    pub timbres: Vec<TimbreConfig>,
}

/// One `parts[]` entry: one rhythmic voice bound to an instrument, possibly driving several of
/// its timbres at once via `patterns`.
#[derive(Debug, Clone, Deserialize)]
pub struct PartConfig {
    /// Name of the instrument this part plays through.
    pub instrument: String,
    /// Pattern-step subdivision (1 = whole note, 4 = quarter, 16 = sixteenth, ...).
    pub denominator: u32,
    /// This part's own default note, merged under the instrument's defaults.
    pub note: Option<u8>,
    /// This part's own default velocity, merged under the instrument's defaults.
    pub velocity: Option<u8>,
    /// Symbol entries local to this part.
    #[serde(default)]
    pub symbols: Vec<SymbolMappingConfig>,
    /// timbre name -> whitespace-tokenized pattern string. One [`crate::build::Assembled`]
    /// player is created per entry.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

/// One `clock_outputs[]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockOutputConfig {
    /// Logical output port the MIDI-clock sender targets.
    pub out_port_name: String,
}

/// One `connectors[]` entry: a static routing edge from an input channel to an output channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorConfig {
    /// Logical input port name.
    pub in_port_name: String,
    /// Input MIDI channel, 0-15.
    pub in_channel: u8,
    /// Logical output port name.
    pub out_port_name: String,
    /// Output MIDI channel, 0-15.
    pub out_channel: u8,
}

/// The project config document (spec §6): everything needed to assemble a running project other
/// than the physical port bindings, which come from [`PortConfig`].
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Tempo, in beats per minute.
    pub bpm: u32,
    /// MIDI-clock senders to build.
    #[serde(default)]
    pub clock_outputs: Vec<ClockOutputConfig>,
    /// Static input-to-output routing edges.
    #[serde(default)]
    pub connectors: Vec<ConnectorConfig>,
    /// Instrument definitions.
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
    /// Part definitions.
    #[serde(default)]
    pub parts: Vec<PartConfig>,
}

/// One `ports[]` entry in the port config document.
#[derive(Debug, Clone, Deserialize)]
pub struct PortDef {
    /// The logical name the project config refers to this port by. Matched case-insensitively.
    pub name: String,
    /// Prefix the physical MIDI port name must start with.
    pub port_name: String,
}

/// The port config document (spec §6): declares which logical names the project may route
/// through, and which physical ports they bind to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortConfig {
    /// Declared ports.
    #[serde(default)]
    pub ports: Vec<PortDef>,
}
