use std::collections::HashSet;
use std::sync::Arc;

use hashbrown::HashMap;

use mseq_core::{
    Dispatch, GatePattern, Instrument, MidiClockSender, ObserverList, OutChannel, PatternPlayer,
    PatternSource, PatternType, SymbolMapper, SymbolMapping, SymbolPattern, Timbre, Timing,
};

use crate::config::{
    ConnectorConfig, InstrumentConfig, PartConfig, PortConfig, ProjectConfig, SymbolMappingConfig,
};
use crate::error::ConfigError;

fn is_valid_channel(channel: u8) -> bool {
    channel <= 15
}

fn to_core_symbols(symbols: &[SymbolMappingConfig]) -> Vec<SymbolMapping> {
    symbols
        .iter()
        .map(|s| SymbolMapping {
            symbol: s.symbol.clone(),
            note: s.note,
            velocity: s.velocity,
        })
        .collect()
}

/// Check `ports:` for duplicate logical names (spec §9 open question: reject at assembly rather
/// than silently shadowing an earlier entry).
pub fn validate_port_config(config: &PortConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for port in &config.ports {
        let key = port.name.to_ascii_lowercase();
        if !seen.insert(key) {
            return Err(ConfigError::DuplicatePort {
                name: port.name.clone(),
            });
        }
    }
    Ok(())
}

fn build_instrument(cfg: &InstrumentConfig, dispatcher: Arc<dyn Dispatch>) -> Result<Instrument, ConfigError> {
    if !is_valid_channel(cfg.channel) {
        return Err(ConfigError::InvalidChannel { channel: cfg.channel });
    }
    let pattern_type_str = cfg.pattern_type.as_deref().unwrap_or("symbol");
    let pattern_type = PatternType::parse(pattern_type_str).ok_or_else(|| ConfigError::InvalidPatternType {
        instrument: cfg.name.clone(),
        value: pattern_type_str.to_string(),
    })?;

    let default_symbol_mapper = SymbolMapper::new(None, None, to_core_symbols(&cfg.defaults.symbols));
    let default_out = OutChannel::new(cfg.port.clone(), cfg.channel, dispatcher);

    let mut timbres = HashMap::new();
    for timbre_cfg in &cfg.timbres {
        let mapper = SymbolMapper::new(
            timbre_cfg.note,
            timbre_cfg.velocity,
            to_core_symbols(&timbre_cfg.symbols),
        );
        let timbre = Timbre::new(timbre_cfg.name.clone(), mapper, &default_symbol_mapper);
        timbres.insert(timbre_cfg.name.clone(), timbre);
    }

    Ok(Instrument {
        name: cfg.name.clone(),
        pattern_type,
        default_out,
        default_symbol_mapper,
        timbres,
    })
}

/// Build every `instruments:` entry, keyed by name.
pub fn build_instruments(
    instruments: &[InstrumentConfig],
    dispatcher: Arc<dyn Dispatch>,
) -> Result<HashMap<String, Instrument>, ConfigError> {
    instruments
        .iter()
        .map(|cfg| Ok((cfg.name.clone(), build_instrument(cfg, dispatcher.clone())?)))
        .collect()
}

fn build_pattern_player(
    instrument: &Instrument,
    pattern: PatternSource,
) -> PatternPlayer {
    let mut observers = ObserverList::new();
    observers.register_observer(Box::new(instrument.default_out.clone()));
    PatternPlayer::new(pattern, observers)
}

/// Build one [`PatternPlayer`] per `(timbre_name, pattern_string)` entry across every part (spec
/// §4.9). The per-entry symbol mapper is the part's own overrides layered onto the named
/// timbre's already-instrument-merged mapper, so a part can override a symbol without touching
/// the shared timbre definition.
pub fn build_players(
    parts: &[PartConfig],
    instruments: &HashMap<String, Instrument>,
) -> Result<Vec<PatternPlayer>, ConfigError> {
    let mut players = Vec::new();

    for part in parts {
        if part.denominator == 0 {
            return Err(ConfigError::InvalidDenominator {
                denominator: part.denominator,
            });
        }
        let instrument = instruments.get(&part.instrument).ok_or_else(|| ConfigError::UnknownInstrument {
            name: part.instrument.clone(),
        })?;

        let mut part_mapper = SymbolMapper::new(part.note, part.velocity, to_core_symbols(&part.symbols));
        part_mapper.apply_defaults(&instrument.default_symbol_mapper);

        let timing = Timing::new(part.denominator);

        for (timbre_name, pattern_string) in &part.patterns {
            let timbre = instrument.timbre(timbre_name).ok_or_else(|| ConfigError::UnknownTimbre {
                instrument: part.instrument.clone(),
                timbre: timbre_name.clone(),
            })?;

            let source = match instrument.pattern_type {
                PatternType::Symbol => {
                    let mut entry_mapper = part_mapper.clone();
                    entry_mapper.apply_defaults(&timbre.symbol_mapper);
                    let tokens = SymbolPattern::tokenize(pattern_string);
                    let pattern = SymbolPattern::new(tokens, entry_mapper, timing);
                    pattern.validate()?;
                    PatternSource::Symbol(pattern)
                }
                PatternType::Gate => {
                    let note = timbre
                        .symbol_mapper
                        .default_note
                        .or(part.note)
                        .ok_or_else(|| ConfigError::MissingGateNote {
                            instrument: part.instrument.clone(),
                            timbre: timbre_name.clone(),
                        })?;
                    let velocity = timbre.symbol_mapper.default_velocity.or(part.velocity).unwrap_or(100);
                    let steps = GatePattern::tokenize(pattern_string);
                    PatternSource::Gate(GatePattern::new(steps, note, velocity, timing))
                }
            };

            players.push(build_pattern_player(instrument, source));
        }
    }

    Ok(players)
}

/// Build one [`MidiClockSender`] per `clock_outputs:` entry.
pub fn build_clock_senders(project: &ProjectConfig, dispatcher: Arc<dyn Dispatch>) -> Vec<MidiClockSender> {
    project
        .clock_outputs
        .iter()
        .map(|entry| MidiClockSender::new(entry.out_port_name.clone(), dispatcher.clone()))
        .collect()
}

/// One resolved `connectors:` routing edge: the input side (port name + channel) and the output
/// side (port name + channel), both still logical. The project crate's port registry turns this
/// into an actual `InChannel` → `OutChannel` wire once its physical ports exist (spec §4.9).
pub struct ConnectorBinding {
    /// Logical input port name.
    pub in_port_name: String,
    /// Input MIDI channel.
    pub in_channel: u8,
    /// Logical output port name.
    pub out_port_name: String,
    /// Output MIDI channel to rewrite onto messages crossing this connector.
    pub out_channel: u8,
}

/// Validate every `connectors:` entry (spec §4.9, §8 scenario 6). Building the actual
/// `InChannel`/`OutChannel` wiring needs a physical port registry, which this crate never touches;
/// the caller does that with the logical names returned here.
pub fn build_connectors(project: &ProjectConfig) -> Result<Vec<ConnectorBinding>, ConfigError> {
    project
        .connectors
        .iter()
        .map(|connector: &ConnectorConfig| {
            if !is_valid_channel(connector.in_channel) {
                return Err(ConfigError::InvalidChannel {
                    channel: connector.in_channel,
                });
            }
            if !is_valid_channel(connector.out_channel) {
                return Err(ConfigError::InvalidChannel {
                    channel: connector.out_channel,
                });
            }
            Ok(ConnectorBinding {
                in_port_name: connector.in_port_name.clone(),
                in_channel: connector.in_channel,
                out_port_name: connector.out_port_name.clone(),
                out_channel: connector.out_channel,
            })
        })
        .collect()
}

/// Everything config ingestion can build without a physical port registry: instruments, pattern
/// players, clock senders, and every routing connector's still-logical endpoints.
pub struct Assembled {
    /// Instruments keyed by name, for diagnostics and further lookups by the caller.
    pub instruments: HashMap<String, Instrument>,
    /// One player per `(part, timbre, pattern)` entry.
    pub players: Vec<PatternPlayer>,
    /// One sender per `clock_outputs:` entry.
    pub clock_senders: Vec<MidiClockSender>,
    /// Every routing connector; the caller still must resolve each to an actual `InChannel`/
    /// `OutChannel` pair via its own port registry.
    pub connectors: Vec<ConnectorBinding>,
}

/// Build everything config ingestion is responsible for (spec §4.9 minus the physical port
/// registry, which the runtime crate owns).
pub fn assemble(project: &ProjectConfig, dispatcher: Arc<dyn Dispatch>) -> Result<Assembled, ConfigError> {
    let instruments = build_instruments(&project.instruments, dispatcher.clone())?;
    let players = build_players(&project.parts, &instruments)?;
    let clock_senders = build_clock_senders(project, dispatcher.clone());
    let connectors = build_connectors(project)?;

    Ok(Assembled {
        instruments,
        players,
        clock_senders,
        connectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClockOutputConfig, DefaultsConfig, TimbreConfig};
    use std::sync::Mutex;

    #[derive(Default)]
    struct NullDispatch(Mutex<Vec<(String, mseq_core::MidiMessage)>>);

    impl Dispatch for NullDispatch {
        fn queue_message(&self, port_name: &str, message: mseq_core::MidiMessage) {
            self.0.lock().unwrap().push((port_name.to_string(), message));
        }
    }

    fn dispatcher() -> Arc<dyn Dispatch> {
        Arc::new(NullDispatch::default())
    }

    fn sample_instrument() -> InstrumentConfig {
        InstrumentConfig {
            name: "kick".into(),
            pattern_type: None,
            port: "out1".into(),
            channel: 9,
            defaults: DefaultsConfig { symbols: vec![] },
            timbres: vec![TimbreConfig {
                name: "main".into(),
                note: Some(36),
                velocity: Some(100),
                symbols: vec![SymbolMappingConfig {
                    symbol: "x".into(),
                    note: None,
                    velocity: None,
                }],
            }],
        }
    }

    fn sample_part() -> PartConfig {
        let mut patterns = std::collections::BTreeMap::new();
        patterns.insert("main".to_string(), "x . x .".to_string());
        PartConfig {
            instrument: "kick".into(),
            denominator: 4,
            note: None,
            velocity: None,
            symbols: vec![],
            patterns,
        }
    }

    #[test]
    fn assemble_builds_one_player_per_pattern_entry() {
        let project = ProjectConfig {
            bpm: 120,
            clock_outputs: vec![ClockOutputConfig {
                out_port_name: "clk".into(),
            }],
            connectors: vec![],
            instruments: vec![sample_instrument()],
            parts: vec![sample_part()],
        };

        let assembled = assemble(&project, dispatcher()).unwrap();
        assert_eq!(assembled.players.len(), 1);
        assert_eq!(assembled.clock_senders.len(), 1);
        assert!(assembled.instruments.contains_key("kick"));
    }

    #[test]
    fn unknown_instrument_reference_fails_loud() {
        let project = ProjectConfig {
            bpm: 120,
            clock_outputs: vec![],
            connectors: vec![],
            instruments: vec![],
            parts: vec![sample_part()],
        };

        let err = assemble(&project, dispatcher()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInstrument { name } if name == "kick"));
    }

    #[test]
    fn unknown_timbre_reference_fails_loud() {
        let mut part = sample_part();
        part.patterns.clear();
        part.patterns.insert("missing".to_string(), "x".to_string());
        let project = ProjectConfig {
            bpm: 120,
            clock_outputs: vec![],
            connectors: vec![],
            instruments: vec![sample_instrument()],
            parts: vec![part],
        };

        let err = assemble(&project, dispatcher()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTimbre { .. }));
    }

    #[test]
    fn unknown_symbol_in_pattern_fails_loud_at_assembly() {
        let mut part = sample_part();
        part.patterns.insert("main".to_string(), "x z".to_string());
        let project = ProjectConfig {
            bpm: 120,
            clock_outputs: vec![],
            connectors: vec![],
            instruments: vec![sample_instrument()],
            parts: vec![part],
        };

        assert!(matches!(
            assemble(&project, dispatcher()),
            Err(ConfigError::UnknownSymbol(_))
        ));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let mut part = sample_part();
        part.denominator = 0;
        let project = ProjectConfig {
            bpm: 120,
            clock_outputs: vec![],
            connectors: vec![],
            instruments: vec![sample_instrument()],
            parts: vec![part],
        };

        assert!(matches!(
            assemble(&project, dispatcher()),
            Err(ConfigError::InvalidDenominator { denominator: 0 })
        ));
    }

    #[test]
    fn duplicate_port_names_are_rejected() {
        let config = PortConfig {
            ports: vec![
                crate::config::PortDef {
                    name: "Out".into(),
                    port_name: "Scarlett".into(),
                },
                crate::config::PortDef {
                    name: "out".into(),
                    port_name: "Other".into(),
                },
            ],
        };
        assert!(matches!(
            validate_port_config(&config),
            Err(ConfigError::DuplicatePort { .. })
        ));
    }
}
