use log::warn;

use crate::{PatternError, SymbolMapper, Timing};

/// One note to emit, produced by [`SymbolPattern::get_notes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// MIDI note number.
    pub note: u8,
    /// Velocity, 1-127 (a rest never reaches this far).
    pub velocity: u8,
    /// The tick at which the corresponding note-off should fire.
    pub tick_off: u64,
}

/// A symbol-sequence pattern bound to one timbre (spec §3/§4.5).
///
/// `symbols` is the whitespace-tokenized pattern string; its length is the pattern's period in
/// beats. Stepping only happens on beat-aligned ticks, per `timing`.
pub struct SymbolPattern {
    symbols: Vec<String>,
    symbol_mapper: SymbolMapper,
    timing: Timing,
}

impl SymbolPattern {
    /// Build a pattern from an already-tokenized symbol sequence.
    pub fn new(symbols: Vec<String>, symbol_mapper: SymbolMapper, timing: Timing) -> Self {
        Self {
            symbols,
            symbol_mapper,
            timing,
        }
    }

    /// Tokenize a whitespace-separated pattern string (spec §4.5).
    pub fn tokenize(pattern: &str) -> Vec<String> {
        pattern.split_whitespace().map(str::to_owned).collect()
    }

    /// Every distinct symbol this pattern references, for config-time validation against a
    /// timbre's mapper.
    pub fn referenced_symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }

    /// Fail loud, at config-assembly time, if any step references a symbol absent from the
    /// pattern's mapper (spec §4.5: "unknown symbol -> error" during config; the runtime path in
    /// [`Self::get_notes`] instead logs and skips, per the documented open-question resolution).
    pub fn validate(&self) -> Result<(), PatternError> {
        for symbol in self.referenced_symbols() {
            if !self.symbol_mapper.map.contains_key(symbol) {
                return Err(PatternError::UnknownSymbol {
                    symbol: symbol.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Expand the pattern at `tick` (spec §4.5 algorithm).
    ///
    /// Returns `None` when `tick` is not beat-aligned, the step is a rest, or the step's symbol
    /// is unknown to the mapper (logged and skipped rather than treated as fatal at runtime; an
    /// unknown symbol is instead rejected during config assembly).
    pub fn get_notes(&self, tick: u64) -> Option<NoteEvent> {
        let beat = self.timing.get_beat(tick)?;
        if self.symbols.is_empty() {
            return None;
        }
        let step = (beat as usize) % self.symbols.len();
        let symbol = &self.symbols[step];

        let Some(mapping) = self.symbol_mapper.map.get(symbol) else {
            warn!("pattern step references unknown symbol {symbol:?}; skipping");
            return None;
        };
        if mapping.is_rest() {
            return None;
        }
        let Some(note) = mapping.note else {
            warn!("symbol {symbol:?} has a velocity but no resolved note; skipping");
            return None;
        };
        Some(NoteEvent {
            note,
            velocity: mapping.velocity.unwrap_or(0),
            tick_off: self.timing.get_next_tick_for_length(tick, 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SymbolMapping;

    fn mapper() -> SymbolMapper {
        SymbolMapper::new(
            None,
            None,
            [
                SymbolMapping {
                    symbol: "x".into(),
                    note: Some(36),
                    velocity: Some(100),
                },
                SymbolMapping {
                    symbol: ".".into(),
                    note: None,
                    velocity: None,
                },
            ],
        )
    }

    #[test]
    fn quarter_note_pattern_steps_on_beat_boundaries_only() {
        let pattern = SymbolPattern::new(
            SymbolPattern::tokenize("x . x ."),
            mapper(),
            Timing::new(4),
        );

        assert!(pattern.get_notes(0).is_some());
        assert!(pattern.get_notes(1).is_none()); // not beat-aligned
        assert!(pattern.get_notes(24).is_none()); // step 1 is a rest
        assert_eq!(pattern.get_notes(48).unwrap().note, 36); // step 2 wraps to "x"
    }

    #[test]
    fn note_on_carries_correct_tick_off() {
        let pattern = SymbolPattern::new(SymbolPattern::tokenize("x"), mapper(), Timing::new(4));
        let event = pattern.get_notes(0).unwrap();
        assert_eq!(event.tick_off, 24);
    }

    #[test]
    fn unknown_symbol_is_skipped_not_fatal() {
        let pattern = SymbolPattern::new(SymbolPattern::tokenize("z"), mapper(), Timing::new(4));
        assert!(pattern.get_notes(0).is_none());
    }

    #[test]
    fn validate_rejects_unknown_symbols_at_assembly_time() {
        let pattern = SymbolPattern::new(SymbolPattern::tokenize("x z"), mapper(), Timing::new(4));
        assert_eq!(
            pattern.validate(),
            Err(PatternError::UnknownSymbol { symbol: "z".to_string() })
        );
    }

    #[test]
    fn validate_accepts_patterns_with_only_known_symbols() {
        let pattern = SymbolPattern::new(SymbolPattern::tokenize("x . x"), mapper(), Timing::new(4));
        assert!(pattern.validate().is_ok());
    }

    #[test]
    fn empty_pattern_never_produces_a_note() {
        let pattern = SymbolPattern::new(Vec::new(), mapper(), Timing::new(4));
        assert!(pattern.get_notes(0).is_none());
    }
}
