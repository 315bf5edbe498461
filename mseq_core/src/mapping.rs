use hashbrown::HashMap;
use serde::Deserialize;

/// One symbol's resolved mapping to a `(note, velocity)` pair (spec §3).
///
/// A mapping with `velocity` unset or `0` denotes a rest: no note is emitted for that symbol.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolMapping {
    /// The symbol token this mapping is keyed by.
    pub symbol: String,
    /// MIDI note number, if resolved.
    pub note: Option<u8>,
    /// Velocity, if resolved. `None` or `Some(0)` means "rest".
    pub velocity: Option<u8>,
}

impl SymbolMapping {
    /// Whether this mapping denotes a rest (no note emitted).
    pub fn is_rest(&self) -> bool {
        matches!(self.velocity, None | Some(0))
    }
}

/// A symbol-to-mapping table with optional defaults used to fill in unset fields (spec §3).
#[derive(Debug, Clone, Default)]
pub struct SymbolMapper {
    /// Default note used to fill mappings with no note set.
    pub default_note: Option<u8>,
    /// Default velocity used to fill mappings with no velocity set.
    pub default_velocity: Option<u8>,
    /// Symbol -> mapping table.
    pub map: HashMap<String, SymbolMapping>,
}

impl SymbolMapper {
    /// Build a mapper from its own defaults and local symbol mappings, filling unset fields on
    /// each local mapping from the defaults given here.
    pub fn new(
        default_note: Option<u8>,
        default_velocity: Option<u8>,
        symbols: impl IntoIterator<Item = SymbolMapping>,
    ) -> Self {
        let mut map = HashMap::new();
        for mut mapping in symbols {
            if mapping.note.is_none() {
                mapping.note = default_note;
            }
            if mapping.velocity.is_none() {
                mapping.velocity = default_velocity;
            }
            map.insert(mapping.symbol.clone(), mapping);
        }
        Self {
            default_note,
            default_velocity,
            map,
        }
    }

    /// Merge `parent` into `self` (spec §3 "merge rule"):
    ///
    /// - For every symbol in `parent` not present locally, deep-copy it in and fill any unset
    ///   `note`/`velocity` with *this* mapper's defaults.
    /// - For symbols present locally, fill unset `note`/`velocity` from `parent.map[symbol]`.
    ///
    /// Idempotent: applying the same `parent` twice leaves `self` unchanged after the first
    /// application, since this only ever fills a gap, never overwrites a resolved value.
    pub fn apply_defaults(&mut self, parent: &SymbolMapper) {
        for (symbol, parent_mapping) in parent.map.iter() {
            match self.map.get_mut(symbol) {
                Some(local) => {
                    if local.note.is_none() {
                        local.note = parent_mapping.note;
                    }
                    if local.velocity.is_none() {
                        local.velocity = parent_mapping.velocity;
                    }
                }
                None => {
                    let mut copied = parent_mapping.clone();
                    if copied.note.is_none() {
                        copied.note = self.default_note;
                    }
                    if copied.velocity.is_none() {
                        copied.velocity = self.default_velocity;
                    }
                    self.map.insert(symbol.clone(), copied);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(symbol: &str, note: Option<u8>, velocity: Option<u8>) -> SymbolMapping {
        SymbolMapping {
            symbol: symbol.to_string(),
            note,
            velocity,
        }
    }

    #[test]
    fn apply_defaults_fills_gaps_from_parent_and_local_defaults() {
        let parent = SymbolMapper::new(
            Some(36),
            Some(100),
            [mapping("x", None, None), mapping("o", Some(42), Some(80))],
        );

        // Local mapper only knows "x" (with an explicit velocity override) and has its own
        // defaults distinct from the parent's.
        let mut local = SymbolMapper::new(Some(50), Some(10), [mapping("x", None, Some(127))]);

        local.apply_defaults(&parent);

        // "x" was present locally: unset `note` filled from parent.map["x"] (which itself
        // resolved to the parent's defaults), velocity untouched (already set locally).
        let x = &local.map["x"];
        assert_eq!(x.note, Some(36));
        assert_eq!(x.velocity, Some(127));

        // "o" was absent locally: deep-copied from parent, with unset fields (there are none
        // here) filled from *local* defaults, not the parent's.
        let o = &local.map["o"];
        assert_eq!(o.note, Some(42));
        assert_eq!(o.velocity, Some(80));
    }

    #[test]
    fn apply_defaults_is_idempotent() {
        let parent = SymbolMapper::new(Some(36), Some(100), [mapping("x", None, None)]);
        let mut once = SymbolMapper::new(None, None, [mapping("x", None, None), mapping("o", None, None)]);
        once.apply_defaults(&parent);

        let mut twice = once.clone();
        twice.apply_defaults(&parent);

        assert_eq!(once.map["x"].note, twice.map["x"].note);
        assert_eq!(once.map["x"].velocity, twice.map["x"].velocity);
        assert_eq!(once.map["o"].note, twice.map["o"].note);
        assert_eq!(once.map["o"].velocity, twice.map["o"].velocity);
    }

    #[test]
    fn rest_symbol_has_no_velocity_or_zero_velocity() {
        assert!(mapping("r", Some(40), None).is_rest());
        assert!(mapping("r", Some(40), Some(0)).is_rest());
        assert!(!mapping("r", Some(40), Some(1)).is_rest());
    }
}
