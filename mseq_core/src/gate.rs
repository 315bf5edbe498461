use crate::{NoteEvent, Timing};

/// A plain gate/trigger pattern: one fixed note and velocity, retriggered on every non-rest step
/// (supplemental; grounded in `original_source/midi/sequencing.py`'s `GatePattern`, ported from a
/// per-character `itertools.cycle` iterator to the tick-indexed form the rest of this crate uses).
///
/// Unlike [`crate::SymbolPattern`], steps are single characters: any character other than `.` is
/// a trigger, `.` is a rest.
pub struct GatePattern {
    steps: Vec<char>,
    note: u8,
    velocity: u8,
    timing: Timing,
}

impl GatePattern {
    /// Build a gate pattern from its character steps.
    pub fn new(steps: impl Into<Vec<char>>, note: u8, velocity: u8, timing: Timing) -> Self {
        Self {
            steps: steps.into(),
            note,
            velocity,
            timing,
        }
    }

    /// Parse a gate pattern string: every non-whitespace character is one step.
    pub fn tokenize(pattern: &str) -> Vec<char> {
        pattern.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Expand the pattern at `tick`, mirroring [`crate::SymbolPattern::get_notes`]'s beat-gating
    /// and tick-off computation.
    pub fn get_notes(&self, tick: u64) -> Option<NoteEvent> {
        let beat = self.timing.get_beat(tick)?;
        if self.steps.is_empty() {
            return None;
        }
        let step = (beat as usize) % self.steps.len();
        if self.steps[step] == '.' {
            return None;
        }
        Some(NoteEvent {
            note: self.note,
            velocity: self.velocity,
            tick_off: self.timing.get_next_tick_for_length(tick, 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triggers_on_non_dot_steps_only() {
        let pattern = GatePattern::new(GatePattern::tokenize("x..x"), 36, 100, Timing::new(4));
        assert!(pattern.get_notes(0).is_some());
        assert!(pattern.get_notes(24).is_none());
        assert!(pattern.get_notes(48).is_none());
        assert!(pattern.get_notes(72).is_some());
    }

    #[test]
    fn off_beat_ticks_never_trigger() {
        let pattern = GatePattern::new(GatePattern::tokenize("x"), 36, 100, Timing::new(4));
        assert!(pattern.get_notes(1).is_none());
    }
}
