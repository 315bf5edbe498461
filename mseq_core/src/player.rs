use std::collections::BTreeMap;

use crate::{ClockWatcher, GatePattern, MidiMessage, NoteEvent, ObserverList, SymbolPattern};

/// The pattern algorithms a [`PatternPlayer`] can drive.
pub enum PatternSource {
    /// A symbol-sequence pattern (spec §4.5).
    Symbol(SymbolPattern),
    /// A gate/trigger pattern (supplemental, see SPEC_FULL.md).
    Gate(GatePattern),
}

impl PatternSource {
    fn get_notes(&self, tick: u64) -> Option<NoteEvent> {
        match self {
            PatternSource::Symbol(pattern) => pattern.get_notes(tick),
            PatternSource::Gate(pattern) => pattern.get_notes(tick),
        }
    }
}

/// Drives one pattern against the tempo clock, turning [`NoteEvent`]s into `note_on`/`note_off`
/// pairs on its own message source (spec §4.6).
///
/// Pending note-offs are kept in a tick-ordered map keyed by `(tick_off, insertion_seq)`, so ties
/// at the same `tick_off` resolve in the order the notes were struck (FIFO), without needing a
/// separate queue alongside the ordering structure.
pub struct PatternPlayer {
    pattern: PatternSource,
    observers: ObserverList,
    pending_offs: BTreeMap<(u64, u64), (u8, u8)>,
    next_seq: u64,
}

impl PatternPlayer {
    /// Build a player for `pattern`, broadcasting note messages to `observers` (typically a
    /// single [`crate::OutChannel`] registered at assembly time).
    pub fn new(pattern: PatternSource, observers: ObserverList) -> Self {
        Self {
            pattern,
            observers,
            pending_offs: BTreeMap::new(),
            next_seq: 0,
        }
    }

    fn pop_due_offs(&mut self, tick: u64) -> Vec<(u8, u8)> {
        let due: Vec<(u64, u64)> = self
            .pending_offs
            .range(..=(tick, u64::MAX))
            .map(|(key, _)| *key)
            .collect();
        due.into_iter()
            .map(|key| self.pending_offs.remove(&key).expect("key just observed in range"))
            .collect()
    }

    fn flush_all_offs(&mut self) {
        let pending = std::mem::take(&mut self.pending_offs);
        for (_, (note, velocity)) in pending {
            self.observers.send_message(MidiMessage::NoteOff { channel: 0, note, velocity });
        }
    }
}

impl ClockWatcher for PatternPlayer {
    fn tick(&mut self, tick: u64) {
        // All note-offs due at or before this tick precede any new note-on (spec §4.6).
        for (note, velocity) in self.pop_due_offs(tick) {
            self.observers.send_message(MidiMessage::NoteOff { channel: 0, note, velocity });
        }

        if let Some(event) = self.pattern.get_notes(tick) {
            self.observers.send_message(MidiMessage::NoteOn {
                channel: 0,
                note: event.note,
                velocity: event.velocity,
            });
            let seq = self.next_seq;
            self.next_seq += 1;
            self.pending_offs.insert((event.tick_off, seq), (event.note, event.velocity));
        }
    }

    fn restart(&mut self) {
        self.pending_offs.clear();
        self.next_seq = 0;
    }

    fn stop(&mut self) {
        // Resolves the open question in favor of flushing: avoids stuck notes on external gear.
        self.flush_all_offs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SymbolMapping;
    use crate::{MessageDestination, SymbolMapper, Timing};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<MidiMessage>>);

    impl MessageDestination for Recorder {
        fn receive_message(&self, message: &MidiMessage) {
            self.0.lock().unwrap().push(*message);
        }
    }

    fn symbol_player(pattern: &str) -> (PatternPlayer, Arc<Recorder>) {
        let mapper = SymbolMapper::new(
            None,
            None,
            [SymbolMapping {
                symbol: "x".into(),
                note: Some(36),
                velocity: Some(100),
            }],
        );
        let source = PatternSource::Symbol(SymbolPattern::new(
            SymbolPattern::tokenize(pattern),
            mapper,
            Timing::new(4),
        ));
        let recorder = Arc::new(Recorder::default());
        let mut observers = ObserverList::new();
        observers.register_observer(Box::new(recorder.clone()));
        (PatternPlayer::new(source, observers), recorder)
    }

    #[test]
    fn note_off_precedes_note_on_on_the_same_tick() {
        // A one-step "x" pattern at denominator 4: every quarter note retriggers immediately,
        // so the pending off from the previous hit lands on the exact tick the next one fires.
        let (mut player, recorder) = symbol_player("x");
        player.tick(0);
        player.tick(24);

        let messages = recorder.0.lock().unwrap();
        // tick 0: note_on. tick 24: note_off (from tick 0's hit) then note_on.
        assert_eq!(messages.len(), 3);
        assert!(matches!(messages[0], MidiMessage::NoteOn { .. }));
        assert!(matches!(messages[1], MidiMessage::NoteOff { .. }));
        assert!(matches!(messages[2], MidiMessage::NoteOn { .. }));
    }

    #[test]
    fn stop_flushes_pending_note_offs() {
        let (mut player, recorder) = symbol_player("x .");
        player.tick(0);
        assert_eq!(recorder.0.lock().unwrap().len(), 1);

        player.stop();
        let messages = recorder.0.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[1], MidiMessage::NoteOff { .. }));
    }

    #[test]
    fn restart_clears_pending_offs_without_emitting() {
        let (mut player, recorder) = symbol_player("x .");
        player.tick(0);
        player.restart();
        player.stop();

        // restart silently drops the pending off; stop has nothing left to flush.
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }
}
