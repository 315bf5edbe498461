/// A MIDI message as understood by the engine's internal message bus.
///
/// Channel-carrying variants keep a `channel` field that [`crate::OutChannel`] rewrites on
/// egress (spec §4.1/§4.2); the real-time/system-common variants (`Clock`, `Start`, `Stop`,
/// `Continue`, `Reset`, `SongPosition`) have no channel, matching standard MIDI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note-on event.
    NoteOn {
        /// MIDI channel, 0-15.
        channel: u8,
        /// MIDI note number.
        note: u8,
        /// Velocity, 0-127.
        velocity: u8,
    },
    /// Note-off event.
    NoteOff {
        /// MIDI channel, 0-15.
        channel: u8,
        /// MIDI note number.
        note: u8,
        /// Velocity, 0-127 (commonly the velocity the note was struck with).
        velocity: u8,
    },
    /// Control-change event.
    ControlChange {
        /// MIDI channel, 0-15.
        channel: u8,
        /// Controller number.
        controller: u8,
        /// New controller value.
        value: u8,
    },
    /// MIDI timing clock. Sent 24 times per quarter note (PPQN) when synchronization is
    /// required.
    Clock,
    /// Start the sequence playing from the beginning.
    Start,
    /// Continue playing from the point the sequence was stopped.
    Continue,
    /// Stop the sequence.
    Stop,
    /// A transport/position reset, sent when a clock watcher restarts.
    Reset,
    /// Song position, in elapsed sixteenth notes since start.
    SongPosition {
        /// Elapsed sixteenth notes.
        position: u16,
    },
}

impl MidiMessage {
    /// The channel this message carries, if any.
    pub fn channel(&self) -> Option<u8> {
        match self {
            MidiMessage::NoteOn { channel, .. }
            | MidiMessage::NoteOff { channel, .. }
            | MidiMessage::ControlChange { channel, .. } => Some(*channel),
            _ => None,
        }
    }

    /// Returns a copy of this message with its channel rewritten to `channel`, if it carries
    /// one. Channel-less (system real-time) messages are returned unchanged.
    pub fn with_channel(&self, channel: u8) -> Self {
        let mut copy = *self;
        match &mut copy {
            MidiMessage::NoteOn { channel: c, .. }
            | MidiMessage::NoteOff { channel: c, .. }
            | MidiMessage::ControlChange { channel: c, .. } => *c = channel,
            _ => {}
        }
        copy
    }
}
