use mseq_core::MidiMessage;
use thiserror::Error;

/// Errors raised talking to the physical MIDI backend.
#[derive(Error, Debug)]
pub enum MidiError {
    /// Failed to enumerate or open an input port.
    #[error("midi input error: {0}")]
    Input(#[from] midir::InitError),
    /// Failed to connect to an input port.
    #[error("midi input connect error: {0}")]
    InputConnect(#[from] midir::ConnectError<midir::MidiInput>),
    /// Failed to connect to an output port.
    #[error("midi output connect error: {0}")]
    OutputConnect(#[from] midir::ConnectError<midir::MidiOutput>),
    /// Failed to write a message to an open output connection.
    #[error("midi send error: {0}")]
    Send(#[from] midir::SendError),
}

/// This trait should not be implemented outside this module. Its only purpose is to let the
/// dispatcher drain its queue through a uniform interface without depending on `midir` directly,
/// so the queue-draining logic stays testable with a fake.
pub trait PhysicalOut: Send {
    /// Write raw MIDI bytes to the port.
    fn send_raw(&mut self, bytes: &[u8]) -> Result<(), MidiError>;
}

impl PhysicalOut for midir::MidiOutputConnection {
    fn send_raw(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        self.send(bytes).map_err(MidiError::from)
    }
}

const NOTE_OFF: u8 = 0x80;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;
const CLOCK: u8 = 0xF8;
const START: u8 = 0xFA;
const CONTINUE: u8 = 0xFB;
const STOP: u8 = 0xFC;
const SONG_POSITION: u8 = 0xF2;
const RESET: u8 = 0xFF;

/// Encode a [`MidiMessage`] as raw MIDI bytes (spec §6 "Wire").
pub fn encode(message: &MidiMessage) -> Vec<u8> {
    match *message {
        MidiMessage::NoteOn { channel, note, velocity } => vec![NOTE_ON | channel, note, velocity],
        MidiMessage::NoteOff { channel, note, velocity } => vec![NOTE_OFF | channel, note, velocity],
        MidiMessage::ControlChange { channel, controller, value } => {
            vec![CONTROL_CHANGE | channel, controller, value]
        }
        MidiMessage::Clock => vec![CLOCK],
        MidiMessage::Start => vec![START],
        MidiMessage::Continue => vec![CONTINUE],
        MidiMessage::Stop => vec![STOP],
        MidiMessage::Reset => vec![RESET],
        MidiMessage::SongPosition { position } => {
            vec![SONG_POSITION, (position & 0x7F) as u8, ((position >> 7) & 0x7F) as u8]
        }
    }
}

/// Decode raw MIDI bytes received on an input port into a [`MidiMessage`], if recognized.
///
/// Unrecognized status bytes return `None` and are dropped silently (spec §7 "Unknown MIDI
/// message on input: dropped silently, not an error").
pub fn decode(bytes: &[u8]) -> Option<MidiMessage> {
    let status = *bytes.first()?;
    let kind = status & 0xF0;
    let channel = status & 0x0F;
    match kind {
        NOTE_ON => Some(MidiMessage::NoteOn {
            channel,
            note: *bytes.get(1)?,
            velocity: *bytes.get(2)?,
        }),
        NOTE_OFF => Some(MidiMessage::NoteOff {
            channel,
            note: *bytes.get(1)?,
            velocity: *bytes.get(2)?,
        }),
        CONTROL_CHANGE => Some(MidiMessage::ControlChange {
            channel,
            controller: *bytes.get(1)?,
            value: *bytes.get(2)?,
        }),
        _ => match status {
            CLOCK => Some(MidiMessage::Clock),
            START => Some(MidiMessage::Start),
            CONTINUE => Some(MidiMessage::Continue),
            STOP => Some(MidiMessage::Stop),
            RESET => Some(MidiMessage::Reset),
            SONG_POSITION => {
                let lsb = *bytes.get(1)? as u16;
                let msb = *bytes.get(2)? as u16;
                Some(MidiMessage::SongPosition {
                    position: lsb | (msb << 7),
                })
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_round_trips_through_the_wire_format() {
        let message = MidiMessage::NoteOn {
            channel: 9,
            note: 36,
            velocity: 100,
        };
        assert_eq!(decode(&encode(&message)), Some(message));
    }

    #[test]
    fn song_position_round_trips_through_the_wire_format() {
        let message = MidiMessage::SongPosition { position: 300 };
        assert_eq!(decode(&encode(&message)), Some(message));
    }

    #[test]
    fn unrecognized_status_byte_decodes_to_none() {
        assert_eq!(decode(&[0xF1, 0x00]), None);
    }

    #[test]
    fn empty_bytes_decode_to_none() {
        assert_eq!(decode(&[]), None);
    }
}
