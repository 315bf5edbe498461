use core::{convert, fmt};

use serde::Deserialize;

/// Represents 1 note of the chromatic scale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Note {
    #[default]
    /// C
    C,
    /// C# or Db
    CS,
    /// D
    D,
    /// D# or Eb
    DS,
    /// E
    E,
    /// F
    F,
    /// F# or Gb
    FS,
    /// G
    G,
    /// G# or Ab
    GS,
    /// A
    A,
    /// A# or Bb
    AS,
    /// B
    B,
}

impl convert::From<Note> for u8 {
    fn from(note: Note) -> Self {
        match note {
            Note::C => 0,
            Note::CS => 1,
            Note::D => 2,
            Note::DS => 3,
            Note::E => 4,
            Note::F => 5,
            Note::FS => 6,
            Note::G => 7,
            Note::GS => 8,
            Note::A => 9,
            Note::AS => 10,
            Note::B => 11,
        }
    }
}

impl From<u8> for Note {
    fn from(midi: u8) -> Self {
        match midi % 12 {
            0 => Note::C,
            1 => Note::CS,
            2 => Note::D,
            3 => Note::DS,
            4 => Note::E,
            5 => Note::F,
            6 => Note::FS,
            7 => Note::G,
            8 => Note::GS,
            9 => Note::A,
            10 => Note::AS,
            _ => Note::B,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let str = match self {
            Note::C => "C",
            Note::CS => "C#",
            Note::D => "D",
            Note::DS => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FS => "F#",
            Note::G => "G",
            Note::GS => "G#",
            Note::A => "A",
            Note::AS => "A#",
            Note::B => "B",
        };
        write!(f, "{}", str)
    }
}

impl Note {
    /// Number of semitones required to transpose from `root` to `note`. Results range from -5 to
    /// 6 to minimize the pitch difference with the original note.
    pub fn transpose(root: Note, note: Note) -> i8 {
        let root_m: u8 = root.into();
        let note_m: u8 = note.into();
        let n = (note_m as i8 - root_m as i8).rem_euclid(12);
        if n > 6 {
            n - 12
        } else {
            n
        }
    }
}

/// A concrete MIDI note: pitch class, octave, and velocity.
///
/// `octave` follows the same convention as the rest of the engine: MIDI note number
/// `= u8::from(note) + 12 * octave`, clipped to the valid MIDI range `0..=127`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MidiNote {
    /// Pitch class.
    pub note: Note,
    /// Octave number.
    pub octave: u8,
    /// Velocity (0-127).
    pub vel: u8,
}

impl MidiNote {
    /// Build a new [`MidiNote`].
    pub fn new(note: Note, octave: u8, vel: u8) -> Self {
        Self { note, octave, vel }
    }

    /// The absolute MIDI note number, clipped to `0..=127`.
    pub fn midi_value(&self) -> u8 {
        let value = u8::from(self.note) as u32 + 12 * self.octave as u32;
        value.min(127) as u8
    }

    /// Returns a copy of this note transposed by `semitones`.
    pub fn transpose(&self, semitones: i8) -> Self {
        let value = self.midi_value() as i32 + semitones as i32;
        let value = value.clamp(0, 127) as u8;
        Self {
            note: Note::from(value),
            octave: value / 12,
            vel: self.vel,
        }
    }
}
