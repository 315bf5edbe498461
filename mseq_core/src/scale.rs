use crate::{Note, ScaleError};

/// A diatonic mode, identified by its interval pattern in semitones (spec §4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Major / Ionian: W-W-H-W-W-W-H.
    Major,
    /// Natural minor / Aeolian: W-H-W-W-H-W-W.
    Minor,
    /// Dorian.
    Dorian,
    /// Phrygian.
    Phrygian,
    /// Lydian.
    Lydian,
    /// Mixolydian.
    Mixolydian,
    /// Locrian.
    Locrian,
}

impl Mode {
    /// Parse a mode name, accepting the classical-mode alias for major/minor (`ionian`,
    /// `aeolian`/`aolian`). Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "major" | "ionian" => Some(Self::Major),
            "minor" | "aeolian" | "aolian" => Some(Self::Minor),
            "dorian" => Some(Self::Dorian),
            "phrygian" => Some(Self::Phrygian),
            "lydian" => Some(Self::Lydian),
            "mixolydian" => Some(Self::Mixolydian),
            "locrian" => Some(Self::Locrian),
            _ => None,
        }
    }

    /// The mode's interval pattern, in semitones between successive scale degrees.
    fn intervals(self) -> [u8; 7] {
        match self {
            Mode::Major => [2, 2, 1, 2, 2, 2, 1],
            Mode::Minor => [2, 1, 2, 2, 1, 2, 2],
            Mode::Dorian => [2, 1, 2, 2, 2, 1, 2],
            Mode::Phrygian => [1, 2, 2, 2, 1, 2, 2],
            Mode::Lydian => [2, 2, 2, 1, 2, 2, 1],
            Mode::Mixolydian => [2, 2, 1, 2, 2, 1, 2],
            Mode::Locrian => [1, 2, 2, 1, 2, 2, 2],
        }
    }
}

/// A sorted ascending set of legal MIDI note numbers, built by walking a mode's interval pattern
/// from a key's root and cycling octaves until `highest_note` is exhausted (spec §4.8).
#[derive(Debug, Clone)]
pub struct Scale {
    notes: Vec<u8>,
}

impl Scale {
    /// Build the scale for `key`/`mode`, restricted to `[lowest_note, highest_note]` and clipped
    /// to the valid MIDI range.
    pub fn new(key: Note, mode: Mode, lowest_note: u8, highest_note: u8) -> Self {
        let intervals = mode.intervals();
        let mut notes = Vec::new();
        let mut current: i32 = u8::from(key) as i32;
        let mut step = 0usize;

        while current <= highest_note as i32 && current <= 127 {
            if current >= lowest_note as i32 && current >= 0 {
                notes.push(current as u8);
            }
            current += intervals[step % intervals.len()] as i32;
            step += 1;
        }

        Self { notes }
    }

    /// Every note in the scale, ascending.
    pub fn get_notes(&self) -> &[u8] {
        &self.notes
    }

    /// The least scale note `>= note`, or [`ScaleError::OutOfRange`] if `note` is higher than
    /// every note in the scale (spec §4.8, resolving the source's open question to fail loud
    /// rather than silently return nothing).
    pub fn quantize_note(&self, note: u8) -> Result<u8, ScaleError> {
        self.notes
            .iter()
            .copied()
            .find(|&n| n >= note)
            .ok_or(ScaleError::OutOfRange { requested: note })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn c_major_one_octave_matches_known_pitch_classes() {
        let scale = Scale::new(Note::C, Mode::Major, 0, 12);
        assert_eq!(scale.get_notes(), &[0, 2, 4, 5, 7, 9, 11, 12]);
    }

    #[test]
    fn get_notes_is_strictly_ascending() {
        let scale = Scale::new(Note::D, Mode::Dorian, 0, 127);
        let notes = scale.get_notes();
        assert!(notes.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn quantize_note_rounds_up_to_nearest_scale_degree() {
        let scale = Scale::new(Note::C, Mode::Major, 0, 24);
        assert_eq!(scale.quantize_note(3).unwrap(), 4);
        assert_eq!(scale.quantize_note(0).unwrap(), 0);
    }

    #[test]
    fn quantize_note_above_range_is_out_of_range() {
        let scale = Scale::new(Note::C, Mode::Major, 0, 12);
        assert_eq!(
            scale.quantize_note(13),
            Err(ScaleError::OutOfRange { requested: 13 })
        );
    }
}
