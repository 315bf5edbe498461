use thiserror::Error;

use crate::midi_connection::MidiError;
use mseq_tracks::ConfigError;

/// Top-level error type covering everything that can go wrong assembling and running a project.
#[derive(Error, Debug)]
pub enum MSeqError {
    /// Failed to parse or resolve a config document.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Failed to talk to the physical MIDI backend.
    #[error(transparent)]
    Midi(#[from] MidiError),
}
