//! Concrete, threaded runtime for the sequencing engine: wires [`mseq_core`]'s pure data model
//! and [`mseq_tracks`]'s config ingestion to real clock, dispatch, and MIDI I/O threads.

#![warn(missing_docs)]

mod clock;
mod cli;
mod dispatcher;
mod error;
mod midi_connection;
mod project;
mod registry;

pub use clock::Clock;
pub use cli::run as run_cli;
pub use dispatcher::Dispatcher;
pub use error::MSeqError;
pub use midi_connection::{decode, encode, MidiError, PhysicalOut};
pub use project::Project;
pub use registry::{InPort, PortRegistry};
