//! Pure, IO-agnostic core of the sequencing engine: the data model, pattern-expansion algorithms,
//! and the watcher/observer traits the concrete runtime wires up to real clocks and real MIDI
//! ports. Nothing in this crate touches a thread, a clock, or a wire format.

#![warn(missing_docs)]

mod clock_watcher;
mod clocksender;
mod error;
mod gate;
mod instrument;
mod mapping;
mod message;
mod midi;
mod note;
mod pattern;
mod player;
mod scale;
mod timbre;
mod timing;

pub use clock_watcher::{ClockWatcher, PPQN};
pub use clocksender::MidiClockSender;
pub use error::{PatternError, ScaleError};
pub use gate::GatePattern;
pub use instrument::{Instrument, PatternType};
pub use mapping::{SymbolMapper, SymbolMapping};
pub use message::{Dispatch, InChannel, MessageDestination, ObserverList, OutChannel};
pub use midi::MidiMessage;
pub use note::{MidiNote, Note};
pub use pattern::{NoteEvent, SymbolPattern};
pub use player::{PatternPlayer, PatternSource};
pub use scale::{Mode, Scale};
pub use timbre::Timbre;
pub use timing::Timing;
