use std::sync::Mutex;

use mseq_core::{Dispatch, MidiMessage};

/// A fake `Dispatch` that records every enqueued message instead of writing to a physical port,
/// mirroring the teacher's `DebugMidiConnection` test fixture.
#[derive(Default)]
pub struct Recorder(Mutex<Vec<(String, MidiMessage)>>);

impl Dispatch for Recorder {
    fn queue_message(&self, port_name: &str, message: MidiMessage) {
        self.0.lock().unwrap().push((port_name.to_string(), message));
    }
}

impl Recorder {
    pub fn messages(&self) -> Vec<(String, MidiMessage)> {
        self.0.lock().unwrap().clone()
    }
}
