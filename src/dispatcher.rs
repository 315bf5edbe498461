use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use hashbrown::HashMap;
use log::warn;
use mseq_core::{Dispatch, MidiMessage};

use crate::midi_connection::{encode, PhysicalOut};

enum Command {
    Send(String, MidiMessage),
    Stop,
}

/// The single consumer thread draining the dispatch queue and writing to physical outputs
/// (spec §4.3, C3). The *sole* writer to any physical output port; producers only ever touch the
/// queue via [`queue_message`](Dispatch::queue_message), which never blocks under normal load.
pub struct Dispatcher {
    sender: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Spawn the worker thread, taking ownership of every opened physical output connection.
    pub fn start(outputs: HashMap<String, Box<dyn PhysicalOut>>) -> Self {
        let (sender, receiver): (Sender<Command>, Receiver<Command>) = crossbeam_channel::unbounded();

        let worker = thread::spawn(move || Self::run(receiver, outputs));

        Self {
            sender,
            worker: Mutex::new(Some(worker)),
        }
    }

    fn run(receiver: Receiver<Command>, mut outputs: HashMap<String, Box<dyn PhysicalOut>>) {
        loop {
            match receiver.recv_timeout(Duration::from_millis(1)) {
                Ok(Command::Stop) => break,
                Ok(Command::Send(port_name, message)) => {
                    Self::send_to(&mut outputs, &port_name, message);
                    // Drain whatever else is already queued before sleeping again (spec §4.3:
                    // "in one wake-up, drain until empty, then sleep").
                    while let Ok(command) = receiver.try_recv() {
                        match command {
                            Command::Stop => return,
                            Command::Send(port_name, message) => {
                                Self::send_to(&mut outputs, &port_name, message)
                            }
                        }
                    }
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn send_to(outputs: &mut HashMap<String, Box<dyn PhysicalOut>>, port_name: &str, message: MidiMessage) {
        match outputs.get_mut(port_name) {
            Some(output) => {
                if let Err(err) = output.send_raw(&encode(&message)) {
                    warn!("failed to send to physical output {port_name:?}: {err}");
                }
            }
            None => {
                // Port was declared but never matched a physical output (or was never
                // declared at all by a misbehaving caller); spec §7 says this is never fatal.
                warn!("dropping message for absent physical output {port_name:?}");
            }
        }
    }

    /// Signal the worker thread to stop and join it. Messages still queued at this point may be
    /// discarded (spec §4.3 "Shutdown"). Idempotent: a second call is a no-op.
    pub fn stop(&self) {
        let _ = self.sender.send(Command::Stop);
        if let Some(worker) = self.worker.lock().unwrap().take() {
            let _ = worker.join();
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Dispatch for Dispatcher {
    fn queue_message(&self, port_name: &str, message: MidiMessage) {
        // An unbounded channel's send is always immediately ready; queue overflow (spec §4.3) is
        // a fatal configuration issue, not something this call needs to guard against at runtime.
        if self.sender.send(Command::Send(port_name.to_string(), message)).is_err() {
            warn!("dispatcher worker thread is gone; dropping message for {port_name:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi_connection::MidiError;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingOutput(Arc<Mutex<Vec<Vec<u8>>>>);

    impl PhysicalOut for RecordingOutput {
        fn send_raw(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
            self.0.lock().unwrap().push(bytes.to_vec());
            Ok(())
        }
    }

    #[test]
    fn messages_are_delivered_in_enqueue_order_per_port() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let mut outputs: HashMap<String, Box<dyn PhysicalOut>> = HashMap::new();
        outputs.insert("out".to_string(), Box::new(RecordingOutput(sent.clone())));

        let dispatcher = Dispatcher::start(outputs);
        dispatcher.queue_message("out", MidiMessage::Clock);
        dispatcher.queue_message("out", MidiMessage::Start);
        dispatcher.queue_message("out", MidiMessage::Stop);

        // Give the worker thread a moment to drain; deterministic ordering doesn't depend on
        // timing, only on the channel's FIFO guarantee, so a generous sleep is safe here.
        std::thread::sleep(Duration::from_millis(50));

        let messages = sent.lock().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], encode(&MidiMessage::Clock));
        assert_eq!(messages[1], encode(&MidiMessage::Start));
        assert_eq!(messages[2], encode(&MidiMessage::Stop));
    }

    #[test]
    fn messages_for_an_absent_port_are_dropped_not_fatal() {
        let dispatcher = Dispatcher::start(HashMap::new());
        dispatcher.queue_message("nonexistent", MidiMessage::Clock);
        std::thread::sleep(Duration::from_millis(20));
        // No panic, no crash: the dispatcher thread is still alive.
        dispatcher.queue_message("nonexistent", MidiMessage::Clock);
    }
}
