use crate::{ClockWatcher, Dispatch, MidiMessage, PPQN};
use std::sync::Arc;

/// Broadcasts MIDI clock/transport messages to one physical output, one per `clock_outputs[]`
/// entry (spec §4.7).
///
/// Enqueues directly onto the [`Dispatch`] queue rather than through an [`crate::ObserverList`]:
/// clock messages carry no channel, so there is nothing for an [`crate::OutChannel`] to rewrite.
pub struct MidiClockSender {
    port_name: String,
    dispatcher: Arc<dyn Dispatch>,
}

impl MidiClockSender {
    /// Build a sender targeting `port_name` on `dispatcher`.
    pub fn new(port_name: impl Into<String>, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            port_name: port_name.into(),
            dispatcher,
        }
    }

    fn send(&self, message: MidiMessage) {
        self.dispatcher.queue_message(&self.port_name, message);
    }
}

impl ClockWatcher for MidiClockSender {
    fn tick(&mut self, tick: u64) {
        let pulses_per_16th = (PPQN / 4) as u64;
        // Songpos is enqueued before clock on a coincident tick: a receiver that processes this
        // port's queue in order always sees its position update take effect before the pulse
        // that reports it (spec §4.7, resolving the order-is-unspecified open question).
        if tick % pulses_per_16th == 0 {
            self.send(MidiMessage::SongPosition {
                position: (tick / pulses_per_16th) as u16,
            });
        }
        self.send(MidiMessage::Clock);
    }

    fn start(&mut self) {
        self.send(MidiMessage::Start);
    }

    fn stop(&mut self) {
        self.send(MidiMessage::Stop);
    }

    fn restart(&mut self) {
        self.send(MidiMessage::Reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<(String, MidiMessage)>>);

    impl Dispatch for Recorder {
        fn queue_message(&self, port_name: &str, message: MidiMessage) {
            self.0.lock().unwrap().push((port_name.to_string(), message));
        }
    }

    #[test]
    fn songpos_precedes_clock_on_sixteenth_boundaries() {
        let recorder = Arc::new(Recorder::default());
        let mut sender = MidiClockSender::new("out", recorder.clone());

        sender.tick(0);

        let messages = recorder.0.lock().unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0].1, MidiMessage::SongPosition { position: 0 }));
        assert!(matches!(messages[1].1, MidiMessage::Clock));
    }

    #[test]
    fn non_sixteenth_ticks_emit_only_clock() {
        let recorder = Arc::new(Recorder::default());
        let mut sender = MidiClockSender::new("out", recorder.clone());

        sender.tick(1);

        let messages = recorder.0.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0].1, MidiMessage::Clock));
    }

    #[test]
    fn lifecycle_messages_map_to_the_expected_transport_events() {
        let recorder = Arc::new(Recorder::default());
        let mut sender = MidiClockSender::new("out", recorder.clone());

        sender.restart();
        sender.start();
        sender.stop();

        let messages = recorder.0.lock().unwrap();
        assert!(matches!(messages[0].1, MidiMessage::Reset));
        assert!(matches!(messages[1].1, MidiMessage::Start));
        assert!(matches!(messages[2].1, MidiMessage::Stop));
    }
}
