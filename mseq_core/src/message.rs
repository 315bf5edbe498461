use std::sync::Arc;

use crate::MidiMessage;

/// A sink for MIDI messages.
///
/// Observer lists are built once at project assembly and treated as read-only afterwards (spec
/// §5), so `receive_message` only needs `&self`: no observer mutates its own state on receipt in
/// this engine (an [`OutChannel`] just rewrites the channel and enqueues).
pub trait MessageDestination: Send + Sync {
    /// Handle an incoming message.
    fn receive_message(&self, message: &MidiMessage);
}

impl<T: MessageDestination + ?Sized> MessageDestination for Arc<T> {
    fn receive_message(&self, message: &MidiMessage) {
        (**self).receive_message(message);
    }
}

/// An ordered list of [`MessageDestination`]s that a [`MidiMessage`] is broadcast to, in
/// registration order (spec §4.2). This is the "message source" capability; components that also
/// need to react to clock ticks additionally implement [`crate::ClockWatcher`] rather than
/// folding both capabilities into one trait (spec §9).
#[derive(Default)]
pub struct ObserverList {
    observers: Vec<Box<dyn MessageDestination>>,
}

impl ObserverList {
    /// Create an empty observer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a destination. Registration order is preserved and duplicates are allowed (spec
    /// §4.1 `InChannel`).
    pub fn register_observer(&mut self, destination: Box<dyn MessageDestination>) {
        self.observers.push(destination);
    }

    /// Broadcast `message` to every registered observer, in registration order.
    pub fn send_message(&self, message: MidiMessage) {
        for observer in &self.observers {
            observer.receive_message(&message);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether any observer is registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// An `InChannel` is simply a named [`ObserverList`]: the fan-out point physical input ports
/// deliver messages to (spec §3, §4.1).
pub type InChannel = ObserverList;

/// The single queue a [`OutChannel`] enqueues onto: one dispatcher per process, draining into
/// physical outputs on its own thread (spec §4.3). Implemented concretely by the runtime crate
/// (backed by `crossbeam-channel`); kept as a trait here so the engine stays decoupled from any
/// particular queue or physical MIDI backend.
pub trait Dispatch: Send + Sync {
    /// Enqueue `message` for delivery to the physical output registered under `port_name`.
    /// Must never block the caller under normal load (spec §4.3).
    fn queue_message(&self, port_name: &str, message: MidiMessage);
}

/// A routing sink bound to one physical output port and one MIDI channel.
///
/// Receiving a message rewrites its channel to `channel` and enqueues it on the dispatcher under
/// `port_name` (spec §4.1).
#[derive(Clone)]
pub struct OutChannel {
    port_name: String,
    channel: u8,
    dispatcher: Arc<dyn Dispatch>,
}

impl OutChannel {
    /// Bind a fresh `OutChannel` to `port_name`/`channel` on `dispatcher`.
    pub fn new(port_name: impl Into<String>, channel: u8, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            port_name: port_name.into(),
            channel,
            dispatcher,
        }
    }

    /// The logical output port name this channel targets.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// The MIDI channel this channel rewrites onto outgoing messages.
    pub fn channel(&self) -> u8 {
        self.channel
    }
}

impl MessageDestination for OutChannel {
    fn receive_message(&self, message: &MidiMessage) {
        let rewritten = message.with_channel(self.channel);
        self.dispatcher.queue_message(&self.port_name, rewritten);
    }
}
