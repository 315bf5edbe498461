use std::sync::{Arc, Mutex, MutexGuard};

use hashbrown::HashMap;
use log::warn;
use midir::{MidiInput, MidiInputConnection, MidiOutput};

use mseq_core::{Dispatch, InChannel, OutChannel};
use mseq_tracks::PortConfig;

use crate::midi_connection::{decode, MidiError, PhysicalOut};

/// Find the first physical port name starting with `prefix`, case-insensitively (spec §4.1:
/// "physical names *start with* the configured `port_name`").
pub fn find_matching_port_name<'a>(prefix: &str, candidates: &'a [String]) -> Option<&'a str> {
    let prefix = prefix.to_ascii_lowercase();
    candidates
        .iter()
        .find(|name| name.to_ascii_lowercase().starts_with(&prefix))
        .map(String::as_str)
}

type ChannelBuses = [Mutex<InChannel>; 16];

fn new_channel_buses() -> Arc<ChannelBuses> {
    Arc::new(std::array::from_fn(|_| Mutex::new(InChannel::new())))
}

/// An opened physical input port: 16 channel buses plus the live `midir` connection keeping the
/// callback alive (spec §4.1). The callback and [`PortRegistry::get_in_channel`] share the same
/// buses, so a connector registered after `build` still sees every message from then on.
pub struct InPort {
    channels: Arc<ChannelBuses>,
    // Held only to keep the callback registered; `midir` drops the connection (and stops
    // delivering callbacks) when this is dropped.
    _connection: MidiInputConnection<()>,
}

struct PortSlot {
    in_port: Option<InPort>,
}

/// Resolves configured logical port names to physical MIDI handles (spec §4.1, C1).
///
/// Missing physical ports are permitted: `build` never fails because a port couldn't be found,
/// it only logs a warning and records the port as absent. All later lookups for an absent port
/// return `None` without raising.
pub struct PortRegistry {
    ports: HashMap<String, PortSlot>,
}

impl PortRegistry {
    /// Open every declared input port, matching physical device names by prefix, and
    /// separately open every declared output connection for the dispatcher to take ownership
    /// of (spec §5: the dispatcher thread is the sole writer to any physical output).
    ///
    /// Each opened input's callback decodes incoming bytes and fans them out directly onto that
    /// channel's own `InChannel` bus (spec §4.1); callers wire connectors onto those same buses
    /// afterwards via [`Self::get_in_channel`].
    ///
    /// Returns the registry (for `InChannel`/`OutChannel` lookups) alongside a map of the opened
    /// output connections, keyed by logical name. A logical name declared in config but with no
    /// matching physical output is simply absent from that map (spec §7: never fatal).
    pub fn build(config: &PortConfig) -> Result<(Self, HashMap<String, Box<dyn PhysicalOut>>), MidiError> {
        let midi_in_probe = MidiInput::new("mseq-probe-in")?;
        let midi_out_probe = MidiOutput::new("mseq-probe-out")?;

        let input_names: Vec<String> = midi_in_probe
            .ports()
            .iter()
            .filter_map(|p| midi_in_probe.port_name(p).ok())
            .collect();
        let output_names: Vec<String> = midi_out_probe
            .ports()
            .iter()
            .filter_map(|p| midi_out_probe.port_name(p).ok())
            .collect();

        let mut ports = HashMap::new();
        let mut outputs: HashMap<String, Box<dyn PhysicalOut>> = HashMap::new();

        for declared in &config.ports {
            let key = declared.name.to_ascii_lowercase();

            let in_port = match find_matching_port_name(&declared.port_name, &input_names) {
                Some(physical_name) => {
                    let midi_in = MidiInput::new("mseq-in")?;
                    let port = midi_in
                        .ports()
                        .into_iter()
                        .find(|p| midi_in.port_name(p).as_deref() == Ok(physical_name));
                    match port {
                        Some(port) => {
                            let channels = new_channel_buses();
                            let callback_channels = channels.clone();
                            let connection = midi_in
                                .connect(
                                    &port,
                                    "mseq-in-conn",
                                    move |_stamp, bytes, _| {
                                        if let Some(message) = decode(bytes) {
                                            if let Some(channel) = message.channel() {
                                                if let Some(bus) = callback_channels.get(channel as usize) {
                                                    bus.lock().unwrap().send_message(message);
                                                }
                                            }
                                        }
                                    },
                                    (),
                                )
                                .map_err(MidiError::from)?;
                            Some(InPort {
                                channels,
                                _connection: connection,
                            })
                        }
                        None => None,
                    }
                }
                None => {
                    warn!(
                        "no physical input port found matching prefix {:?} for logical port {:?}",
                        declared.port_name, declared.name
                    );
                    None
                }
            };

            match find_matching_port_name(&declared.port_name, &output_names) {
                Some(physical_name) => {
                    let midi_out = MidiOutput::new("mseq-out")?;
                    let port = midi_out
                        .ports()
                        .into_iter()
                        .find(|p| midi_out.port_name(p).as_deref() == Ok(physical_name));
                    match port {
                        Some(port) => {
                            let connection = midi_out.connect(&port, "mseq-out-conn").map_err(MidiError::from)?;
                            outputs.insert(declared.name.clone(), Box::new(connection));
                        }
                        None => warn!("output port {physical_name:?} vanished between enumeration and connect"),
                    }
                }
                None => warn!(
                    "no physical output port found matching prefix {:?} for logical port {:?}",
                    declared.port_name, declared.name
                ),
            }

            ports.insert(key, PortSlot { in_port });
        }

        Ok((Self { ports }, outputs))
    }

    /// Lock and return the `InChannel` bus for `(name, channel)`, for registering an observer on
    /// it (spec §4.1/§4.9). `None` if the logical name or physical input is absent or `channel`
    /// is out of range. The live input callback locks the same bus to deliver messages, so an
    /// observer registered here sees every message from then on.
    pub fn get_in_channel(&self, name: &str, channel: u8) -> Option<MutexGuard<'_, InChannel>> {
        let key = name.to_ascii_lowercase();
        let in_port = self.ports.get(&key)?.in_port.as_ref()?;
        let bus = in_port.channels.get(channel as usize)?;
        Some(bus.lock().unwrap())
    }

    /// Build a fresh `OutChannel` bound to `dispatcher` for `(name, channel)`, or `None` if
    /// `name` was never declared in the port config. The physical output itself may still be
    /// absent; that is handled later by the dispatcher (spec §7: never fatal).
    pub fn get_out_channel(&self, name: &str, channel: u8, dispatcher: Arc<dyn Dispatch>) -> Option<OutChannel> {
        let key = name.to_ascii_lowercase();
        self.ports.get(&key)?;
        Some(OutChannel::new(name.to_string(), channel, dispatcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitive_prefix() {
        let candidates = vec!["Scarlett 2i2 USB".to_string(), "Midi Through Port-0".to_string()];
        assert_eq!(find_matching_port_name("scarlett", &candidates), Some("Scarlett 2i2 USB"));
    }

    #[test]
    fn no_match_returns_none() {
        let candidates = vec!["Scarlett 2i2 USB".to_string()];
        assert_eq!(find_matching_port_name("nonexistent", &candidates), None);
    }

    #[test]
    fn first_match_wins_on_ambiguous_prefix() {
        let candidates = vec!["Foo A".to_string(), "Foo B".to_string()];
        assert_eq!(find_matching_port_name("foo", &candidates), Some("Foo A"));
    }
}
