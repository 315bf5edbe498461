use std::path::Path;
use std::sync::Arc;

use log::warn;
use mseq_core::{ClockWatcher, Dispatch};
use mseq_tracks::{load_port_config, load_project_config, PortConfig};

use crate::clock::Clock;
use crate::dispatcher::Dispatcher;
use crate::error::MSeqError;
use crate::registry::PortRegistry;

/// A fully assembled, running project: the clock thread, the dispatcher thread, and the port
/// registry keeping the physical input connections alive.
///
/// Dropping this stops the clock and the dispatcher (spec §4.3/§4.4 "Shutdown").
pub struct Project {
    clock: Clock,
    dispatcher: Arc<Dispatcher>,
    // Held only to keep input connections open; lookups happen at assembly time, not at runtime.
    _registry: PortRegistry,
}

impl Project {
    /// Load `port_config_path` and `project_config_path`, assemble every instrument, pattern
    /// player, clock sender and routing connector they describe, open the physical MIDI ports,
    /// and start the clock and dispatcher threads (spec §4.9, the project's full assembly order).
    pub fn load(port_config_path: impl AsRef<Path>, project_config_path: impl AsRef<Path>) -> Result<Self, MSeqError> {
        let port_config = load_port_config(port_config_path)?;
        let project_config = load_project_config(project_config_path)?;
        Self::assemble(&port_config, &project_config)
    }

    /// Assemble a project from already-parsed config documents.
    pub fn assemble(port_config: &PortConfig, project_config: &mseq_tracks::ProjectConfig) -> Result<Self, MSeqError> {
        mseq_tracks::validate_port_config(port_config)?;

        let (registry, outputs) = PortRegistry::build(port_config)?;

        let dispatcher = Arc::new(Dispatcher::start(outputs));
        let dispatch: Arc<dyn Dispatch> = dispatcher.clone();

        let instruments = mseq_tracks::build_instruments(&project_config.instruments, dispatch.clone())?;
        let players = mseq_tracks::build_players(&project_config.parts, &instruments)?;
        let clock_senders = mseq_tracks::build_clock_senders(project_config, dispatch.clone());
        let connectors = mseq_tracks::build_connectors(project_config)?;

        // Wire each connector directly onto the registry's own `InChannel` buses (spec §4.1,
        // §4.9): the physical input callback and this registration share the same bus, so once
        // registered, every message from then on is routed, with no separate routing table.
        for binding in connectors {
            let Some(out_channel) = registry.get_out_channel(&binding.out_port_name, binding.out_channel, dispatch.clone())
            else {
                warn!("connector targets undeclared output port {:?}, skipping", binding.out_port_name);
                continue;
            };
            let Some(mut in_channel) = registry.get_in_channel(&binding.in_port_name, binding.in_channel) else {
                warn!(
                    "connector's input port {:?} is undeclared or has no physical input, skipping",
                    binding.in_port_name
                );
                continue;
            };
            in_channel.register_observer(Box::new(out_channel));
        }

        let mut watchers: Vec<Box<dyn ClockWatcher>> = Vec::new();
        watchers.extend(players.into_iter().map(|player| Box::new(player) as Box<dyn ClockWatcher>));
        watchers.extend(
            clock_senders
                .into_iter()
                .map(|sender| Box::new(sender) as Box<dyn ClockWatcher>),
        );

        let clock = Clock::start(project_config.bpm, watchers);

        Ok(Self {
            clock,
            dispatcher,
            _registry: registry,
        })
    }

    /// The running clock, for starting/stopping/retiming playback.
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
}
