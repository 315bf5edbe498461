//! Config ingestion for the sequencing engine: parses the port and project YAML documents and
//! builds the [`mseq_core`] entities they describe (instruments, pattern players, clock senders,
//! and the output side of routing connectors).
//!
//! This crate never touches a physical MIDI port: it only knows the logical port names config
//! declares. Binding those names to real hardware, and wiring routing connectors to a live
//! [`mseq_core::ObserverList`], is the runtime crate's job.

#![warn(missing_docs)]

mod build;
mod config;
mod error;
mod loader;

pub use build::{assemble, build_clock_senders, build_connectors, build_instruments, build_players, validate_port_config, Assembled, ConnectorBinding};
pub use config::{
    ClockOutputConfig, ConnectorConfig, DefaultsConfig, InstrumentConfig, PartConfig, PortConfig,
    PortDef, ProjectConfig, SymbolMappingConfig, TimbreConfig,
};
pub use error::ConfigError;
pub use loader::{load_port_config, load_project_config};
