use thiserror::Error;

/// Errors raised while loading or assembling a project from config (spec §7 "Config error":
/// fail loudly at project assembly; the clock and dispatcher never start).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading a config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file's YAML was malformed or didn't match the expected schema.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yml::Error),
    /// A part referenced an instrument not present in `instruments:`.
    #[error("part references unknown instrument {name:?}")]
    UnknownInstrument {
        /// The offending instrument name.
        name: String,
    },
    /// A part's `patterns:` map referenced a timbre not present on its instrument.
    #[error("part for instrument {instrument:?} references unknown timbre {timbre:?}")]
    UnknownTimbre {
        /// The instrument the part is bound to.
        instrument: String,
        /// The offending timbre name.
        timbre: String,
    },
    /// A pattern step referenced a symbol absent from its resolved mapper.
    #[error(transparent)]
    UnknownSymbol(#[from] mseq_core::PatternError),
    /// `denominator` was zero.
    #[error("denominator must be at least 1, got {denominator}")]
    InvalidDenominator {
        /// The offending denominator.
        denominator: u32,
    },
    /// A MIDI channel fell outside `0..=15`.
    #[error("channel must be in 0..=15, got {channel}")]
    InvalidChannel {
        /// The offending channel.
        channel: u8,
    },
    /// `pattern_type` was neither `"symbol"` nor `"gate"`.
    #[error("unknown pattern_type {value:?} on instrument {instrument:?}")]
    InvalidPatternType {
        /// The instrument the bad value was found on.
        instrument: String,
        /// The unrecognized value.
        value: String,
    },
    /// A gate-type instrument's timbre had no resolvable note (neither the timbre nor its part
    /// set one).
    #[error("instrument {instrument:?} timbre {timbre:?} is gate-typed but has no resolved note")]
    MissingGateNote {
        /// The instrument the timbre belongs to.
        instrument: String,
        /// The offending timbre name.
        timbre: String,
    },
    /// Two entries in `ports:` declared the same logical name (spec §9 open question: reject at
    /// assembly).
    #[error("duplicate port name {name:?}")]
    DuplicatePort {
        /// The offending name.
        name: String,
    },
}
