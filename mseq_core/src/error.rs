use thiserror::Error;

/// Errors raised while expanding a pattern's symbols into notes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// A pattern step referenced a symbol not present in its timbre's mapper.
    #[error("unknown pattern symbol {symbol:?}")]
    UnknownSymbol {
        /// The offending symbol.
        symbol: String,
    },
}

/// Errors raised by [`crate::Scale`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    /// `quantize_note` was asked to round up from a note higher than every note in the scale's
    /// range (spec §4.8, resolving the source's open question: fail loud rather than return
    /// nothing silently).
    #[error("no scale note at or above {requested} within the configured range")]
    OutOfRange {
        /// The note that had no match.
        requested: u8,
    },
}
