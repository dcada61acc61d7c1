//! Error Types for Hit Testing and Archive Output
//!
//! ## Design Philosophy
//!
//! Errors on the bunch path are kept minimal:
//!
//! 1. **Small Size**: Bunch errors are returned once per photon bunch in the
//!    hot path, so every variant stays a few bytes and implements `Copy`.
//!
//! 2. **No Heap Allocation**: Only inline data and `&'static str` messages;
//!    the bunch and header errors work without `std`.
//!
//! 3. **Typed Numeric Faults**: Invalid direction cosines or non-finite
//!    fields become explicit variants instead of NaN propagating through
//!    comparisons and silently reading as "no hit".
//!
//! Session errors are different animals: they name the offending file path
//! and carry the underlying `std::io::Error`, because every one of them is
//! fatal for the run and ends up in a log message a human has to act on.
//! A corrupted or truncated archive is worse than an aborted run, so there
//! is no retry path anywhere in this taxonomy.

use thiserror_no_std::Error;

/// Result type for per-bunch operations.
pub type BunchResult<T> = Result<T, BunchError>;

/// Faults in a single photon bunch - kept small, the hit test sees millions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum BunchError {
    /// The direction cosines do not describe a downward unit vector.
    ///
    /// `cx^2 + cy^2 > 1` makes the derived `cz` radicand negative. This is
    /// an upstream data-quality fault, not recoverable locally.
    #[error("direction cosines invalid: cx^2 + cy^2 = {norm} exceeds 1")]
    InvalidDirection {
        /// The offending squared norm of the transverse direction cosines.
        norm: f32,
    },

    /// A bunch field is NaN or infinite.
    #[error("invalid value: not a finite number")]
    InvalidValue,
}

/// Faults in a simulator header block.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum HeaderError {
    /// The observation level count word is outside the defined `1..=10`.
    #[error("observation level count {count} outside 1..=10")]
    ObservationLevelCount {
        /// Raw count word as found in the header.
        count: f32,
    },
}

/// Fatal faults in the output session. Each one aborts the run.
#[cfg(feature = "std")]
#[derive(Error, Debug)]
pub enum SessionError {
    /// An operation was called in a lifecycle state that does not allow it,
    /// e.g. appending a record with no photon block open.
    #[error("cannot {operation} while the session is {state:?}")]
    Precondition {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the session was actually in.
        state: crate::session::SessionState,
    },

    /// A file could not be created or written.
    #[error("unable to open or write '{path}': {source}")]
    Io {
        /// Path of the offending file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A record of the wrong encoding was handed to `append`.
    #[error("record encoding {given:?} does not match configured {configured:?}")]
    EncodingMismatch {
        /// Encoding the session was opened with.
        configured: crate::record::Encoding,
        /// Encoding of the rejected record.
        given: crate::record::Encoding,
    },

    /// A header block failed validation while deriving session constants.
    #[error("malformed header: {0}")]
    Header(#[from] HeaderError),
}
