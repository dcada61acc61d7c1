//! Run and Event Header Blocks
//!
//! The simulator prefixes every run and every event with a block of 273
//! 32-bit float words. This crate treats the blocks as opaque except for
//! the handful of words the session needs:
//!
//! - run header word 4: number of observation levels (1..=10), and the
//!   level itself at word `4 + count` (the lowest configured level, cm);
//! - event header word 6: height of the first interaction (cm, may be
//!   negative when the simulator did not record it);
//! - event header word 10: zenith angle of the primary (rad).
//!
//! Word 0 of either block carries a four-character marker ("RUNH"/"EVTH")
//! reinterpreted as a float; it is exposed for consumers but not enforced,
//! since the producer is trusted on framing.

use crate::constants::format::HEADER_WORDS;
use crate::errors::HeaderError;

/// Run header block: 273 float words, written once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunHeader {
    words: [f32; HEADER_WORDS],
}

/// Event header block: 273 float words, one per event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventHeader {
    words: [f32; HEADER_WORDS],
}

impl RunHeader {
    /// Wrap a raw block of header words.
    pub const fn from_words(words: [f32; HEADER_WORDS]) -> Self {
        Self { words }
    }

    /// The raw words.
    pub const fn words(&self) -> &[f32; HEADER_WORDS] {
        &self.words
    }

    /// Four-byte block marker, "RUNH" for a well-formed producer.
    pub fn marker(&self) -> [u8; 4] {
        self.words[0].to_le_bytes()
    }

    /// Height of the observation plane above sea level (cm).
    ///
    /// Word 4 counts the configured observation levels; the plane this
    /// session archives for is the last of them, at word `4 + count`.
    pub fn observation_level(&self) -> Result<f32, HeaderError> {
        let count = self.words[4];
        if !count.is_finite() || !(1.0..=10.0).contains(&count) {
            return Err(HeaderError::ObservationLevelCount { count });
        }
        Ok(self.words[4 + count as usize])
    }
}

impl EventHeader {
    /// Wrap a raw block of header words.
    pub const fn from_words(words: [f32; HEADER_WORDS]) -> Self {
        Self { words }
    }

    /// The raw words.
    pub const fn words(&self) -> &[f32; HEADER_WORDS] {
        &self.words
    }

    /// Four-byte block marker, "EVTH" for a well-formed producer.
    pub fn marker(&self) -> [u8; 4] {
        self.words[0].to_le_bytes()
    }

    /// Event number as recorded by the producer.
    pub fn event_number(&self) -> f32 {
        self.words[1]
    }

    /// Height of the first interaction above sea level (cm).
    ///
    /// Negative when the producer left it unset; the session then falls
    /// back to the top of the atmosphere for the time origin.
    pub fn first_interaction_height(&self) -> f32 {
        self.words[6]
    }

    /// Zenith angle of the primary particle (rad).
    pub fn zenith_rad(&self) -> f32 {
        self.words[10]
    }
}

#[cfg(feature = "std")]
mod io {
    use std::io::{self, Write};

    use super::{EventHeader, RunHeader};

    fn write_words<W: Write>(words: &[f32], out: &mut W) -> io::Result<()> {
        for word in words {
            out.write_all(&word.to_le_bytes())?;
        }
        Ok(())
    }

    impl RunHeader {
        /// Write the block as 273 little-endian float words.
        pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
            write_words(&self.words, out)
        }
    }

    impl EventHeader {
        /// Write the block as 273 little-endian float words.
        pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
            write_words(&self.words, out)
        }
    }
}
