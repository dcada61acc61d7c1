//! Constants for the Cherenkov archive core
//!
//! Centralized, documented constants used throughout the crate. Values
//! appear here instead of as magic numbers at the point of use; each one
//! names its unit and where it comes from.
//!
//! ## Organization
//!
//! - **Physics**: speed of light, refractivity of air
//! - **Format**: quantization ranges and binary record sizes

/// Physical constants.
pub mod physics;

/// Archive format constants: quantization ranges and record layout.
pub mod format;

// Re-export commonly used constants for convenience
pub use format::{COMPRESSED_RECORD_SIZE, HEADER_WORDS, RAW_RECORD_SIZE};
pub use physics::VACUUM_SPEED_OF_LIGHT_CM_PER_NS;
