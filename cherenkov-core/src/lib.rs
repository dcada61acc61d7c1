//! Core engine for archiving simulated Cherenkov light
//!
//! Intercepts photon bunches produced by an air-shower simulator, tests each
//! bunch against a spherical detector volume, and persists the hits into a
//! compact, event-indexed binary archive.
//!
//! Key constraints:
//! - Geometry, headers and the quantizing codec are no_std capable
//! - Single-threaded, blocking I/O driven by the simulator's lifecycle
//! - Illegal call orderings fail with typed errors, never corrupt a file
//!
//! ```
//! use cherenkov_core::{DetectorSphere, PhotonBunch};
//! use cherenkov_core::geometry::Vec3;
//!
//! let detector = DetectorSphere::new(Vec3::new(0.0, 0.0, 0.0), 55.0);
//! let bunch = PhotonBunch::from_producer(
//!     1.0, 10.0, -4.0, 0.0, 0.0, 120.0, 8.5e5, 433.0, 0.0, 0.0,
//! );
//!
//! // Test the bunch against the detector volume
//! match detector.is_hit_by_photon(&bunch) {
//!     Ok(true) => {}  // archive it
//!     Ok(false) => {} // missed the sphere
//!     Err(e) => {}    // upstream handed us invalid direction cosines
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod atmosphere;
pub mod bunch;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod geometry;
pub mod header;
pub mod photon;
pub mod record;
#[cfg(feature = "std")]
pub mod session;

// Public API
pub use bunch::PhotonBunch;
pub use detector::DetectorSphere;
pub use errors::{BunchError, BunchResult, HeaderError};
pub use header::{EventHeader, RunHeader};
pub use photon::{CompressedPhoton, SessionConstants};
pub use record::{Encoding, PhotonRecord};
#[cfg(feature = "std")]
pub use errors::SessionError;
#[cfg(feature = "std")]
pub use session::{OutputSession, SessionState};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
