//! On-Disk Photon Record Forms
//!
//! A photon block stores either raw 40-byte records (ten float words per
//! bunch) or compressed 16-byte records (eight quantized i16 words). A
//! block never mixes forms; the session pins the encoding when it opens
//! and rejects records of the other kind.

use heapless::Vec;

use crate::bunch::PhotonBunch;
use crate::constants::format::{COMPRESSED_RECORD_SIZE, RAW_RECORD_SIZE};
use crate::photon::CompressedPhoton;

/// Record form used for a photon block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Encoding {
    /// Ten little-endian float32 words, 40 bytes per bunch.
    Raw,
    /// Eight little-endian i16 words, 16 bytes per photon.
    Compressed,
}

impl Encoding {
    /// Fixed byte size of one record in this form.
    pub const fn record_size(&self) -> usize {
        match self {
            Encoding::Raw => RAW_RECORD_SIZE,
            Encoding::Compressed => COMPRESSED_RECORD_SIZE,
        }
    }
}

/// One photon ready to be appended to a block, in either form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhotonRecord {
    /// Full-precision bunch record.
    Raw(PhotonBunch),
    /// Quantized detector-frame record.
    Compressed(CompressedPhoton),
}

impl PhotonRecord {
    /// The form this record serializes to.
    pub const fn encoding(&self) -> Encoding {
        match self {
            PhotonRecord::Raw(_) => Encoding::Raw,
            PhotonRecord::Compressed(_) => Encoding::Compressed,
        }
    }

    /// Serialize into a bounded buffer sized for the larger form.
    pub fn to_bytes(&self) -> Vec<u8, RAW_RECORD_SIZE> {
        let mut out = Vec::new();
        // The buffer capacity covers both record sizes, so the pushes
        // below cannot fail.
        let _ = match self {
            PhotonRecord::Raw(bunch) => out.extend_from_slice(&bunch.to_bytes()),
            PhotonRecord::Compressed(photon) => out.extend_from_slice(&photon.to_bytes()),
        };
        out
    }

    /// Write the serialized record to `out`.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.write_all(&self.to_bytes())
    }
}

impl From<PhotonBunch> for PhotonRecord {
    fn from(bunch: PhotonBunch) -> Self {
        PhotonRecord::Raw(bunch)
    }
}

impl From<CompressedPhoton> for PhotonRecord {
    fn from(photon: CompressedPhoton) -> Self {
        PhotonRecord::Compressed(photon)
    }
}
