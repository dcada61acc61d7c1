//! Quantized Photon Codec
//!
//! ## Overview
//!
//! Maps a floating-point [`PhotonBunch`] plus the session-derived constants
//! into a fixed-precision [`CompressedPhoton`] of eight signed 16-bit
//! fields. The mapping is pure: no I/O, no state, the same inputs always
//! yield the same record.
//!
//! ## Quantization policy
//!
//! Two policies apply uniformly to every field and are tested explicitly:
//!
//! - **Rounding**: round half away from zero. `0.5` steps become `1`,
//!   `-0.5` steps become `-1`; quantization error is at most half a step in
//!   either direction.
//! - **Overflow**: saturate to `i16::MIN..=i16::MAX`. A value outside its
//!   declared range clamps to the nearest representable code and never
//!   wraps around to the opposite sign.
//!
//! ## Field mappings
//!
//! | field             | mapping                                    |
//! |-------------------|--------------------------------------------|
//! | x, y              | `pos / 26000 cm * 32768`                   |
//! | cx, cy            | `cosine * 32768` (native +-1 domain)       |
//! | arrival_time      | relative time in 0.1 ns steps              |
//! | wavelength        | `lambda * 32768`, magnitude pre-stripped   |
//! | emission_altitude | `|alt| / 10^7 cm * 32768`, sign-stripped   |
//! | mother            | constant tag `1`                           |
//!
//! The relative arrival time subtracts the light path delay from the
//! detector center height and the event time offset, so that codes stay
//! near zero for photons of the same shower front.

use libm::{ceilf, fabsf, floorf, sqrtf};

use crate::bunch::PhotonBunch;
use crate::constants::format::{
    ARRIVAL_TIME_STEP_NS, COMPRESSED_RECORD_SIZE, EMISSION_ALTITUDE_RANGE_CM, POSITION_RANGE_CM,
    QUANT_SCALE,
};
use crate::detector::DetectorSphere;
use crate::errors::BunchResult;

/// Run- and event-scoped constants the codec needs.
///
/// Derived once per run (`observation_level`, light speed) and once per
/// event (`time_offset`) by the output session; read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConstants {
    /// Height of the observation plane above sea level (cm).
    pub observation_level: f32,
    /// Speed of light in air at the observation level (cm/ns).
    pub speed_of_light_on_observation_level: f32,
    /// Event time origin relative to the first interaction (ns).
    pub time_offset: f32,
}

/// One compressed photon: eight signed 16-bit fields, 16 bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedPhoton {
    /// Quantized x position in the detector frame.
    pub x: i16,
    /// Quantized y position in the detector frame.
    pub y: i16,
    /// Quantized direction cosine, x axis.
    pub cx: i16,
    /// Quantized direction cosine, y axis.
    pub cy: i16,
    /// Quantized relative arrival time, 0.1 ns steps.
    pub arrival_time: i16,
    /// Quantized wavelength.
    pub wavelength: i16,
    /// Quantized emission altitude, sign-stripped.
    pub emission_altitude: i16,
    /// Mother particle tag.
    pub mother: i16,
}

fn round_half_away(value: f32) -> f32 {
    if value >= 0.0 {
        floorf(value + 0.5)
    } else {
        ceilf(value - 0.5)
    }
}

fn saturate_i16(value: f32) -> i16 {
    if value >= i16::MAX as f32 {
        i16::MAX
    } else if value <= i16::MIN as f32 {
        i16::MIN
    } else {
        value as i16
    }
}

/// Quantize with the crate-wide policy: round half away from zero, saturate.
pub fn quantize(value: f32) -> i16 {
    saturate_i16(round_half_away(value))
}

/// Compress a position (cm) against the +-260 m full range.
pub fn compress_position(pos_cm: f32) -> i16 {
    quantize(pos_cm / POSITION_RANGE_CM * QUANT_SCALE)
}

/// Expand a position code back to cm.
pub fn expand_position(code: i16) -> f32 {
    code as f32 / QUANT_SCALE * POSITION_RANGE_CM
}

/// Compress a direction cosine against its native +-1 domain.
pub fn compress_slope(cosine: f32) -> i16 {
    quantize(cosine * QUANT_SCALE)
}

/// Expand a direction cosine code.
pub fn expand_slope(code: i16) -> f32 {
    code as f32 / QUANT_SCALE
}

/// Compress a relative arrival time (ns) into 0.1 ns steps.
pub fn compress_arrival_time(time_ns: f32) -> i16 {
    quantize(time_ns / ARRIVAL_TIME_STEP_NS)
}

/// Expand an arrival time code back to ns.
pub fn expand_arrival_time(code: i16) -> f32 {
    code as f32 * ARRIVAL_TIME_STEP_NS
}

/// Compress an emission altitude (cm): sign-stripped, 100 km full range.
pub fn compress_emission_altitude(altitude_cm: f32) -> i16 {
    quantize(fabsf(altitude_cm) / EMISSION_ALTITUDE_RANGE_CM * QUANT_SCALE)
}

/// Expand an emission altitude code back to cm.
pub fn expand_emission_altitude(code: i16) -> f32 {
    code as f32 / QUANT_SCALE * EMISSION_ALTITUDE_RANGE_CM
}

/// Compress a wavelength magnitude (nm).
pub fn compress_wavelength(wavelength_nm: f32) -> i16 {
    quantize(wavelength_nm * QUANT_SCALE)
}

/// Expand a wavelength code back to nm.
pub fn expand_wavelength(code: i16) -> f32 {
    code as f32 / QUANT_SCALE
}

// TODO: map (mass, charge) to a PDG-style particle tag once the producer
// forwards particle ids alongside the bunch parameters.
fn compress_mother(_mass_gev: f32, _charge: f32) -> i16 {
    1
}

impl CompressedPhoton {
    /// Encode a bunch that already passed the hit test and frame transform.
    ///
    /// The relative arrival time is
    /// `t - z_det * sqrt(1 + cx^2 + cy^2) / c_obs - time_offset`.
    /// Validates the direction cosines so a malformed bunch cannot slip
    /// into the archive through the codec path.
    pub fn from_bunch(
        bunch: &PhotonBunch,
        detector: &DetectorSphere,
        constants: &SessionConstants,
    ) -> BunchResult<Self> {
        bunch.direction()?;

        let slope = sqrtf(1.0 + bunch.cx * bunch.cx + bunch.cy * bunch.cy);
        let path_delay = detector.z() * slope / constants.speed_of_light_on_observation_level;
        let relative_time = bunch.arrival_time - path_delay - constants.time_offset;

        Ok(Self {
            x: compress_position(bunch.x),
            y: compress_position(bunch.y),
            cx: compress_slope(bunch.cx),
            cy: compress_slope(bunch.cy),
            arrival_time: compress_arrival_time(relative_time),
            wavelength: compress_wavelength(bunch.wavelength),
            emission_altitude: compress_emission_altitude(bunch.emission_altitude),
            mother: compress_mother(bunch.mother_mass, bunch.mother_charge),
        })
    }

    fn fields(&self) -> [i16; 8] {
        [
            self.x,
            self.y,
            self.cx,
            self.cy,
            self.arrival_time,
            self.wavelength,
            self.emission_altitude,
            self.mother,
        ]
    }

    /// Serialize as the 16-byte record: 8 x little-endian int16.
    pub fn to_bytes(&self) -> [u8; COMPRESSED_RECORD_SIZE] {
        let mut out = [0u8; COMPRESSED_RECORD_SIZE];
        for (chunk, field) in out.chunks_exact_mut(2).zip(self.fields()) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }

    /// Deserialize from the 16-byte record.
    pub fn from_bytes(bytes: &[u8; COMPRESSED_RECORD_SIZE]) -> Self {
        let mut fields = [0i16; 8];
        for (field, chunk) in fields.iter_mut().zip(bytes.chunks_exact(2)) {
            let mut buf = [0u8; 2];
            buf.copy_from_slice(chunk);
            *field = i16::from_le_bytes(buf);
        }
        Self {
            x: fields[0],
            y: fields[1],
            cx: fields[2],
            cy: fields[3],
            arrival_time: fields[4],
            wavelength: fields[5],
            emission_altitude: fields[6],
            mother: fields[7],
        }
    }
}
