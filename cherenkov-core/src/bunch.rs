//! Photon Bunch Data Model
//!
//! ## Overview
//!
//! A bunch is a thinning-weighted group of simulated photons sharing one
//! trajectory sample. The upstream simulator hands over one bunch at a time
//! during an event; this module defines the record, its validity rules, and
//! its raw 40-byte binary form.
//!
//! ## Validity
//!
//! The transverse direction cosines must satisfy `cx^2 + cy^2 <= 1`, since
//! the downward component is derived as `cz = sqrt(1 - cx^2 - cy^2)`.
//! A violation means the producer sent garbage; [`PhotonBunch::direction`]
//! reports it as a typed error so that no NaN ever reaches the hit test.
//!
//! ## Wavelength sentinel
//!
//! The producer encodes "wavelength undetermined" as zero and "already a
//! photo-electron" as a negative wavelength. Only the magnitude is physical
//! and only the magnitude survives quantization, so
//! [`PhotonBunch::from_producer`] strips the sign on entry.

use core::fmt;

use libm::{fabsf, sqrtf};

use crate::constants::format::RAW_RECORD_SIZE;
use crate::errors::{BunchError, BunchResult};
use crate::geometry::Vec3;

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {{}};
}

/// One photon bunch as delivered by the air-shower simulator.
///
/// Units: positions in cm on the observation plane, time in ns since the
/// primary's first interaction, emission altitude in cm above sea level,
/// wavelength in nm, mother mass in GeV.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhotonBunch {
    /// Equivalent photon count, fractional under thinning.
    pub size: f32,
    /// Incidence x position on the observation plane (cm).
    pub x: f32,
    /// Incidence y position on the observation plane (cm).
    pub y: f32,
    /// Direction cosine relative to the plane normal, x axis.
    pub cx: f32,
    /// Direction cosine relative to the plane normal, y axis.
    pub cy: f32,
    /// Arrival time on the observation plane (ns).
    pub arrival_time: f32,
    /// Emission altitude above sea level, not above the plane (cm).
    pub emission_altitude: f32,
    /// Wavelength magnitude (nm); zero when unspecified.
    pub wavelength: f32,
    /// Mass of the emitting particle (GeV).
    pub mother_mass: f32,
    /// Electric charge of the emitting particle.
    pub mother_charge: f32,
}

impl PhotonBunch {
    /// Build a bunch from the producer's raw callback parameters.
    ///
    /// `lambda` may be negative (photo-electron sentinel); only its
    /// magnitude is stored. Everything else is taken verbatim.
    #[allow(clippy::too_many_arguments)]
    pub fn from_producer(
        size: f32,
        x: f32,
        y: f32,
        cx: f32,
        cy: f32,
        arrival_time: f32,
        emission_altitude: f32,
        lambda: f32,
        mother_mass: f32,
        mother_charge: f32,
    ) -> Self {
        Self {
            size,
            x,
            y,
            cx,
            cy,
            arrival_time,
            emission_altitude,
            wavelength: fabsf(lambda),
            mother_mass,
            mother_charge,
        }
    }

    /// Unit propagation direction, with `cz` derived from `cx` and `cy`.
    ///
    /// Fails with [`BunchError::InvalidDirection`] when `cx^2 + cy^2 > 1`
    /// and [`BunchError::InvalidValue`] when either cosine is not finite.
    pub fn direction(&self) -> BunchResult<Vec3> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(BunchError::InvalidValue);
        }
        let norm = self.cx * self.cx + self.cy * self.cy;
        if norm > 1.0 {
            return Err(BunchError::InvalidDirection { norm });
        }
        Ok(Vec3::new(self.cx, self.cy, sqrtf(1.0 - norm)))
    }

    /// Downward direction cosine `sqrt(1 - cx^2 - cy^2)`.
    pub fn cz(&self) -> BunchResult<f32> {
        Ok(self.direction()?.z)
    }

    /// Trajectory slope `cx / cz`.
    pub fn slope_x(&self) -> BunchResult<f32> {
        let cz = self.cz()?;
        Ok(self.cx / cz)
    }

    /// Trajectory slope `cy / cz`.
    pub fn slope_y(&self) -> BunchResult<f32> {
        let cz = self.cz()?;
        Ok(self.cy / cz)
    }

    /// Thinning acceptance: the bunch survives iff `u <= size` for a
    /// uniform draw `u` in `[0, 1]`.
    pub fn reaches_observation_level(&self, uniform_0to1: f32) -> bool {
        uniform_0to1 <= self.size
    }

    /// Log a warning when the bunch size exceeds one equivalent photon.
    ///
    /// Sizes above 1.0 are legal under some thinning configurations but
    /// usually indicate a misconfigured producer.
    pub fn warn_if_size_above_one(&self) {
        if self.size > 1.0 {
            log_warn!("photon bunch size > 1.0 in {}", self);
        }
    }

    fn words(&self) -> [f32; 10] {
        [
            self.size,
            self.x,
            self.y,
            self.cx,
            self.cy,
            self.arrival_time,
            self.emission_altitude,
            self.wavelength,
            self.mother_mass,
            self.mother_charge,
        ]
    }

    /// Serialize as the raw 40-byte record: 10 x little-endian float32.
    pub fn to_bytes(&self) -> [u8; RAW_RECORD_SIZE] {
        let mut out = [0u8; RAW_RECORD_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.words()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Deserialize from the raw 40-byte record.
    pub fn from_bytes(bytes: &[u8; RAW_RECORD_SIZE]) -> Self {
        let mut words = [0f32; 10];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(chunk);
            *word = f32::from_le_bytes(buf);
        }
        Self {
            size: words[0],
            x: words[1],
            y: words[2],
            cx: words[3],
            cy: words[4],
            arrival_time: words[5],
            emission_altitude: words[6],
            wavelength: words[7],
            mother_mass: words[8],
            mother_charge: words[9],
        }
    }
}

impl fmt::Display for PhotonBunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PhotonBunch(size {}, x {}cm, y {}cm, cx {}, cy {}, t {}ns, \
             z0 {}cm, lambda {}nm, mother mass {}GeV, mother charge {})",
            self.size,
            self.x,
            self.y,
            self.cx,
            self.cy,
            self.arrival_time,
            self.emission_altitude,
            self.wavelength,
            self.mother_mass,
            self.mother_charge,
        )
    }
}
