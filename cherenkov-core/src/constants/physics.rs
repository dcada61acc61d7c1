//! Physical Constants
//!
//! Fundamental constants used by the frame transform and the atmosphere
//! model. Everything is expressed in the simulator's native units:
//! centimeters and nanoseconds.

/// Vacuum speed of light (cm/ns).
///
/// Exact by definition of the meter. In cm/ns the value is numerically the
/// familiar 29.98 cm per nanosecond.
///
/// Source: CODATA 2018
pub const VACUUM_SPEED_OF_LIGHT_CM_PER_NS: f32 = 29.9792458;

/// Refractivity of air (n - 1) at sea level for visible light.
///
/// The refractive index of air scales with density to good accuracy, so
/// this single anchor value plus a density profile gives n at any height.
///
/// Source: Ciddor equation, 15 degC, 1013.25 hPa, 550 nm
pub const AIR_REFRACTIVITY_SEA_LEVEL: f32 = 2.83e-4;
