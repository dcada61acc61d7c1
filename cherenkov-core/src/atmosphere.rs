//! Atmosphere Model for Light Speed and Time-Offset Lookups
//!
//! ## Motivation
//!
//! The output session needs two atmospheric quantities the simulator itself
//! does not hand over: the speed of light in air at the observation level,
//! and the height where the vertical atmospheric thickness (slant depth)
//! reaches a given value - in particular thickness zero, the top of the
//! atmosphere, used as the time origin when the first interaction height is
//! not reported.
//!
//! ## Physics Background
//!
//! The US standard atmosphere in Linsley's parametrization stacks five
//! layers. In the lower four the vertical thickness above height `h`
//! follows
//!
//! ```text
//! T(h) = a_i + b_i * exp(-h / c_i)      [g/cm^2, h in cm]
//! ```
//!
//! and in the thin top layer it falls off linearly, reaching zero at
//! 112.8292 km. Both directions are closed-form: the exponential layers
//! invert to `h = -c_i * ln((T - a_i) / b_i)`.
//!
//! Air density is the (negative) height derivative of the thickness,
//! `rho(h) = b_i / c_i * exp(-h / c_i)`, and the refractive index of air
//! scales with density to good accuracy:
//!
//! ```text
//! n(h) = 1 + 2.83e-4 * rho(h) / rho(0)
//! ```
//!
//! That closes the loop: `speed_of_light(h) = c_vacuum / n(h)`.

use libm::{expf, logf};

use crate::constants::physics::{AIR_REFRACTIVITY_SEA_LEVEL, VACUUM_SPEED_OF_LIGHT_CM_PER_NS};

/// One exponential layer of the Linsley parametrization.
struct Layer {
    /// Lower boundary of the layer (cm above sea level).
    floor_cm: f32,
    /// Thickness offset (g/cm^2).
    a: f32,
    /// Thickness scale (g/cm^2).
    b: f32,
    /// Scale height (cm).
    c: f32,
}

/// Exponential layers of the US standard atmosphere, sea level to 100 km.
const LAYERS: [Layer; 4] = [
    Layer { floor_cm: 0.0, a: -186.555_305, b: 1_222.656_2, c: 994_186.38 },
    Layer { floor_cm: 4.0e5, a: -94.919, b: 1_144.906_9, c: 878_153.55 },
    Layer { floor_cm: 1.0e6, a: 0.612_89, b: 1_305.594_8, c: 636_143.04 },
    Layer { floor_cm: 4.0e6, a: 0.0, b: 540.177_8, c: 772_170.16 },
];

/// Lower boundary of the linear top layer (cm).
const TOP_LAYER_FLOOR_CM: f32 = 1.0e7;

/// Thickness offset of the linear top layer (g/cm^2).
const TOP_LAYER_A: f32 = 0.011_282_92;

/// Height scale of the linear top layer (cm per g/cm^2).
const TOP_LAYER_SCALE_CM: f32 = 1.0e9;

/// Height where the atmospheric thickness reaches zero: 112.8292 km.
pub const ATMOSPHERE_TOP_CM: f32 = TOP_LAYER_A * TOP_LAYER_SCALE_CM;

/// Air density at sea level (g/cm^3).
pub const SEA_LEVEL_DENSITY_G_PER_CM3: f32 = LAYERS[0].b / LAYERS[0].c;

fn layer_for_height(height_cm: f32) -> &'static Layer {
    // Heights below sea level extrapolate with the lowest layer.
    if height_cm >= LAYERS[3].floor_cm {
        &LAYERS[3]
    } else if height_cm >= LAYERS[2].floor_cm {
        &LAYERS[2]
    } else if height_cm >= LAYERS[1].floor_cm {
        &LAYERS[1]
    } else {
        &LAYERS[0]
    }
}

/// Vertical atmospheric thickness above `height_cm` (g/cm^2).
pub fn thickness(height_cm: f32) -> f32 {
    if height_cm >= ATMOSPHERE_TOP_CM {
        0.0
    } else if height_cm >= TOP_LAYER_FLOOR_CM {
        TOP_LAYER_A - height_cm / TOP_LAYER_SCALE_CM
    } else {
        let layer = layer_for_height(height_cm);
        layer.a + layer.b * expf(-height_cm / layer.c)
    }
}

/// Height above sea level (cm) where the thickness equals `thickness_g_cm2`.
///
/// `height_above_sea_level(0.0)` is the top of the atmosphere. Thickness
/// values above the sea-level thickness extrapolate below sea level.
pub fn height_above_sea_level(thickness_g_cm2: f32) -> f32 {
    if thickness_g_cm2 <= 0.0 {
        return ATMOSPHERE_TOP_CM;
    }
    if thickness_g_cm2 < thickness(TOP_LAYER_FLOOR_CM) {
        return (TOP_LAYER_A - thickness_g_cm2) * TOP_LAYER_SCALE_CM;
    }
    let layer = if thickness_g_cm2 >= thickness(LAYERS[1].floor_cm) {
        &LAYERS[0]
    } else if thickness_g_cm2 >= thickness(LAYERS[2].floor_cm) {
        &LAYERS[1]
    } else if thickness_g_cm2 >= thickness(LAYERS[3].floor_cm) {
        &LAYERS[2]
    } else {
        &LAYERS[3]
    };
    -layer.c * logf((thickness_g_cm2 - layer.a) / layer.b)
}

/// Air density at `height_cm` (g/cm^3).
pub fn density(height_cm: f32) -> f32 {
    if height_cm >= ATMOSPHERE_TOP_CM {
        0.0
    } else if height_cm >= TOP_LAYER_FLOOR_CM {
        1.0 / TOP_LAYER_SCALE_CM
    } else {
        let layer = layer_for_height(height_cm);
        layer.b / layer.c * expf(-height_cm / layer.c)
    }
}

/// Refractive index of air at `height_cm`.
pub fn refractive_index(height_cm: f32) -> f32 {
    1.0 + AIR_REFRACTIVITY_SEA_LEVEL * density(height_cm) / SEA_LEVEL_DENSITY_G_PER_CM3
}

/// Speed of light in air at `height_cm` (cm/ns).
pub fn speed_of_light(height_cm: f32) -> f32 {
    VACUUM_SPEED_OF_LIGHT_CM_PER_NS / refractive_index(height_cm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_thickness() {
        // Full vertical atmosphere: ~1036 g/cm^2
        let t = thickness(0.0);
        assert!((t - 1036.1).abs() < 0.5, "thickness {}", t);
    }

    #[test]
    fn zero_thickness_is_top_of_atmosphere() {
        let top = height_above_sea_level(0.0);
        assert!((top - 1.128_292e7).abs() < 1.0);
        assert_eq!(thickness(top), 0.0);
    }

    #[test]
    fn thickness_height_round_trip() {
        for t in [1000.0f32, 700.0, 300.0, 100.0, 5.0, 1.0, 0.01, 0.002] {
            let h = height_above_sea_level(t);
            let back = thickness(h);
            assert!(
                (back - t).abs() <= t * 1e-3 + 1e-4,
                "t {} -> h {} -> {}",
                t,
                h,
                back
            );
        }
    }

    #[test]
    fn thickness_decreases_with_height() {
        let mut previous = thickness(0.0);
        for h in [2.0e5f32, 6.0e5, 2.0e6, 6.0e6, 1.05e7] {
            let t = thickness(h);
            assert!(t < previous, "thickness not decreasing at {} cm", h);
            previous = t;
        }
    }

    #[test]
    fn sea_level_density() {
        assert!((density(0.0) - 1.2298e-3).abs() < 1e-5);
    }

    #[test]
    fn refractive_index_at_sea_level() {
        let n = refractive_index(0.0);
        assert!((n - 1.000_283).abs() < 1e-6);
    }

    #[test]
    fn refractive_index_falls_off_with_height() {
        let n0 = refractive_index(0.0);
        let n2km = refractive_index(2.0e5);
        let n10km = refractive_index(1.0e6);
        assert!(n0 > n2km);
        assert!(n2km > n10km);
        assert!(n10km > 1.0);
    }

    #[test]
    fn light_is_slower_in_air() {
        let c_obs = speed_of_light(0.0);
        assert!(c_obs < VACUUM_SPEED_OF_LIGHT_CM_PER_NS);
        assert!(c_obs > VACUUM_SPEED_OF_LIGHT_CM_PER_NS / 1.001);
    }
}
