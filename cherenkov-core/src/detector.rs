//! Detector Volume and Hit Test
//!
//! The detector is a fiducial sphere: any bunch whose ray passes within the
//! radius is assumed to be captured by the instrument. The sphere is created
//! once at array setup and is read-only for the rest of the run.
//!
//! The hit test works in absolute observation-plane coordinates; the frame
//! transform that recenters a bunch on the detector must therefore run
//! *after* the test, and only once per accepted hit.

use crate::bunch::PhotonBunch;
use crate::errors::BunchResult;
use crate::geometry::{closest_approach_distance, Vec3};

/// Spherical detector volume: center and radius in cm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorSphere {
    center: Vec3,
    radius: f32,
}

impl DetectorSphere {
    /// Create a detector sphere. The center z is the height of the sphere
    /// center above the observation plane.
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere center.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// Sphere radius (cm).
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Height of the sphere center above the observation plane (cm).
    pub const fn z(&self) -> f32 {
        self.center.z
    }

    /// Does the bunch's ray pass through the sphere?
    ///
    /// The ray has support `(x, y, 0)` on the observation plane and the
    /// bunch's unit direction. The boundary is inclusive: a ray at exactly
    /// `radius` counts as a hit. Invalid direction cosines surface as an
    /// error instead of silently reading as a miss.
    pub fn is_hit_by_photon(&self, bunch: &PhotonBunch) -> BunchResult<bool> {
        let support = Vec3::new(bunch.x, bunch.y, 0.0);
        let direction = bunch.direction()?;
        let distance = closest_approach_distance(support, direction, self.center);
        Ok(self.radius >= distance)
    }

    /// Shift the bunch into the detector frame.
    ///
    /// Translation only: the detector is not rotated relative to the
    /// observation plane, so `cx`/`cy` and every other field stay as they
    /// are. Mutates the bunch; call once per accepted hit, after the test.
    pub fn transform_to_detector_frame(&self, bunch: &mut PhotonBunch) {
        bunch.x -= self.center.x;
        bunch.y -= self.center.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT_HALF: f32 = 0.707_106_78;

    fn vertical_bunch_at(x: f32, y: f32) -> PhotonBunch {
        PhotonBunch::from_producer(1.0, x, y, 0.0, 0.0, 0.0, 1e6, 433.0, 0.0, 0.0)
    }

    fn inclined_bunch(cx: f32, cy: f32) -> PhotonBunch {
        PhotonBunch::from_producer(1.0, 0.0, 0.0, cx, cy, 0.0, 1e6, 433.0, 0.0, 0.0)
    }

    #[test]
    fn accessors() {
        let sphere = DetectorSphere::new(Vec3::new(1.0, 2.0, 3.0), 55.0);
        assert_eq!(sphere.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius(), 55.0);
        assert_eq!(sphere.z(), 3.0);
    }

    #[test]
    fn frontal_hit() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 1.0);
        assert!(sphere.is_hit_by_photon(&vertical_bunch_at(0.0, 0.0)).unwrap());
    }

    #[test]
    fn frontal_but_too_far_away() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 1.0);
        assert!(!sphere.is_hit_by_photon(&vertical_bunch_at(1.1, 0.0)).unwrap());
    }

    #[test]
    fn zero_radius_exact_hit() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 0.0);
        assert!(sphere.is_hit_by_photon(&vertical_bunch_at(0.0, 0.0)).unwrap());
    }

    #[test]
    fn zero_radius_tiny_offset_misses() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 0.0);
        assert!(!sphere.is_hit_by_photon(&vertical_bunch_at(1e-6, 0.0)).unwrap());
    }

    #[test]
    fn frontal_close_to_edge() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 1.0);

        for (x, y, expect_hit) in [
            (1.01, 0.0, false),
            (0.99, 0.0, true),
            (0.0, 1.01, false),
            (0.0, 0.99, true),
            (-1.01, 0.0, false),
            (-0.99, 0.0, true),
            (0.0, -1.01, false),
            (0.0, -0.99, true),
        ] {
            let hit = sphere.is_hit_by_photon(&vertical_bunch_at(x, y)).unwrap();
            assert_eq!(hit, expect_hit, "offset ({}, {})", x, y);
        }
    }

    #[test]
    fn inclined_45_degrees() {
        // Sphere one unit above the plane; a 45 degree ray from the origin
        // passes at distance sqrt(0.5) from the center.
        let hit_sphere = DetectorSphere::new(Vec3::new(0.0, 0.0, 1.0), SQRT_HALF + 0.01);
        let miss_sphere = DetectorSphere::new(Vec3::new(0.0, 0.0, 1.0), SQRT_HALF - 0.01);

        for (cx, cy) in [
            (SQRT_HALF, 0.0),
            (0.0, SQRT_HALF),
            (-SQRT_HALF, 0.0),
            (0.0, -SQRT_HALF),
        ] {
            let bunch = inclined_bunch(cx, cy);
            assert!(
                hit_sphere.is_hit_by_photon(&bunch).unwrap(),
                "cx {} cy {} should hit",
                cx,
                cy
            );
            assert!(
                !miss_sphere.is_hit_by_photon(&bunch).unwrap(),
                "cx {} cy {} should miss",
                cx,
                cy
            );
        }
    }

    #[test]
    fn invalid_direction_is_an_error_not_a_miss() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 1.0);
        let bunch = inclined_bunch(0.9, 0.9);
        assert!(sphere.is_hit_by_photon(&bunch).is_err());
    }

    #[test]
    fn transform_at_origin_is_identity() {
        let sphere = DetectorSphere::new(Vec3::ZERO, 0.0);
        let mut bunch = PhotonBunch::from_producer(1.0, 1.0, 2.0, 0.1, 0.2, 0.0, 1e6, 0.0, 0.0, 0.0);

        sphere.transform_to_detector_frame(&mut bunch);

        assert_eq!(bunch.x, 1.0);
        assert_eq!(bunch.y, 2.0);
        assert_eq!(bunch.cx, 0.1);
        assert_eq!(bunch.cy, 0.2);
    }

    #[test]
    fn transform_is_pure_translation() {
        let sphere = DetectorSphere::new(Vec3::new(0.3, 1.0, 0.0), 1.0);
        let mut bunch = PhotonBunch::from_producer(1.0, 1.0, 2.0, 0.1, 0.2, 0.0, 1e6, 0.0, 0.0, 0.0);

        sphere.transform_to_detector_frame(&mut bunch);

        assert!((bunch.x - 0.7).abs() < 1e-6);
        assert!((bunch.y - 1.0).abs() < 1e-6);
        assert_eq!(bunch.cx, 0.1);
        assert_eq!(bunch.cy, 0.2);
    }
}
