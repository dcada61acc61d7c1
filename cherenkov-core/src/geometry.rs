//! Vector geometry primitive for the detector hit test
//!
//! A photon bunch travels along a straight ray from the observation plane.
//! The only geometric question this crate ever asks is "how close does that
//! ray pass to a given point", so this module provides exactly that: a small
//! `Vec3` and the closest-approach distance of a ray to a point.
//!
//! Math goes through `libm` so the module works without `std`.

use libm::sqrtf;

/// Three-component vector, lengths in cm.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// x component.
    pub x: f32,
    /// y component.
    pub y: f32,
    /// z component.
    pub z: f32,
}

impl Vec3 {
    /// The origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component-wise sum.
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise difference.
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Scale by a factor.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Euclidean length.
    pub fn norm(self) -> f32 {
        sqrtf(self.dot(self))
    }
}

/// Closest distance between the ray `support + alpha * direction` and `point`.
///
/// The ray parameter `alpha = d.p - s.d` marks the point on the ray closest
/// to `point`; the returned value is the perpendicular miss distance.
/// `direction` must be a unit vector, the caller guarantees this.
pub fn closest_approach_distance(support: Vec3, direction: Vec3, point: Vec3) -> f32 {
    let alpha = direction.dot(point) - support.dot(direction);
    let closest = support.add(direction.scale(alpha));
    point.sub(closest).norm()
}
