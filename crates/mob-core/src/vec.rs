//! Minimal 3-component vector used for all positional math.
//!
//! Single-precision is deliberate: the host engine's transforms are f32, and
//! every distance this library computes feeds a threshold comparison, not an
//! integrator.  No SIMD, no external math crate — the handful of operations
//! below is the entire requirement.

use std::f32::consts::TAU;

/// A position or offset in host world space, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Distance ignoring the vertical axis — used for reach checks so that a
    /// hovering drone and a ground crawler measure range the same way.
    #[inline]
    pub fn distance_xz(self, other: Vec3) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Unit vector in the direction of `self`, or `ZERO` for near-zero input.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Linear blend: `self` at `t = 0`, `other` at `t = 1`.
    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    /// The point on a horizontal ring of `radius` around `center`, at slot
    /// `i` of `n` plus `base_angle` radians.
    ///
    /// Slot angles are `TAU * i / n + base_angle`, so `n` agents land evenly
    /// spaced.  The result keeps `center`'s height.
    pub fn ring_slot(center: Vec3, radius: f32, i: usize, n: usize, base_angle: f32) -> Vec3 {
        let n = n.max(1);
        let angle = TAU * (i as f32) / (n as f32) + base_angle;
        Vec3::new(
            center.x + radius * angle.cos(),
            center.y,
            center.z + radius * angle.sin(),
        )
    }

    /// The point `distance` metres from `target` along the line back toward
    /// `from` — the standoff point a chaser steers for instead of the target
    /// itself.  Falls back to `target` when the two coincide.
    pub fn approach_point(from: Vec3, target: Vec3, distance: f32) -> Vec3 {
        let away = (from - target).normalized();
        if away == Vec3::ZERO {
            target
        } else {
            target + away * distance
        }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
