//! Zones — assignable spatial regions.
//!
//! A zone is a horizontal disc: agents wander inside their assigned zone
//! while idle and relocate between zones as a group.  The host defines the
//! zone layout at session start; the library only samples points and tests
//! membership.

use crate::rng::AgentRng;
use crate::{Vec3, ZoneId};

/// One assignable region: a disc of `radius` around `center`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub center: Vec3,
    pub radius: f32,
}

impl Zone {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// `true` if `point` lies inside the zone (horizontal distance only —
    /// zone membership ignores height).
    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        point.distance_xz(self.center) <= self.radius
    }

    /// Uniform random point inside the zone, at the zone's height.
    ///
    /// Radius is sampled as `r = R * sqrt(u)` so area density is uniform
    /// rather than clumped at the center.
    pub fn random_point(&self, rng: &mut AgentRng) -> Vec3 {
        let angle: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
        let r = self.radius * rng.gen_range(0.0_f32..1.0).sqrt();
        Vec3::new(
            self.center.x + r * angle.cos(),
            self.center.y,
            self.center.z + r * angle.sin(),
        )
    }
}

/// The session's zone layout, indexed by [`ZoneId`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// The zone containing `point`, if any.  First match wins when zones
    /// overlap.
    pub fn zone_at(&self, point: Vec3) -> Option<ZoneId> {
        self.zones
            .iter()
            .position(|z| z.contains(point))
            .map(|i| ZoneId(i as u16))
    }

    /// Pick a zone uniformly at random among all zones except `current`.
    ///
    /// Returns `None` when no alternative exists (zero or one zone, or the
    /// only other candidate *is* `current`).
    pub fn pick_other(&self, current: ZoneId, rng: &mut AgentRng) -> Option<ZoneId> {
        let candidates: Vec<u16> = (0..self.zones.len() as u16)
            .filter(|&i| ZoneId(i) != current)
            .collect();
        rng.choose(&candidates).map(|&i| ZoneId(i))
    }
}
