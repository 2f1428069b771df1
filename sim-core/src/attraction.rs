use crate::force::Force;
use crate::particle::{ParticleSet, ParticleView};
use crate::types::ParticleHandle;
use crate::vector::Vector2;

/// Inverse-square attraction (or repulsion, for negative `strength`)
/// between two particles.
///
/// The force magnitude is `strength * m_a * m_b / max(d², min_distance²)`,
/// so it stops growing once the particles are closer than `min_distance`.
#[derive(Clone, Debug, PartialEq)]
pub struct Attraction {
    pub a: ParticleHandle,
    pub b: ParticleHandle,
    pub strength: f64,
    pub enabled: bool,
    min_distance: f64,
    min_distance_squared: f64,
}

impl Attraction {
    pub fn new(a: ParticleHandle, b: ParticleHandle, strength: f64, min_distance: f64) -> Self {
        Self {
            a,
            b,
            strength,
            enabled: true,
            min_distance,
            min_distance_squared: min_distance * min_distance,
        }
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn min_distance_squared(&self) -> f64 {
        self.min_distance_squared
    }

    pub fn set_min_distance(&mut self, min_distance: f64) -> &mut Self {
        self.min_distance = min_distance;
        self.min_distance_squared = min_distance * min_distance;
        self
    }

    /// Same shape as [`crate::spring::Spring::resting`], using `min_distance`
    /// as the proximity threshold.
    pub fn resting(&self, particles: &ParticleSet) -> bool {
        if !self.enabled {
            return true;
        }
        let (Some(a), Some(b)) = (particles.get(self.a), particles.get(self.b)) else {
            return true;
        };
        let l = self.min_distance;

        (a.fixed && b.fixed)
            || (a.fixed && b.position.distance_to(&a.position) <= l && b.resting())
            || (b.fixed && a.position.distance_to(&b.position) <= l && a.resting())
    }
}

impl Force for Attraction {
    fn apply(&self, particles: &mut ParticleView<'_>) {
        if !self.enabled {
            return;
        }
        let Some((a, b)) = particles.pair_mut(self.a, self.b) else {
            return;
        };
        if a.fixed && b.fixed {
            return;
        }

        let mut a2b = Vector2::ZERO;
        a2b.sub_of(&a.position, &b.position);

        // NaN separations propagate rather than being clamped away.
        let len_sq = a2b.length_squared();
        let dist_sq = if len_sq.is_nan() {
            len_sq
        } else {
            len_sq.max(self.min_distance_squared)
        };

        let force = (self.strength * a.mass * b.mass) / dist_sq;
        let len = dist_sq.sqrt();

        if force == 0.0 || len == 0.0 {
            a2b.clear();
        } else {
            a2b.divide_scale(len).scale(force);
        }

        if !a.fixed {
            a.force.sub_in_place(&a2b);
        }
        if !b.fixed {
            b.force.add_in_place(&a2b);
        }
    }
}
