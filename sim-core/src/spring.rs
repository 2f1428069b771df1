use crate::force::Force;
use crate::particle::{ParticleSet, ParticleView};
use crate::types::ParticleHandle;
use crate::vector::Vector2;

/// Hookean spring with velocity damping between two particles.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    pub a: ParticleHandle,
    pub b: ParticleHandle,
    pub stiffness: f64,
    pub damping: f64,
    pub rest_length: f64,
    pub enabled: bool,
}

impl Spring {
    pub fn new(
        a: ParticleHandle,
        b: ParticleHandle,
        stiffness: f64,
        damping: f64,
        rest_length: f64,
    ) -> Self {
        Self {
            a,
            b,
            stiffness,
            damping,
            rest_length,
            enabled: true,
        }
    }

    /// Distance between the endpoints, or `None` if either handle is stale.
    pub fn current_length(&self, particles: &ParticleSet) -> Option<f64> {
        let a = particles.get(self.a)?;
        let b = particles.get(self.b)?;
        Some(a.distance_to(b))
    }

    /// Conservative equilibrium test.
    ///
    /// Holds when the spring is disabled, both ends are fixed, or one end is
    /// fixed and the other is resting within `rest_length` of it (on top of
    /// it when `rest_length` is zero). A spring between two free particles
    /// never rests.
    pub fn resting(&self, particles: &ParticleSet) -> bool {
        if !self.enabled {
            return true;
        }
        let (Some(a), Some(b)) = (particles.get(self.a), particles.get(self.b)) else {
            return true;
        };

        let within = |p: &Vector2, anchor: &Vector2| {
            if self.rest_length == 0.0 {
                p.equals(anchor)
            } else {
                p.distance_to(anchor) <= self.rest_length
            }
        };

        (a.fixed && b.fixed)
            || (a.fixed && within(&b.position, &a.position) && b.resting())
            || (b.fixed && within(&a.position, &b.position) && a.resting())
    }
}

impl Force for Spring {
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

        let mut dir = Vector2::ZERO;
        dir.sub_of(&a.position, &b.position);
        let d = dir.length();
        if d == 0.0 {
            dir.clear();
        } else {
            dir.divide_scale(d);
        }

        let spring_force = -1.0 * (d - self.rest_length) * self.stiffness;

        let mut rel_velocity = Vector2::ZERO;
        rel_velocity.sub_of(&a.velocity, &b.velocity);
        let damping_force = -1.0 * self.damping * rel_velocity.dot(&dir);

        dir.scale(spring_force + damping_force);

        if !a.fixed {
            a.force.add_in_place(&dir);
        }
        if !b.fixed {
            b.force.sub_in_place(&dir);
        }
    }
}
