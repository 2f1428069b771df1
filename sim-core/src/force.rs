//! Force elements and the aggregate force field of a system.
//!
//! Everything that pushes on particles implements [`Force`]. The
//! [`ForceField`] owns the global terms (gravity, drag) together with the
//! ordered element lists and evaluates them in a fixed order:
//!
//! 1. gravity, added to every particle when it is not (almost) zero,
//! 2. linear drag `-velocity * drag` on every particle,
//! 3. springs, then attractions, then custom forces, each in insertion order.
//!
//! Forces accumulate additively, so the order only matters for
//! floating-point reproducibility, but it is kept stable for exactly that.

use crate::attraction::Attraction;
use crate::config::DEFAULT_DRAG;
use crate::particle::{ParticleSet, ParticleView};
use crate::spring::Spring;
use crate::vector::Vector2;

/// A force element that adds into particle force accumulators.
///
/// Elements see the particles through a [`ParticleView`], which cannot
/// change the particle count. Implementations must leave `fixed` particles
/// untouched.
pub trait Force {
    fn apply(&self, particles: &mut ParticleView<'_>);
}

impl<F: Fn(&mut ParticleView<'_>)> Force for F {
    fn apply(&self, particles: &mut ParticleView<'_>) {
        self(particles)
    }
}

pub struct ForceField {
    pub gravity: Vector2,
    pub drag: f64,
    pub springs: Vec<Spring>,
    pub attractions: Vec<Attraction>,
    pub custom: Vec<Box<dyn Force>>,
}

impl Default for ForceField {
    fn default() -> Self {
        Self {
            gravity: Vector2::ZERO,
            drag: DEFAULT_DRAG,
            springs: Vec::new(),
            attractions: Vec::new(),
            custom: Vec::new(),
        }
    }
}

impl std::fmt::Debug for ForceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForceField")
            .field("gravity", &self.gravity)
            .field("drag", &self.drag)
            .field("springs", &self.springs.len())
            .field("attractions", &self.attractions.len())
            .field("custom", &self.custom.len())
            .finish()
    }
}

impl ForceField {
    /// Accumulates every force term into `particles`.
    ///
    /// Force accumulators are not cleared first; the caller decides when
    /// to reset them.
    pub fn apply(&self, particles: &mut ParticleSet) {
        if !self.gravity.is_zero() {
            for p in particles.iter_mut() {
                p.force.add_in_place(&self.gravity);
            }
        }

        for p in particles.iter_mut() {
            let drag = p.velocity * -1.0 * self.drag;
            p.force.add_in_place(&drag);
        }

        let mut view = particles.view();
        for spring in &self.springs {
            spring.apply(&mut view);
        }
        for attraction in &self.attractions {
            attraction.apply(&mut view);
        }
        for force in &self.custom {
            force.apply(&mut view);
        }
    }

    /// Empties the spring and attraction lists. Custom forces are kept.
    pub fn clear_elements(&mut self) {
        self.springs.clear();
        self.attractions.clear();
    }
}
