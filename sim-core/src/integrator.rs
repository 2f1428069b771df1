//! Fixed-step 4th-order Runge-Kutta integrator.
//!
//! One [`Integrator::step`] performs four evaluations of the force field:
//!
//! 1. **K1** at the current state.
//! 2. **K2** at `x0 + k1v * dt/2`, `v0 + k1f * dt/2 / m`.
//! 3. **K3** at `x0 + k2v * dt/2`, `v0 + k2f * dt/2 / m`.
//! 4. **K4** at `x0 + k3v * dt`, `v0 + k3f * dt / m`.
//!
//! and then combines them with the classic `1/6 (k1 + 2 k2 + 2 k3 + k4)`
//! weights. Fixed particles are never moved, but they stay in the list and
//! act as force sources at every stage.

use tracing::trace;

use crate::force::ForceField;
use crate::particle::ParticleSet;
use crate::scratch::StageBuffer;
use crate::vector::Vector2;

/// RK4 integrator with per-particle scratch storage.
///
/// Every buffer is indexed by particle list position and grows to the
/// particle count at the start of each step. Buffers are never shared
/// between systems.
#[derive(Debug, Default)]
pub struct Integrator {
    original_position: Vec<Vector2>,
    original_velocity: Vec<Vector2>,
    k1: StageBuffer,
    k2: StageBuffer,
    k3: StageBuffer,
    k4: StageBuffer,
}

impl Integrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of particle slots currently allocated.
    pub fn capacity(&self) -> usize {
        self.original_position.len()
    }

    /// Grows every scratch buffer to `len` entries. Never shrinks.
    pub fn allocate(&mut self, len: usize) {
        if self.original_position.len() < len {
            self.original_position.resize(len, Vector2::ZERO);
            self.original_velocity.resize(len, Vector2::ZERO);
        }
        self.k1.ensure_len(len);
        self.k2.ensure_len(len);
        self.k3.ensure_len(len);
        self.k4.ensure_len(len);
    }

    /// Advances every free particle by `dt`.
    ///
    /// ### Parameters
    /// - `particles` - The system's particle list; positions, velocities,
    ///   forces and ages are updated in place.
    /// - `field` - Force field evaluated once per stage.
    /// - `dt` - Time step.
    pub fn step(&mut self, particles: &mut ParticleSet, field: &ForceField, dt: f64) {
        self.allocate(particles.len());

        for (i, p) in particles.iter_mut().enumerate() {
            if !p.fixed {
                self.original_position[i] = p.position;
                self.original_velocity[i] = p.velocity;
            }
            p.force.clear();
        }

        field.apply(particles);
        Self::record(&mut self.k1, particles);
        particles.clear_forces();

        self.predict(particles, Stage::K1, 0.5, dt);
        field.apply(particles);
        Self::record(&mut self.k2, particles);
        particles.clear_forces();

        self.predict(particles, Stage::K2, 0.5, dt);
        field.apply(particles);
        Self::record(&mut self.k3, particles);
        particles.clear_forces();

        self.predict(particles, Stage::K3, 1.0, dt);
        field.apply(particles);
        Self::record(&mut self.k4, particles);

        for (i, p) in particles.iter_mut().enumerate() {
            p.age += dt;

            if p.fixed {
                continue;
            }

            let velocity_sum = self.k1.velocity(i)
                + self.k2.velocity(i) * 2.0
                + self.k3.velocity(i) * 2.0
                + self.k4.velocity(i);
            p.position = self.original_position[i] + velocity_sum * (dt / 6.0);

            let force_sum = self.k1.force(i)
                + self.k2.force(i) * 2.0
                + self.k3.force(i) * 2.0
                + self.k4.force(i);
            p.velocity = self.original_velocity[i] + force_sum * (dt / (6.0 * p.mass));
        }

        trace!(particles = particles.len(), dt, "rk4 step");
    }

    fn record(stage: &mut StageBuffer, particles: &ParticleSet) {
        for (i, p) in particles.iter().enumerate() {
            if !p.fixed {
                stage.record(i, p.force, p.velocity);
            }
        }
    }

    /// Moves free particles to the evaluation point of the next stage,
    /// `x0 + kv * weight * dt` and `v0 + kf * weight * dt / m`.
    fn predict(&self, particles: &mut ParticleSet, from: Stage, weight: f64, dt: f64) {
        let stage = match from {
            Stage::K1 => &self.k1,
            Stage::K2 => &self.k2,
            Stage::K3 => &self.k3,
        };
        for (i, p) in particles.iter_mut().enumerate() {
            if p.fixed {
                continue;
            }
            p.position = self.original_position[i] + stage.velocity(i) * weight * dt;
            p.velocity = self.original_velocity[i] + stage.force(i) * weight * dt / p.mass;
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Stage {
    K1,
    K2,
    K3,
}
