//! The particle system: particles, force elements and the integrator.
//!
//! A [`System`] owns every particle, spring, attraction and custom force.
//! Elements are created through the factory methods, which return handles;
//! nothing is ever removed except by [`System::clear`]. Each
//! [`System::tick`] runs one RK4 step over the whole particle list and, when
//! equilibrium tracking is on, re-evaluates whether the system has settled.

use tracing::{debug, trace};

use crate::attraction::Attraction;
use crate::config::{DEFAULT_TIME_STEP, EquilibriumCriteria, SystemConfig};
use crate::force::{Force, ForceField};
use crate::integrator::Integrator;
use crate::particle::{Particle, ParticleSet};
use crate::spring::Spring;
use crate::types::{AttractionHandle, ParticleHandle, SpringHandle};
use crate::vector::Vector2;

#[derive(Debug, Default)]
pub struct System {
    particles: ParticleSet,
    field: ForceField,
    integrator: Integrator,
    criteria: EquilibriumCriteria,
    equilibrium: bool,
    optimized: bool,
}

impl System {
    /// Creates an empty system with [`SystemConfig::default`] settings.
    pub fn new() -> Self {
        Self::with_config(SystemConfig::default())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        let mut system = Self::default();
        system.apply_config(&config);
        system
    }

    /// Overwrites gravity, drag, the optimize flag and the equilibrium criteria.
    pub fn apply_config(&mut self, config: &SystemConfig) -> &mut Self {
        self.field.gravity = config.gravity;
        self.field.drag = config.drag;
        self.optimized = config.optimized;
        self.criteria = config.equilibrium;
        self
    }

    pub fn config(&self) -> SystemConfig {
        SystemConfig {
            gravity: self.field.gravity,
            drag: self.field.drag,
            optimized: self.optimized,
            equilibrium: self.criteria,
        }
    }

    pub fn create_particle(&mut self, mass: f64, x: f64, y: f64) -> ParticleHandle {
        self.add_particle(Particle::new(mass, x, y))
    }

    pub fn create_spring(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
        stiffness: f64,
        damping: f64,
        rest_length: f64,
    ) -> SpringHandle {
        self.add_spring(Spring::new(a, b, stiffness, damping, rest_length))
    }

    pub fn create_attraction(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
        strength: f64,
        min_distance: f64,
    ) -> AttractionHandle {
        self.add_attraction(Attraction::new(a, b, strength, min_distance))
    }

    pub fn add_particle(&mut self, particle: Particle) -> ParticleHandle {
        self.particles.push(particle)
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringHandle {
        let handle = SpringHandle::new(self.field.springs.len(), self.particles.epoch());
        self.field.springs.push(spring);
        handle
    }

    pub fn add_attraction(&mut self, attraction: Attraction) -> AttractionHandle {
        let handle = AttractionHandle::new(self.field.attractions.len(), self.particles.epoch());
        self.field.attractions.push(attraction);
        handle
    }

    /// Appends a custom force element, evaluated after springs and attractions.
    pub fn add_force<F: Force + 'static>(&mut self, force: F) -> &mut Self {
        self.field.custom.push(Box::new(force));
        self
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.get(handle)
    }

    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.particles.get_mut(handle)
    }

    pub fn spring(&self, handle: SpringHandle) -> Option<&Spring> {
        if handle.epoch != self.particles.epoch() {
            return None;
        }
        self.field.springs.get(handle.index())
    }

    pub fn spring_mut(&mut self, handle: SpringHandle) -> Option<&mut Spring> {
        if handle.epoch != self.particles.epoch() {
            return None;
        }
        self.field.springs.get_mut(handle.index())
    }

    pub fn attraction(&self, handle: AttractionHandle) -> Option<&Attraction> {
        if handle.epoch != self.particles.epoch() {
            return None;
        }
        self.field.attractions.get(handle.index())
    }

    pub fn attraction_mut(&mut self, handle: AttractionHandle) -> Option<&mut Attraction> {
        if handle.epoch != self.particles.epoch() {
            return None;
        }
        self.field.attractions.get_mut(handle.index())
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn springs(&self) -> &[Spring] {
        &self.field.springs
    }

    pub fn attractions(&self) -> &[Attraction] {
        &self.field.attractions
    }

    pub fn custom_force_count(&self) -> usize {
        self.field.custom.len()
    }

    pub fn set_gravity(&mut self, x: f64, y: f64) -> &mut Self {
        self.field.gravity.set(x, y);
        self
    }

    pub fn gravity(&self) -> Vector2 {
        self.field.gravity
    }

    pub fn set_drag(&mut self, drag: f64) -> &mut Self {
        self.field.drag = drag;
        self
    }

    pub fn drag(&self) -> f64 {
        self.field.drag
    }

    /// Turns equilibrium tracking on or off. Only an optimized system updates
    /// its equilibrium flag after each tick.
    pub fn optimize(&mut self, enabled: bool) -> &mut Self {
        self.optimized = enabled;
        self
    }

    pub fn is_optimized(&self) -> bool {
        self.optimized
    }

    pub fn set_equilibrium_criteria(
        &mut self,
        particles: bool,
        springs: bool,
        attractions: bool,
    ) -> &mut Self {
        self.criteria = EquilibriumCriteria {
            particles,
            springs,
            attractions,
        };
        self
    }

    pub fn equilibrium_criteria(&self) -> EquilibriumCriteria {
        self.criteria
    }

    /// Result of the last equilibrium evaluation. Always `false` unless the
    /// system is optimized.
    pub fn is_at_equilibrium(&self) -> bool {
        self.equilibrium
    }

    /// Forgets a previously detected equilibrium so the next tick runs.
    pub fn reset_equilibrium(&mut self) -> &mut Self {
        self.equilibrium = false;
        self
    }

    /// Adds gravity, drag and every force element into the particles'
    /// force accumulators.
    pub fn apply_forces(&mut self) -> &mut Self {
        self.field.apply(&mut self.particles);
        self
    }

    pub fn clear_forces(&mut self) -> &mut Self {
        self.particles.clear_forces();
        self
    }

    /// Removes every particle, spring and attraction. Custom forces stay.
    ///
    /// Handles issued before the call no longer resolve.
    pub fn clear(&mut self) -> &mut Self {
        debug!(
            particles = self.particles.len(),
            springs = self.field.springs.len(),
            attractions = self.field.attractions.len(),
            "clearing system"
        );
        self.particles.clear();
        self.field.clear_elements();
        self
    }

    /// Advances the simulation by `dt`.
    pub fn tick(&mut self, dt: f64) -> &mut Self {
        self.integrator.step(&mut self.particles, &self.field, dt);

        if self.optimized {
            let was_at_rest = self.equilibrium;
            self.equilibrium = !self.needs_update();
            if self.equilibrium && !was_at_rest {
                debug!(particles = self.particles.len(), "system reached equilibrium");
            }
        }
        trace!(dt, equilibrium = self.equilibrium, "tick");
        self
    }

    /// [`System::tick`] with [`DEFAULT_TIME_STEP`].
    pub fn advance(&mut self) -> &mut Self {
        self.tick(DEFAULT_TIME_STEP)
    }

    /// True while any element of an enabled equilibrium category is still
    /// moving. Disabled categories are ignored.
    pub fn needs_update(&self) -> bool {
        if self.criteria.particles && self.particles.iter().any(|p| !p.resting()) {
            return true;
        }
        if self.criteria.springs
            && self.field.springs.iter().any(|s| !s.resting(&self.particles))
        {
            return true;
        }
        if self.criteria.attractions
            && self
                .field
                .attractions
                .iter()
                .any(|a| !a.resting(&self.particles))
        {
            return true;
        }
        false
    }

    /// Scratch slots currently held by the integrator.
    pub fn integrator_capacity(&self) -> usize {
        self.integrator.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::ParticleView;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn new_system_uses_default_config() {
        let system = System::new();
        assert_eq!(system.config(), SystemConfig::default());
        assert!(!system.is_at_equilibrium());
        assert!(system.particles().is_empty());
    }

    #[test]
    fn factories_append_and_return_handles() {
        let mut system = System::new();
        let a = system.create_particle(1.0, 0.0, 0.0);
        let b = system.create_particle(2.0, 5.0, 0.0);
        let s = system.create_spring(a, b, 1.0, 0.1, 2.0);
        let at = system.create_attraction(a, b, 3.0, 1.0);

        assert_eq!(system.particles().len(), 2);
        assert_eq!(system.particle(b).unwrap().mass, 2.0);
        assert_eq!(system.spring(s).unwrap().rest_length, 2.0);
        assert_eq!(system.attraction(at).unwrap().strength, 3.0);
        assert_eq!(system.springs().len(), 1);
        assert_eq!(system.attractions().len(), 1);
    }

    #[test]
    fn add_does_not_deduplicate() {
        let mut system = System::new();
        let a = system.create_particle(1.0, 0.0, 0.0);
        let b = system.create_particle(1.0, 1.0, 0.0);
        let spring = Spring::new(a, b, 1.0, 0.0, 1.0);

        system.add_spring(spring.clone());
        system.add_spring(spring);

        assert_eq!(system.springs().len(), 2);
    }

    #[test]
    fn clear_empties_lists_and_invalidates_handles() {
        let mut system = System::new();
        let a = system.create_particle(1.0, 0.0, 0.0);
        let b = system.create_particle(1.0, 1.0, 0.0);
        let s = system.create_spring(a, b, 1.0, 0.0, 1.0);
        let at = system.create_attraction(a, b, 1.0, 1.0);
        system.add_force(|_: &mut ParticleView<'_>| {});

        system.clear();

        assert!(system.particles().is_empty());
        assert!(system.springs().is_empty());
        assert!(system.attractions().is_empty());
        assert_eq!(system.custom_force_count(), 1);
        assert!(system.particle(a).is_none());
        assert!(system.spring(s).is_none());
        assert!(system.attraction(at).is_none());
    }

    #[test]
    fn apply_and_clear_forces() {
        let mut system = System::new();
        system.set_gravity(0.0, -2.0).set_drag(0.0);
        let p = system.create_particle(1.0, 0.0, 0.0);

        system.apply_forces();
        assert_eq!(system.particle(p).unwrap().force, Vector2::new(0.0, -2.0));

        system.apply_forces();
        assert_eq!(system.particle(p).unwrap().force, Vector2::new(0.0, -4.0));

        system.clear_forces();
        assert_eq!(system.particle(p).unwrap().force, Vector2::ZERO);
    }

    #[test]
    fn tick_moves_particles_under_gravity() {
        let mut system = System::new();
        system.set_gravity(0.0, -10.0).set_drag(0.0);
        let p = system.create_particle(1.0, 0.0, 0.0);

        system.advance();

        let particle = system.particle(p).unwrap();
        assert_relative_eq!(particle.position.y, -5.0, epsilon = 1e-12);
        assert_relative_eq!(particle.velocity.y, -10.0, epsilon = 1e-12);
        assert_eq!(system.integrator_capacity(), 1);
    }

    #[test]
    fn equilibrium_only_tracked_when_optimized() {
        let mut system = System::new();
        system.create_particle(1.0, 0.0, 0.0);

        system.tick(1.0);
        assert!(!system.is_at_equilibrium());

        system.optimize(true).tick(1.0);
        assert!(system.is_at_equilibrium());

        system.reset_equilibrium();
        assert!(!system.is_at_equilibrium());
    }

    #[test]
    fn needs_update_respects_disabled_categories() {
        let mut system = System::new();
        let a = system.create_particle(1.0, 0.0, 0.0);
        let b = system.create_particle(1.0, 1.0, 0.0);
        system.create_spring(a, b, 1.0, 0.0, 1.0);
        system.create_attraction(a, b, 1.0, 1.0);

        // every particle is at rest, but free-free elements never rest
        assert!(system.needs_update());

        system.set_equilibrium_criteria(true, false, true);
        assert!(system.needs_update());

        system.set_equilibrium_criteria(true, false, false);
        assert!(!system.needs_update());

        system.particle_mut(a).unwrap().velocity.set(1.0, 0.0);
        assert!(system.needs_update());

        system.set_equilibrium_criteria(false, false, false);
        assert!(!system.needs_update());
    }

    #[test]
    fn fixed_pair_settles_the_system() {
        let mut system = System::new();
        system.optimize(true);
        let a = system.create_particle(1.0, 0.0, 0.0);
        let b = system.create_particle(1.0, 50.0, 0.0);
        system.particle_mut(a).unwrap().fix();
        system.particle_mut(b).unwrap().fix();
        system.create_spring(a, b, 5.0, 0.0, 1.0);

        system.tick(0.1);

        assert!(system.is_at_equilibrium());
    }

    #[test]
    fn config_roundtrips_through_setters() {
        let mut system = System::new();
        system
            .set_gravity(1.0, 2.0)
            .set_drag(0.3)
            .optimize(true)
            .set_equilibrium_criteria(false, true, false);

        let cfg = system.config();
        assert_eq!(cfg.gravity, Vector2::new(1.0, 2.0));
        assert_eq!(cfg.drag, 0.3);
        assert!(cfg.optimized);
        assert_eq!(
            cfg.equilibrium,
            EquilibriumCriteria {
                particles: false,
                springs: true,
                attractions: false
            }
        );

        let rebuilt = System::with_config(cfg);
        assert_eq!(rebuilt.config(), cfg);
    }

    proptest! {
        #[test]
        fn needs_update_matches_enabled_categories(
            moving_particle in any::<bool>(),
            fixed_spring_ends in any::<bool>(),
            check_particles in any::<bool>(),
            check_springs in any::<bool>(),
            check_attractions in any::<bool>(),
        ) {
            let mut system = System::new();
            let a = system.create_particle(1.0, 0.0, 0.0);
            let b = system.create_particle(1.0, 10.0, 0.0);
            let c = system.create_particle(1.0, 20.0, 0.0);
            if moving_particle {
                system.particle_mut(c).unwrap().velocity.set(0.0, 1.0);
            }
            if fixed_spring_ends {
                system.particle_mut(a).unwrap().fix();
                system.particle_mut(b).unwrap().fix();
            }
            system.create_spring(a, b, 1.0, 0.0, 1.0);
            // free-free with no fixed end: never resting
            system.create_attraction(b, c, 1.0, 1.0);
            system.set_equilibrium_criteria(check_particles, check_springs, check_attractions);

            let particles_rest = !moving_particle;
            let springs_rest = fixed_spring_ends;
            // with a fixed b, c must rest within 1 of b; it is 10 away
            let attractions_rest = false;

            let expected = (check_particles && !particles_rest)
                || (check_springs && !springs_rest)
                || (check_attractions && !attractions_rest);
            prop_assert_eq!(system.needs_update(), expected);
        }
    }
}
