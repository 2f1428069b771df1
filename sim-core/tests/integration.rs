//! End-to-end behaviour of systems built through the public API.

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use sim_core::animator::Animator;
use sim_core::particle::{Particle, ParticleView};
use sim_core::scenario::Scenario;
use sim_core::{System, Vector2};

// ── Integrator ───────────────────────────────────────────────────────

#[test]
fn free_fall_matches_closed_form() {
    let mut system = System::new();
    system.set_gravity(0.0, -10.0).set_drag(0.0);
    let p = system.create_particle(1.0, 0.0, 0.0);

    for n in 1..=20 {
        system.tick(1.0);
        let particle = system.particle(p).unwrap();
        let n = n as f64;
        assert_relative_eq!(particle.position.y, -5.0 * n * n, max_relative = 1e-12);
        assert_relative_eq!(particle.velocity.y, -10.0 * n, max_relative = 1e-12);
        assert_eq!(particle.position.x, 0.0);
    }
}

#[test]
fn zero_length_spring_never_overshoots_release_point() {
    let mut system = System::new();
    system.set_drag(0.0);
    let anchor = system.create_particle(1.0, 0.0, 0.0);
    system.particle_mut(anchor).unwrap().fix();
    let bob = system.create_particle(1.0, 10.0, 0.0);
    system.create_spring(anchor, bob, 1.0, 0.0, 0.0);

    let mut crossed_origin = false;
    for _ in 0..200 {
        system.tick(1.0);
        let p = system.particle(bob).unwrap();
        assert!(p.position.length() <= 10.0 + 1e-9, "overshoot: {:?}", p.position);
        crossed_origin |= p.position.x < 0.0;
    }
    assert!(crossed_origin, "particle never oscillated");
    assert_eq!(system.particle(anchor).unwrap().position, Vector2::ZERO);
}

#[test]
fn coincident_attraction_produces_zero_force() {
    let mut system = System::new();
    system.set_drag(0.0);
    let a = system.create_particle(1.0, 3.0, 3.0);
    let b = system.create_particle(1.0, 3.0, 3.0);
    system.create_attraction(a, b, 100.0, 0.0);

    system.apply_forces();
    assert_eq!(system.particle(a).unwrap().force, Vector2::ZERO);
    assert_eq!(system.particle(b).unwrap().force, Vector2::ZERO);

    system.clear_forces().tick(1.0);
    let p = system.particle(a).unwrap();
    assert!(p.position.x.is_finite() && p.position.y.is_finite());
}

#[test]
fn custom_forces_take_part_in_every_stage() {
    let mut system = System::new();
    system.set_drag(0.0);
    let p = system.create_particle(2.0, 0.0, 0.0);
    system.add_force(|particles: &mut ParticleView<'_>| {
        for particle in particles.iter_mut().filter(|p| !p.fixed) {
            particle.force.x += 4.0;
        }
    });

    system.tick(1.0);

    let particle = system.particle(p).unwrap();
    assert_relative_eq!(particle.velocity.x, 2.0, epsilon = 1e-12);
    assert_relative_eq!(particle.position.x, 1.0, epsilon = 1e-12);
}

#[test]
fn custom_forces_see_a_fixed_particle_count_in_every_stage() {
    let mut system = System::new();
    system.add_particle(Particle::new(1.0, 0.0, 0.0));
    system.add_particle(Particle::new(1.0, 5.0, 5.0));

    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let seen = seen.clone();
        system.add_force(move |particles: &mut ParticleView<'_>| {
            seen.borrow_mut().push(particles.len());
            for p in particles.iter_mut() {
                p.force.y -= 1.0;
            }
        });
    }

    system.tick(1.0).tick(1.0);

    assert_eq!(seen.borrow().as_slice(), &[2; 8]);
    assert_eq!(system.particles().len(), 2);
    assert_eq!(system.integrator_capacity(), 2);
}

// ── Equilibrium ──────────────────────────────────────────────────────

#[test]
fn damped_tether_eventually_settles() {
    let mut system = System::new();
    system.optimize(true).set_drag(0.5);
    let anchor = system.create_particle(1.0, 0.0, 0.0);
    system.particle_mut(anchor).unwrap().fix();
    let bob = system.create_particle(1.0, 0.0, -5.0);
    system.create_spring(anchor, bob, 0.5, 0.5, 0.0);

    let mut ticks = 0;
    while !system.is_at_equilibrium() && ticks < 10_000 {
        system.tick(1.0);
        ticks += 1;
    }
    assert!(system.is_at_equilibrium(), "still moving after {ticks} ticks");
}

#[test]
fn stale_handles_after_clear_resolve_to_nothing() {
    let mut system = System::new();
    let old = system.create_particle(1.0, 0.0, 0.0);
    system.clear();
    let new = system.create_particle(1.0, 5.0, 5.0);

    assert_eq!(old.index(), new.index());
    assert!(system.particle(old).is_none());
    assert_eq!(system.particle(new).unwrap().position, Vector2::new(5.0, 5.0));

    // springs created with stale endpoints exert nothing
    let spring = system.create_spring(old, new, 10.0, 0.0, 0.0);
    system.apply_forces();
    assert!(system.spring(spring).is_some());
    assert_eq!(system.particle(new).unwrap().force, Vector2::ZERO);
}

// ── Scenario and driver ──────────────────────────────────────────────

#[test]
fn scenario_driven_by_animator() {
    let scenario = Scenario::from_yaml_str(
        r#"
system:
  gravity: { x: 0.0, y: -1.0 }
  drag: 0.0
particles:
  - { position: [0, 0] }
"#,
    )
    .unwrap();

    let mut animator = Animator::new(scenario.build().unwrap());
    let ticks = Rc::new(Cell::new(0));
    {
        let ticks = ticks.clone();
        animator.on_update(Rc::new(move |_: &System| ticks.set(ticks.get() + 1)));
    }

    animator.frame();
    animator.play();
    for _ in 0..4 {
        animator.frame();
    }

    assert_eq!(ticks.get(), 4);
    let p = animator.system().particles().iter().next().unwrap();
    assert_relative_eq!(p.position.y, -8.0, max_relative = 1e-12);
}

#[test]
fn bundled_viewer_scenes_build() {
    for text in [
        include_str!("../../sim-view/scenes/pendulum.yaml"),
        include_str!("../../sim-view/scenes/binary.yaml"),
    ] {
        let mut system = Scenario::from_yaml_str(text).unwrap().build().unwrap();
        assert!(!system.particles().is_empty());
        for _ in 0..10 {
            system.advance();
        }
        assert!(system.particles().iter().all(|p| p.position.length().is_finite()));
    }
}
