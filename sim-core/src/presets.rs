//! Ready-made systems used by the viewer and the tests.
//!
//! All presets are tuned for the default time step of `1.0`.

use rand::Rng;

use crate::system::System;
use crate::types::ParticleHandle;

/// Selectable preset scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    HangingChain,
    Cloth,
    Orbit,
    RandomCloud,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::HangingChain,
        Preset::Cloth,
        Preset::Orbit,
        Preset::RandomCloud,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::HangingChain => "Hanging chain",
            Preset::Cloth => "Cloth",
            Preset::Orbit => "Orbit",
            Preset::RandomCloud => "Random cloud",
        }
    }

    pub fn build(self, rng: &mut impl Rng) -> System {
        match self {
            Preset::HangingChain => hanging_chain(12, 8.0),
            Preset::Cloth => cloth(14, 10, 8.0),
            Preset::Orbit => orbit(),
            Preset::RandomCloud => random_cloud(60, 80.0, rng),
        }
    }
}

/// A chain of `links` free particles hanging from a fixed anchor at the
/// origin, `spacing` apart along negative y.
pub fn hanging_chain(links: usize, spacing: f64) -> System {
    let mut system = System::new();
    system.set_gravity(0.0, -0.1).set_drag(0.02);

    let anchor = system.create_particle(1.0, 0.0, 0.0);
    if let Some(p) = system.particle_mut(anchor) {
        p.fix();
    }

    let mut prev = anchor;
    for i in 1..=links {
        // offset sideways so the chain swings
        let next = system.create_particle(1.0, i as f64 * spacing * 0.5, -(i as f64) * spacing);
        system.create_spring(prev, next, 0.5, 0.1, spacing);
        prev = next;
    }
    system
}

/// A `cols` x `rows` grid of particles joined by structural springs. Every
/// other particle of the top row is pinned.
pub fn cloth(cols: usize, rows: usize, spacing: f64) -> System {
    let mut system = System::new();
    system.set_gravity(0.0, -0.05).set_drag(0.02);

    let width = (cols.saturating_sub(1)) as f64 * spacing;
    let mut grid: Vec<ParticleHandle> = Vec::with_capacity(cols * rows);

    for row in 0..rows {
        for col in 0..cols {
            let x = col as f64 * spacing - width * 0.5;
            let y = -(row as f64) * spacing;
            let handle = system.create_particle(1.0, x, y);
            if row == 0
                && col % 2 == 0
                && let Some(p) = system.particle_mut(handle)
            {
                p.fix();
            }
            grid.push(handle);
        }
    }

    for row in 0..rows {
        for col in 0..cols {
            let here = grid[row * cols + col];
            if col + 1 < cols {
                system.create_spring(here, grid[row * cols + col + 1], 0.4, 0.05, spacing);
            }
            if row + 1 < rows {
                system.create_spring(here, grid[(row + 1) * cols + col], 0.4, 0.05, spacing);
            }
        }
    }
    system
}

/// A light particle on a circular orbit around a fixed heavy one.
pub fn orbit() -> System {
    const RADIUS: f64 = 100.0;
    const STRENGTH: f64 = 400.0;

    let mut system = System::new();
    system.set_drag(0.0);

    let sun = system.create_particle(1.0, 0.0, 0.0);
    if let Some(p) = system.particle_mut(sun) {
        p.fix();
    }
    let planet = system.create_particle(1.0, RADIUS, 0.0);
    if let Some(p) = system.particle_mut(planet) {
        // v^2 / r = strength * m_sun / r^2
        p.velocity.set(0.0, (STRENGTH / RADIUS).sqrt());
    }
    system.create_attraction(sun, planet, STRENGTH, 10.0);
    system
}

/// `count` particles scattered uniformly in a square of half extent
/// `half_range`, each attracted to a fixed center particle.
pub fn random_cloud(count: usize, half_range: f64, rng: &mut impl Rng) -> System {
    let mut system = System::new();
    system.set_drag(0.05);

    let center = system.create_particle(4.0, 0.0, 0.0);
    if let Some(p) = system.particle_mut(center) {
        p.fix();
    }

    for _ in 0..count {
        let x = rng.random_range(-half_range..=half_range);
        let y = rng.random_range(-half_range..=half_range);
        let mass = rng.random_range(0.5..=2.0);
        let p = system.create_particle(mass, x, y);
        system.create_attraction(center, p, 50.0, 15.0);
    }
    system
}
