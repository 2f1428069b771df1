//! Scenario files: initial system setup loaded from YAML.
//!
//! A scenario describes the global settings, the starting particles and the
//! springs and attractions between them. Endpoints refer to particles by
//! their position in the `particles` list.
//!
//! ```yaml
//! system:
//!   gravity: { x: 0.0, y: -0.2 }
//!   drag: 0.01
//! particles:
//!   - { position: [0, 0], fixed: true }
//!   - { position: [0, -40], mass: 2 }
//! springs:
//!   - { a: 0, b: 1, stiffness: 0.5, damping: 0.1, rest_length: 30 }
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::SystemConfig;
use crate::particle::Particle;
use crate::system::System;
use crate::types::ParticleHandle;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{element} {index} refers to unknown particle {particle}")]
    UnknownParticle {
        element: &'static str,
        index: usize,
        particle: usize,
    },
}

pub type Result<T> = std::result::Result<T, ScenarioError>;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub system: SystemConfig,
    pub particles: Vec<ParticleSpec>,
    pub springs: Vec<SpringSpec>,
    pub attractions: Vec<AttractionSpec>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ParticleSpec {
    #[serde(default = "default_mass")]
    pub mass: f64,
    pub position: [f64; 2],
    #[serde(default)]
    pub velocity: [f64; 2],
    #[serde(default)]
    pub fixed: bool,
}

fn default_mass() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SpringSpec {
    pub a: usize,
    pub b: usize,
    pub stiffness: f64,
    pub damping: f64,
    pub rest_length: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AttractionSpec {
    pub a: usize,
    pub b: usize,
    pub strength: f64,
    pub min_distance: f64,
}

impl Scenario {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Builds a fresh [`System`] holding every element of the scenario.
    ///
    /// Fails if a spring or attraction names a particle index that is not
    /// in the `particles` list.
    pub fn build(&self) -> Result<System> {
        let mut system = System::with_config(self.system);

        let handles: Vec<ParticleHandle> = self
            .particles
            .iter()
            .map(|spec| {
                let mut particle = Particle::new(spec.mass, spec.position[0], spec.position[1]);
                particle.velocity = spec.velocity.into();
                if spec.fixed {
                    particle.fix();
                }
                system.add_particle(particle)
            })
            .collect();

        let lookup = |element: &'static str, index: usize, particle: usize| {
            handles
                .get(particle)
                .copied()
                .ok_or(ScenarioError::UnknownParticle {
                    element,
                    index,
                    particle,
                })
        };

        for (i, s) in self.springs.iter().enumerate() {
            let a = lookup("spring", i, s.a)?;
            let b = lookup("spring", i, s.b)?;
            system.create_spring(a, b, s.stiffness, s.damping, s.rest_length);
        }

        for (i, at) in self.attractions.iter().enumerate() {
            let a = lookup("attraction", i, at.a)?;
            let b = lookup("attraction", i, at.b)?;
            system.create_attraction(a, b, at.strength, at.min_distance);
        }

        debug!(
            particles = handles.len(),
            springs = self.springs.len(),
            attractions = self.attractions.len(),
            "built scenario"
        );
        Ok(system)
    }
}
