//! Deterministic 2-D particle physics with springs and attractions.
//!
//! Main components:
//! - [`vector`] - the mutable 2-D vector used throughout.
//! - [`particle`] - point masses and the handle-addressed particle list.
//! - [`spring`] / [`attraction`] - pairwise force elements.
//! - [`force`] - the [`force::Force`] trait and the per-system force field.
//! - [`integrator`] - fixed-step RK4 with reusable scratch buffers.
//! - [`system`] - the particle system tying everything together.
//! - [`animator`] - play/pause driver with update observers.
//! - [`config`] / [`scenario`] - global settings and YAML scenario files.
//! - [`presets`] - ready-made demo systems.
//! - [`types`] - generation-checked element handles.

pub mod animator;
pub mod attraction;
pub mod config;
pub mod force;
pub mod integrator;
pub mod particle;
pub mod presets;
pub mod scenario;
pub mod scratch;
pub mod spring;
pub mod system;
pub mod types;
pub mod vector;

pub use animator::Animator;
pub use system::System;
pub use vector::Vector2;
