use std::sync::atomic::{AtomicU32, Ordering};

use crate::types::ParticleHandle;
use crate::vector::Vector2;

/// A point mass with accumulated force.
///
/// `fixed` particles are pinned: the integrator and force elements never
/// touch their velocity or force, but their position still feeds the
/// springs and attractions that reference them.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub force: Vector2,
    /// Expected to be strictly positive. Zero is not guarded and makes the
    /// integrator produce non-finite state.
    pub mass: f64,
    pub fixed: bool,
    pub age: f64,
    pub dead: bool,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }
}

impl Particle {
    pub fn new(mass: f64, x: f64, y: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            velocity: Vector2::ZERO,
            force: Vector2::ZERO,
            mass,
            fixed: false,
            age: 0.0,
            dead: false,
        }
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        self.position.distance_to(&other.position)
    }

    /// Pins the particle and zeroes its velocity. The force accumulator is left as is.
    pub fn fix(&mut self) -> &mut Self {
        self.fixed = true;
        self.velocity.clear();
        self
    }

    /// Restores the freshly-created state at the origin. `fixed` is kept.
    pub fn reset(&mut self) -> &mut Self {
        self.position.clear();
        self.velocity.clear();
        self.force.clear();
        self.mass = 1.0;
        self.age = 0.0;
        self.dead = false;
        self
    }

    pub fn resting(&self) -> bool {
        self.fixed || (self.velocity.is_zero() && self.force.is_zero())
    }
}

/// Source of particle-list epochs. Every list, and every `clear` of a list,
/// draws a fresh value, so a handle never resolves in a list it did not come
/// from.
static EPOCH_COUNTER: AtomicU32 = AtomicU32::new(0);

fn next_epoch() -> u32 {
    EPOCH_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// The particle list owned by a [`crate::system::System`].
///
/// Handles issued by [`ParticleSet::push`] resolve until the next
/// [`ParticleSet::clear`], and only in the set that issued them. The list
/// never shrinks otherwise, so `handle.index()` is always the particle's
/// position in [`ParticleSet::iter`] order, which the integrator's scratch
/// buffers rely on.
#[derive(Debug)]
pub struct ParticleSet {
    items: Vec<Particle>,
    epoch: u32,
}

impl Default for ParticleSet {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            epoch: next_epoch(),
        }
    }
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, particle: Particle) -> ParticleHandle {
        let handle = ParticleHandle::new(self.items.len(), self.epoch);
        self.items.push(particle);
        handle
    }

    /// Drops every particle and invalidates all outstanding handles.
    pub fn clear(&mut self) {
        self.items.clear();
        self.epoch = next_epoch();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    #[inline]
    pub fn contains(&self, handle: ParticleHandle) -> bool {
        handle.epoch == self.epoch && handle.index() < self.items.len()
    }

    #[inline]
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.items.get(handle.index())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.items.get_mut(handle.index())
    }

    /// Fixed-length mutable access for force evaluation.
    pub fn view(&mut self) -> ParticleView<'_> {
        ParticleView {
            items: &mut self.items,
            epoch: self.epoch,
        }
    }

    /// Handle for the particle at list position `index`, if any.
    pub fn handle_at(&self, index: usize) -> Option<ParticleHandle> {
        (index < self.items.len()).then(|| ParticleHandle::new(index, self.epoch))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.items.iter_mut()
    }

    pub fn handles(&self) -> impl Iterator<Item = ParticleHandle> + '_ {
        (0..self.items.len()).map(|i| ParticleHandle::new(i, self.epoch))
    }

    /// Finds the particle closest to `pos`, with its squared distance.
    pub fn nearest(&self, pos: Vector2) -> Option<(ParticleHandle, f64)> {
        let mut best = None;
        let mut best_d2 = f64::MAX;
        for (i, p) in self.items.iter().enumerate() {
            let d2 = p.position.distance_to_squared(&pos);
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(i);
            }
        }
        best.map(|i| (ParticleHandle::new(i, self.epoch), best_d2))
    }

    pub fn clear_forces(&mut self) {
        for p in &mut self.items {
            p.force.clear();
        }
    }
}

/// Mutable access to the particles of a [`ParticleSet`] that cannot add or
/// remove particles.
///
/// Force elements receive this view, so the particle count is fixed for the
/// duration of an integrator step.
#[derive(Debug)]
pub struct ParticleView<'a> {
    items: &'a mut [Particle],
    epoch: u32,
}

impl ParticleView<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.items.get(handle.index())
    }

    #[inline]
    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        if handle.epoch != self.epoch {
            return None;
        }
        self.items.get_mut(handle.index())
    }

    /// Mutable access to two distinct particles at once.
    ///
    /// Returns `None` if either handle is stale or both name the same particle.
    pub fn pair_mut(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
    ) -> Option<(&mut Particle, &mut Particle)> {
        let len = self.items.len();
        if a.epoch != self.epoch || b.epoch != self.epoch || a.index == b.index {
            return None;
        }
        let (ia, ib) = (a.index(), b.index());
        if ia >= len || ib >= len {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.items.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.items.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Particle> {
        self.items.iter_mut()
    }
}
