use crate::vector::Vector2;

/// Per-particle scratch storage for one integrator stage.
///
/// For each particle index `i`, this buffer stores:
///
/// - `force[i]` - the force accumulated on the particle during the stage.
/// - `velocity[i]` - the particle's velocity at the stage's evaluation point.
///
/// Entry `i` always corresponds to the particle at position `i` of the
/// owning system's particle list. The buffer only ever grows; entries of
/// fixed particles are left untouched and simply never read.
#[derive(Debug, Default)]
pub struct StageBuffer {
    force: Vec<Vector2>,
    velocity: Vec<Vector2>,
}

impl StageBuffer {
    /// Creates a [`StageBuffer`] with `len` zeroed entries.
    ///
    /// ### Parameters
    /// - `len` - Number of particles this buffer can hold entries for.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vector2::ZERO; len],
            velocity: vec![Vector2::ZERO; len],
        }
    }

    /// Grows the buffer to at least `len` entries.
    ///
    /// New entries are zeroed, existing ones keep their values. A smaller
    /// `len` is ignored: the buffer never shrinks.
    ///
    /// ### Parameters
    /// - `len` - Current number of particles in the system.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() < len {
            self.force.resize(len, Vector2::ZERO);
            self.velocity.resize(len, Vector2::ZERO);
        }
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// Stores the stage sample for particle `i`.
    ///
    /// ### Panics
    /// Panics if `i` is out of bounds.
    #[inline]
    pub fn record(&mut self, i: usize, force: Vector2, velocity: Vector2) {
        self.force[i] = force;
        self.velocity[i] = velocity;
    }

    #[inline]
    pub fn force(&self, i: usize) -> Vector2 {
        self.force[i]
    }

    #[inline]
    pub fn velocity(&self, i: usize) -> Vector2 {
        self.velocity[i]
    }
}
