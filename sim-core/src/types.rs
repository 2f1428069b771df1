//! Generation-scoped handles for particles and force elements.
//!
//! A handle stores the element's position in its owning list plus the
//! epoch of the [`crate::particle::ParticleSet`] it was issued from. Epochs
//! are drawn from a process-wide counter, so a handle from one system does
//! not resolve in another. Lists only ever grow, except for
//! [`crate::system::System::clear`], which truncates them and draws a new
//! epoch; handles issued before the clear are then stale and resolve to
//! `None`.

use std::fmt;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) index: u32,
            pub(crate) epoch: u32,
        }

        impl $name {
            pub(crate) fn new(index: usize, epoch: u32) -> Self {
                Self {
                    index: index as u32,
                    epoch,
                }
            }

            /// Position of the element in its owning list.
            pub fn index(&self) -> usize {
                self.index as usize
            }

            /// Epoch of the list when this handle was issued.
            pub fn epoch(&self) -> u32 {
                self.epoch
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(idx={}, epoch={})", stringify!($name), self.index, self.epoch)
            }
        }
    };
}

define_handle!(
    /// Identifies a [`crate::particle::Particle`] inside a [`crate::system::System`].
    ParticleHandle
);

define_handle!(
    /// Identifies a [`crate::spring::Spring`] inside a [`crate::system::System`].
    SpringHandle
);

define_handle!(
    /// Identifies an [`crate::attraction::Attraction`] inside a [`crate::system::System`].
    AttractionHandle
);
