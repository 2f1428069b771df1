use serde::Deserialize;

use crate::vector::Vector2;

/// Linear drag applied when no other value is configured.
pub const DEFAULT_DRAG: f64 = 0.001;

/// Time step used by [`crate::system::System::advance`].
pub const DEFAULT_TIME_STEP: f64 = 1.0;

/// Which element categories take part in the equilibrium test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EquilibriumCriteria {
    pub particles: bool,
    pub springs: bool,
    pub attractions: bool,
}

impl Default for EquilibriumCriteria {
    fn default() -> Self {
        Self {
            particles: true,
            springs: true,
            attractions: true,
        }
    }
}

/// Global settings of a [`crate::system::System`].
///
/// Defaults: no gravity, drag [`DEFAULT_DRAG`], equilibrium tracking off,
/// every equilibrium category enabled.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub gravity: Vector2,
    pub drag: f64,
    pub optimized: bool,
    pub equilibrium: EquilibriumCriteria,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::ZERO,
            drag: DEFAULT_DRAG,
            optimized: false,
            equilibrium: EquilibriumCriteria::default(),
        }
    }
}
