//! Frame-driven playback of a [`System`].
//!
//! The host calls [`Animator::frame`] once per display refresh. While the
//! animator is playing each frame runs one [`Animator::update`], which ticks
//! the system and notifies the registered observers.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::DEFAULT_TIME_STEP;
use crate::system::System;

/// Observer invoked with the system after it changed.
pub type Callback = Rc<dyn Fn(&System)>;

pub struct Animator {
    system: System,
    playing: bool,
    time_step: f64,
    on_update: Vec<Callback>,
    on_equilibrium: Vec<Callback>,
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("system", &self.system)
            .field("playing", &self.playing)
            .field("time_step", &self.time_step)
            .field("on_update", &self.on_update.len())
            .field("on_equilibrium", &self.on_equilibrium.len())
            .finish()
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(System::new())
    }
}

impl Animator {
    /// Wraps `system` in a paused animator.
    pub fn new(system: System) -> Self {
        Self {
            system,
            playing: false,
            time_step: DEFAULT_TIME_STEP,
            on_update: Vec::new(),
            on_equilibrium: Vec::new(),
        }
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut System {
        &mut self.system
    }

    /// Swaps in a new system, keeping callbacks and playback state.
    pub fn replace_system(&mut self, system: System) -> System {
        std::mem::replace(&mut self.system, system)
    }

    /// Starts playback and forgets any detected equilibrium. No-op while
    /// already playing.
    pub fn play(&mut self) -> &mut Self {
        if self.playing {
            return self;
        }
        self.playing = true;
        self.system.reset_equilibrium();
        debug!("playback started");
        self
    }

    pub fn pause(&mut self) -> &mut Self {
        if self.playing {
            debug!("playback paused");
        }
        self.playing = false;
        self
    }

    pub fn toggle(&mut self) -> &mut Self {
        if self.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    pub fn set_time_step(&mut self, dt: f64) -> &mut Self {
        self.time_step = dt;
        self
    }

    /// Registers an observer run after every executed update. Registering
    /// the same callback twice has no effect.
    pub fn on_update(&mut self, callback: Callback) -> &mut Self {
        register(&mut self.on_update, callback, "update");
        self
    }

    /// Registers an observer run after an update that left the system at
    /// equilibrium.
    pub fn on_equilibrium(&mut self, callback: Callback) -> &mut Self {
        register(&mut self.on_equilibrium, callback, "equilibrium");
        self
    }

    /// Advances the system by one time step unless it is optimized and
    /// already settled. Returns whether a tick ran.
    pub fn update(&mut self) -> bool {
        if self.system.is_optimized() && self.system.is_at_equilibrium() {
            return false;
        }

        self.system.tick(self.time_step);

        for callback in &self.on_update {
            callback(&self.system);
        }
        if self.system.is_at_equilibrium() {
            for callback in &self.on_equilibrium {
                callback(&self.system);
            }
        }
        true
    }

    /// Per-refresh entry point. Returns whether a tick ran.
    pub fn frame(&mut self) -> bool {
        self.playing && self.update()
    }
}

fn register(list: &mut Vec<Callback>, callback: Callback, kind: &str) {
    if list.iter().any(|existing| Rc::ptr_eq(existing, &callback)) {
        trace!(kind, "callback already registered");
        return;
    }
    list.push(callback);
}
