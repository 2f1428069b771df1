//! Interactive 2D particle system viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns an [`Animator`] driving the
//! particle system and implements [`eframe::App`] to render and control the
//! simulation through an egui UI.

use std::cell::Cell;
use std::rc::Rc;

use eframe::App;
use glam::DVec2;
use rand::rng;
use sim_core::{
    Animator, System,
    config::SystemConfig,
    presets::Preset,
    scenario::Scenario,
};
use tracing::{info, warn};

/// What a click in the central panel creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnTool {
    /// A free particle with the configured mass.
    Particle,
    /// A fixed particle.
    Anchor,
    /// A free particle tied by a spring to the nearest existing particle.
    Tethered,
}

/// Where [`Viewer::reset`] rebuilds the system from.
#[derive(Debug)]
enum Source {
    Preset(Preset),
    Scenario(Scenario),
}

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The simulation: an [`Animator`] owning the [`System`].
/// - UI configuration (pan/zoom, spawn tool, timing).
/// - eframe/egui callbacks for drawing and user interaction.
///
/// The typical per-frame update is:
/// 1. Handle UI interactions / input.
/// 2. If the animator is playing and enough time has passed, run one
///    [`Animator::frame`].
/// 3. Render springs, attractions, particles and tool hints.
///
/// ### Fields
/// - `animator` - Playback driver owning the particle system.
/// - `source` - Preset or scenario the system was built from.
/// - `ticks` - Number of executed ticks, counted by an update observer.
///
/// - `spawn_tool` - Active click tool.
/// - `spawn_mass` - Mass of spawned particles.
/// - `tether_stiffness` / `tether_damping` - Spring settings of the tether tool.
///
/// - `zoom` - Zoom factor for world-to-screen coordinate mapping.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `step_interval` - Target wall time between automatic ticks (seconds).
/// - `last_step_time` - Time stamp of the last tick (egui time).
/// - `last_step_dt` - Actual time delta between the last two ticks (for display only).
pub struct Viewer {
    animator: Animator,
    source: Source,
    ticks: Rc<Cell<u64>>,

    rng: rand::rngs::ThreadRng,

    spawn_tool: SpawnTool,
    spawn_mass: f64,
    tether_stiffness: f64,
    tether_damping: f64,

    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
}

impl Viewer {
    /// Creates a paused viewer showing the hanging chain preset.
    pub fn new() -> Self {
        let mut rng = rng();
        let preset = Preset::HangingChain;
        let system = preset.build(&mut rng);
        Self::from_parts(system, Source::Preset(preset), rng)
    }

    /// Creates a paused viewer showing the given scenario. Reset rebuilds
    /// from the same scenario.
    pub fn with_scenario(scenario: Scenario) -> sim_core::scenario::Result<Self> {
        let system = scenario.build()?;
        Ok(Self::from_parts(system, Source::Scenario(scenario), rng()))
    }

    fn from_parts(system: System, source: Source, rng: rand::rngs::ThreadRng) -> Self {
        let ticks = Rc::new(Cell::new(0));
        let mut animator = Animator::new(system);
        {
            let ticks = ticks.clone();
            animator.on_update(Rc::new(move |_: &System| ticks.set(ticks.get() + 1)));
        }
        animator.on_equilibrium(Rc::new(|system: &System| {
            info!(particles = system.particles().len(), "simulation settled");
        }));

        Self {
            animator,
            source,
            ticks,
            rng,
            spawn_tool: SpawnTool::Particle,
            spawn_mass: 1.0,
            tether_stiffness: 0.5,
            tether_damping: 0.1,
            zoom: 2.0,
            pan: egui::vec2(0.0, -150.0),
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
        }
    }

    /// Rebuilds the system from its source and pauses playback.
    ///
    /// Camera and spawn settings are kept.
    fn reset(&mut self) {
        let system = match &self.source {
            Source::Preset(preset) => Some(preset.build(&mut self.rng)),
            Source::Scenario(scenario) => match scenario.build() {
                Ok(system) => Some(system),
                Err(e) => {
                    warn!(error = %e, "scenario rebuild failed");
                    None
                }
            },
        };
        if let Some(system) = system {
            self.animator.replace_system(system);
        }
        self.animator.pause();
        self.ticks.set(0);
    }

    /// Switches to `preset` and resets.
    fn load_preset(&mut self, preset: Preset) {
        self.source = Source::Preset(preset);
        self.reset();
    }

    /// Removes every particle, spring and attraction.
    fn clear(&mut self) {
        self.animator.system_mut().clear();
    }

    /// Advances the simulation by a single tick, ignoring playback state.
    fn step_once(&mut self) {
        self.animator.system_mut().reset_equilibrium();
        self.animator.update();
    }

    /// Applies the active spawn tool at `world`.
    fn spawn_at(&mut self, world: DVec2) {
        let system = self.animator.system_mut();
        let nearest = system.particles().nearest(world.into());
        let handle = system.create_particle(self.spawn_mass, world.x, world.y);

        match self.spawn_tool {
            SpawnTool::Particle => {}
            SpawnTool::Anchor => {
                if let Some(p) = system.particle_mut(handle) {
                    p.fix();
                }
            }
            SpawnTool::Tethered => {
                if let Some((other, d2)) = nearest {
                    system.create_spring(
                        other,
                        handle,
                        self.tether_stiffness,
                        self.tether_damping,
                        d2.sqrt(),
                    );
                }
            }
        }
        // new elements may break a detected equilibrium
        system.reset_equilibrium();
    }

    /// Converts a world-space position to screen-space.
    ///
    /// World coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in world space.
    fn world_to_screen(&self, p: DVec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x as f32 * self.zoom + self.pan.x,
            center.y - p.y as f32 * self.zoom + self.pan.y,
        )
    }

    /// Converts a screen-space position back to world-space.
    ///
    /// This is the inverse of [`Viewer::world_to_screen`] (up to floating
    /// point rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> DVec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        DVec2::new(x as f64, y as f64)
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`].
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel UI (run controls, stepping, presets, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let playing = self.animator.is_playing();
                if ui
                    .button(if playing { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.animator.toggle();
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("frame interval = ")
                        .range(0.0..=1.0)
                        .speed(0.005),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                if ui.button("Clear").clicked() {
                    self.clear();
                }

                ui.separator();
                let current = match &self.source {
                    Source::Preset(preset) => preset.label(),
                    Source::Scenario(_) => "Scenario file",
                };
                let mut chosen = None;
                egui::ComboBox::from_label("Preset")
                    .selected_text(current)
                    .show_ui(ui, |ui| {
                        for preset in Preset::ALL {
                            if ui.selectable_label(current == preset.label(), preset.label()).clicked() {
                                chosen = Some(preset);
                            }
                        }
                    });
                if let Some(preset) = chosen {
                    self.load_preset(preset);
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 0.1..=10.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (tick count, element counts, equilibrium).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        let system = self.animator.system();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frame dt last = {:.3} s", self.last_step_dt));
                ui.label(format!("ticks = {}", self.ticks.get()));
                ui.separator();
                ui.label(format!("particles = {}", system.particles().len()));
                ui.label(format!("springs = {}", system.springs().len()));
                ui.label(format!("attractions = {}", system.attractions().len()));
                ui.separator();
                if system.is_optimized() {
                    ui.label(if system.is_at_equilibrium() {
                        "at equilibrium"
                    } else {
                        "moving"
                    });
                }
            });
        });
    }

    /// Builds the right-hand configuration panel for system parameters.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("System");

                let mut cfg = self.animator.system().config();
                let mut changed = false;

                ui.separator();
                ui.label("Gravity");
                changed |= Self::labeled_drag_f64(ui, "gravity.x:", &mut cfg.gravity.x, -2.0..=2.0, 0.01);
                changed |= Self::labeled_drag_f64(ui, "gravity.y:", &mut cfg.gravity.y, -2.0..=2.0, 0.01);

                ui.separator();
                changed |= Self::labeled_drag_f64(ui, "drag:", &mut cfg.drag, 0.0..=1.0, 0.001);

                ui.separator();
                changed |= ui.checkbox(&mut cfg.optimized, "Stop at equilibrium").changed();
                ui.label("Equilibrium criteria");
                changed |= ui.checkbox(&mut cfg.equilibrium.particles, "particles").changed();
                changed |= ui.checkbox(&mut cfg.equilibrium.springs, "springs").changed();
                changed |= ui.checkbox(&mut cfg.equilibrium.attractions, "attractions").changed();

                if ui.button("Reset system config").clicked() {
                    cfg = SystemConfig::default();
                    changed = true;
                }

                if changed {
                    self.animator
                        .system_mut()
                        .apply_config(&cfg)
                        .reset_equilibrium();
                }

                ui.separator();
                let mut dt = self.animator.time_step();
                if Self::labeled_drag_f64(ui, "time step:", &mut dt, 0.01..=2.0, 0.01) {
                    self.animator.set_time_step(dt);
                }

                ui.separator();
                ui.heading("Spawning");
                Self::labeled_drag_f64(ui, "mass:", &mut self.spawn_mass, 0.1..=20.0, 0.05);
                Self::labeled_drag_f64(
                    ui,
                    "tether stiffness:",
                    &mut self.tether_stiffness,
                    0.0..=2.0,
                    0.01,
                );
                Self::labeled_drag_f64(
                    ui,
                    "tether damping:",
                    &mut self.tether_damping,
                    0.0..=2.0,
                    0.01,
                );
            });
    }

    /// Builds the small floating toolbar for choosing the spawn tool.
    fn ui_toolbar(&mut self, ctx: &egui::Context) {
        egui::Area::new("toolbar".into())
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 100.0))
            .movable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 32))
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            for (tool, label) in [
                                (SpawnTool::Particle, "● Particle"),
                                (SpawnTool::Anchor, "◼ Anchor"),
                                (SpawnTool::Tethered, "⟟ Tethered"),
                            ] {
                                if ui.selectable_label(self.spawn_tool == tool, label).clicked() {
                                    self.spawn_tool = tool;
                                }
                            }
                        });
                    });
            });
    }

    /// Draws a preview of the current spawn tool at the hovered world position.
    fn ui_tool_hint(&self, painter: &egui::Painter, rect: egui::Rect, hover_world: Option<DVec2>) {
        let Some(center) = hover_world else {
            return;
        };

        let p_screen = self.world_to_screen(center, rect);
        let r = self.particle_radius(self.spawn_mass);
        let stroke = egui::Stroke::new(1.5, egui::Color32::YELLOW);

        match self.spawn_tool {
            SpawnTool::Particle => {
                painter.circle_stroke(p_screen, r, stroke);
            }
            SpawnTool::Anchor => {
                painter.rect_stroke(
                    egui::Rect::from_center_size(p_screen, egui::vec2(2.0 * r, 2.0 * r)),
                    0.0,
                    stroke,
                    egui::StrokeKind::Middle,
                );
            }
            SpawnTool::Tethered => {
                painter.circle_stroke(p_screen, r, stroke);
                if let Some((other, _)) = self.animator.system().particles().nearest(center.into())
                    && let Some(p) = self.animator.system().particle(other)
                {
                    let q = self.world_to_screen(p.position.as_dvec2(), rect);
                    painter.line_segment([q, p_screen], stroke);
                }
            }
        }
    }

    fn particle_radius(&self, mass: f64) -> f32 {
        (mass.max(0.0).sqrt() as f32 * 2.0 * self.zoom).max(2.0)
    }

    /// Builds the central panel where the system is drawn and interacted with.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            let hover_world = response.hover_pos().map(|p| self.screen_to_world(p, rect));

            if response.clicked()
                && let Some(world) = hover_world
            {
                self.spawn_at(world);
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(0.1, 10.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let system = self.animator.system();
            let particles = system.particles();

            // Springs, colored by stretch.
            for spring in system.springs() {
                let (Some(a), Some(b)) = (particles.get(spring.a), particles.get(spring.b)) else {
                    continue;
                };
                let stretch = a.distance_to(b) - spring.rest_length;
                let color = if !spring.enabled {
                    egui::Color32::DARK_GRAY
                } else if stretch > 0.0 {
                    egui::Color32::LIGHT_RED
                } else {
                    egui::Color32::LIGHT_GREEN
                };
                painter.line_segment(
                    [
                        self.world_to_screen(a.position.as_dvec2(), rect),
                        self.world_to_screen(b.position.as_dvec2(), rect),
                    ],
                    egui::Stroke::new(1.0, color),
                );
            }

            // Attractions as faint links.
            for attraction in system.attractions() {
                let (Some(a), Some(b)) = (particles.get(attraction.a), particles.get(attraction.b))
                else {
                    continue;
                };
                painter.line_segment(
                    [
                        self.world_to_screen(a.position.as_dvec2(), rect),
                        self.world_to_screen(b.position.as_dvec2(), rect),
                    ],
                    egui::Stroke::new(0.5, egui::Color32::from_rgba_unmultiplied(120, 160, 255, 60)),
                );
            }

            for p in particles.iter() {
                let pos = self.world_to_screen(p.position.as_dvec2(), rect);
                let r = self.particle_radius(p.mass);
                let color = if p.fixed {
                    egui::Color32::RED
                } else {
                    egui::Color32::LIGHT_BLUE
                };
                painter.circle_filled(pos, r, color);
            }

            // Tool hint overlay.
            self.ui_tool_hint(&painter, rect, hover_world);

            // Auto-run simulation if requested.
            if self.animator.is_playing() {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.animator.frame();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
        self.ui_toolbar(ctx);
    }
}
