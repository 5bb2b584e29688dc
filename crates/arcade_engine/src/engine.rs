//! Frame driver
//!
//! [`Simulation`] owns the current level and decides when a frame runs. It is
//! the only place a [`World`] is constructed.

use crate::config::{ConfigError, SimulationConfig};
use crate::ecs::{FrameReport, World, WorldError};
use crate::foundation::time::FrameTimer;
use crate::render::RenderContext;
use log::{info, warn};
use thiserror::Error;

/// Frame driver errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Settings were rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A frame failed
    #[error("Simulation error: {0}")]
    World(#[from] WorldError),
}

/// Runs levels frame by frame
///
/// The driver checks its run and pause flags before every frame, paces
/// frames to the configured minimum interval, and clamps long frames to
/// `max_delta_time` so a stall does not launch every body across the arena.
pub struct Simulation {
    config: SimulationConfig,
    timer: FrameTimer,
    level: Option<World>,
    running: bool,
    paused: bool,
}

impl Simulation {
    /// Create a driver with no level loaded
    pub fn new(config: SimulationConfig) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            "Initializing simulation (frame time {:.3}s, {:?} acceleration)",
            config.target_frame_time, config.acceleration_mode
        );
        Ok(Self {
            timer: FrameTimer::new(config.target_frame_time),
            config,
            level: None,
            running: true,
            paused: false,
        })
    }

    /// Active settings
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the current level with an empty one and return it
    pub fn load_level(&mut self) -> &mut World {
        if self.level.is_some() {
            info!("Unloading current level");
        }
        info!("Loading new level");
        self.level.insert(World::new(self.config.clone()))
    }

    /// Current level
    ///
    /// Returns `None` (and logs a warning) before a level has been loaded.
    pub fn level(&self) -> Option<&World> {
        if self.level.is_none() {
            warn!("No level is loaded yet");
        }
        self.level.as_ref()
    }

    /// Mutable current level; `None` (with a warning) before one is loaded
    pub fn level_mut(&mut self) -> Option<&mut World> {
        if self.level.is_none() {
            warn!("No level is loaded yet");
        }
        self.level.as_mut()
    }

    /// Whether the driver still accepts frames
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop for good; later frames are skipped
    pub fn stop(&mut self) {
        info!("Simulation stopped");
        self.running = false;
    }

    /// Whether frames are currently skipped
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Skip frames until [`resume`](Self::resume)
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue after [`pause`](Self::pause)
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Clamp a raw frame delta into `[0, max_delta_time]`
    pub fn clamp_delta(&self, dt: f64) -> f64 {
        dt.clamp(0.0, self.config.max_delta_time)
    }

    /// Run one frame of `dt` seconds if the driver is running, unpaused and
    /// has a level
    pub fn step(&mut self, dt: f64) -> Result<Option<FrameReport>, EngineError> {
        if !self.running || self.paused {
            return Ok(None);
        }
        let dt = self.clamp_delta(dt);
        let Some(level) = self.level_mut() else {
            return Ok(None);
        };
        Ok(Some(level.step(dt)?))
    }

    /// Run a frame if the minimum frame interval has elapsed
    pub fn tick(&mut self) -> Result<Option<FrameReport>, EngineError> {
        if !self.timer.frame_due() {
            return Ok(None);
        }
        let dt = self.timer.tick();
        self.step(dt)
    }

    /// Block until `frames` frames have run (or the driver stops), drawing
    /// each one into `ctx`
    ///
    /// Returns the number of frames actually run.
    pub fn run_frames(&mut self, frames: u64, ctx: &mut dyn RenderContext) -> Result<u64, EngineError> {
        let mut ran = 0;
        while ran < frames && self.running {
            if !self.timer.frame_due() {
                std::thread::sleep(self.timer.time_until_due());
                continue;
            }
            let dt = self.timer.tick();
            if self.step(dt)?.is_some() {
                ran += 1;
                self.render(ctx);
            } else if self.paused || self.level.is_none() {
                break;
            }
        }
        info!("Ran {} frames, average {:.1} fps", ran, self.timer.average_fps());
        Ok(ran)
    }

    /// Draw the current level, if any
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        if let Some(level) = &self.level {
            level.render(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;
    use crate::render::Color;

    #[derive(Default)]
    struct NullContext {
        polygons: usize,
    }

    impl RenderContext for NullContext {
        fn draw_polygon(&mut self, _points: &[Vec2], _color: Color) {
            self.polygons += 1;
        }

        fn draw_line(&mut self, _from: Vec2, _to: Vec2, _color: Color) {}

        fn draw_circle(&mut self, _center: Vec2, _radius: f64, _color: Color) {}
    }

    #[test]
    fn test_level_absent_until_loaded() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert!(sim.level().is_none());
        assert!(sim.step(0.016).unwrap().is_none());

        sim.load_level();
        assert!(sim.level().is_some());
        let report = sim.step(0.016).unwrap().unwrap();
        assert_eq!(report.frame, 1);
    }

    #[test]
    fn test_pause_and_stop_skip_frames() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.load_level();

        sim.pause();
        assert!(sim.step(0.016).unwrap().is_none());
        sim.resume();
        assert!(sim.step(0.016).unwrap().is_some());

        sim.stop();
        assert!(!sim.is_running());
        assert!(sim.step(0.016).unwrap().is_none());
        assert_eq!(sim.level().unwrap().frame(), 1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let sim = Simulation::new(SimulationConfig::default()).unwrap();
        assert_eq!(sim.clamp_delta(5.0), 0.1);
        assert_eq!(sim.clamp_delta(-1.0), 0.0);
        assert_eq!(sim.clamp_delta(0.02), 0.02);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            max_delta_time: 0.001,
            ..SimulationConfig::default()
        };
        assert!(matches!(Simulation::new(config), Err(EngineError::Config(_))));
    }

    #[test]
    fn test_run_frames_counts_and_renders() {
        let config = SimulationConfig {
            target_frame_time: 0.001,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::new(config).unwrap();
        sim.load_level();
        let mut ctx = NullContext::default();

        assert_eq!(sim.run_frames(3, &mut ctx).unwrap(), 3);
        assert_eq!(sim.level().unwrap().frame(), 3);
        assert_eq!(ctx.polygons, 0);
    }
}
