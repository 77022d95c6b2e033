//! Core engine implementation
//!
//! The frame loop: application update, scene tick, render-queue drain.

use std::path::Path;

use crate::{
    application::Application,
    config::{Config, ConfigError},
    core::config::EngineConfig,
    core::error::SceneError,
    ecs::{EntityManager, TickStats},
    foundation::{
        logging,
        time::{FrameStep, Timer},
    },
    render::{RenderQueue, RenderQueueStats},
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the scene and the render queue and runs the frame loop.
pub struct Engine {
    /// Scene registry owning every entity and component
    pub entities: EntityManager,

    /// Draw calls submitted by renderable components
    pub render_queue: RenderQueue,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Self {
        log::info!("Initializing engine...");
        Self {
            entities: EntityManager::with_config(config.scene.clone()),
            render_queue: RenderQueue::new(),
            timer: Timer::new(FrameStep::from_config(config.fixed_delta_time)),
            config,
            running: true,
        }
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        logging::init(&config.logging);
        let mut engine = Self::new(config);

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        let result = engine.main_loop(app);

        app.cleanup(&mut engine);
        log::info!("Engine shutdown complete after {} frame(s)", engine.timer.frame_count());
        result
    }

    /// Load configuration from a `.toml` or `.ron` file, then run
    pub fn run_from_file<T: Application>(path: impl AsRef<Path>, app: &mut T) -> Result<(), EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        Self::run(config, app)
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        while self.running && !self.frame_limit_reached() {
            self.frame(app)?;
        }
        Ok(())
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .max_frames
            .is_some_and(|limit| self.timer.frame_count() >= limit)
    }

    /// Run a single frame: update, tick the scene, drain and render draw calls
    pub fn frame<T: Application>(&mut self, app: &mut T) -> Result<TickStats, EngineError> {
        let delta_time = self.timer.next_frame();

        app.update(self, delta_time)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

        let stats = self.entities.tick(delta_time);
        let draw_calls = self.render_queue.execute();

        app.render(self, &draw_calls)
            .map_err(|e| EngineError::ApplicationError(format!("App render: {}", e)))?;

        log::trace!(
            "Frame {} took {:.3} ms ({} draw call(s))",
            self.timer.frame_count(),
            self.timer.frame_elapsed_millis(),
            draw_calls.len()
        );
        Ok(stats)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running && !self.frame_limit_reached()
    }

    /// Get the scene
    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    /// Get mutable access to the scene
    pub fn entities_mut(&mut self) -> &mut EntityManager {
        &mut self.entities
    }

    /// Get the render queue
    pub fn render_queue(&self) -> &RenderQueue {
        &self.render_queue
    }

    /// Render-queue counters of the last frame
    pub fn render_stats(&self) -> RenderQueueStats {
        self.render_queue.last_frame_stats()
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}
