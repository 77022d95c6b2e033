//! Application trait and lifecycle management

use crate::config::ConfigError;
use crate::core::error::SceneError;
use crate::engine::{Engine, EngineError};
use crate::render::DrawCall;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with the engine loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is created. Build the initial scene here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the scene is ticked.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Consume the frame's draw calls
    ///
    /// Called after the scene tick with everything submitted this frame. The
    /// default implementation discards them.
    fn render(&mut self, _engine: &mut Engine, _draw_calls: &[DrawCall]) -> Result<(), AppError> {
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the loop ends, including when it ends with an error.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Checked scene lookup failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
