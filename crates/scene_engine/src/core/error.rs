//! Scene error types
//!
//! Lifecycle mutations never fail; these errors only come from the checked
//! lookup helpers and from loading configuration.

use crate::config::ConfigError;
use crate::ecs::{ComponentId, EntityId};
use thiserror::Error;

/// Errors raised by checked scene lookups
#[derive(Error, Debug)]
pub enum SceneError {
    /// The entity was destroyed or never existed
    #[error("Stale entity handle: {0:?}")]
    StaleEntity(EntityId),

    /// The component was released, or is not of the requested type
    #[error("Stale or mistyped component handle: {0:?}")]
    StaleComponent(ComponentId),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
