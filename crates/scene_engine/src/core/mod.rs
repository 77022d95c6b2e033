//! # Core Engine Module
//!
//! Shared abstractions used by the rest of the engine.
//!
//! ## Organization
//!
//! - **Config**: Typed configuration for the scene core, logging and the frame loop
//! - **Error**: Error type for fallible scene lookups

pub mod config;
pub mod error;

pub use config::{EngineConfig, LoggingConfig, SceneConfig};
pub use error::SceneError;
pub use crate::config::{Config, ConfigError};
