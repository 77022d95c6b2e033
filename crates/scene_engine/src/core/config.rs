//! # Engine Configuration
//!
//! Configuration for the scene core, logging and the frame loop. Every type
//! implements [`Config`] so it can be loaded from TOML or RON.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::ecs::scheduler::TickPolicy;

/// # Scene Configuration
///
/// Controls how the entity manager schedules component ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Which components are ticked each pass
    pub tick_policy: TickPolicy,
    /// Arena capacity reserved up front
    pub initial_capacity: usize,
    /// Log per-pass statistics at debug level
    pub log_frame_stats: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tick_policy: TickPolicy::ActiveOnly,
            initial_capacity: 256,
            log_frame_stats: false,
        }
    }
}

impl Config for SceneConfig {}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter, e.g. `info` or `scene_engine=trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config for LoggingConfig {}

/// # Engine Configuration
///
/// Top-level configuration consumed by [`crate::Engine::run`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Stop after this many frames (None = run until quit)
    pub max_frames: Option<u64>,
    /// Fixed step in seconds (None = wall clock)
    pub fixed_delta_time: Option<f32>,
    /// Scene core settings
    pub scene: SceneConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_frames: None,
            fixed_delta_time: None,
            scene: SceneConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config for EngineConfig {}
