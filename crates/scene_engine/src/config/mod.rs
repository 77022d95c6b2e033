//! Configuration system
//!
//! Any `serde` type with a default can be loaded from and saved to disk by
//! implementing [`Config`]. The file extension picks the format.

pub use serde::{Serialize, Deserialize};

use std::path::Path;

/// Configuration trait
///
/// `.toml` files go through `toml`, `.ron` files through `ron`; anything else
/// is rejected with [`ConfigError::UnsupportedFormat`].
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let parsed = match format {
            ConfigFormat::Toml => toml::from_str(&contents).map_err(|e| e.to_string()),
            ConfigFormat::Ron => ron::from_str(&contents).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;

        log::debug!("Loaded {:?} config from {}", format, path.display());
        Ok(config)
    }

    /// Load configuration from file, falling back to defaults when it is missing
    ///
    /// A file that exists but cannot be parsed is still an error.
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match ConfigFormat::from_path(path)? {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Ron,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written
    #[error("Cannot access config file {path}: {source}")]
    Io {
        /// Offending file
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid for its format
    #[error("Cannot parse config file {path}: {message}")]
    Parse {
        /// Offending file
        path: String,
        /// Parser message
        message: String,
    },

    /// The value could not be serialized
    #[error("Cannot serialize config: {0}")]
    Serialize(String),

    /// Extension is neither `.toml` nor `.ron`
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    impl Config for Sample {}

    #[test]
    fn test_ron_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sample.ron");
        let sample = Sample {
            name: "orbit".to_string(),
            count: 3,
        };

        sample.save_to_file(&path).expect("save");
        assert_eq!(Sample::load_from_file(&path).expect("load"), sample);
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "count = \"three\"").expect("write");

        match Sample::load_from_file(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert!(reported.ends_with("broken.toml")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = Sample::load_from_file("definitely/missing.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
