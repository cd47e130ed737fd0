//! Configuration loading.
//!
//! `defaults/slimc.default.toml` is embedded into the crate so that the documented defaults
//! and the runtime behavior stay in sync. Callers layer user files and overrides on top of
//! those defaults via [`Loader`] before deserializing into [`SlimConfig`].
//!
//! The command-line tool layers, in order: the defaults, `slimc.toml` in the working directory
//! when present ([`PROJECT_CONFIG_FILE`]), the file given with `--config`, then flag overrides.

use crate::options::Options;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/slimc.default.toml");

/// Per-project configuration picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "slimc.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SlimConfig {
    pub render: RenderConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub extensions: ExtensionsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub tab_width: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Which of the bundled extensions are registered.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionsConfig {
    pub builtin_filters: bool,
    pub autotags: bool,
}

impl SlimConfig {
    pub fn options(&self) -> Options {
        Options::with_tab_width(self.render.tab_width)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.render.tab_width == 0 {
            return Err(ConfigError::Message(
                "render.tab_width must be a positive integer".to_string(),
            ));
        }
        Ok(self)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<SlimConfig, ConfigError> {
        self.builder
            .build()?
            .try_deserialize::<SlimConfig>()?
            .validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
