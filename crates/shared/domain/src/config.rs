use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Settings of the `c3dp` tooling.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolConfigInner {
    pub codec: CodecSettings,
    pub logging: LoggingSettings,
    pub registry: RegistrySettings,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ToolConfig {
    #[serde(flatten, default)]
    inner: Arc<ToolConfigInner>,
}

impl Deref for ToolConfig {
    type Target = ToolConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ToolConfig {
    fn deref_mut(&mut self) -> &mut ToolConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Flat codec limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Deepest nesting accepted when flattening.
    pub max_depth: usize,
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level directive (`RUST_LOG` still wins).
    pub level: String,
    pub console: bool,
    /// Emit file logs as JSON lines.
    pub json: bool,
    /// Directory for rolling log files; file logging is off when unset.
    pub path: Option<PathBuf>,
}

/// Fake-boolean registry seeding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Keys registered as fake-booleans before any payload is decoded.
    pub preload: Vec<String>,
    /// Also register the device's known boolean settings.
    pub device_defaults: bool,
}

// --- Default ---

impl Default for CodecSettings {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_owned(), console: true, json: false, path: None }
    }
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self { preload: Vec::new(), device_defaults: true }
    }
}
