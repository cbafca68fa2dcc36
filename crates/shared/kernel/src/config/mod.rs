use c3dp_derive::c3dp_error;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix of environment overrides (`C3DP__CODEC__MAX_DEPTH=64`).
pub const ENV_PREFIX: &str = "C3DP";

/// Settings file looked up when no explicit path is given (any supported extension).
pub const DEFAULT_CONFIG_NAME: &str = "c3dp";

/// Custom error type for settings loading.
#[c3dp_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads settings from a file layered under environment overrides.
///
/// 1. **Base File**: an explicit `path` must exist. Without one, a `c3dp.*`
///    file in the working directory is used if present.
/// 2. **Environment Overrides**: variables prefixed with `C3DP__`; nested
///    fields are separated by double underscores (`C3DP__LOGGING__LEVEL`
///    maps to `logging.level`).
///
/// Fields missing from every layer keep the defaults of `T`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing or
/// malformed, or if the merged layers do not match `T`.
///
/// # Example
/// ```rust
/// use c3dp_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct ToolSettings {
///     depth: usize,
/// }
///
/// let cfg: ToolSettings = load_config(Some("config/missing")).unwrap_or_default();
/// assert_eq!(cfg.depth, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_NAME), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("registry.preload"),
        );

    if required {
        info!("Loading config from {}", effective_path.display());
    } else {
        debug!("Looking for optional config {}", effective_path.display());
    }

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
