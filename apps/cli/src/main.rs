#![warn(rust_2018_idioms, unused_lifetimes)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{codec, defaults, diff};
use crate::models::args::{Cli, Command};

use anyhow::{Context, Result};
use c3dp_codec::{BoolRegistry, FlatCodec};
use c3dp_kernel::config::load_config;
use c3dp_kernel::domain::config::{LoggingSettings, ToolConfig};
use c3dp_kernel::domain::device;
use c3dp_logger::{Logger, parse_level};
use clap::Parser;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config: ToolConfig = load_config(cli.config.as_deref()).context("Failed to load settings")?;
    let _logger = init_logger(&config.logging, cli.verbose)?;

    let codec = build_codec(&config, &cli.fakebool)?;
    debug!(preloaded = codec.registry().len(), "Codec ready");

    match cli.command {
        Command::Flatten { input } => codec::flatten(&codec, input.as_deref(), cli.pretty)?,
        Command::Unflatten { input } => codec::unflatten(&codec, input.as_deref(), cli.pretty)?,
        Command::Normalize { input, show_registry } => {
            codec::normalize(&codec, input.as_deref(), cli.pretty, show_registry)?;
        },
        Command::Diff { baseline, edited, flat } => {
            diff::diff(codec, &baseline, &edited, flat, cli.pretty)?;
        },
        Command::Defaults { tree } => defaults::defaults(&codec, tree, cli.pretty)?,
    }

    Ok(())
}

/// Installs logging unless every output is disabled.
fn init_logger(settings: &LoggingSettings, verbose: u8) -> Result<Option<Logger>> {
    if !settings.console && settings.path.is_none() {
        return Ok(None);
    }

    let builder = Logger::builder()
        .name(env!("CARGO_BIN_NAME"))
        .console(settings.console)
        .level(parse_level(&settings.level)?)
        .verbosity(verbose);

    let logger = match &settings.path {
        Some(path) => builder.path(path).json(settings.json).init()?,
        None => builder.init()?,
    };
    Ok(Some(logger))
}

/// Seeds the session registry from settings and flags.
fn build_codec(config: &ToolConfig, fakebool: &[String]) -> Result<FlatCodec> {
    let registry = BoolRegistry::new();
    registry.extend(&config.registry.preload);
    if config.registry.device_defaults {
        registry.extend(device::boolean_keys());
    }
    registry.extend(fakebool);

    let codec = FlatCodec::builder()
        .registry(registry)
        .max_depth(config.codec.max_depth)
        .build()
        .context("Invalid codec settings")?;
    Ok(codec)
}
