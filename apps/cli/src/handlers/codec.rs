use crate::services::io::{read_json, write_json};
use anyhow::{Context, Result};
use c3dp_codec::FlatCodec;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Prints the flat device form of a config tree.
///
/// # Errors
/// Returns an error if the input cannot be read or nests too deeply.
pub fn flatten(codec: &FlatCodec, input: Option<&Path>, pretty: bool) -> Result<()> {
    let tree = read_json(input)?;
    let flat = codec.flatten(&tree).context("Failed to flatten input")?;
    write_json(&Value::Object(flat), pretty)
}

/// Prints the nested tree of a flat device config.
///
/// # Errors
/// Returns an error if the input cannot be read.
pub fn unflatten(codec: &FlatCodec, input: Option<&Path>, pretty: bool) -> Result<()> {
    let flat = read_json(input)?;
    write_json(&codec.unflatten(flat), pretty)
}

/// Prints a flat device config as the editor would send it back unchanged.
///
/// # Errors
/// Returns an error if the input cannot be read or flattened.
#[allow(clippy::print_stderr)]
pub fn normalize(
    codec: &FlatCodec,
    input: Option<&Path>,
    pretty: bool,
    show_registry: bool,
) -> Result<()> {
    let device = read_json(input)?;
    let tree = codec.unflatten(device);
    let flat = codec.flatten(&tree).context("Failed to flatten normalized tree")?;
    info!(keys = flat.len(), "Normalized device config");

    write_json(&Value::Object(flat), pretty)?;

    if show_registry {
        for key in codec.registry().keys() {
            eprintln!("{key}");
        }
    }
    Ok(())
}
