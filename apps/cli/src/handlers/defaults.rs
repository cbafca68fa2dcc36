use crate::services::io::write_json;
use anyhow::Result;
use c3dp_codec::{FlatCodec, FlatMap};
use c3dp_kernel::domain::device::DEVICE_ENTRIES;
use serde_json::Value;

/// Prints the firmware defaults, flat or as a tree.
///
/// # Errors
/// Returns an error if stdout is closed.
pub fn defaults(codec: &FlatCodec, tree: bool, pretty: bool) -> Result<()> {
    let flat: FlatMap = DEVICE_ENTRIES
        .iter()
        .map(|entry| (entry.key.to_owned(), Value::String(entry.default.to_owned())))
        .collect();

    let output = if tree { codec.unflatten_map(flat) } else { Value::Object(flat) };
    write_json(&output, pretty)
}
