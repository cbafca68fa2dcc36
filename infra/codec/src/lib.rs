//! Flattened-JSON codec for the Cloud3DP device configuration.
//!
//! The device persists its settings as a single flat JSON object whose keys are
//! paths into a nested document, and it has no boolean type on the wire:
//!
//! ```text
//! { "net.ap.ssid": "Cloud3DP", "net.ap.hide": "0", "web.path.ap": "/ap/" }
//! ```
//!
//! [`FlatCodec`] converts between that flat form ([`FlatMap`]) and a nested
//! [`ConfigTree`] suitable for editing, and back again without losing
//! information.
//!
//! ## Key grammar
//!
//! Mapping keys are joined with `.`, sequence indices use brackets
//! (`a.b[2].c`). The empty key addresses the root, which is how a document
//! that is itself a scalar is flattened. See [`FlatKey::segments`] for the
//! tokenizer and [`FlatCodec::unflatten_map`] for how unplaceable keys are
//! dropped.
//!
//! ## Fake-booleans
//!
//! Values arriving as exactly `"0"` or `"1"` become `false` / `true` and their
//! keys are recorded in a [`BoolRegistry`]. On the way out, every value at a
//! recorded key is written back as `"0"` / `"1"` by its truthiness, even if
//! the value changed type in between; booleans at other keys stay native.
//! The registry lives as long as the session that owns it and is shared
//! between clones.
//!
//! The heuristic is ambiguous for settings that legitimately hold the strings
//! `"0"` or `"1"`: those come back as booleans. Nothing on the wire
//! distinguishes the two cases.
//!
//! ## Example
//! ```rust
//! use c3dp_codec::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), CodecError> {
//! let registry = BoolRegistry::new();
//! let codec = FlatCodec::builder().registry(registry.clone()).build()?;
//!
//! let tree = codec.unflatten(json!({ "net.ap.ssid": "Cloud3DP", "net.ap.hide": "0" }));
//! assert_eq!(tree, json!({ "net": { "ap": { "ssid": "Cloud3DP", "hide": false } } }));
//! assert!(registry.contains("net.ap.hide"));
//!
//! let flat = codec.flatten(&json!({ "net": { "ap": { "ssid": "Cloud3DP", "hide": true } } }))?;
//! assert_eq!(flat["net.ap.hide"], json!("1"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod registry;
mod types;

pub use builder::FlatCodecBuilder;
pub use engine::FlatCodec;
pub use error::{CodecError, CodecErrorExt};
pub use registry::BoolRegistry;
pub use types::{
    ConfigTree, DEFAULT_MAX_DEPTH, FAKE_FALSE, FAKE_TRUE, FlatKey, FlatMap, MAX_SEQUENCE_INDEX,
    MAX_SEQUENCE_SLOTS, Segment, fake_bool, is_truthy, parse_fake_bool,
};

pub mod prelude {
    pub use crate::engine::FlatCodec;
    pub use crate::error::{CodecError, CodecErrorExt};
    pub use crate::registry::BoolRegistry;
    pub use crate::types::{ConfigTree, FlatKey, FlatMap};
}
