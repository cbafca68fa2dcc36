use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::builder::FlatCodecBuilder;
use crate::error::{CodecError, CodecErrorExt};
use crate::registry::BoolRegistry;
use crate::types::{
    ConfigTree, DEFAULT_MAX_DEPTH, FlatKey, FlatMap, MAX_SEQUENCE_INDEX, MAX_SEQUENCE_SLOTS,
    Segment, fake_bool, is_truthy, parse_fake_bool,
};

/// Bidirectional transform between a nested [`ConfigTree`] and its flat wire form.
///
/// The device stores booleans as the strings `"0"` / `"1"`. Unflattening turns
/// them into native booleans and records their keys in the codec's
/// [`BoolRegistry`]; flattening writes every value at a recorded key back as
/// `"0"` / `"1"` by its truthiness. Booleans at keys never seen as `"0"` /
/// `"1"` stay native.
///
/// ### Example
/// ```rust
/// use c3dp_codec::FlatCodec;
/// use serde_json::json;
///
/// let codec = FlatCodec::new();
///
/// let tree = codec.unflatten(json!({ "a.b": "1", "a.c": "0", "list[0]": "x" }));
/// assert_eq!(tree, json!({ "a": { "b": true, "c": false }, "list": ["x"] }));
///
/// let flat = codec.flatten(&tree).unwrap();
/// assert_eq!(serde_json::Value::Object(flat), json!({ "a.b": "1", "a.c": "0", "list[0]": "x" }));
/// ```
#[derive(Debug, Clone)]
pub struct FlatCodec {
    registry: BoolRegistry,
    max_depth: usize,
}

impl Default for FlatCodec {
    fn default() -> Self {
        Self::from_parts(BoolRegistry::new(), DEFAULT_MAX_DEPTH)
    }
}

impl FlatCodec {
    /// Creates a codec with its own empty registry and the default depth limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec sharing the given registry.
    #[must_use]
    pub fn with_registry(registry: BoolRegistry) -> Self {
        Self::from_parts(registry, DEFAULT_MAX_DEPTH)
    }

    /// Returns a new [`FlatCodecBuilder`].
    #[must_use]
    pub fn builder() -> FlatCodecBuilder {
        FlatCodecBuilder::new()
    }

    pub(crate) const fn from_parts(registry: BoolRegistry, max_depth: usize) -> Self {
        Self { registry, max_depth }
    }

    #[must_use]
    pub const fn registry(&self) -> &BoolRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flattens a tree into its wire form.
    ///
    /// Mapping children are addressed as `prefix.key`, sequence elements as
    /// `prefix[i]`, and a scalar root as the empty key. Empty containers are
    /// kept as explicit `{}` / `[]` leaves (an empty root mapping yields an
    /// empty flat map). Booleans at registered keys leave as `"0"` / `"1"`.
    ///
    /// # Errors
    /// Returns [`CodecError::CyclicStructure`] if the tree nests deeper than
    /// [`FlatCodec::max_depth`].
    pub fn flatten(&self, tree: &ConfigTree) -> Result<FlatMap, CodecError> {
        let mut flat = FlatMap::new();
        self.flatten_node(&mut flat, tree, FlatKey::root(), 0)?;
        let obfuscated = self.obfuscate_in_place(&mut flat);

        debug!(leaves = flat.len(), obfuscated, "Flattened config tree");
        Ok(flat)
    }

    /// Rebuilds a tree from its wire form.
    ///
    /// Anything but a JSON object is returned unchanged. Objects go through
    /// [`FlatCodec::unflatten_map`].
    #[must_use]
    pub fn unflatten(&self, data: Value) -> ConfigTree {
        match data {
            Value::Object(flat) => self.unflatten_map(flat),
            other => other,
        }
    }

    /// Rebuilds a tree from a flat map.
    ///
    /// Fake-booleans are converted (and registered) first. Each key is then
    /// walked segment by segment, creating a sequence where the next segment
    /// is an index and a mapping otherwise. The empty key addresses the root.
    ///
    /// Keys are dropped, never rejected, when they cannot be placed:
    /// * a non-empty key without any segment (e.g. `"..."`);
    /// * a key with more segments than the codec's depth limit;
    /// * an index beyond `usize`, or above [`MAX_SEQUENCE_INDEX`] where it
    ///   addresses a sequence;
    /// * a key whose sequence padding would exceed [`MAX_SEQUENCE_SLOTS`]
    ///   for the whole call;
    /// * a name segment addressing an existing sequence.
    ///
    /// A scalar standing where a container is needed is replaced by that
    /// container, so the later key wins.
    #[must_use]
    pub fn unflatten_map(&self, flat: FlatMap) -> ConfigTree {
        let flat = self.deobfuscate(flat);
        let total = flat.len();
        let mut root: Option<Value> = None;
        let mut dropped = 0usize;
        let mut slots_left = MAX_SEQUENCE_SLOTS;

        for (key, value) in flat {
            let segments = match FlatKey::from(key.as_str()).segments() {
                Some(segments) if segments.is_empty() && key.is_empty() => {
                    root = Some(value);
                    continue;
                },
                Some(segments) if !segments.is_empty() => segments,
                Some(_) => {
                    warn!(key = %key, "Dropping flat key without path segments");
                    dropped += 1;
                    continue;
                },
                None => {
                    warn!(key = %key, "Dropping flat key with an out-of-range index");
                    dropped += 1;
                    continue;
                },
            };

            if segments.len() > self.max_depth {
                warn!(
                    key = %key.chars().take(64).collect::<String>(),
                    depth = segments.len(),
                    max_depth = self.max_depth,
                    "Dropping flat key nested deeper than the depth limit"
                );
                dropped += 1;
                continue;
            }

            let added = match plan(root.as_ref(), &segments) {
                Ok(added) if added > slots_left => {
                    warn!(key = %key, added, "Dropping flat key past the sequence padding budget");
                    dropped += 1;
                    continue;
                },
                Ok(added) => added,
                Err(reason) => {
                    warn!(key = %key, reason, "Dropping flat key");
                    dropped += 1;
                    continue;
                },
            };
            slots_left -= added;

            if let Err(reason) = assign(root.get_or_insert(Value::Null), &segments, value) {
                warn!(key = %key, reason, "Dropping flat key");
                dropped += 1;
            }
        }

        debug!(keys = total, dropped, "Unflattened flat map");
        root.unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Encodes the value at every registered key as `"0"` / `"1"`.
    ///
    /// `null`, `false`, zero and `""` become `"0"`, anything else `"1"` (see
    /// [`is_truthy`]). Values already spelled `"0"` / `"1"` are kept.
    #[must_use]
    pub fn obfuscate(&self, mut flat: FlatMap) -> FlatMap {
        self.obfuscate_in_place(&mut flat);
        flat
    }

    /// Replaces `"0"` / `"1"` values with native booleans and registers their keys.
    #[must_use]
    pub fn deobfuscate(&self, mut flat: FlatMap) -> FlatMap {
        let mut seen = Vec::new();
        for (key, value) in &mut flat {
            if let Some(b) = parse_fake_bool(value) {
                *value = Value::Bool(b);
                seen.push(key.as_str());
            }
        }

        let registered = self.registry.extend(seen);
        if registered > 0 {
            debug!(registered, "Registered new fake-boolean keys");
        }
        flat
    }

    /// Flattens any serializable value.
    ///
    /// # Errors
    /// Returns [`CodecError::Serialization`] if the value cannot be represented
    /// as JSON, or [`CodecError::CyclicStructure`] as for [`FlatCodec::flatten`].
    pub fn flatten_serialize<T>(&self, value: &T) -> Result<FlatMap, CodecError>
    where
        T: Serialize + ?Sized,
    {
        let tree = serde_json::to_value(value).context("Serializing typed config")?;
        self.flatten(&tree)
    }

    /// Unflattens into any deserializable type.
    ///
    /// # Errors
    /// Returns [`CodecError::Serialization`] if the rebuilt tree does not match `T`.
    pub fn unflatten_deserialize<T>(&self, flat: FlatMap) -> Result<T, CodecError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(self.unflatten_map(flat)).context("Deserializing typed config")
    }

    fn flatten_node(
        &self,
        flat: &mut FlatMap,
        node: &Value,
        prefix: FlatKey,
        depth: usize,
    ) -> Result<(), CodecError> {
        let is_container = node.is_object() || node.is_array();
        if is_container && depth >= self.max_depth {
            return Err(CodecError::CyclicStructure {
                path: prefix.into_string(),
                max_depth: self.max_depth,
                context: None,
            });
        }

        match node {
            Value::Object(map) if map.is_empty() => {
                if !prefix.is_root() {
                    flat.insert(prefix.into_string(), Value::Object(Map::new()));
                }
            },
            Value::Object(map) => {
                for (key, child) in map {
                    self.flatten_node(flat, child, prefix.child(key), depth + 1)?;
                }
            },
            Value::Array(items) if items.is_empty() => {
                flat.insert(prefix.into_string(), Value::Array(Vec::new()));
            },
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    self.flatten_node(flat, child, prefix.index(i), depth + 1)?;
                }
            },
            scalar => {
                flat.insert(prefix.into_string(), scalar.clone());
            },
        }

        Ok(())
    }

    fn obfuscate_in_place(&self, flat: &mut FlatMap) -> usize {
        let registered = self.registry.snapshot();
        if registered.is_empty() {
            return 0;
        }

        let mut count = 0;
        for (key, value) in flat.iter_mut() {
            if registered.contains(key) && parse_fake_bool(value).is_none() {
                *value = fake_bool(is_truthy(value));
                count += 1;
            }
        }
        count
    }
}

/// Checks where `segments` would land without touching the tree.
///
/// Returns the number of sequence slots the assignment would allocate.
fn plan(slot: Option<&Value>, segments: &[Segment]) -> Result<usize, &'static str> {
    let mut current = slot.filter(|v| v.is_object() || v.is_array());
    let mut added = 0usize;

    for segment in segments {
        current = match (current, segment) {
            (Some(Value::Object(map)), Segment::Key(key)) => map.get(key.as_str()),
            (Some(Value::Object(map)), Segment::Index(i)) => map.get(&i.to_string()),
            (Some(Value::Array(_)), Segment::Key(_)) => return Err("name segment addresses a sequence"),
            (Some(Value::Array(items)), Segment::Index(i)) => {
                if *i > MAX_SEQUENCE_INDEX {
                    return Err("sequence index too large");
                }
                added = added.saturating_add((*i + 1).saturating_sub(items.len()));
                items.get(*i)
            },
            (_, Segment::Key(_)) => None,
            (_, Segment::Index(i)) => {
                if *i > MAX_SEQUENCE_INDEX {
                    return Err("sequence index too large");
                }
                added = added.saturating_add(*i + 1);
                None
            },
        }
        .filter(|v| v.is_object() || v.is_array());
    }

    Ok(added)
}

/// Walks `segments` from `slot`, creating containers as needed, and stores `value`.
fn assign(slot: &mut Value, segments: &[Segment], value: Value) -> Result<(), &'static str> {
    let mut current = slot;
    for segment in segments {
        ensure_container(current, segment);
        current = child_slot(current, segment)?;
    }

    *current = value;
    Ok(())
}

fn ensure_container(slot: &mut Value, next: &Segment) {
    if slot.is_object() || slot.is_array() {
        return;
    }
    if !slot.is_null() {
        debug!(replaced = %slot, "Replacing scalar with a container");
    }
    *slot = if next.is_index() { Value::Array(Vec::new()) } else { Value::Object(Map::new()) };
}

fn child_slot<'a>(container: &'a mut Value, segment: &Segment) -> Result<&'a mut Value, &'static str> {
    match (container, segment) {
        (Value::Object(map), Segment::Key(key)) => Ok(map.entry(key.as_str()).or_insert(Value::Null)),
        (Value::Object(map), Segment::Index(i)) => Ok(map.entry(i.to_string()).or_insert(Value::Null)),
        (Value::Array(items), Segment::Index(i)) => {
            if items.len() <= *i {
                items.resize(*i + 1, Value::Null);
            }
            Ok(&mut items[*i])
        },
        (Value::Array(_), Segment::Key(_)) => Err("name segment addresses a sequence"),
        _ => Err("segment addresses a scalar"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: Value) -> FlatMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn flattens_nested_mappings_and_sequences() {
        let codec = FlatCodec::new();
        let tree = json!({ "web": { "path": { "ap": "/ap/" } }, "items": ["x", "y"] });

        let out = codec.flatten(&tree).unwrap();

        assert_eq!(
            Value::Object(out),
            json!({ "web.path.ap": "/ap/", "items[0]": "x", "items[1]": "y" })
        );
    }

    #[test]
    fn flatten_preserves_insertion_order() {
        let codec = FlatCodec::new();
        let tree = json!({ "z": 1, "a": { "y": 2, "b": 3 } });

        let keys: Vec<String> = codec.flatten(&tree).unwrap().keys().cloned().collect();

        assert_eq!(keys, vec!["z", "a.y", "a.b"]);
    }

    #[test]
    fn scalar_root_uses_empty_key() {
        let codec = FlatCodec::new();
        assert_eq!(Value::Object(codec.flatten(&json!("scalar")).unwrap()), json!({ "": "scalar" }));
        assert_eq!(Value::Object(codec.flatten(&json!(null)).unwrap()), json!({ "": null }));
        assert_eq!(Value::Object(codec.flatten(&json!([])).unwrap()), json!({ "": [] }));
        assert!(codec.flatten(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn unflatten_rebuilds_root_scalar_and_sequence() {
        let codec = FlatCodec::new();
        assert_eq!(codec.unflatten(json!({ "": 42 })), json!(42));
        assert_eq!(codec.unflatten(json!({ "": false })), json!(false));
        assert_eq!(codec.unflatten(json!({ "[0]": "a", "[1]": "b" })), json!(["a", "b"]));
        assert_eq!(codec.unflatten(json!({})), json!({}));
    }

    #[test]
    fn unflatten_pads_sparse_sequences() {
        let codec = FlatCodec::new();
        assert_eq!(codec.unflatten(json!({ "a[2]": "c" })), json!({ "a": [null, null, "c"] }));
    }

    #[test]
    fn later_key_replaces_scalar_in_the_way() {
        let codec = FlatCodec::new();
        let tree = codec.unflatten(json!({ "a": "leaf", "a.b": "inner" }));
        assert_eq!(tree, json!({ "a": { "b": "inner" } }));
    }

    #[test]
    fn index_into_mapping_uses_decimal_key() {
        let codec = FlatCodec::new();
        let tree = codec.unflatten(json!({ "a.b": 1, "a[0]": 2 }));
        assert_eq!(tree, json!({ "a": { "b": 1, "0": 2 } }));
    }

    #[test]
    fn name_into_sequence_is_dropped() {
        let codec = FlatCodec::new();
        let tree = codec.unflatten(json!({ "a[0]": 1, "a.b": 2 }));
        assert_eq!(tree, json!({ "a": [1] }));
    }

    #[test]
    fn huge_indices_are_dropped() {
        let codec = FlatCodec::new();
        let tree = codec.unflatten(json!({ "ok": 1, "a[70000]": 2, "b[99999999999999999999999]": 3 }));
        assert_eq!(tree, json!({ "ok": 1 }));
    }

    #[test]
    fn huge_index_into_a_mapping_is_a_plain_key() {
        let codec = FlatCodec::new();
        let tree = codec.unflatten(json!({ "a.b": 1, "a[70000]": 2 }));
        assert_eq!(tree, json!({ "a": { "b": 1, "70000": 2 } }));
    }

    #[test]
    fn sequence_padding_is_bounded_per_call() {
        let codec = FlatCodec::new();
        let mut input = Map::new();
        for n in 0..10 {
            input.insert(format!("k{n}[60000]"), json!(n));
        }

        let tree = codec.unflatten_map(input);

        let kept: Vec<&String> = tree.as_object().unwrap().keys().collect();
        assert_eq!(kept, vec!["k0", "k1", "k2", "k3"]);
        assert_eq!(tree["k3"][60000], json!(3));
    }

    #[test]
    fn keys_deeper_than_the_limit_are_dropped() {
        let codec = FlatCodec::new();
        let deep = vec!["a"; 200_000].join(".");

        let tree = codec.unflatten_map(flat(json!({ "ok": 1, deep: 2 })));

        assert_eq!(tree, json!({ "ok": 1 }));
    }

    #[test]
    fn unflatten_honours_configured_depth() {
        let codec = FlatCodec::builder().max_depth(3).build().unwrap();

        let tree = codec.unflatten(json!({ "a.b.c": 1, "x.y.z.w": 2, "l[0][1]": 3 }));

        assert_eq!(tree, json!({ "a": { "b": { "c": 1 } }, "l": [[null, 3]] }));
        assert!(codec.flatten(&tree).is_ok());
    }

    #[test]
    fn depth_limit_reports_cyclic_structure() {
        let codec = FlatCodec::builder().max_depth(2).build().unwrap();

        assert!(codec.flatten(&json!({ "a": { "b": 1 } })).is_ok());

        let err = codec.flatten(&json!({ "a": { "b": { "c": 1 } } })).unwrap_err();
        assert!(
            matches!(&err, CodecError::CyclicStructure { path, max_depth: 2, .. } if path == "a.b"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn obfuscation_encodes_every_registered_key() {
        let codec = FlatCodec::new();
        for key in ["a", "s", "z", "e", "n", "k"] {
            codec.registry().register(key);
        }

        let out = codec.obfuscate(flat(json!({
            "a": true,
            "b": false,
            "s": "text",
            "z": 0,
            "e": "",
            "n": null,
            "k": "0",
        })));

        assert_eq!(
            Value::Object(out),
            json!({ "a": "1", "b": false, "s": "1", "z": "0", "e": "0", "n": "0", "k": "0" })
        );
    }

    #[test]
    fn deobfuscation_registers_keys() {
        let codec = FlatCodec::new();
        let out = codec.deobfuscate(flat(json!({ "a": "1", "b": "0", "c": "10", "d": 1 })));

        assert_eq!(Value::Object(out), json!({ "a": true, "b": false, "c": "10", "d": 1 }));
        assert_eq!(codec.registry().keys(), vec!["a", "b"]);
    }

    #[test]
    fn typed_roundtrip() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Ap {
            ssid: String,
            hide: bool,
        }

        let codec = FlatCodec::new();
        let typed: Ap = codec
            .unflatten_deserialize(flat(json!({ "ssid": "Cloud3DP", "hide": "0" })))
            .unwrap();
        assert_eq!(typed, Ap { ssid: "Cloud3DP".into(), hide: false });

        let out = codec.flatten_serialize(&typed).unwrap();
        assert_eq!(Value::Object(out), json!({ "ssid": "Cloud3DP", "hide": "0" }));
    }
}
