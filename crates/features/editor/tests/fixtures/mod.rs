use c3dp_domain::device::DEVICE_ENTRIES;
use serde_json::{Map, Value};

/// The flat map a freshly flashed device reports: every setting at its default.
#[must_use]
pub fn factory_report() -> Value {
    let map: Map<String, Value> = DEVICE_ENTRIES
        .iter()
        .map(|entry| (entry.key.to_owned(), Value::String(entry.default.to_owned())))
        .collect();
    Value::Object(map)
}
