use c3dp_codec::prelude::*;
use serde_json::{Value, json};

/// A flat payload shaped like the one the device serves on `GET /config`.
#[must_use]
pub fn device_payload() -> Value {
    json!({
        "web.ws.name": "",
        "web.path.ap": "/ap/",
        "web.path.data": "/data/",
        "net.ap.ssid": "Cloud3DP",
        "net.ap.pass": "12345678",
        "net.ap.hide": "0",
        "app.dns.run": "1",
        "app.cmd.prompt": "c3dp> "
    })
}

/// Unwraps a JSON object into a [`FlatMap`].
/// # Panics
/// * If the value is not an object.
#[must_use]
pub fn as_flat(value: Value) -> FlatMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
