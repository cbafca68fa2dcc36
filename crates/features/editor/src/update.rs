use crate::diff::ConfigDiff;
use c3dp_codec::FlatMap;
use serde_json::{Map, Value};

/// HTTP method the device expects for config writes.
pub const SAVE_METHOD: &str = "POST";

/// Endpoint receiving config writes.
pub const SAVE_PATH: &str = "/config";

/// Form field carrying the flat JSON text.
pub const SAVE_FIELD: &str = "json";

/// Message reported when a save finds nothing to send.
pub const NO_CHANGES: &str = "No configurations changed";

/// A pending config write, ready to be sent to the device.
///
/// Sending it is up to the caller. Once the device accepts it, hand it back
/// to [`crate::ConfigSession::commit`] so it becomes the new baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpdate {
    flat: FlatMap,
    payload: String,
    diff: ConfigDiff,
}

impl ConfigUpdate {
    pub(crate) const fn new(flat: FlatMap, payload: String, diff: ConfigDiff) -> Self {
        Self { flat, payload, diff }
    }

    #[must_use]
    pub const fn method(&self) -> &'static str {
        SAVE_METHOD
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        SAVE_PATH
    }

    /// The flat JSON text sent in the [`SAVE_FIELD`] form field.
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Form fields of the request body, as `(name, value)` pairs.
    #[must_use]
    pub fn form(&self) -> [(&'static str, &str); 1] {
        [(SAVE_FIELD, self.payload.as_str())]
    }

    /// The form rendered as a JSON object, `{"json": "<flat JSON text>"}`.
    #[must_use]
    pub fn form_value(&self) -> Value {
        let mut form = Map::new();
        form.insert(SAVE_FIELD.to_owned(), Value::String(self.payload.clone()));
        Value::Object(form)
    }

    #[must_use]
    pub const fn flat(&self) -> &FlatMap {
        &self.flat
    }

    #[must_use]
    pub const fn diff(&self) -> &ConfigDiff {
        &self.diff
    }
}

/// Result of [`crate::ConfigSession::save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The edited tree flattens to exactly the baseline.
    Unchanged,
    Changed(ConfigUpdate),
}

impl SaveOutcome {
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    #[must_use]
    pub const fn update(&self) -> Option<&ConfigUpdate> {
        match self {
            Self::Changed(update) => Some(update),
            Self::Unchanged => None,
        }
    }

    #[must_use]
    pub fn into_update(self) -> Option<ConfigUpdate> {
        match self {
            Self::Changed(update) => Some(update),
            Self::Unchanged => None,
        }
    }
}
