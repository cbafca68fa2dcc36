use crate::diff::ConfigDiff;
use crate::error::{EditorError, EditorErrorExt};
use crate::update::{ConfigUpdate, NO_CHANGES, SaveOutcome};
use c3dp_codec::{BoolRegistry, ConfigTree, FlatCodec, FlatMap};
use c3dp_domain::device;
use serde_json::Value;
use tracing::{debug, info};

const MASK: &str = "********";

#[derive(Debug, Clone)]
struct Baseline {
    flat: FlatMap,
    text: String,
}

impl Baseline {
    fn new(flat: FlatMap) -> Result<Self, EditorError> {
        let text = serde_json::to_string(&flat).context("Serializing baseline")?;
        Ok(Self { flat, text })
    }
}

/// Tracks one device's config between what it reported and what the user edits.
///
/// The session owns the codec, and through it the fake-boolean registry, so
/// everything registered while reading the device config is used again when
/// the edited tree is written back.
///
/// ```rust
/// use c3dp_codec::FlatCodec;
/// use c3dp_editor::{ConfigSession, SaveOutcome};
/// use serde_json::json;
///
/// # fn main() -> Result<(), c3dp_editor::EditorError> {
/// let mut session = ConfigSession::new(FlatCodec::new());
/// session.init(json!({ "net.ap.ssid": "Cloud3DP", "net.ap.hide": "0" }))?;
///
/// let mut tree = session.load()?;
/// tree["net"]["ap"]["hide"] = json!(true);
///
/// let SaveOutcome::Changed(update) = session.save(&tree)? else { unreachable!() };
/// assert_eq!(update.payload(), r#"{"net.ap.ssid":"Cloud3DP","net.ap.hide":"1"}"#);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigSession {
    codec: FlatCodec,
    baseline: Option<Baseline>,
}

impl ConfigSession {
    #[must_use]
    pub const fn new(codec: FlatCodec) -> Self {
        Self { codec, baseline: None }
    }

    /// Adopts the config reported by the device.
    ///
    /// The baseline is the device map normalized through the codec
    /// (`flatten(unflatten(device_flat))`), which also registers every
    /// fake-boolean the device sent. Calling `init` again replaces the
    /// baseline; registrations are kept.
    ///
    /// # Errors
    /// Fails if the rebuilt tree cannot be flattened.
    pub fn init(&mut self, device_flat: Value) -> Result<&FlatMap, EditorError> {
        let tree = self.codec.unflatten(device_flat);
        let flat = self.codec.flatten(&tree).context("Normalizing device config")?;

        info!(keys = flat.len(), booleans = self.codec.registry().len(), "Config session initialized");
        Ok(&self.baseline.insert(Baseline::new(flat)?).flat)
    }

    /// Returns a fresh, caller-owned tree built from the baseline.
    ///
    /// # Errors
    /// [`EditorError::NotInitialized`] before [`ConfigSession::init`].
    pub fn load(&self) -> Result<ConfigTree, EditorError> {
        let baseline = self.current("load")?;
        Ok(self.codec.unflatten_map(baseline.flat.clone()))
    }

    /// Compares an edited tree against the baseline.
    ///
    /// The tree is flattened and its JSON text compared with the baseline's.
    /// Identical text yields [`SaveOutcome::Unchanged`]; anything else yields
    /// the request that writes the new map to the device. The baseline itself
    /// is left alone until [`ConfigSession::commit`].
    ///
    /// # Errors
    /// [`EditorError::NotInitialized`] before [`ConfigSession::init`];
    /// [`EditorError::Codec`] if the tree cannot be flattened.
    pub fn save(&self, tree: &ConfigTree) -> Result<SaveOutcome, EditorError> {
        let baseline = self.current("save")?;
        let flat = self.codec.flatten(tree).context("Flattening edited config")?;
        let payload = serde_json::to_string(&flat).context("Serializing edited config")?;

        if payload == baseline.text {
            info!("{NO_CHANGES}");
            return Ok(SaveOutcome::Unchanged);
        }

        let diff = ConfigDiff::between(&baseline.flat, &flat);
        log_diff(&diff, &baseline.flat, &flat);
        info!(
            added = diff.added.len(),
            changed = diff.changed.len(),
            removed = diff.removed.len(),
            "Config changed"
        );

        Ok(SaveOutcome::Changed(ConfigUpdate::new(flat, payload, diff)))
    }

    /// Makes an acknowledged update the new baseline.
    pub fn commit(&mut self, update: &ConfigUpdate) {
        self.baseline =
            Some(Baseline { flat: update.flat().clone(), text: update.payload().to_owned() });
        debug!(keys = update.flat().len(), "Committed config update");
    }

    /// The normalized flat map last received or committed.
    #[must_use]
    pub fn baseline(&self) -> Option<&FlatMap> {
        self.baseline.as_ref().map(|b| &b.flat)
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.baseline.is_some()
    }

    #[must_use]
    pub const fn registry(&self) -> &BoolRegistry {
        self.codec.registry()
    }

    #[must_use]
    pub const fn codec(&self) -> &FlatCodec {
        &self.codec
    }

    fn current(&self, operation: &'static str) -> Result<&Baseline, EditorError> {
        self.baseline
            .as_ref()
            .ok_or_else(|| EditorError::NotInitialized { context: Some(operation.into()) })
    }
}

fn log_diff(diff: &ConfigDiff, before: &FlatMap, after: &FlatMap) {
    for key in &diff.added {
        debug!(key = %key, value = %shown(key, after.get(key)), "Config key added");
    }
    for key in &diff.changed {
        debug!(
            key = %key,
            from = %shown(key, before.get(key)),
            to = %shown(key, after.get(key)),
            "Config key changed"
        );
    }
    for key in &diff.removed {
        debug!(key = %key, "Config key removed");
    }
}

fn shown(key: &str, value: Option<&Value>) -> String {
    match value {
        Some(_) if device::is_secret(key) => MASK.to_owned(),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn load_and_save_require_init() {
        let session = ConfigSession::default();
        assert!(matches!(session.load(), Err(EditorError::NotInitialized { .. })));
        assert!(matches!(session.save(&json!({})), Err(EditorError::NotInitialized { .. })));
        assert!(session.baseline().is_none());
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(shown("net.ap.pass", Some(&json!("hunter22"))), MASK);
        assert_eq!(shown("net.ap.ssid", Some(&json!("Cloud3DP"))), "\"Cloud3DP\"");
        assert_eq!(shown("net.ap.ssid", None), "");
    }

    #[test]
    fn init_normalizes_the_device_map() {
        let mut session = ConfigSession::default();
        let baseline = session.init(json!({ "a[1]": "x", "b": "1" })).unwrap().clone();

        assert_eq!(baseline, json!({ "a[0]": null, "a[1]": "x", "b": "1" }).as_object().unwrap().clone());
        assert!(session.registry().contains("b"));
    }

    #[test]
    fn commit_moves_the_baseline() {
        let mut session = ConfigSession::default();
        session.init(json!({ "app.ota.run": "0" })).unwrap();

        let mut tree = session.load().unwrap();
        tree["app"]["ota"]["run"] = json!(true);
        let update = session.save(&tree).unwrap().into_update().unwrap();

        session.commit(&update);
        assert_eq!(session.baseline(), Some(update.flat()));
        assert_eq!(session.save(&tree).unwrap(), SaveOutcome::Unchanged);
    }
}
