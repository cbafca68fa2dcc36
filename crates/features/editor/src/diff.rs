use c3dp_codec::FlatMap;
use serde::Serialize;

/// Keys that differ between two flat maps, each list sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigDiff {
    pub added: Vec<String>,
    pub changed: Vec<String>,
    pub removed: Vec<String>,
}

impl ConfigDiff {
    /// Compares `updated` against `baseline` key by key.
    #[must_use]
    pub fn between(baseline: &FlatMap, updated: &FlatMap) -> Self {
        let mut diff = Self::default();

        for (key, value) in updated {
            match baseline.get(key) {
                None => diff.added.push(key.clone()),
                Some(before) if before != value => diff.changed.push(key.clone()),
                Some(_) => {},
            }
        }
        diff.removed =
            baseline.keys().filter(|key| !updated.contains_key(*key)).cloned().collect();

        diff.added.sort_unstable();
        diff.changed.sort_unstable();
        diff.removed.sort_unstable();
        diff
    }

    /// `true` when no key was added, changed or removed.
    ///
    /// Two maps can serialize differently and still have an empty diff when
    /// only their key order differs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.changed.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: serde_json::Value) -> FlatMap {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!("fixture must be an object"),
        }
    }

    #[test]
    fn classifies_and_sorts_keys() {
        let baseline = flat(json!({ "b": "1", "a": "x", "z": "gone", "m": 3 }));
        let updated = flat(json!({ "a": "y", "b": "1", "m": 3, "y": "new", "c": "new" }));

        let diff = ConfigDiff::between(&baseline, &updated);
        assert_eq!(diff.added, vec!["c", "y"]);
        assert_eq!(diff.changed, vec!["a"]);
        assert_eq!(diff.removed, vec!["z"]);
        assert_eq!(diff.len(), 4);
    }

    #[test]
    fn type_change_counts_as_change() {
        let diff = ConfigDiff::between(&flat(json!({ "n": 1 })), &flat(json!({ "n": "1" })));
        assert_eq!(diff.changed, vec!["n"]);
    }

    #[test]
    fn reordering_alone_is_empty() {
        let diff = ConfigDiff::between(
            &flat(json!({ "a": 1, "b": 2 })),
            &flat(json!({ "b": 2, "a": 1 })),
        );
        assert!(diff.is_empty());
    }
}
