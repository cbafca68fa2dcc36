use fxhash::FxHashSet;
use parking_lot::{RwLock, RwLockReadGuard};
use std::sync::Arc;
use tracing::trace;

/// The set of flat keys known to carry fake-booleans (`"0"` / `"1"`).
///
/// A key is registered the first time unflattening sees it arrive as a
/// fake-boolean and stays registered for the lifetime of the registry, even
/// if its value later changes type. Flattening writes the value at every
/// registered key back to the wire as `"0"` / `"1"`.
///
/// Clones share the same set, so one registry can be handed to several
/// codecs (or threads) that belong to the same session.
///
/// ### Example
/// ```rust
/// use c3dp_codec::BoolRegistry;
///
/// let registry = BoolRegistry::new();
/// assert!(registry.register("net.ap.hide"));
/// assert!(!registry.register("net.ap.hide"));
///
/// let shared = registry.clone();
/// assert!(shared.contains("net.ap.hide"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BoolRegistry {
    keys: Arc<RwLock<FxHashSet<String>>>,
}

impl BoolRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a key. Returns `true` if it was not registered before.
    pub fn register(&self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        if self.keys.read().contains(key) {
            return false;
        }
        let inserted = self.keys.write().insert(key.to_owned());
        if inserted {
            trace!(key, "Registered fake-boolean key");
        }
        inserted
    }

    /// Registers every key of the iterator, returning how many were new.
    pub fn extend<I, K>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut guard = self.keys.write();
        let mut added = 0;
        for key in keys {
            let key: &str = key.as_ref();
            if guard.insert(key.to_owned()) {
                added += 1;
            }
        }
        added
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.read().contains(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Returns a sorted snapshot of the registered keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.keys.read().iter().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Holds the read lock for a whole pass over a flat map.
    pub(crate) fn snapshot(&self) -> RwLockReadGuard<'_, FxHashSet<String>> {
        self.keys.read()
    }

    /// Returns `true` if both handles share the same underlying set.
    #[must_use]
    pub fn same_session(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.keys, &other.keys)
    }
}

impl<K: AsRef<str>> FromIterator<K> for BoolRegistry {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let registry = Self::new();
        registry.extend(iter);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn registration_is_idempotent() {
        let registry = BoolRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("app.dns.run"));
        assert!(!registry.register("app.dns.run"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn extend_counts_new_keys_only() {
        let registry: BoolRegistry = ["b", "a"].into_iter().collect();
        let added = registry.extend(["a", "c", "c"]);

        assert_eq!(added, 1);
        assert_eq!(registry.keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn clones_share_state() {
        let registry = BoolRegistry::new();
        let clone = registry.clone();
        clone.register("net.ap.hide");

        assert!(registry.contains("net.ap.hide"));
        assert!(registry.same_session(&clone));
        assert!(!registry.same_session(&BoolRegistry::new()));
    }

    #[test]
    fn concurrent_registration_keeps_every_key() {
        let registry = BoolRegistry::new();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        registry.register(format!("k{t}.{i}"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("registration thread panicked");
        }

        assert_eq!(registry.len(), 200);
    }
}
