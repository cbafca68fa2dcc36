use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;

// --- Aliases ---

/// A nested configuration document.
pub type ConfigTree = Value;

/// The wire form of a [`ConfigTree`]: flat keys mapped to leaf values.
///
/// Insertion order is preserved, so flattening produces stable output.
pub type FlatMap = Map<String, Value>;

// --- Limits ---

/// Default nesting limit applied by [`crate::FlatCodec::flatten`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest sequence index accepted while unflattening.
///
/// Keys addressing a higher index of a sequence are dropped instead of
/// padding it with tens of thousands of `null`s. Indices landing in a
/// mapping are plain keys and are not limited.
pub const MAX_SEQUENCE_INDEX: usize = u16::MAX as usize;

/// Sequence slots (padding included) one unflatten call may allocate.
pub const MAX_SEQUENCE_SLOTS: usize = 1 << 18;

// --- Fake booleans ---

/// Wire spelling of `true`.
pub const FAKE_TRUE: &str = "1";

/// Wire spelling of `false`.
pub const FAKE_FALSE: &str = "0";

/// Returns the native boolean a wire value stands for, if it is a fake-boolean.
#[must_use]
pub fn parse_fake_bool(value: &Value) -> Option<bool> {
    match value.as_str()? {
        FAKE_TRUE => Some(true),
        FAKE_FALSE => Some(false),
        _ => None,
    }
}

/// Truthiness as the device front end sees it.
///
/// `null`, `false`, zero and the empty string are falsy; every other value,
/// empty containers included, is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Returns the wire spelling of a boolean.
#[must_use]
pub fn fake_bool(value: bool) -> Value {
    Value::String(if value { FAKE_TRUE } else { FAKE_FALSE }.to_owned())
}

// --- Keys ---

/// One step of a [`FlatKey`] path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key, written `.key` (or bare at the start of the path).
    Key(String),
    /// Sequence index, written `[i]`.
    Index(usize),
}

impl Segment {
    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

/// A path addressing one leaf of a [`ConfigTree`], e.g. `web.path[2].name`.
///
/// The empty key addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatKey(String);

impl FlatKey {
    /// The key of the root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the key of a mapping child.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        if self.0.is_empty() { Self(key.to_owned()) } else { Self(format!("{}.{key}", self.0)) }
    }

    /// Returns the key of a sequence element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Tokenizes the key into path segments.
    ///
    /// Scans left to right for either a name (optionally preceded by one `.`)
    /// made of anything but `.`, `[` and `]`, or a decimal index in brackets.
    /// Characters matching neither are skipped, so `a..b` reads as `a`, `b`
    /// and `a[x]` as `a`, `x`.
    ///
    /// Returns `None` when an index does not fit in a `usize`.
    #[must_use]
    pub fn segments(&self) -> Option<Vec<Segment>> {
        tokenize(&self.0)
    }
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FlatKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FlatKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for FlatKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for FlatKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<FlatKey> for String {
    fn from(key: FlatKey) -> Self {
        key.0
    }
}

const fn is_name_char(c: char) -> bool {
    !matches!(c, '.' | '[' | ']')
}

fn tokenize(key: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = key;

    while let Some(first) = rest.chars().next() {
        let after_dot = rest.strip_prefix('.').unwrap_or(rest);
        let name_len = after_dot.find(|c| !is_name_char(c)).unwrap_or(after_dot.len());
        if name_len > 0 {
            segments.push(Segment::Key(after_dot[..name_len].to_owned()));
            rest = &after_dot[name_len..];
            continue;
        }

        if let Some(inner) = rest.strip_prefix('[') {
            let digits = inner.find(|c: char| !c.is_ascii_digit()).unwrap_or(inner.len());
            if digits > 0 && inner[digits..].starts_with(']') {
                segments.push(Segment::Index(inner[..digits].parse().ok()?));
                rest = &inner[digits + 1..];
                continue;
            }
        }

        rest = &rest[first.len_utf8()..];
    }

    Some(segments)
}
