//! # Config Editor
//!
//! Editing session for a Cloud3DP device configuration.
//!
//! The device reports its settings as flat JSON. A [`ConfigSession`] keeps
//! the normalized copy of that report as its baseline, hands out nested
//! trees for editing, and on save decides whether anything changed. A change
//! produces a [`ConfigUpdate`] describing the `POST /config` request (form
//! field `json`) that writes the new flat map back, plus a [`ConfigDiff`] of
//! the affected keys.
//!
//! Transport is not handled here.

mod diff;
mod error;
mod session;
mod update;

pub use crate::diff::ConfigDiff;
pub use crate::error::{EditorError, EditorErrorExt};
pub use crate::session::ConfigSession;
pub use crate::update::{
    ConfigUpdate, NO_CHANGES, SAVE_FIELD, SAVE_METHOD, SAVE_PATH, SaveOutcome,
};
