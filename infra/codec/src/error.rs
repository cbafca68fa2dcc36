//! # Codec Errors
//!
//! This module defines the [`CodecError`] enum used throughout the codec crate
//! for reporting structural, configuration, and serialization failures.
//!
//! Malformed flat keys are deliberately absent: unflattening drops them
//! instead of failing.

use c3dp_derive::c3dp_error;
use std::borrow::Cow;

/// A specialized [`CodecError`] enum for codec failures.
#[c3dp_error]
pub enum CodecError {
    /// The tree nests deeper than the configured limit.
    ///
    /// Owned trees cannot contain reference cycles, so an unbounded nesting
    /// depth is how a self-referential document shows up here.
    #[error(
        "Cyclic structure{}: nesting exceeds {max_depth} levels at `{path}`",
        format_context(.context)
    )]
    CyclicStructure { path: String, max_depth: usize, context: Option<Cow<'static, str>> },

    /// Failure when the codec or builder is incorrectly configured.
    #[error("Invalid configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Failure while converting a typed value to or from a [`serde_json::Value`].
    #[error("Serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal codec error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_in_display() {
        let err: Result<(), CodecError> =
            Err(CodecError::InvalidConfiguration { message: "bad".into(), context: None });
        let err = err.context("building codec").unwrap_err();

        assert_eq!(err.to_string(), "Invalid configuration (building codec): bad");
    }

    #[test]
    fn serde_errors_convert_with_context() {
        let raw: Result<serde_json::Value, serde_json::Error> = serde_json::from_str("{");
        let err = raw.context("parsing flat map").unwrap_err();

        assert!(matches!(err, CodecError::Serialization { context: Some(_), .. }));
    }

    #[test]
    fn strings_fall_back_to_internal() {
        let err = CodecError::from("unexpected");
        assert!(matches!(err, CodecError::Internal { .. }));
        assert_eq!(err.to_string(), "Internal codec error: unexpected");
    }
}
