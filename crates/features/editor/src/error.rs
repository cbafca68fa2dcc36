use c3dp_codec::CodecError;
use c3dp_derive::c3dp_error;
use std::borrow::Cow;

/// Error types specific to the config editing session.
#[c3dp_error]
pub enum EditorError {
    /// The codec rejected the tree or its configuration.
    #[error("Codec error{}: {source}", format_context(.context))]
    Codec { source: CodecError, context: Option<Cow<'static, str>> },

    /// The flat map could not be rendered as the save payload.
    #[error("Serde serialization error{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// `load` or `save` was called before the device config arrived.
    #[error("Config session is not initialized{}", format_context(.context))]
    NotInitialized { context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal editor error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_in_parentheses() {
        let err: Result<(), EditorError> = Err(EditorError::NotInitialized { context: None });
        let err = err.context("save").unwrap_err();
        assert_eq!(err.to_string(), "Config session is not initialized (save)");
    }

    #[test]
    fn codec_errors_convert() {
        let source = CodecError::InvalidConfiguration { message: "bad".into(), context: None };
        let err = EditorError::from(source);
        assert!(matches!(err, EditorError::Codec { context: None, .. }));
        assert!(err.to_string().starts_with("Codec error: "));
    }
}
