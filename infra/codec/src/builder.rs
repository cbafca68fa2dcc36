use crate::engine::FlatCodec;
use crate::error::CodecError;
use crate::registry::BoolRegistry;
use crate::types::DEFAULT_MAX_DEPTH;

/// A builder for [`FlatCodec`].
///
/// Without an explicit [`FlatCodecBuilder::registry`] the codec starts a
/// fresh, empty [`BoolRegistry`] of its own.
#[derive(Debug)]
pub struct FlatCodecBuilder {
    registry: Option<BoolRegistry>,
    max_depth: usize,
}

impl Default for FlatCodecBuilder {
    fn default() -> Self {
        Self { registry: None, max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl FlatCodecBuilder {
    /// Creates a new builder with the default depth limit.
    #[must_use = "Builder must be finalized with `build` before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares an existing registry with the codec.
    ///
    /// Codecs built from clones of the same registry observe each other's
    /// fake-boolean registrations.
    #[must_use]
    pub fn registry(mut self, registry: BoolRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Limits how deep [`FlatCodec::flatten`] descends before reporting
    /// [`CodecError::CyclicStructure`].
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Finalizes codec construction.
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidConfiguration`] if the depth limit is zero.
    pub fn build(self) -> Result<FlatCodec, CodecError> {
        if self.max_depth == 0 {
            return Err(CodecError::InvalidConfiguration {
                message: "max_depth must be greater than zero".into(),
                context: None,
            });
        }

        Ok(FlatCodec::from_parts(self.registry.unwrap_or_default(), self.max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_depth_is_rejected() {
        let err = FlatCodecBuilder::new().max_depth(0).build().unwrap_err();
        assert!(matches!(err, CodecError::InvalidConfiguration { .. }));
    }

    #[test]
    fn injected_registry_is_shared() {
        let registry = BoolRegistry::new();
        let codec = FlatCodecBuilder::new().registry(registry.clone()).build().unwrap();

        assert!(codec.registry().same_session(&registry));
        assert_eq!(codec.max_depth(), DEFAULT_MAX_DEPTH);
    }
}
