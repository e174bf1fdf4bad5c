use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unrecognized option `{0}`")]
    UnknownKey(String),

    #[error("invalid value for option `{key}`: {reason}")]
    InvalidOption { key: &'static str, reason: String },

    #[error("expected {expected} encoded bytes, found {found}")]
    WidthMismatch { expected: usize, found: usize },
}

impl CodecError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        CodecError::InvalidOption {
            key,
            reason: reason.into(),
        }
    }
}
