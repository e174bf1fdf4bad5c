use pack_codec::CodecError;
use pack_stream::StreamError;
use thiserror::Error;

use crate::TypeName;

/// Everything a pack or unpack call can fail with.
#[derive(Debug, Error)]
pub enum PackError {
    /// Unrecognized option key, invalid enum value, or a call shape that
    /// cannot be resolved (e.g. reading without any target type)
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no packer `{name}` for type {type_name}")]
    UnknownPacker { type_name: TypeName, name: String },

    /// The named packer exists, but only outside the requested type's lineage
    #[error("packer `{name}` is not available to {type_name} (registered on {owners:?})")]
    ScopeViolation {
        type_name: TypeName,
        name: String,
        owners: Vec<TypeName>,
    },

    /// A bare packer name matched more than one owning type
    #[error("packer `{name}` is registered on several types: {owners:?}")]
    AmbiguousPacker { name: String, owners: Vec<TypeName> },

    #[error("unknown type {0}")]
    UnknownType(TypeName),

    #[error("type {name} already declared with parent {existing:?}, not {requested}")]
    TypeConflict {
        name: TypeName,
        existing: Option<TypeName>,
        requested: TypeName,
    },

    #[error("expected a value of type {expected}, found {found}")]
    TypeMismatch { expected: TypeName, found: TypeName },

    #[error("unexpected end of stream: needed {needed} bytes, {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// Raised by read strategies that find bytes they cannot interpret
    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("codec error: {0}")]
    Codec(CodecError),

    #[error("stream error: {0}")]
    Stream(StreamError),
}

impl From<StreamError> for PackError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::UnexpectedEof { needed, available } => {
                PackError::UnexpectedEof { needed, available }
            }
            other => PackError::Stream(other),
        }
    }
}

impl From<CodecError> for PackError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::UnknownKey(_) | CodecError::InvalidOption { .. } => {
                PackError::InvalidOption(err.to_string())
            }
            other => PackError::Codec(other),
        }
    }
}
