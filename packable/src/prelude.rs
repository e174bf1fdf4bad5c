//! Convenience re-exports for common usage

pub use crate::{Chain, Engine, Packed, PackedIter, Session};
pub use crate::{Composite, TypeName, Unpacked, Value};
pub use crate::{Directive, OptionSet, Packer, Target};

// Codec options
pub use pack_codec::{CodecOptions, Endian, OptionValue, Precision};

// Streams
pub use pack_stream::Stream;

// Errors
pub use crate::{PackError, Result};
