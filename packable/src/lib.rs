//! # Packable
//!
//! Binary packing driven by a registry of per-type packers.
//!
//! ## Features
//!
//! - **Scoped packers**: default and named packers per type, inherited along
//!   an explicit parent chain and shadowed by more specific registrations
//! - **Primitive codecs**: arbitrary-precision integers, IEEE-754 floats,
//!   fixed or variable width byte strings
//! - **Flexible call shapes**: bare types, shortcut names, option sets, or
//!   any of those paired with options, applied to values in lockstep
//! - **Stream integration**: position deltas, lazy repeated decode, and
//!   read/write accumulators over any [`Stream`]
//!
//! ## Quick Start
//!
//! ```rust
//! use packable::prelude::*;
//!
//! let engine = Engine::new();
//!
//! // 6 as a default integer, then a three byte string padded with fill
//! let flv = CodecOptions::new().with_bytes(3).with_fill("FLV");
//! let bytes = engine
//!     .pack(&[Value::from(6), Value::from("x")], [Directive::Default, flv.into()])
//!     .unwrap();
//! assert_eq!(bytes, b"\x00\x00\x00\x06xFL");
//!
//! let back = engine
//!     .unpack(&bytes, [Directive::from("unsigned_long"), (TypeName::STRING, CodecOptions::new().with_bytes(3)).into()])
//!     .unwrap();
//! assert_eq!(
//!     back,
//!     Some(Unpacked::Many(vec![Value::from(6), Value::from("xFL")]))
//! );
//!
//! // Too little data in memory is absent rather than an error
//! assert_eq!(engine.unpack_value(&[0, 0], "long").unwrap(), None);
//! ```

mod builtins;
pub mod chain;
pub mod engine;
pub mod error;
pub mod iter;
pub mod normalize;
pub mod packer;
pub mod prelude;
pub mod registry;
pub mod session;
pub mod value;

use std::sync::{Arc, LazyLock};

pub use crate::chain::{Chain, Packed};
pub use crate::engine::Engine;
pub use crate::error::PackError;
pub use crate::iter::PackedIter;
pub use crate::normalize::{Directive, ResolvedEntry, Target};
pub use crate::packer::{OptionSet, Packer, PackerBuilder, ReadFn, ReadStrategy, WriteFn, WriteStrategy};
pub use crate::registry::Registry;
pub use crate::session::Session;
pub use crate::value::{Composite, TypeName, Unpacked, Value};

// Re-export codec and stream types
pub use pack_codec::{CodecError, CodecOptions, Endian, Integer, OptionValue, Precision};
pub use pack_stream::{Storage, Stream, StreamError};

/// Result alias for packing operations.
pub type Result<T> = std::result::Result<T, PackError>;

static GLOBAL: LazyLock<Engine> = LazyLock::new(Engine::new);

/// The process-wide engine used by the free functions below.
pub fn global() -> &'static Engine {
    &GLOBAL
}

/// Packs `values` with the process-wide engine.
pub fn pack<I>(values: &[Value], directives: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = Directive>,
{
    global().pack(values, directives)
}

/// Best-effort decode with the process-wide engine; see [`Engine::unpack`].
pub fn unpack<I>(bytes: &[u8], directives: I) -> Result<Option<Unpacked>>
where
    I: IntoIterator<Item = Directive>,
{
    global().unpack(bytes, directives)
}

pub fn register_packer(packer: Packer) -> Result<Arc<Packer>> {
    global().register_packer(packer)
}

pub fn declare_type(name: impl Into<TypeName>, parent: impl Into<TypeName>) -> Result<()> {
    global().declare_type(name, parent)
}
