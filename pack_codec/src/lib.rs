//! # pack_codec
//!
//! Primitive codecs for the packing engine: integers of any width, IEEE-754
//! floats and fixed or variable byte strings, each driven by a
//! [`CodecOptions`] set.
//!
//! ```rust
//! use pack_codec::{integer, CodecOptions, Endian, Integer};
//!
//! let options = CodecOptions::new().with_bytes(3).with_endian(Endian::Little);
//! let raw = integer::encode(&Integer::from(258), &options).unwrap();
//! assert_eq!(raw, [2, 1, 0]);
//!
//! let back = integer::decode(&raw, &options.with_signed(false)).unwrap();
//! assert_eq!(back, Integer::from(258));
//! ```
//!
//! Widths beyond a machine word need no special handling:
//!
//! ```rust
//! use pack_codec::{integer, CodecOptions, Integer};
//!
//! let big = Integer::from(42u8) * Integer::from(u64::MAX) * Integer::from(u64::MAX);
//! let options = CodecOptions::new().with_bytes(17).with_signed(false);
//! let raw = integer::encode(&big, &options).unwrap();
//! assert_eq!(integer::decode(&raw, &options).unwrap(), big);
//! ```

pub mod error;
pub mod float;
pub mod integer;
pub mod options;
pub mod string;

pub use error::CodecError;
pub use malachite::Integer;
pub use options::{CodecOptions, Endian, OptionValue, Precision};

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
