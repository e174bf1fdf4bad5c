//! # pack_stream
//!
//! Byte sinks and sources for the packing engine.
//!
//! A [`Stream`] wraps one [`Storage`] backend (an in-memory buffer, a file, or
//! a forward-only reader/writer), probes once whether it can seek, and keeps
//! track of its own position so that position deltas are meaningful even on
//! pipes and sockets.
//!
//! ```
//! use pack_stream::Stream;
//!
//! let mut stream = Stream::in_memory();
//! stream.write(b"abcd").unwrap();
//! assert_eq!(stream.position(), 4);
//!
//! stream.rewind().unwrap();
//! assert_eq!(stream.read_exact(2).unwrap(), b"ab");
//! ```

pub mod error;
pub mod storage;
pub mod stream;

pub use error::StreamError;
pub use storage::Storage;
pub use stream::Stream;

/// Result alias for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
