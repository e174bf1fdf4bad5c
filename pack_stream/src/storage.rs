use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use crate::{Result, StreamError};

/// The low-level backend a [`Stream`](crate::Stream) reads from and writes to.
///
/// - `InMemory` and regular `File`s can seek
/// - `Reader` and `Writer` are forward-only (pipes, sockets, stdin/stdout)
pub enum Storage {
    /// Growable in-memory buffer
    InMemory(Cursor<Vec<u8>>),

    /// File handle; seekable only when it refers to a regular file
    File(File),

    /// Forward-only byte source
    Reader(Box<dyn Read + Send>),

    /// Forward-only byte sink
    Writer(Box<dyn Write + Send>),
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Storage::InMemory(c) => f
                .debug_struct("InMemory")
                .field("len", &c.get_ref().len())
                .field("position", &c.position())
                .finish(),
            Storage::File(file) => f.debug_tuple("File").field(file).finish(),
            Storage::Reader(_) => f.write_str("Reader"),
            Storage::Writer(_) => f.write_str("Writer"),
        }
    }
}

impl Storage {
    /// Create an empty in-memory buffer
    pub fn new_in_memory() -> Self {
        Storage::InMemory(Cursor::new(Vec::new()))
    }

    /// Wrap existing bytes; reading starts at offset 0
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Storage::InMemory(Cursor::new(bytes))
    }

    /// Check whether this backend can be repositioned without errors.
    ///
    /// Files are asked for their metadata: only regular files qualify, since
    /// seeking a FIFO or a character device fails at runtime.
    pub fn probe_seekable(&self) -> bool {
        match self {
            Storage::InMemory(_) => true,
            Storage::File(file) => file.metadata().map(|m| m.is_file()).unwrap_or(false),
            Storage::Reader(_) | Storage::Writer(_) => false,
        }
    }

    /// Current offset reported by the backend itself, when it has one
    pub(crate) fn offset(&mut self) -> Option<u64> {
        match self {
            Storage::InMemory(c) => Some(c.position()),
            Storage::File(file) => file.stream_position().ok(),
            Storage::Reader(_) | Storage::Writer(_) => None,
        }
    }

    /// Total length of the backing data, when known
    pub(crate) fn len(&self) -> Option<u64> {
        match self {
            Storage::InMemory(c) => Some(c.get_ref().len() as u64),
            Storage::File(file) => file.metadata().ok().map(|m| m.len()),
            Storage::Reader(_) | Storage::Writer(_) => None,
        }
    }

    /// Read up to `buf.len()` bytes, returning 0 at end of data
    pub(crate) fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            let res = match self {
                Storage::InMemory(c) => c.read(buf),
                Storage::File(file) => file.read(buf),
                Storage::Reader(r) => r.read(buf),
                Storage::Writer(_) => {
                    return Err(StreamError::Unsupported("cannot read from a write-only stream"));
                }
            };
            match res {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub(crate) fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Storage::InMemory(c) => c.write_all(bytes)?,
            Storage::File(file) => file.write_all(bytes)?,
            Storage::Writer(w) => w.write_all(bytes)?,
            Storage::Reader(_) => {
                return Err(StreamError::Unsupported("cannot write to a read-only stream"));
            }
        }
        Ok(())
    }

    pub(crate) fn seek(&mut self, pos: u64) -> Result<u64> {
        match self {
            Storage::InMemory(c) => Ok(c.seek(SeekFrom::Start(pos))?),
            Storage::File(file) => Ok(file.seek(SeekFrom::Start(pos))?),
            Storage::Reader(_) | Storage::Writer(_) => Err(StreamError::NotSeekable),
        }
    }

    pub(crate) fn flush(&mut self) -> Result<()> {
        match self {
            Storage::InMemory(_) | Storage::Reader(_) => {}
            Storage::File(file) => file.flush()?,
            Storage::Writer(w) => w.flush()?,
        }
        Ok(())
    }

    /// Take the buffer out of an in-memory backend
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Storage::InMemory(c) => Some(c.into_inner()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_in_memory_and_boxed() {
        assert!(Storage::new_in_memory().probe_seekable());
        assert!(!Storage::Reader(Box::new(std::io::empty())).probe_seekable());
        assert!(!Storage::Writer(Box::new(std::io::sink())).probe_seekable());
    }

    #[test]
    fn test_wrong_direction_is_unsupported() {
        let mut reader = Storage::Reader(Box::new(std::io::empty()));
        assert!(matches!(
            reader.write_all(b"x"),
            Err(StreamError::Unsupported(_))
        ));

        let mut writer = Storage::Writer(Box::new(std::io::sink()));
        let mut buf = [0u8; 1];
        assert!(matches!(writer.read(&mut buf), Err(StreamError::Unsupported(_))));
        assert!(matches!(writer.seek(0), Err(StreamError::NotSeekable)));
    }

    #[test]
    fn test_in_memory_overwrites_in_place() {
        let mut storage = Storage::from_bytes(b"hello".to_vec());
        storage.seek(1).unwrap();
        storage.write_all(b"EL").unwrap();
        assert_eq!(storage.len(), Some(5));
        assert_eq!(storage.into_bytes().unwrap(), b"hELlo");
    }
}
