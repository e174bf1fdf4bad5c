use std::fs::File;
use std::io::{Read, Write};

use bytemuck::Pod;
use tracing::{debug, trace};

use crate::{Result, Storage, StreamError};

const CHUNK: usize = 8 * 1024;

/// Position-tracking adapter over a [`Storage`] backend.
///
/// Seekability is probed once, when the stream is built, and never changes
/// afterwards. The position is counted by the adapter itself, so forward-only
/// backends report exact offsets too.
///
/// # Examples
///
/// ```
/// use pack_stream::{Stream, StreamError};
///
/// let mut stream = Stream::from_bytes(b"\x00\x06ab".to_vec());
/// assert!(stream.is_seekable());
///
/// assert_eq!(stream.read_exact(2).unwrap(), [0, 6]);
/// assert!(matches!(
///     stream.read_exact(3),
///     Err(StreamError::UnexpectedEof { needed: 3, available: 2 })
/// ));
///
/// // A failed read leaves a seekable stream where it was
/// assert_eq!(stream.position(), 2);
/// assert_eq!(stream.read_to_end().unwrap(), b"ab");
/// ```
#[derive(Debug)]
pub struct Stream {
    storage: Storage,
    pos: u64,
    seekable: bool,
    // lookahead used by `is_eof` on forward-only sources
    peeked: Option<u8>,
}

impl Stream {
    /// Wraps a backend, probing its capabilities once.
    pub fn new(mut storage: Storage) -> Self {
        let seekable = storage.probe_seekable();
        let pos = if seekable {
            storage.offset().unwrap_or(0)
        } else {
            0
        };
        debug!(?storage, seekable, pos, "opened stream");
        Stream {
            storage,
            pos,
            seekable,
            peeked: None,
        }
    }

    /// Empty in-memory sink.
    pub fn in_memory() -> Self {
        Self::new(Storage::new_in_memory())
    }

    /// In-memory source positioned at the first byte.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Storage::from_bytes(bytes.into()))
    }

    /// File backend, positioned at the file's current offset.
    ///
    /// A file opened in append mode reports the offset it was opened with
    /// (0) even though every write lands at the end. Call
    /// `file.seek(SeekFrom::End(0))` before wrapping it so positions and
    /// write deltas match the bytes on disk.
    pub fn from_file(file: File) -> Self {
        Self::new(Storage::File(file))
    }

    /// Forward-only source, e.g. a pipe or a socket.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::new(Storage::Reader(Box::new(reader)))
    }

    /// Forward-only sink.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::new(Storage::Writer(Box::new(writer)))
    }

    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    /// Bytes consumed or produced since offset 0 (or since the backend's
    /// initial offset for files opened mid-way).
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Moves to an absolute offset. Fails with [`StreamError::NotSeekable`]
    /// on forward-only streams.
    pub fn seek(&mut self, pos: u64) -> Result<()> {
        if !self.seekable {
            return Err(StreamError::NotSeekable);
        }
        self.pos = self.storage.seek(pos)?;
        self.peeked = None;
        trace!(pos = self.pos, "seek");
        Ok(())
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.seek(0)
    }

    /// Reads exactly `n` bytes.
    ///
    /// # Errors
    ///
    /// [`StreamError::UnexpectedEof`] when the source is exhausted first. A
    /// seekable stream is moved back to where the read started; a forward-only
    /// stream has consumed whatever was available.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        // sources of known length fail before anything is allocated
        if let Some(left) = self.remaining() {
            if left < n as u64 {
                return Err(StreamError::UnexpectedEof {
                    needed: n,
                    available: usize::try_from(left).unwrap_or(n),
                });
            }
        }

        let start = self.pos;
        let mut buf = Vec::with_capacity(n.min(CHUNK));
        let mut chunk = vec![0u8; n.min(CHUNK)];
        while buf.len() < n {
            let want = (n - buf.len()).min(chunk.len());
            let got = self.fill(&mut chunk[..want])?;
            buf.extend_from_slice(&chunk[..got]);
            if got < want {
                break;
            }
        }
        if buf.len() < n {
            if self.seekable {
                self.seek(start)?;
            }
            return Err(StreamError::UnexpectedEof {
                needed: n,
                available: buf.len(),
            });
        }
        Ok(buf)
    }

    /// Reads everything up to the end of the source.
    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = vec![0u8; CHUNK];
        loop {
            let n = self.fill(&mut chunk)?;
            out.extend_from_slice(&chunk[..n]);
            if n < chunk.len() {
                return Ok(out);
            }
        }
    }

    /// Writes all of `bytes`, returning the count written.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.storage.write_all(bytes)?;
        self.pos += bytes.len() as u64;
        Ok(bytes.len())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.storage.flush()
    }

    /// Whether the source has no more data.
    ///
    /// Forward-only sources are probed by reading one byte ahead; that byte
    /// is handed back by the next read.
    pub fn is_eof(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(false);
        }
        if self.seekable {
            if let Some(len) = self.storage.len() {
                return Ok(self.pos >= len);
            }
        }
        let mut one = [0u8; 1];
        if self.storage.read(&mut one)? == 0 {
            return Ok(true);
        }
        self.peeked = Some(one[0]);
        Ok(false)
    }

    /// Bytes left before the end, when the backend knows its length.
    pub fn remaining(&self) -> Option<u64> {
        if !self.seekable {
            return None;
        }
        self.storage.len().map(|len| len.saturating_sub(self.pos))
    }

    /// Returns the change in position caused by `f`.
    ///
    /// A closure that rewinds past the starting point reports 0.
    pub fn pos_change<E, F>(&mut self, f: F) -> std::result::Result<u64, E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        let start = self.pos;
        f(self)?;
        Ok(self.pos.saturating_sub(start))
    }

    /// Writes the raw in-memory bytes of a plain-old-data value.
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> Result<usize> {
        self.write(bytemuck::bytes_of(value))
    }

    /// Reads a plain-old-data value from its raw in-memory bytes.
    pub fn read_pod<T: Pod>(&mut self) -> Result<T> {
        let bytes = self.read_exact(std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(&bytes))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Takes the buffer out of an in-memory stream.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.storage.into_bytes()
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        if !buf.is_empty() {
            if let Some(b) = self.peeked.take() {
                buf[0] = b;
                filled = 1;
            }
        }
        while filled < buf.len() {
            let n = self.storage.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.pos += filled as u64;
        Ok(filled)
    }
}
