use pack_stream::Stream;

use crate::normalize::ResolvedEntry;
use crate::{Engine, Result, Session, Value};

/// Lazy repeated decode with one pre-resolved entry.
///
/// Yields values until the stream reports end of data. The first error is
/// yielded and ends the sequence. Only seekable streams can be replayed, via
/// [`PackedIter::rewind`].
pub struct PackedIter<'s> {
    engine: &'s Engine,
    stream: &'s mut Stream,
    entry: ResolvedEntry<'static>,
    start: u64,
    done: bool,
}

impl<'s> PackedIter<'s> {
    pub(crate) fn new(engine: &'s Engine, stream: &'s mut Stream, entry: ResolvedEntry<'static>) -> Self {
        let start = stream.position();
        PackedIter {
            engine,
            stream,
            entry,
            start,
            done: false,
        }
    }

    /// Moves back to where the sequence started.
    ///
    /// # Errors
    ///
    /// [`crate::PackError::Stream`] wrapping `NotSeekable` on forward-only
    /// streams; the sequence cannot be restarted there.
    pub fn rewind(&mut self) -> Result<()> {
        self.stream.seek(self.start)?;
        self.done = false;
        Ok(())
    }
}

impl Iterator for PackedIter<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.is_eof() {
            Ok(false) => {}
            Ok(true) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        }

        let mut session = Session::new(self.engine, self.stream);
        let result = self.engine.read_entry(&mut session, &self.entry);
        self.done = result.is_err();
        Some(result)
    }
}
