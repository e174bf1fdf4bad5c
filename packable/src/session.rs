use pack_stream::Stream;

use crate::{Directive, Engine, Result, Value};

/// What a strategy runs against: the engine that resolved it and exclusive
/// access to the stream for the duration of the call.
///
/// Custom strategies either move raw bytes through the session or recurse
/// into [`Session::write_value`] / [`Session::read_value`] to reuse other
/// packers.
pub struct Session<'a> {
    engine: &'a Engine,
    stream: &'a mut Stream,
}

impl<'a> Session<'a> {
    pub(crate) fn new(engine: &'a Engine, stream: &'a mut Stream) -> Self {
        Session { engine, stream }
    }

    pub fn engine(&self) -> &Engine {
        self.engine
    }

    pub fn stream(&mut self) -> &mut Stream {
        self.stream
    }

    pub fn position(&self) -> u64 {
        self.stream.position()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write(bytes)?;
        Ok(())
    }

    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.stream.read_exact(n)?)
    }

    pub fn read_to_end(&mut self) -> Result<Vec<u8>> {
        Ok(self.stream.read_to_end()?)
    }

    /// Packs `value` with full resolution, returning the bytes written.
    pub fn write_value(&mut self, value: &Value, directive: impl Into<Directive>) -> Result<u64> {
        self.engine
            .pack_and_write(self.stream, std::slice::from_ref(value), [directive.into()])
    }

    pub fn read_value(&mut self, directive: impl Into<Directive>) -> Result<Value> {
        self.engine.read_value(self.stream, directive)
    }
}
