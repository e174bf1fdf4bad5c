//! Accumulators for step-by-step reads and writes on one stream.

use pack_stream::Stream;

use crate::{Directive, Engine, Result, Value};

/// Reads values one directive at a time and keeps them in order.
///
/// ```
/// use packable::{Engine, Stream, TypeName, Value};
///
/// let engine = Engine::new();
/// let mut stream = Stream::from_bytes(b"\x00\x2aok".to_vec());
/// let values = engine
///     .chain(&mut stream)
///     .read("unsigned_short")?
///     .read(TypeName::STRING)?
///     .finish();
/// assert_eq!(values, [Value::from(42), Value::from("ok")]);
/// # Ok::<(), packable::PackError>(())
/// ```
pub struct Chain<'s> {
    engine: &'s Engine,
    stream: &'s mut Stream,
    values: Vec<Value>,
}

impl<'s> Chain<'s> {
    pub(crate) fn new(engine: &'s Engine, stream: &'s mut Stream) -> Self {
        Chain {
            engine,
            stream,
            values: Vec::new(),
        }
    }

    pub fn read(mut self, directive: impl Into<Directive>) -> Result<Self> {
        let value = self.engine.read_value(self.stream, directive)?;
        self.values.push(value);
        Ok(self)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn finish(self) -> Vec<Value> {
        self.values
    }
}

/// Writes values one at a time and tracks the total position change.
pub struct Packed<'s> {
    engine: &'s Engine,
    stream: &'s mut Stream,
    written: u64,
}

impl<'s> Packed<'s> {
    pub(crate) fn new(engine: &'s Engine, stream: &'s mut Stream) -> Self {
        Packed {
            engine,
            stream,
            written: 0,
        }
    }

    pub fn write(mut self, value: impl Into<Value>, directive: impl Into<Directive>) -> Result<Self> {
        let value = value.into();
        self.written += self.engine.write_value(self.stream, &value, directive)?;
        Ok(self)
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Total bytes written through this accumulator.
    pub fn finish(self) -> u64 {
        self.written
    }
}
