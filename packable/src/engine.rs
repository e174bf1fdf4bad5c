use std::sync::Arc;

use pack_stream::Stream;
use tracing::trace;

use crate::normalize::{self, ResolvedEntry};
use crate::{
    Chain, Directive, PackError, Packed, PackedIter, Packer, Registry, Result, Session, TypeName,
    Unpacked, Value,
};

/// Packer registry plus the pack and unpack entry points.
///
/// Engines are independent of each other; the process-wide one is reached
/// through [`crate::global`].
///
/// ```
/// use packable::{Directive, Engine, Value};
///
/// let engine = Engine::new();
/// let bytes = engine.pack(&[Value::from(6), Value::from("abcd")], []).unwrap();
/// assert_eq!(bytes, b"\x00\x00\x00\x06abcd");
///
/// let back = engine.unpack_value(&bytes, "unsigned_long").unwrap();
/// assert_eq!(back, Some(Value::from(6)));
/// ```
pub struct Engine {
    registry: Registry,
}

impl Engine {
    /// An engine with the primitive types and their shortcuts installed.
    pub fn new() -> Self {
        let registry = Registry::new();
        crate::builtins::install(&registry);
        Engine { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn declare_type(&self, name: impl Into<TypeName>, parent: impl Into<TypeName>) -> Result<()> {
        self.registry.declare_type(name, parent)
    }

    pub fn register_packer(&self, packer: Packer) -> Result<Arc<Packer>> {
        self.registry.register(packer)
    }

    /// Writes `values` in order and returns the change in stream position.
    ///
    /// The change is the end position minus the start position, not a byte
    /// count. A strategy that leaves the stream before where packing started
    /// makes this 0.
    ///
    /// Every entry is resolved before the first byte is written, so a bad
    /// directive leaves the stream untouched.
    pub fn pack_and_write<I>(&self, stream: &mut Stream, values: &[Value], directives: I) -> Result<u64>
    where
        I: IntoIterator<Item = Directive>,
    {
        let entries = normalize::write_entries(&self.registry, values, directives)?;
        self.write_entries(stream, &entries)
    }

    fn write_entries(&self, stream: &mut Stream, entries: &[ResolvedEntry<'_>]) -> Result<u64> {
        stream.pos_change(|stream| {
            let mut session = Session::new(self, stream);
            for entry in entries {
                let start = session.position();
                entry.write(&mut session)?;
                trace!(
                    type_name = %entry.type_name,
                    packer = entry.packer.label(),
                    bytes = session.position().saturating_sub(start),
                    "packed entry"
                );
            }
            Ok(())
        })
    }

    /// Packs one value onto `stream`.
    pub fn write_value(&self, stream: &mut Stream, value: &Value, directive: impl Into<Directive>) -> Result<u64> {
        self.pack_and_write(stream, std::slice::from_ref(value), [directive.into()])
    }

    /// Packs `values` into a fresh buffer.
    pub fn pack<I>(&self, values: &[Value], directives: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = Directive>,
    {
        let mut stream = Stream::in_memory();
        self.pack_and_write(&mut stream, values, directives)?;
        into_buffer(stream)
    }

    pub fn pack_value(&self, value: &Value, directive: impl Into<Directive>) -> Result<Vec<u8>> {
        self.pack(std::slice::from_ref(value), [directive.into()])
    }

    /// Decodes one value per directive, in order.
    pub fn read_entries<I>(&self, stream: &mut Stream, directives: I) -> Result<Vec<Value>>
    where
        I: IntoIterator<Item = Directive>,
    {
        let entries = normalize::read_entries(&self.registry, directives)?;
        let mut session = Session::new(self, stream);
        entries
            .iter()
            .map(|entry| self.read_entry(&mut session, entry))
            .collect()
    }

    pub(crate) fn read_entry(&self, session: &mut Session<'_>, entry: &ResolvedEntry<'_>) -> Result<Value> {
        let start = session.position();
        let value = entry.read(session)?;
        trace!(
            type_name = %entry.type_name,
            packer = entry.packer.label(),
            bytes = session.position().saturating_sub(start),
            "unpacked entry"
        );
        Ok(value)
    }

    /// Like [`Engine::read_entries`], but a single directive yields the
    /// value itself rather than a one-element list.
    pub fn read_with_packing<I>(&self, stream: &mut Stream, directives: I) -> Result<Unpacked>
    where
        I: IntoIterator<Item = Directive>,
    {
        let mut values = self.read_entries(stream, directives)?;
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Ok(Unpacked::One(value));
            }
        }
        Ok(Unpacked::Many(values))
    }

    pub fn read_value(&self, stream: &mut Stream, directive: impl Into<Directive>) -> Result<Value> {
        let entry = normalize::resolve_read(&self.registry, directive.into())?;
        let mut session = Session::new(self, stream);
        self.read_entry(&mut session, &entry)
    }

    /// Best-effort decode of an in-memory buffer.
    ///
    /// A buffer too short for the requested layout gives `Ok(None)` instead
    /// of [`PackError::UnexpectedEof`]; every other failure is returned.
    /// Bytes past the decoded layout are ignored.
    pub fn unpack<I>(&self, bytes: &[u8], directives: I) -> Result<Option<Unpacked>>
    where
        I: IntoIterator<Item = Directive>,
    {
        let mut stream = Stream::from_bytes(bytes.to_vec());
        absent_on_eof(self.read_with_packing(&mut stream, directives))
    }

    pub fn unpack_value(&self, bytes: &[u8], directive: impl Into<Directive>) -> Result<Option<Value>> {
        let mut stream = Stream::from_bytes(bytes.to_vec());
        absent_on_eof(self.read_value(&mut stream, directive))
    }

    /// Lazily decodes values with the same directive until the stream ends.
    pub fn each_packed<'s>(&'s self, stream: &'s mut Stream, directive: impl Into<Directive>) -> Result<PackedIter<'s>> {
        let entry = normalize::resolve_read(&self.registry, directive.into())?;
        Ok(PackedIter::new(self, stream, entry))
    }

    /// Read accumulator over `stream`.
    pub fn chain<'s>(&'s self, stream: &'s mut Stream) -> Chain<'s> {
        Chain::new(self, stream)
    }

    /// Write accumulator over `stream`.
    pub fn packed<'s>(&'s self, stream: &'s mut Stream) -> Packed<'s> {
        Packed::new(self, stream)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn into_buffer(stream: Stream) -> Result<Vec<u8>> {
    stream
        .into_bytes()
        .ok_or_else(|| PackError::Malformed("in-memory stream lost its buffer".into()))
}

fn absent_on_eof<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(PackError::UnexpectedEof { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
