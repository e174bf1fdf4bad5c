//! Packers: named or default (write, read, default options) bundles owned by
//! a type, plus the per-call [`OptionSet`].

use std::fmt;
use std::sync::Arc;

use pack_codec::{CodecOptions, OptionValue};

use crate::{Result, Session, TypeName, Value};

/// Write strategy: encodes a value onto the session's stream.
pub type WriteFn = dyn Fn(&Value, &CodecOptions, &mut Session<'_>) -> Result<()> + Send + Sync;

/// Read strategy: decodes one value from the session's stream.
pub type ReadFn = dyn Fn(&mut Session<'_>, &CodecOptions) -> Result<Value> + Send + Sync;

pub type WriteStrategy = Arc<WriteFn>;
pub type ReadStrategy = Arc<ReadFn>;

/// Name under which the unnamed packer of a type can also be requested.
pub const DEFAULT_NAME: &str = "default";

/// A registered encoding strategy for one type.
///
/// Either strategy may be missing: a packer that only carries options (like
/// the `short` shortcut) borrows the strategies of the nearest default packer
/// in its owner's lineage.
pub struct Packer {
    owner: TypeName,
    name: Option<String>,
    write: Option<WriteStrategy>,
    read: Option<ReadStrategy>,
    defaults: CodecOptions,
}

impl Packer {
    /// Starts a packer for `owner`. It is the type's default unless
    /// [`PackerBuilder::named`] gives it a name.
    ///
    /// ```
    /// use packable::{CodecOptions, Packer, TypeName};
    ///
    /// let tiny = Packer::builder(TypeName::INTEGER)
    ///     .named("tiny")
    ///     .defaults(CodecOptions::new().with_bytes(1))
    ///     .build();
    /// assert_eq!(tiny.name(), Some("tiny"));
    /// assert!(tiny.write_strategy().is_none());
    ///
    /// let default = Packer::builder(TypeName::INTEGER).build();
    /// assert_eq!(default.name(), None);
    /// ```
    pub fn builder(owner: impl Into<TypeName>) -> PackerBuilder {
        PackerBuilder {
            packer: Packer {
                owner: owner.into(),
                name: None,
                write: None,
                read: None,
                defaults: CodecOptions::new(),
            },
        }
    }

    pub fn owner(&self) -> &TypeName {
        &self.owner
    }

    /// `None` for the default packer.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for logs and errors.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn write_strategy(&self) -> Option<&WriteStrategy> {
        self.write.as_ref()
    }

    pub fn read_strategy(&self) -> Option<&ReadStrategy> {
        self.read.as_ref()
    }

    pub fn defaults(&self) -> &CodecOptions {
        &self.defaults
    }
}

impl fmt::Debug for Packer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packer")
            .field("owner", &self.owner)
            .field("name", &self.label())
            .field("write", &self.write.is_some())
            .field("read", &self.read.is_some())
            .field("defaults", &self.defaults)
            .finish()
    }
}

pub struct PackerBuilder {
    packer: Packer,
}

impl PackerBuilder {
    /// Registers under `name` instead of as the type's default. The name
    /// `"default"` means the default.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.packer.name = (name != DEFAULT_NAME).then_some(name);
        self
    }

    pub fn write<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &CodecOptions, &mut Session<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let strategy: WriteStrategy = Arc::new(f);
        self.packer.write = Some(strategy);
        self
    }

    pub fn read<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Session<'_>, &CodecOptions) -> Result<Value> + Send + Sync + 'static,
    {
        let strategy: ReadStrategy = Arc::new(f);
        self.packer.read = Some(strategy);
        self
    }

    pub fn defaults(mut self, defaults: CodecOptions) -> Self {
        self.packer.defaults = defaults;
        self
    }

    pub fn build(self) -> Packer {
        self.packer
    }
}

/// Options for one entry of a call: codec options plus optional strategy
/// overrides that win over whatever packer gets resolved.
#[derive(Clone, Default)]
pub struct OptionSet {
    pub codec: CodecOptions,
    pub write_packed: Option<WriteStrategy>,
    pub read_packed: Option<ReadStrategy>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validated string-keyed mapping, e.g. `[("bytes", 3.into())]`.
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: AsRef<str>,
    {
        Ok(CodecOptions::from_pairs(pairs)?.into())
    }

    pub fn with_write_packed<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &CodecOptions, &mut Session<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let strategy: WriteStrategy = Arc::new(f);
        self.write_packed = Some(strategy);
        self
    }

    pub fn with_read_packed<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut Session<'_>, &CodecOptions) -> Result<Value> + Send + Sync + 'static,
    {
        let strategy: ReadStrategy = Arc::new(f);
        self.read_packed = Some(strategy);
        self
    }

    /// Packer defaults overlaid with these options; overrides are kept.
    pub(crate) fn over(&self, defaults: &CodecOptions) -> OptionSet {
        OptionSet {
            codec: defaults.merge(&self.codec),
            write_packed: self.write_packed.clone(),
            read_packed: self.read_packed.clone(),
        }
    }
}

impl From<CodecOptions> for OptionSet {
    fn from(codec: CodecOptions) -> Self {
        OptionSet {
            codec,
            ..Default::default()
        }
    }
}

impl fmt::Debug for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSet")
            .field("codec", &self.codec)
            .field("write_packed", &self.write_packed.is_some())
            .field("read_packed", &self.read_packed.is_some())
            .finish()
    }
}
