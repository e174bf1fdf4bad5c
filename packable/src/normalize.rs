//! Turning call arguments into resolved entries.
//!
//! Each positional value (or, when reading, each requested target) comes with
//! one [`Directive`]. Normalization picks the type, resolves the packer,
//! overlays the explicit options on the packer's defaults and fixes the
//! strategy that will run, all before any byte moves.

use std::fmt;
use std::sync::Arc;

use pack_codec::CodecOptions;

use crate::packer::DEFAULT_NAME;
use crate::{
    OptionSet, PackError, Packer, ReadStrategy, Registry, Result, Session, TypeName, Value,
    WriteStrategy,
};

/// What a [`Directive::With`] applies its options to.
#[derive(Debug, Clone)]
pub enum Target {
    Type(TypeName),
    Named(String),
}

/// How one value is packed, or what one read decodes.
///
/// The `From` impls give the accepted call shapes:
///
/// ```
/// use packable::{CodecOptions, Directive, TypeName};
///
/// assert!(matches!(Directive::from("short"), Directive::Named(_)));
/// assert!(matches!(Directive::from("default"), Directive::Default));
/// assert!(matches!(Directive::from(TypeName::STRING), Directive::Type(_)));
/// assert!(matches!(
///     Directive::from((TypeName::STRING, CodecOptions::new().with_bytes(4))),
///     Directive::With(..)
/// ));
/// ```
#[derive(Debug, Clone, Default)]
pub enum Directive {
    /// The value's own type with its default packer
    #[default]
    Default,
    /// A bare type
    Type(TypeName),
    /// A named packer (shortcut) looked up in scope
    Named(String),
    /// Explicit options on the value's default packer
    Options(OptionSet),
    /// A type or packer name plus explicit options
    With(Target, OptionSet),
}

impl Directive {
    fn named(name: String) -> Self {
        if name == DEFAULT_NAME {
            Directive::Default
        } else {
            Directive::Named(name)
        }
    }

    fn named_with(name: String, options: OptionSet) -> Self {
        if name == DEFAULT_NAME {
            Directive::Options(options)
        } else {
            Directive::With(Target::Named(name), options)
        }
    }
}

impl From<TypeName> for Directive {
    fn from(t: TypeName) -> Self {
        Directive::Type(t)
    }
}

impl From<&str> for Directive {
    fn from(name: &str) -> Self {
        Directive::named(name.to_owned())
    }
}

impl From<String> for Directive {
    fn from(name: String) -> Self {
        Directive::named(name)
    }
}

impl From<OptionSet> for Directive {
    fn from(options: OptionSet) -> Self {
        Directive::Options(options)
    }
}

impl From<CodecOptions> for Directive {
    fn from(options: CodecOptions) -> Self {
        Directive::Options(options.into())
    }
}

impl From<(TypeName, OptionSet)> for Directive {
    fn from((t, options): (TypeName, OptionSet)) -> Self {
        Directive::With(Target::Type(t), options)
    }
}

impl From<(TypeName, CodecOptions)> for Directive {
    fn from((t, options): (TypeName, CodecOptions)) -> Self {
        Directive::With(Target::Type(t), options.into())
    }
}

impl From<(&str, OptionSet)> for Directive {
    fn from((name, options): (&str, OptionSet)) -> Self {
        Directive::named_with(name.to_owned(), options)
    }
}

impl From<(&str, CodecOptions)> for Directive {
    fn from((name, options): (&str, CodecOptions)) -> Self {
        Directive::named_with(name.to_owned(), options.into())
    }
}

#[derive(Clone)]
pub(crate) enum Strategy {
    Write(WriteStrategy),
    Read(ReadStrategy),
}

/// One normalized unit of work: type, packer, merged options and, when
/// writing, the value being encoded.
#[derive(Clone)]
pub struct ResolvedEntry<'v> {
    pub type_name: TypeName,
    pub packer: Arc<Packer>,
    /// Packer defaults overlaid with the explicit options
    pub options: OptionSet,
    pub value: Option<&'v Value>,
    strategy: Strategy,
}

impl ResolvedEntry<'_> {
    pub(crate) fn write(&self, session: &mut Session<'_>) -> Result<()> {
        match (&self.strategy, self.value) {
            (Strategy::Write(f), Some(value)) => f(value, &self.options.codec, session),
            _ => Err(PackError::InvalidOption(format!(
                "entry for {} was not resolved for writing",
                self.type_name
            ))),
        }
    }

    pub(crate) fn read(&self, session: &mut Session<'_>) -> Result<Value> {
        match &self.strategy {
            Strategy::Read(f) => f(session, &self.options.codec),
            Strategy::Write(_) => Err(PackError::InvalidOption(format!(
                "entry for {} was not resolved for reading",
                self.type_name
            ))),
        }
    }
}

impl fmt::Debug for ResolvedEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedEntry")
            .field("type_name", &self.type_name)
            .field("packer", &self.packer.label())
            .field("options", &self.options)
            .field("value", &self.value)
            .finish()
    }
}

/// Resolves one value for writing.
///
/// A [`Directive::Type`] may widen to an ancestor of the value's type (to use
/// a packer registered there) but never to an unrelated type. When the
/// ancestor's lineage has no matching packer, the value's own default is used.
pub fn resolve_write<'v>(
    registry: &Registry,
    value: &'v Value,
    directive: Directive,
) -> Result<ResolvedEntry<'v>> {
    let found = value.type_name();
    let (type_name, name, explicit) = match directive {
        Directive::Default => (found.clone(), None, OptionSet::new()),
        Directive::Type(t) => (t, None, OptionSet::new()),
        Directive::Named(n) => (found.clone(), Some(n), OptionSet::new()),
        Directive::Options(o) => (found.clone(), None, o),
        Directive::With(Target::Type(t), o) => (t, None, o),
        Directive::With(Target::Named(n), o) => (found.clone(), Some(n), o),
    };
    if type_name != found && !registry.is_a(&found, &type_name)? {
        return Err(PackError::TypeMismatch {
            expected: type_name,
            found,
        });
    }

    let packer = registry.resolve_within(&type_name, &found, name.as_deref())?;
    let options = explicit.over(packer.defaults());
    let strategy = match &options.write_packed {
        Some(f) => Arc::clone(f),
        None => registry.write_strategy(&found, &packer)?,
    };
    Ok(ResolvedEntry {
        type_name,
        packer,
        options,
        value: Some(value),
        strategy: Strategy::Write(strategy),
    })
}

/// Resolves one read target. A packer name without a type is looked up
/// across every registered type and must have exactly one owner.
pub fn resolve_read(registry: &Registry, directive: Directive) -> Result<ResolvedEntry<'static>> {
    let (type_name, name, explicit) = match directive {
        Directive::Default | Directive::Options(_) => {
            return Err(PackError::InvalidOption(
                "reading needs a type or a packer name".into(),
            ));
        }
        Directive::Type(t) => (t, None, OptionSet::new()),
        Directive::Named(n) => (registry.owner_of(&n)?, Some(n), OptionSet::new()),
        Directive::With(Target::Type(t), o) => (t, None, o),
        Directive::With(Target::Named(n), o) => (registry.owner_of(&n)?, Some(n), o),
    };

    let packer = registry.resolve(&type_name, name.as_deref())?;
    let options = explicit.over(packer.defaults());
    let strategy = match &options.read_packed {
        Some(f) => Arc::clone(f),
        None => registry.read_strategy(&type_name, &packer)?,
    };
    Ok(ResolvedEntry {
        type_name,
        packer,
        options,
        value: None,
        strategy: Strategy::Read(strategy),
    })
}

/// Pairs values with directives in lockstep. Missing trailing directives
/// mean [`Directive::Default`]; surplus ones are an error.
pub fn write_entries<'v, I>(
    registry: &Registry,
    values: &'v [Value],
    directives: I,
) -> Result<Vec<ResolvedEntry<'v>>>
where
    I: IntoIterator<Item = Directive>,
{
    let mut directives: Vec<Directive> = directives.into_iter().collect();
    if directives.len() > values.len() {
        return Err(PackError::InvalidOption(format!(
            "{} directives given for {} values",
            directives.len(),
            values.len()
        )));
    }
    directives.resize(values.len(), Directive::Default);
    values
        .iter()
        .zip(directives)
        .map(|(value, directive)| resolve_write(registry, value, directive))
        .collect()
}

pub fn read_entries<I>(registry: &Registry, directives: I) -> Result<Vec<ResolvedEntry<'static>>>
where
    I: IntoIterator<Item = Directive>,
{
    let entries = directives
        .into_iter()
        .map(|directive| resolve_read(registry, directive))
        .collect::<Result<Vec<_>>>()?;
    if entries.is_empty() {
        return Err(PackError::InvalidOption("nothing to read".into()));
    }
    Ok(entries)
}
