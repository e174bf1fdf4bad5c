//! Typed encoding options shared by every codec.

use std::str::FromStr;

use crate::{CodecError, Result};

/// Byte order of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endian {
    /// Most-significant byte first
    #[default]
    Big,
    /// Least-significant byte first
    Little,
    /// Whatever the host uses; see [`Endian::NATIVE`]
    Native,
}

impl Endian {
    /// The host byte order, fixed for the lifetime of the process.
    pub const NATIVE: Endian = if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    };

    /// Maps `Native` to the concrete host order.
    pub const fn resolve(self) -> Endian {
        match self {
            Endian::Native => Self::NATIVE,
            other => other,
        }
    }
}

impl FromStr for Endian {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "big" => Ok(Endian::Big),
            "little" => Ok(Endian::Little),
            "native" => Ok(Endian::Native),
            other => Err(CodecError::invalid(
                "endian",
                format!("`{other}` is not one of big, little, native"),
            )),
        }
    }
}

/// IEEE-754 width of an encoded float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// 4 bytes
    Single,
    /// 8 bytes
    #[default]
    Double,
}

impl Precision {
    pub const fn width(self) -> usize {
        match self {
            Precision::Single => 4,
            Precision::Double => 8,
        }
    }
}

impl FromStr for Precision {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(Precision::Single),
            "double" => Ok(Precision::Double),
            other => Err(CodecError::invalid(
                "precision",
                format!("`{other}` is not one of single, double"),
            )),
        }
    }
}

/// Untyped value in a string-keyed option mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Int(i64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(v.into())
    }
}

/// Widths past `i64::MAX` have no `Int` form and are rejected.
impl TryFrom<usize> for OptionValue {
    type Error = CodecError;

    fn try_from(v: usize) -> Result<Self> {
        i64::try_from(v)
            .map(OptionValue::Int)
            .map_err(|_| CodecError::invalid("bytes", format!("{v} does not fit in an option value")))
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<Vec<u8>> for OptionValue {
    fn from(v: Vec<u8>) -> Self {
        OptionValue::Bytes(v)
    }
}

/// Keys accepted by [`CodecOptions::set`].
pub const KEYS: [&str; 7] = [
    "bytes",
    "endian",
    "signed",
    "precision",
    "fill",
    "read_packed",
    "write_packed",
];

/// Encoding options. Every field is optional; unset fields fall back to the
/// codec's documented default.
///
/// | key | used by | default |
/// |---|---|---|
/// | `bytes` | integer, string | integer: max(4, smallest width holding the value); string: variable |
/// | `endian` | integer, float | `big` |
/// | `signed` | integer | inferred from the sign when writing, required when reading |
/// | `precision` | float | `double` |
/// | `fill` | string | ASCII space |
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecOptions {
    pub bytes: Option<usize>,
    pub endian: Option<Endian>,
    pub signed: Option<bool>,
    pub precision: Option<Precision>,
    pub fill: Option<Vec<u8>>,
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(mut self, bytes: usize) -> Self {
        self.bytes = Some(bytes);
        self
    }

    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = Some(endian);
        self
    }

    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = Some(signed);
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_fill(mut self, fill: impl Into<Vec<u8>>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `self` with every field set in `overlay` replaced.
    pub fn merge(&self, overlay: &CodecOptions) -> CodecOptions {
        CodecOptions {
            bytes: overlay.bytes.or(self.bytes),
            endian: overlay.endian.or(self.endian),
            signed: overlay.signed.or(self.signed),
            precision: overlay.precision.or(self.precision),
            fill: overlay.fill.clone().or_else(|| self.fill.clone()),
        }
    }

    /// Sets one option from a string key.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownKey`] for keys outside [`KEYS`], and
    /// [`CodecError::InvalidOption`] for values of the wrong kind or outside
    /// the allowed set.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<()> {
        match key {
            "bytes" => match value {
                OptionValue::Int(n) if n >= 0 => {
                    self.bytes = Some(usize::try_from(n).map_err(|_| {
                        CodecError::invalid("bytes", format!("{n} does not fit in usize"))
                    })?);
                }
                other => {
                    return Err(CodecError::invalid(
                        "bytes",
                        format!("expected a non-negative width, got {other:?}"),
                    ));
                }
            },
            "endian" => match value {
                OptionValue::Str(s) => self.endian = Some(s.parse()?),
                other => {
                    return Err(CodecError::invalid(
                        "endian",
                        format!("expected a name, got {other:?}"),
                    ));
                }
            },
            "signed" => match value {
                OptionValue::Bool(b) => self.signed = Some(b),
                other => {
                    return Err(CodecError::invalid(
                        "signed",
                        format!("expected a boolean, got {other:?}"),
                    ));
                }
            },
            "precision" => match value {
                OptionValue::Str(s) => self.precision = Some(s.parse()?),
                other => {
                    return Err(CodecError::invalid(
                        "precision",
                        format!("expected a name, got {other:?}"),
                    ));
                }
            },
            "fill" => {
                let fill = match value {
                    OptionValue::Str(s) => s.into_bytes(),
                    OptionValue::Bytes(b) => b,
                    OptionValue::Int(n) => vec![u8::try_from(n).map_err(|_| {
                        CodecError::invalid("fill", format!("{n} is not a byte"))
                    })?],
                    OptionValue::Bool(_) => {
                        return Err(CodecError::invalid("fill", "expected a byte or a string"));
                    }
                };
                if fill.is_empty() {
                    return Err(CodecError::invalid("fill", "must not be empty"));
                }
                self.fill = Some(fill);
            }
            "read_packed" => {
                return Err(CodecError::invalid(
                    "read_packed",
                    "strategies cannot be set from a mapping",
                ));
            }
            "write_packed" => {
                return Err(CodecError::invalid(
                    "write_packed",
                    "strategies cannot be set from a mapping",
                ));
            }
            other => return Err(CodecError::UnknownKey(other.to_owned())),
        }
        Ok(())
    }

    /// Builds options from a string-keyed mapping, validating every entry.
    ///
    /// ```
    /// use pack_codec::{CodecError, CodecOptions, Endian, OptionValue};
    ///
    /// let options = CodecOptions::from_pairs([
    ///     ("bytes", OptionValue::from(3)),
    ///     ("endian", OptionValue::from("little")),
    /// ]).unwrap();
    /// assert_eq!(options, CodecOptions::new().with_bytes(3).with_endian(Endian::Little));
    ///
    /// let err = CodecOptions::from_pairs([("endian", OptionValue::from("Geronimo"))]).unwrap_err();
    /// assert!(matches!(err, CodecError::InvalidOption { key: "endian", .. }));
    /// ```
    pub fn from_pairs<I, K>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OptionValue)>,
        K: AsRef<str>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            options.set(key.as_ref(), value)?;
        }
        Ok(options)
    }

    /// Byte order with `Native` already resolved.
    pub fn endian_or_default(&self) -> Endian {
        self.endian.unwrap_or_default().resolve()
    }

    pub fn precision_or_default(&self) -> Precision {
        self.precision.unwrap_or_default()
    }

    pub fn fill_or_default(&self) -> &[u8] {
        self.fill.as_deref().unwrap_or(b" ")
    }
}
