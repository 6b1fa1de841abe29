//! Keyword value coercion.
//!
//! Keyword arguments arrive as raw text and are converted to the type declared
//! in the command's prototype. Positional arguments never pass through here.

use std::fmt;

use crate::error::{CalbrError, Result};

/// Characters that separate list items inside a single keyword value.
const LIST_SEPARATORS: [char; 3] = [',', ';', '|'];

/// Declared type of a keyword parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Str,
    Int,
    Bool,
    Float,
    List,
}

impl TypeTag {
    /// All recognized tags.
    pub const ALL: &'static [Self] = &[Self::Str, Self::Int, Self::Bool, Self::Float, Self::List];

    /// Parse a textual tag (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "str" | "string" => Some(Self::Str),
            "int" | "integer" => Some(Self::Int),
            "bool" | "boolean" => Some(Self::Bool),
            "float" => Some(Self::Float),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    /// Canonical short name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Float => "float",
            Self::List => "list",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A keyword value after coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Str(String),
    Int(i64),
    Bool(bool),
    Float(f64),
    List(Vec<String>),
}

impl TypedValue {
    /// The tag this value satisfies.
    #[must_use]
    pub const fn type_tag(&self) -> TypeTag {
        match self {
            Self::Str(_) => TypeTag::Str,
            Self::Int(_) => TypeTag::Int,
            Self::Bool(_) => TypeTag::Bool,
            Self::Float(_) => TypeTag::Float,
            Self::List(_) => TypeTag::List,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for TypedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<String>> for TypedValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Convert `raw` into a value of the declared type.
///
/// # Errors
///
/// Returns [`CalbrError::Coercion`] when `raw` is not a valid literal for `tag`.
pub fn coerce(raw: &str, tag: TypeTag) -> Result<TypedValue> {
    match tag {
        TypeTag::Str => Ok(TypedValue::Str(raw.to_string())),
        TypeTag::Int => parse_int(raw).map(TypedValue::Int),
        TypeTag::Bool => parse_bool(raw).map(TypedValue::Bool),
        TypeTag::Float => raw
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|_| coercion_error(raw, tag)),
        TypeTag::List => Ok(TypedValue::List(
            raw.split(LIST_SEPARATORS)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )),
    }
}

/// Parse an integer literal, inferring the base from its prefix.
///
/// `0x` is hexadecimal, `0b` binary, any other leading `0` octal, everything
/// else decimal.
///
/// # Errors
///
/// Returns [`CalbrError::Coercion`] when the digits are invalid in the inferred base.
pub fn parse_int(raw: &str) -> Result<i64> {
    let prefix = raw.get(..2).map(str::to_ascii_lowercase);
    let (digits, radix) = match prefix.as_deref() {
        Some("0x") => (&raw[2..], 16),
        Some("0b") => (&raw[2..], 2),
        _ if raw.starts_with('0') => (raw, 8),
        _ => (raw, 10),
    };

    // from_str_radix tolerates a sign after the prefix; reject it.
    if radix != 10 && digits.starts_with(['+', '-']) {
        return Err(coercion_error(raw, TypeTag::Int));
    }

    i64::from_str_radix(digits, radix).map_err(|_| coercion_error(raw, TypeTag::Int))
}

/// Parse a boolean literal: `true`/`yes` or `false`/`no`, case-insensitive.
///
/// # Errors
///
/// Returns [`CalbrError::Coercion`] for any other token.
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(coercion_error(raw, TypeTag::Bool)),
    }
}

fn coercion_error(raw: &str, expected: TypeTag) -> CalbrError {
    CalbrError::Coercion {
        value: raw.to_string(),
        expected,
    }
}
