//! ABI type descriptors

use std::fmt;

/// Solidity parameter types
///
/// Widths are carried as written; the coder dispatcher validates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Address
    Address,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Dynamic bytes
    Bytes,
    /// Fixed-size bytes with byte width (1-32)
    FixedBytes(usize),
    /// Unsigned integer with bit width (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    /// Dynamic array `T[]`
    Array(Box<ParamType>),
    /// Fixed-size array `T[k]`
    FixedArray(Box<ParamType>, usize),
    /// Tuple with ordered, optionally named components
    Tuple(Vec<Param>),
    /// Zero-width placeholder (the empty type spelling)
    Empty,
}

impl ParamType {
    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(|c| c.kind.is_dynamic()),
            _ => false,
        }
    }

    /// Dynamic array of this type
    pub fn array_of(self) -> ParamType {
        ParamType::Array(Box::new(self))
    }

    /// Fixed-size array of this type
    pub fn fixed_array_of(self, len: usize) -> ParamType {
        ParamType::FixedArray(Box::new(self), len)
    }

    /// Tuple of unnamed components
    pub fn tuple(kinds: impl IntoIterator<Item = ParamType>) -> ParamType {
        ParamType::Tuple(kinds.into_iter().map(Param::from).collect())
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bool => f.write_str("bool"),
            ParamType::String => f.write_str("string"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::FixedBytes(size) => write!(f, "bytes{}", size),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            ParamType::Tuple(components) => {
                f.write_str("(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", component.kind)?;
                }
                f.write_str(")")
            }
            ParamType::Empty => Ok(()),
        }
    }
}

/// A type descriptor with an optional name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Label, empty when unnamed
    pub name: String,
    /// The type
    pub kind: ParamType,
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self { name: name.into(), kind }
    }

    /// Create an unnamed parameter
    pub fn unnamed(kind: ParamType) -> Self {
        Self { name: String::new(), kind }
    }
}

impl From<ParamType> for Param {
    fn from(kind: ParamType) -> Self {
        Param::unnamed(kind)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {}", self.kind, self.name)
        }
    }
}
