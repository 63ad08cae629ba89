//! Coder strategies
//!
//! A [`Coder`] is resolved once from a type descriptor and mirrors its tree:
//! arrays own their element coder and tuples own their component coders.
//! Whether a coder is dynamic is decided at construction, bottom-up, from
//! the shape of the type alone.

mod composite;
mod dynamic;
mod scalar;

use crate::error::{AbiError, Result};
use crate::reader::Reader;
use crate::token::Token;
use crate::writer::{Writer, WORD_SIZE};

/// ABI type family handled by a coder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoderKind {
    /// Zero-width placeholder
    Null,
    /// 20-byte address, right-aligned in its word
    Address,
    /// Boolean word
    Bool,
    /// Integer of `size` bytes
    Number {
        /// Byte width (1-32)
        size: usize,
        /// Two's complement when true
        signed: bool,
    },
    /// `bytesN`, left-aligned in its word
    FixedBytes {
        /// Byte width (1-32)
        size: usize,
    },
    /// Length-prefixed bytes
    Bytes,
    /// Length-prefixed UTF-8
    String,
    /// `T[]` when `length` is `None`, `T[k]` otherwise
    Array {
        /// Element coder
        element: Box<Coder>,
        /// Fixed length
        length: Option<usize>,
    },
    /// Heterogeneous sequence
    Tuple {
        /// Component coders
        components: Vec<Coder>,
    },
}

/// Encoding/decoding strategy bound to one resolved type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coder {
    name: String,
    type_name: String,
    dynamic: bool,
    kind: CoderKind,
}

impl Coder {
    /// Build a coder; widths are assumed already validated
    pub fn new(name: impl Into<String>, kind: CoderKind) -> Self {
        let dynamic = match &kind {
            CoderKind::Bytes | CoderKind::String => true,
            CoderKind::Array { element, length } => length.is_none() || element.dynamic,
            CoderKind::Tuple { components } => components.iter().any(|c| c.dynamic),
            _ => false,
        };
        let type_name = type_name_of(&kind);
        Self {
            name: name.into(),
            type_name,
            dynamic,
            kind,
        }
    }

    /// Label copied from the descriptor
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical type spelling, as passed to the coercion hook
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the encoded size depends on the value
    pub fn is_dynamic(&self) -> bool {
        self.dynamic
    }

    /// Type family
    pub fn kind(&self) -> &CoderKind {
        &self.kind
    }

    /// Size of an ABI word in bytes
    pub fn word_size(&self) -> usize {
        WORD_SIZE
    }

    /// Bytes this coder occupies in an enclosing head
    pub fn head_size(&self) -> usize {
        if self.dynamic {
            return WORD_SIZE;
        }
        match &self.kind {
            CoderKind::Null => 0,
            CoderKind::Array { element, length } => {
                element.head_size().saturating_mul(length.unwrap_or(0))
            }
            CoderKind::Tuple { components } => components
                .iter()
                .fold(0usize, |size, c| size.saturating_add(c.head_size())),
            _ => WORD_SIZE,
        }
    }

    /// Encode `value` into `writer`
    pub fn encode(&self, writer: &mut Writer, value: &Token) -> Result<()> {
        match &self.kind {
            CoderKind::Null => scalar::encode_null(&self.type_name, value),
            CoderKind::Address => scalar::encode_address(writer, &self.type_name, value),
            CoderKind::Bool => scalar::encode_bool(writer, &self.type_name, value),
            CoderKind::Number { size, signed } => {
                scalar::encode_number(writer, &self.type_name, *size, *signed, value)
            }
            CoderKind::FixedBytes { size } => {
                scalar::encode_fixed_bytes(writer, self.label(), &self.type_name, *size, value)
            }
            CoderKind::Bytes => dynamic::encode_bytes(writer, &self.type_name, value),
            CoderKind::String => dynamic::encode_string(writer, &self.type_name, value),
            CoderKind::Array { element, length } => {
                composite::encode_array(writer, self.label(), &self.type_name, element, *length, value)
            }
            CoderKind::Tuple { .. } => match value {
                Token::Tuple(items) => self.encode_values(writer, items),
                other => Err(mismatch(&self.type_name, other)),
            },
        }
    }

    /// Decode one value at the reader's cursor
    pub fn decode(&self, reader: &mut Reader<'_>) -> Result<Token> {
        let raw = match &self.kind {
            CoderKind::Null => return Ok(Token::Null),
            CoderKind::Address => scalar::decode_address(reader, &self.type_name)?,
            CoderKind::Bool => scalar::decode_bool(reader, &self.type_name)?,
            CoderKind::Number { size, signed } => {
                scalar::decode_number(reader, &self.type_name, *size, *signed)?
            }
            CoderKind::FixedBytes { size } => {
                scalar::decode_fixed_bytes(reader, &self.type_name, *size)?
            }
            CoderKind::Bytes => dynamic::decode_bytes(reader)?,
            CoderKind::String => dynamic::decode_string(reader, &self.type_name)?,
            CoderKind::Array { element, length } => {
                return composite::decode_array(reader, element, *length);
            }
            CoderKind::Tuple { .. } => return Ok(Token::Tuple(self.decode_values(reader)?)),
        };
        Ok(reader.coerce(&self.type_name, raw))
    }

    /// Encode a tuple coder's components from a value slice
    pub fn encode_values(&self, writer: &mut Writer, values: &[Token]) -> Result<()> {
        let CoderKind::Tuple { components } = &self.kind else {
            return Err(AbiError::Internal(format!("{} is not a tuple coder", self.type_name)));
        };
        if values.len() != components.len() {
            return Err(AbiError::invalid_argument(
                self.label(),
                &self.type_name,
                format!("expected {} components, got {}", components.len(), values.len()),
            ));
        }
        composite::pack(writer, components.iter().zip(values))
    }

    /// Decode a tuple coder's components into a value list
    pub fn decode_values(&self, reader: &mut Reader<'_>) -> Result<Vec<Token>> {
        let CoderKind::Tuple { components } = &self.kind else {
            return Err(AbiError::Internal(format!("{} is not a tuple coder", self.type_name)));
        };
        composite::unpack(reader, components)
    }

    fn label(&self) -> &str {
        if self.name.is_empty() {
            "value"
        } else {
            &self.name
        }
    }
}

fn type_name_of(kind: &CoderKind) -> String {
    match kind {
        CoderKind::Null => String::new(),
        CoderKind::Address => "address".into(),
        CoderKind::Bool => "bool".into(),
        CoderKind::Number { size, signed: false } => format!("uint{}", size * 8),
        CoderKind::Number { size, signed: true } => format!("int{}", size * 8),
        CoderKind::FixedBytes { size } => format!("bytes{}", size),
        CoderKind::Bytes => "bytes".into(),
        CoderKind::String => "string".into(),
        CoderKind::Array { element, length: None } => format!("{}[]", element.type_name),
        CoderKind::Array { element, length: Some(n) } => format!("{}[{}]", element.type_name, n),
        CoderKind::Tuple { components } => {
            let inner: Vec<&str> = components.iter().map(|c| c.type_name.as_str()).collect();
            format!("({})", inner.join(","))
        }
    }
}

fn mismatch(expected: &str, found: &Token) -> AbiError {
    AbiError::TypeMismatch {
        expected: expected.to_string(),
        found: found.kind_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(bits: usize) -> Coder {
        Coder::new("", CoderKind::Number { size: bits / 8, signed: false })
    }

    fn array(element: Coder, length: Option<usize>) -> Coder {
        Coder::new("", CoderKind::Array { element: Box::new(element), length })
    }

    fn tuple(components: Vec<Coder>) -> Coder {
        Coder::new("", CoderKind::Tuple { components })
    }

    #[test]
    fn test_scalars_are_static() {
        for kind in [
            CoderKind::Null,
            CoderKind::Address,
            CoderKind::Bool,
            CoderKind::Number { size: 32, signed: true },
            CoderKind::FixedBytes { size: 4 },
        ] {
            assert!(!Coder::new("", kind).is_dynamic());
        }
        assert!(Coder::new("", CoderKind::Bytes).is_dynamic());
        assert!(Coder::new("", CoderKind::String).is_dynamic());
    }

    #[test]
    fn test_composite_classification() {
        assert!(array(uint(256), None).is_dynamic());
        assert!(!array(uint(256), Some(3)).is_dynamic());
        assert!(array(Coder::new("", CoderKind::String), Some(3)).is_dynamic());
        assert!(!tuple(vec![uint(8), Coder::new("", CoderKind::Bool)]).is_dynamic());
        assert!(tuple(vec![uint(8), array(uint(8), None)]).is_dynamic());
        assert!(!tuple(vec![]).is_dynamic());
    }

    #[test]
    fn test_head_size() {
        assert_eq!(uint(8).head_size(), 32);
        assert_eq!(Coder::new("", CoderKind::Null).head_size(), 0);
        assert_eq!(Coder::new("", CoderKind::String).head_size(), 32);
        assert_eq!(array(uint(8), Some(3)).head_size(), 96);
        assert_eq!(array(uint(8), None).head_size(), 32);
        assert_eq!(tuple(vec![uint(8), array(uint(16), Some(2))]).head_size(), 96);
    }

    #[test]
    fn test_word_size() {
        assert_eq!(uint(8).word_size(), 32);
        assert_eq!(tuple(vec![]).word_size(), 32);
        assert_eq!(array(uint(8), Some(3)).head_size(), 3 * uint(8).word_size());
    }

    #[test]
    fn test_type_names() {
        assert_eq!(uint(8).type_name(), "uint8");
        assert_eq!(
            Coder::new("", CoderKind::Number { size: 32, signed: true }).type_name(),
            "int256"
        );
        assert_eq!(array(uint(8), Some(3)).type_name(), "uint8[3]");
        assert_eq!(
            tuple(vec![uint(8), array(Coder::new("", CoderKind::Address), None)]).type_name(),
            "(uint8,address[])"
        );
    }

    #[test]
    fn test_encode_values_requires_tuple() {
        let mut writer = Writer::new();
        assert!(matches!(
            uint(8).encode_values(&mut writer, &[]),
            Err(AbiError::Internal(_))
        ));
    }

    #[test]
    fn test_tuple_component_count_mismatch() {
        let coder = tuple(vec![uint(8), uint(8)]);
        let mut writer = Writer::new();
        let err = coder.encode(&mut writer, &Token::Tuple(vec![Token::uint(1u64)])).unwrap_err();
        assert!(matches!(err, AbiError::InvalidArgument { .. }));
    }
}
