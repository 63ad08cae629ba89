//! Coder dispatcher and the public encode/decode entry points

use std::fmt;
use std::sync::Arc;

use crate::coder::{Coder, CoderKind};
use crate::config::CoderConfig;
use crate::error::{AbiError, Result};
use crate::param::{Param, ParamType};
use crate::reader::{CoerceFn, Reader};
use crate::token::Token;
use crate::values::DecodedValues;
use crate::writer::Writer;

/// ABI encoder/decoder
///
/// Immutable after construction and cheap to clone; share it freely across
/// threads. Every call builds its own coder tree, writer or reader.
#[derive(Clone, Default)]
pub struct AbiCoder {
    config: CoderConfig,
    coerce: Option<Arc<CoerceFn>>,
}

impl AbiCoder {
    /// Create a coder with strict decoding and no coercion
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coder with the given configuration
    pub fn with_config(config: CoderConfig) -> Self {
        Self { config, coerce: None }
    }

    /// Install a hook applied to every decoded scalar value
    pub fn with_coerce<F>(mut self, coerce: F) -> Self
    where
        F: Fn(&str, Token) -> Token + Send + Sync + 'static,
    {
        self.coerce = Some(Arc::new(coerce));
        self
    }

    /// Active configuration
    pub fn config(&self) -> &CoderConfig {
        &self.config
    }

    /// Resolve a descriptor into its coder tree
    pub fn get_coder(&self, param: &Param) -> Result<Coder> {
        let kind = match &param.kind {
            ParamType::Empty => CoderKind::Null,
            ParamType::Address => CoderKind::Address,
            ParamType::Bool => CoderKind::Bool,
            ParamType::String => CoderKind::String,
            ParamType::Bytes => CoderKind::Bytes,
            ParamType::Uint(bits) | ParamType::Int(bits) => {
                if *bits == 0 || *bits % 8 != 0 || *bits > 256 {
                    let prefix = if matches!(param.kind, ParamType::Int(_)) { "int" } else { "uint" };
                    return Err(AbiError::invalid_argument(
                        "param",
                        param.kind.to_string(),
                        format!("invalid {} bit length", prefix),
                    ));
                }
                CoderKind::Number {
                    size: bits / 8,
                    signed: matches!(param.kind, ParamType::Int(_)),
                }
            }
            ParamType::FixedBytes(size) => {
                if *size == 0 || *size > 32 {
                    return Err(AbiError::invalid_argument(
                        "param",
                        param.kind.to_string(),
                        "invalid bytes length",
                    ));
                }
                CoderKind::FixedBytes { size: *size }
            }
            ParamType::Array(inner) => CoderKind::Array {
                element: Box::new(self.get_coder(&Param::new(param.name.clone(), (**inner).clone()))?),
                length: None,
            },
            ParamType::FixedArray(inner, len) => CoderKind::Array {
                element: Box::new(self.get_coder(&Param::new(param.name.clone(), (**inner).clone()))?),
                length: Some(*len),
            },
            ParamType::Tuple(components) => CoderKind::Tuple {
                components: components
                    .iter()
                    .map(|component| self.get_coder(component))
                    .collect::<Result<_>>()?,
            },
        };
        Ok(Coder::new(param.name.clone(), kind))
    }

    fn tuple_coder(&self, types: &[Param]) -> Result<Coder> {
        let components = types.iter().map(|p| self.get_coder(p)).collect::<Result<_>>()?;
        Ok(Coder::new("", CoderKind::Tuple { components }))
    }

    /// Encode `values` as the parameter list `types`
    ///
    /// The output length is always a multiple of 32.
    pub fn encode(&self, types: &[Param], values: &[Token]) -> Result<Vec<u8>> {
        tracing::debug!("Encoding {} ABI values", values.len());
        if types.len() != values.len() {
            return Err(AbiError::LengthMismatch {
                types: types.len(),
                values: values.len(),
            });
        }

        let coder = self.tuple_coder(types)?;
        let mut writer = Writer::new();
        let encoded = coder
            .encode_values(&mut writer, values)
            .and_then(|_| writer.finalize());
        if let Err(e) = &encoded {
            tracing::debug!("ABI encode failed: {}", e);
        }
        encoded
    }

    /// Decode `data` as the parameter list `types`
    pub fn decode(&self, types: &[Param], data: &[u8]) -> Result<DecodedValues> {
        tracing::debug!("Decoding {} ABI values from {} bytes", types.len(), data.len());
        let coder = self.tuple_coder(types)?;
        let mut reader = Reader::new(data)
            .with_mode(self.config.decode_mode)
            .with_coerce(self.coerce.as_deref());

        match coder.decode_values(&mut reader) {
            Ok(values) => Ok(DecodedValues::new(types, values)),
            Err(e) => {
                tracing::debug!("ABI decode failed: {}", e);
                Err(e)
            }
        }
    }

    /// Decode a single value of type `param` from `data`
    pub fn decode_one(&self, param: &Param, data: &[u8]) -> Result<Token> {
        let mut values = self.decode(std::slice::from_ref(param), data)?.into_tokens();
        values
            .pop()
            .ok_or_else(|| AbiError::Internal("single-value decode produced nothing".into()))
    }
}

impl fmt::Debug for AbiCoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbiCoder")
            .field("config", &self.config)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}
