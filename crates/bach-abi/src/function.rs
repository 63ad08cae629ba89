//! Function calls and event logs

use std::str::FromStr;

use primitive_types::H256;
use sha3::{Digest, Keccak256};

use crate::abi_coder::AbiCoder;
use crate::error::{AbiError, Result};
use crate::param::{Param, ParamType};
use crate::token::Token;
use crate::values::DecodedValues;

fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    H256::from_slice(&hasher.finalize())
}

/// Compute the 4-byte selector of a canonical function signature
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash.as_bytes()[..4]);
    selector
}

/// Compute the topic hash of a canonical event signature
pub fn event_topic(signature: &str) -> H256 {
    keccak256(signature.as_bytes())
}

fn canonical_signature<'a>(name: &str, params: impl IntoIterator<Item = &'a ParamType>) -> String {
    let types: Vec<String> = params.into_iter().map(ToString::to_string).collect();
    format!("{}({})", name, types.join(","))
}

/// Contract function definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name
    pub name: String,
    /// Input parameters
    pub inputs: Vec<Param>,
    /// Output parameters
    pub outputs: Vec<Param>,
}

impl Function {
    /// Create a new function definition
    pub fn new(name: impl Into<String>, inputs: Vec<Param>, outputs: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs,
        }
    }

    /// Set the output parameters
    pub fn with_outputs(mut self, outputs: Vec<Param>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, self.inputs.iter().map(|p| &p.kind))
    }

    /// 4-byte selector
    pub fn selector(&self) -> [u8; 4] {
        function_selector(&self.signature())
    }

    /// Encode call data: selector followed by the encoded arguments
    pub fn encode_input(&self, coder: &AbiCoder, values: &[Token]) -> Result<Vec<u8>> {
        let args = coder.encode(&self.inputs, values)?;
        let mut data = Vec::with_capacity(4 + args.len());
        data.extend_from_slice(&self.selector());
        data.extend_from_slice(&args);
        Ok(data)
    }

    /// Decode call data after checking its selector
    pub fn decode_input(&self, coder: &AbiCoder, data: &[u8]) -> Result<DecodedValues> {
        if data.len() < 4 {
            return Err(AbiError::BufferOverrun {
                offset: 0,
                needed: 4,
                available: data.len(),
            });
        }
        let (selector, args) = data.split_at(4);
        if selector != self.selector() {
            return Err(AbiError::invalid_argument(
                "selector",
                format!("0x{}", hex::encode(selector)),
                format!("does not match {}", self.signature()),
            ));
        }
        coder.decode(&self.inputs, args)
    }

    /// Decode return data
    pub fn decode_output(&self, coder: &AbiCoder, data: &[u8]) -> Result<DecodedValues> {
        coder.decode(&self.outputs, data)
    }
}

impl FromStr for Function {
    type Err = AbiError;

    /// Parse `name(type [name], ...)`; outputs start empty
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let open = s
            .find('(')
            .ok_or_else(|| AbiError::Parse(format!("missing parameter list in {:?}", s)))?;
        let name = s[..open].trim();
        if name.is_empty() {
            return Err(AbiError::Parse(format!("missing function name in {:?}", s)));
        }
        match s[open..].parse::<ParamType>()? {
            ParamType::Tuple(inputs) => Ok(Function::new(name, inputs, Vec::new())),
            _ => Err(AbiError::Parse(format!("malformed parameter list in {:?}", s))),
        }
    }
}

/// Event parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParam {
    /// Parameter name and type
    pub param: Param,
    /// Whether the value is carried in a topic
    pub indexed: bool,
}

impl EventParam {
    /// Create an event parameter
    pub fn new(param: Param, indexed: bool) -> Self {
        Self { param, indexed }
    }

    /// Indexed values of reference types only leave their hash in the topic
    fn is_hashed(&self) -> bool {
        self.indexed
            && (self.param.kind.is_dynamic()
                || matches!(
                    self.param.kind,
                    ParamType::FixedArray(..) | ParamType::Tuple(_)
                ))
    }
}

/// Contract event definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name
    pub name: String,
    /// Parameters in declaration order
    pub inputs: Vec<EventParam>,
    /// Anonymous events carry no signature topic
    pub anonymous: bool,
}

impl Event {
    /// Create a new event definition
    pub fn new(name: impl Into<String>, inputs: Vec<EventParam>, anonymous: bool) -> Self {
        Self {
            name: name.into(),
            inputs,
            anonymous,
        }
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, self.inputs.iter().map(|p| &p.param.kind))
    }

    /// Signature topic
    pub fn topic(&self) -> H256 {
        event_topic(&self.signature())
    }

    /// Decode a log from its topics and data
    pub fn decode_log(&self, coder: &AbiCoder, topics: &[H256], data: &[u8]) -> Result<DecodedValues> {
        let indexed_count = self.inputs.iter().filter(|p| p.indexed).count();
        let expected = indexed_count + usize::from(!self.anonymous);
        if topics.len() != expected {
            return Err(AbiError::invalid_argument(
                "topics",
                topics.len().to_string(),
                format!("{} expects {} topics", self.signature(), expected),
            ));
        }

        let mut topics = topics.iter();
        if !self.anonymous {
            if let Some(first) = topics.next() {
                if *first != self.topic() {
                    return Err(AbiError::invalid_argument(
                        "topics",
                        format!("{:?}", first),
                        format!("does not match {}", self.signature()),
                    ));
                }
            }
        }

        let unindexed: Vec<Param> = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.param.clone())
            .collect();
        let mut unindexed_values = coder.decode(&unindexed, data)?.into_iter();

        let mut params = Vec::with_capacity(self.inputs.len());
        let mut values = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let value = if input.indexed {
                let topic = topics
                    .next()
                    .ok_or_else(|| AbiError::Internal("topic count already checked".into()))?;
                if input.is_hashed() {
                    Token::bytes32(*topic)
                } else {
                    coder.decode_one(&input.param, topic.as_bytes())?
                }
            } else {
                unindexed_values
                    .next()
                    .ok_or_else(|| AbiError::Internal("decoded fewer values than requested".into()))?
            };
            let kind = if input.is_hashed() {
                ParamType::FixedBytes(32)
            } else {
                input.param.kind.clone()
            };
            params.push(Param::new(input.param.name.clone(), kind));
            values.push(value);
        }

        tracing::debug!("Decoded {} log with {} values", self.name, values.len());
        Ok(DecodedValues::new(&params, values))
    }
}
