//! # bach-abi
//!
//! Ethereum contract ABI encoding and decoding for BachLedger.
//!
//! ## Features
//!
//! - **AbiCoder**: encode value lists against parameter lists, decode them back
//! - **Type parsing**: `uint256`, `address[]`, `(uint8 a, string b)[2]`, ...
//! - **Strict or lenient decoding**: reject or tolerate non-canonical words
//! - **Functions and events**: selectors, call data and log decoding
//!
//! ## Example
//!
//! ```rust
//! use bach_abi::{parse_params, AbiCoder, Token};
//!
//! let coder = AbiCoder::new();
//! let types = parse_params(&["uint8 id", "string name"]).unwrap();
//! let data = coder
//!     .encode(&types, &[Token::uint(7u64), Token::string("abc")])
//!     .unwrap();
//! assert_eq!(data.len(), 128);
//!
//! let decoded = coder.decode(&types, &data).unwrap();
//! assert_eq!(decoded.by_name("name").unwrap(), &Token::string("abc"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod abi_coder;
mod coder;
mod config;
mod error;
mod function;
mod param;
mod parse;
mod reader;
mod token;
mod values;
mod writer;

pub use abi_coder::AbiCoder;
pub use coder::{Coder, CoderKind};
pub use config::{CoderConfig, DecodeMode};
pub use error::{AbiError, ErrorKind, Result};
pub use function::{event_topic, function_selector, Event, EventParam, Function};
pub use param::{Param, ParamType};
pub use parse::parse_params;
pub use primitive_types::{H160, H256, U256};
pub use reader::{CoerceFn, Reader};
pub use token::{Address, Token, I256};
pub use values::DecodedValues;
pub use writer::{u256_to_word, Placeholder, Word, Writer, WORD_SIZE};

/// Encode `values` with the default coder
pub fn encode(types: &[Param], values: &[Token]) -> Result<Vec<u8>> {
    AbiCoder::new().encode(types, values)
}

/// Decode `data` with the default coder
pub fn decode(types: &[Param], data: &[u8]) -> Result<DecodedValues> {
    AbiCoder::new().decode(types, data)
}

/// Encode tokens using the types they imply
///
/// Integers are encoded as 256-bit words; see [`Token::type_of`].
pub fn encode_tokens(values: &[Token]) -> Result<Vec<u8>> {
    let types: Vec<Param> = values.iter().map(|v| Param::unnamed(v.type_of())).collect();
    encode(&types, values)
}
