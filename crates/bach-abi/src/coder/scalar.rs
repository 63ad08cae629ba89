//! Single-word coders: address, bool, integers, `bytesN` and the null placeholder

use primitive_types::U256;

use super::mismatch;
use crate::error::{AbiError, Result};
use crate::reader::Reader;
use crate::token::{Address, Token, I256};
use crate::writer::{Writer, WORD_SIZE};

pub(super) fn encode_null(type_name: &str, value: &Token) -> Result<()> {
    match value {
        Token::Null => Ok(()),
        other => Err(mismatch(type_name, other)),
    }
}

pub(super) fn encode_address(writer: &mut Writer, type_name: &str, value: &Token) -> Result<()> {
    let Token::Address(addr) = value else {
        return Err(mismatch(type_name, value));
    };
    let mut word = [0u8; WORD_SIZE];
    word[12..].copy_from_slice(addr.as_bytes());
    writer.append_word(&word);
    Ok(())
}

pub(super) fn decode_address(reader: &mut Reader<'_>, type_name: &str) -> Result<Token> {
    let word = reader.read_word()?;
    if word[..12].iter().any(|&b| b != 0) {
        if reader.mode().is_strict() {
            return Err(AbiError::invalid_data(type_name, "non-zero high-order bytes"));
        }
        tracing::warn!("Truncating address word with dirty high-order bytes: 0x{}", hex::encode(word));
    }
    Ok(Token::Address(Address::from_slice(&word[12..])))
}

pub(super) fn encode_bool(writer: &mut Writer, type_name: &str, value: &Token) -> Result<()> {
    let Token::Bool(b) = value else {
        return Err(mismatch(type_name, value));
    };
    writer.append_u256(if *b { U256::one() } else { U256::zero() });
    Ok(())
}

pub(super) fn decode_bool(reader: &mut Reader<'_>, type_name: &str) -> Result<Token> {
    let word = reader.read_u256()?;
    if word > U256::one() {
        if reader.mode().is_strict() {
            return Err(AbiError::invalid_data(type_name, format!("word {} is not 0 or 1", word)));
        }
        tracing::warn!("Accepting non-canonical bool word {} as true", word);
    }
    Ok(Token::Bool(!word.is_zero()))
}

pub(super) fn encode_number(
    writer: &mut Writer,
    type_name: &str,
    size: usize,
    signed: bool,
    value: &Token,
) -> Result<()> {
    let bits = size * 8;
    let out_of_range = || AbiError::NumericRange {
        ty: type_name.to_string(),
        value: value.to_string(),
    };

    let word = match value {
        Token::Uint(v) if signed => {
            if !I256::new(*v, false).fits(bits) {
                return Err(out_of_range());
            }
            *v
        }
        Token::Uint(v) => {
            if v.bits() > bits {
                return Err(out_of_range());
            }
            *v
        }
        Token::Int(v) if signed => {
            if !v.fits(bits) {
                return Err(out_of_range());
            }
            v.to_twos_complement()
        }
        Token::Int(v) => {
            if v.is_negative() || v.abs.bits() > bits {
                return Err(out_of_range());
            }
            v.abs
        }
        other => return Err(mismatch(type_name, other)),
    };

    writer.append_u256(word);
    Ok(())
}

pub(super) fn decode_number(
    reader: &mut Reader<'_>,
    type_name: &str,
    size: usize,
    signed: bool,
) -> Result<Token> {
    let bits = size * 8;
    let word = reader.read_u256()?;

    if !signed {
        if word.bits() > bits {
            if reader.mode().is_strict() {
                return Err(AbiError::invalid_data(type_name, format!("{} exceeds {} bits", word, bits)));
            }
            tracing::warn!("Truncating {} to the width of {}", word, type_name);
            return Ok(Token::Uint(word & low_mask(bits)));
        }
        return Ok(Token::Uint(word));
    }

    let extended = sign_extend(word, bits);
    if extended != word {
        if reader.mode().is_strict() {
            return Err(AbiError::invalid_data(type_name, "high-order bits are not a sign extension"));
        }
        tracing::warn!("Sign-extending dirty {} word from bit {}", type_name, bits - 1);
    }
    Ok(Token::Int(I256::from_twos_complement(extended)))
}

/// Mask covering the low `bits` bits of a word
fn low_mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::one() << bits) - U256::one()
    }
}

/// Extend the sign bit `bits - 1` of `word` through all 256 bits
fn sign_extend(word: U256, bits: usize) -> U256 {
    if bits >= 256 {
        return word;
    }
    let mask = low_mask(bits);
    let low = word & mask;
    if low.bit(bits - 1) {
        low | !mask
    } else {
        low
    }
}

pub(super) fn encode_fixed_bytes(
    writer: &mut Writer,
    label: &str,
    type_name: &str,
    size: usize,
    value: &Token,
) -> Result<()> {
    let data = match value {
        Token::FixedBytes(data) | Token::Bytes(data) => data,
        other => return Err(mismatch(type_name, other)),
    };
    if data.len() != size {
        return Err(AbiError::invalid_argument(
            label,
            type_name,
            format!("incorrect data length: expected {} bytes, got {}", size, data.len()),
        ));
    }
    writer.append_padded(data);
    Ok(())
}

pub(super) fn decode_fixed_bytes(reader: &mut Reader<'_>, type_name: &str, size: usize) -> Result<Token> {
    let word = reader.read_word()?;
    if word[size..].iter().any(|&b| b != 0) {
        if reader.mode().is_strict() {
            return Err(AbiError::invalid_data(type_name, "non-zero padding bytes"));
        }
        tracing::warn!("Ignoring dirty padding of {} word", type_name);
    }
    Ok(Token::FixedBytes(word[..size].to_vec()))
}
