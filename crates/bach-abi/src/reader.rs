//! Word-granular input cursor

use std::fmt;

use primitive_types::U256;

use crate::config::DecodeMode;
use crate::error::{AbiError, Result};
use crate::token::Token;
use crate::writer::{Word, WORD_SIZE};

/// Caller-supplied hook applied to every decoded scalar value
///
/// Receives the canonical type name (e.g. `uint8`) and the raw token.
pub type CoerceFn = dyn Fn(&str, Token) -> Token + Send + Sync;

/// Cursor over ABI-encoded input
///
/// Offsets taken by [`Reader::sub_reader_at`] are relative to this reader's
/// base, which is the start of the composite it decodes.
#[derive(Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    base: usize,
    position: usize,
    mode: DecodeMode,
    coerce: Option<&'a CoerceFn>,
}

impl<'a> Reader<'a> {
    /// Create a reader over the whole buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            base: 0,
            position: 0,
            mode: DecodeMode::default(),
            coerce: None,
        }
    }

    /// Set the decode mode
    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the coercion hook
    pub fn with_coerce(mut self, coerce: Option<&'a CoerceFn>) -> Self {
        self.coerce = coerce;
        self
    }

    /// Decode mode in effect
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Bytes consumed relative to this reader's base
    pub fn consumed(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.absolute())
    }

    fn absolute(&self) -> usize {
        self.base + self.position
    }

    /// Fail unless at least `needed` bytes remain after the cursor
    pub fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(AbiError::BufferOverrun {
                offset: self.absolute(),
                needed,
                available: self.data.len(),
            });
        }
        Ok(())
    }

    /// Fail unless `count` elements of `size` head bytes each can come from the input
    ///
    /// Zero-width elements consume nothing, so their count is capped at the
    /// input length instead (at least one word).
    pub fn ensure_elements(&self, count: usize, size: usize) -> Result<()> {
        if size == 0 {
            if count > self.data.len().max(WORD_SIZE) {
                return Err(AbiError::BufferOverrun {
                    offset: self.absolute(),
                    needed: count,
                    available: self.data.len(),
                });
            }
            return Ok(());
        }
        let needed = count
            .checked_mul(size)
            .ok_or_else(|| AbiError::OffsetOverflow(count.to_string()))?;
        self.ensure(needed)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.absolute();
        let end = start.checked_add(len).filter(|&end| end <= self.data.len()).ok_or(
            AbiError::BufferOverrun {
                offset: start,
                needed: len,
                available: self.data.len(),
            },
        )?;
        self.position += len;
        Ok(&self.data[start..end])
    }

    /// Read one word
    pub fn read_word(&mut self) -> Result<Word> {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(self.take(WORD_SIZE)?);
        Ok(word)
    }

    /// Read one word as a big-endian integer
    pub fn read_u256(&mut self) -> Result<U256> {
        Ok(U256::from_big_endian(&self.read_word()?))
    }

    /// Read a word holding an offset or a length
    pub fn read_usize(&mut self) -> Result<usize> {
        let value = self.read_u256()?;
        if value > U256::from(usize::MAX) {
            return Err(AbiError::OffsetOverflow(value.to_string()));
        }
        Ok(value.as_usize())
    }

    /// Read `len` bytes, advancing past their word padding
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let padded = len
            .checked_next_multiple_of(WORD_SIZE)
            .ok_or_else(|| AbiError::OffsetOverflow(len.to_string()))?;
        let chunk = self.take(padded)?;
        Ok(&chunk[..len])
    }

    /// Independent reader positioned `offset` bytes after this reader's base
    pub fn sub_reader_at(&self, offset: usize) -> Result<Reader<'a>> {
        let base = self
            .base
            .checked_add(offset)
            .filter(|&base| base <= self.data.len())
            .ok_or(AbiError::BufferOverrun {
                offset: self.base.saturating_add(offset),
                needed: 0,
                available: self.data.len(),
            })?;
        Ok(Reader {
            data: self.data,
            base,
            position: 0,
            mode: self.mode,
            coerce: self.coerce,
        })
    }

    /// Run the coercion hook, or pass the value through
    pub fn coerce(&self, type_name: &str, value: Token) -> Token {
        match self.coerce {
            Some(coerce) => coerce(type_name, value),
            None => value,
        }
    }
}

impl fmt::Debug for Reader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("len", &self.data.len())
            .field("base", &self.base)
            .field("position", &self.position)
            .field("mode", &self.mode)
            .field("coerce", &self.coerce.is_some())
            .finish()
    }
}
