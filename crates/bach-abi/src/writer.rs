//! Word-aligned output buffer
//!
//! A [`Writer`] accumulates encoded segments and keeps a patch list of
//! reserved placeholder words. Placeholders hold offsets that are only known
//! once the data they point to has been laid out; every one of them must be
//! filled before [`Writer::finalize`].

use bytes::{BufMut, BytesMut};
use primitive_types::U256;

use crate::error::{AbiError, Result};

/// Size of an ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// A single 32-byte ABI word
pub type Word = [u8; WORD_SIZE];

/// Handle to a reserved placeholder word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(usize);

#[derive(Debug, Clone, Copy)]
struct Slot {
    position: usize,
    filled: bool,
}

/// ABI output buffer
#[derive(Debug, Default)]
pub struct Writer {
    buf: BytesMut,
    slots: Vec<Slot>,
}

impl Writer {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing was written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append one word
    pub fn append_word(&mut self, word: &Word) {
        self.buf.put_slice(word);
    }

    /// Append an integer as a big-endian word
    pub fn append_u256(&mut self, value: U256) {
        self.append_word(&u256_to_word(value));
    }

    /// Append `bytes` followed by zero padding to the next word boundary
    pub fn append_padded(&mut self, bytes: &[u8]) {
        self.put_padded(bytes, WORD_SIZE);
    }

    /// Append `bytes` followed by zero padding to a multiple of `alignment`
    pub fn append_aligned(&mut self, bytes: &[u8], alignment: usize) -> Result<()> {
        if alignment == 0 {
            return Err(AbiError::Internal("zero alignment".into()));
        }
        self.put_padded(bytes, alignment);
        Ok(())
    }

    fn put_padded(&mut self, bytes: &[u8], alignment: usize) {
        self.buf.put_slice(bytes);
        let padding = (alignment - bytes.len() % alignment) % alignment;
        self.buf.put_bytes(0, padding);
    }

    /// Splice a child writer in, returning the offset at which it starts
    ///
    /// Unfilled placeholders of the child move into this writer.
    pub fn append_child(&mut self, child: Writer) -> usize {
        let offset = self.buf.len();
        self.slots.extend(child.slots.into_iter().filter(|s| !s.filled).map(|s| Slot {
            position: s.position + offset,
            filled: false,
        }));
        self.buf.unsplit(child.buf);
        offset
    }

    /// Reserve a zeroed word to be filled later
    pub fn reserve_placeholder(&mut self) -> Placeholder {
        let position = self.buf.len();
        self.buf.put_bytes(0, WORD_SIZE);
        self.slots.push(Slot { position, filled: false });
        Placeholder(self.slots.len() - 1)
    }

    /// Write the value of a reserved placeholder
    pub fn fill(&mut self, placeholder: Placeholder, word: &Word) -> Result<()> {
        let slot = self
            .slots
            .get_mut(placeholder.0)
            .ok_or_else(|| AbiError::Internal(format!("unknown placeholder {}", placeholder.0)))?;
        if slot.filled {
            return Err(AbiError::Internal(format!("placeholder {} filled twice", placeholder.0)));
        }
        slot.filled = true;
        self.buf[slot.position..slot.position + WORD_SIZE].copy_from_slice(word);
        Ok(())
    }

    /// Linearize into the final byte buffer
    pub fn finalize(self) -> Result<Vec<u8>> {
        if let Some(slot) = self.slots.iter().find(|s| !s.filled) {
            return Err(AbiError::Internal(format!(
                "placeholder at byte {} never filled",
                slot.position
            )));
        }
        if self.buf.len() % WORD_SIZE != 0 {
            return Err(AbiError::Internal(format!(
                "output length {} is not word aligned",
                self.buf.len()
            )));
        }
        Ok(self.buf.to_vec())
    }
}

/// Convert U256 to a 32-byte big-endian word
pub fn u256_to_word(value: U256) -> Word {
    let mut word = [0u8; WORD_SIZE];
    value.to_big_endian(&mut word);
    word
}
