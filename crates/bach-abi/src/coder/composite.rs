//! Arrays and tuples: the head/tail layout
//!
//! A sequence of members is laid out as a head with one slot per member,
//! followed by a tail. Static members sit inline in the head. Dynamic
//! members put an offset in their slot and their content in the tail; the
//! offset counts from the start of the sequence's own head.

use primitive_types::U256;

use super::{mismatch, Coder};
use crate::error::{AbiError, Result};
use crate::reader::Reader;
use crate::token::Token;
use crate::writer::{u256_to_word, Writer};

/// Encode members as head then tail
pub(super) fn pack<'c, 't>(
    writer: &mut Writer,
    members: impl IntoIterator<Item = (&'c Coder, &'t Token)>,
) -> Result<()> {
    let mut head = Writer::new();
    let mut tail = Writer::new();
    let mut offsets = Vec::new();

    for (coder, value) in members {
        if coder.is_dynamic() {
            let slot = head.reserve_placeholder();
            let mut content = Writer::new();
            coder.encode(&mut content, value)?;
            offsets.push((slot, tail.append_child(content)));
        } else {
            coder.encode(&mut head, value)?;
        }
    }

    // Offsets are only known once the head is complete
    let head_len = head.len();
    for (slot, tail_offset) in offsets {
        head.fill(slot, &u256_to_word(U256::from(head_len + tail_offset)))?;
    }

    writer.append_child(head);
    writer.append_child(tail);
    Ok(())
}

/// Decode members laid out by [`pack`], starting at the reader's cursor
///
/// Dynamic members are read through sub-readers; the cursor itself only
/// moves past their head slots.
pub(super) fn unpack<'c>(
    reader: &mut Reader<'_>,
    coders: impl IntoIterator<Item = &'c Coder>,
) -> Result<Vec<Token>> {
    let base = reader.sub_reader_at(reader.consumed())?;
    let mut values = Vec::new();

    for coder in coders {
        let value = if coder.is_dynamic() {
            let offset = reader.read_usize()?;
            let mut content = base.sub_reader_at(offset)?;
            coder.decode(&mut content)?
        } else {
            coder.decode(reader)?
        };
        values.push(value);
    }

    Ok(values)
}

pub(super) fn encode_array(
    writer: &mut Writer,
    label: &str,
    type_name: &str,
    element: &Coder,
    length: Option<usize>,
    value: &Token,
) -> Result<()> {
    let items = match value {
        Token::Array(items) | Token::FixedArray(items) => items,
        other => return Err(mismatch(type_name, other)),
    };

    match length {
        Some(expected) if items.len() != expected => {
            return Err(AbiError::invalid_argument(
                label,
                type_name,
                format!("expected {} elements, got {}", expected, items.len()),
            ));
        }
        Some(_) => {}
        None => writer.append_u256(U256::from(items.len())),
    }

    pack(writer, items.iter().map(|item| (element, item)))
}

pub(super) fn decode_array(
    reader: &mut Reader<'_>,
    element: &Coder,
    length: Option<usize>,
) -> Result<Token> {
    let count = match length {
        Some(count) => count,
        None => reader.read_usize()?,
    };
    // Reject counts the remaining input cannot possibly hold
    reader.ensure_elements(count, element.head_size())?;

    let items = unpack(reader, std::iter::repeat(element).take(count))?;
    Ok(match length {
        Some(_) => Token::FixedArray(items),
        None => Token::Array(items),
    })
}
