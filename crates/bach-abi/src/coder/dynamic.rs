//! Length-prefixed coders: `bytes` and `string`

use primitive_types::U256;

use super::mismatch;
use crate::error::{AbiError, Result};
use crate::reader::Reader;
use crate::token::Token;
use crate::writer::Writer;

fn write_length_prefixed(writer: &mut Writer, data: &[u8]) {
    writer.append_u256(U256::from(data.len()));
    writer.append_padded(data);
}

fn read_length_prefixed<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8]> {
    let len = reader.read_usize()?;
    reader.read_bytes(len)
}

pub(super) fn encode_bytes(writer: &mut Writer, type_name: &str, value: &Token) -> Result<()> {
    match value {
        Token::Bytes(data) | Token::FixedBytes(data) => {
            write_length_prefixed(writer, data);
            Ok(())
        }
        other => Err(mismatch(type_name, other)),
    }
}

pub(super) fn decode_bytes(reader: &mut Reader<'_>) -> Result<Token> {
    Ok(Token::Bytes(read_length_prefixed(reader)?.to_vec()))
}

pub(super) fn encode_string(writer: &mut Writer, type_name: &str, value: &Token) -> Result<()> {
    match value {
        Token::String(s) => {
            write_length_prefixed(writer, s.as_bytes());
            Ok(())
        }
        other => Err(mismatch(type_name, other)),
    }
}

pub(super) fn decode_string(reader: &mut Reader<'_>, type_name: &str) -> Result<Token> {
    let data = read_length_prefixed(reader)?;
    match std::str::from_utf8(data) {
        Ok(s) => Ok(Token::String(s.to_string())),
        Err(e) if reader.mode().is_strict() => {
            Err(AbiError::invalid_data(type_name, format!("invalid UTF-8: {}", e)))
        }
        Err(e) => {
            tracing::warn!("Replacing invalid UTF-8 in string: {}", e);
            Ok(Token::String(String::from_utf8_lossy(data).into_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DecodeMode;

    #[test]
    fn test_encode_string_abc() {
        let mut writer = Writer::new();
        encode_string(&mut writer, "string", &Token::string("abc")).unwrap();
        let out = writer.finalize().unwrap();

        assert_eq!(out.len(), 64);
        assert_eq!(out[31], 3);
        assert_eq!(&out[32..35], b"abc");
        assert!(out[35..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_empty_bytes_is_one_word() {
        let mut writer = Writer::new();
        encode_bytes(&mut writer, "bytes", &Token::bytes(Vec::new())).unwrap();
        assert_eq!(writer.finalize().unwrap(), vec![0u8; 32]);
    }

    #[test]
    fn test_encode_exact_word_has_no_padding() {
        let mut writer = Writer::new();
        encode_bytes(&mut writer, "bytes", &Token::bytes(vec![7u8; 32])).unwrap();
        assert_eq!(writer.len(), 64);
    }

    #[test]
    fn test_decode_bytes() {
        let mut data = vec![0u8; 64];
        data[31] = 3;
        data[32..35].copy_from_slice(&[1, 2, 3]);
        let mut reader = Reader::new(&data);
        assert_eq!(decode_bytes(&mut reader).unwrap(), Token::bytes(vec![1, 2, 3]));
        assert_eq!(reader.consumed(), 64);
    }

    #[test]
    fn test_decode_bytes_length_past_end() {
        let mut data = vec![0u8; 64];
        data[31] = 33;
        let mut reader = Reader::new(&data);
        assert!(matches!(decode_bytes(&mut reader), Err(AbiError::BufferOverrun { .. })));
    }

    #[test]
    fn test_decode_string_invalid_utf8() {
        let mut data = vec![0u8; 64];
        data[31] = 2;
        data[32] = 0xff;
        data[33] = 0xfe;

        let mut strict = Reader::new(&data);
        assert!(matches!(
            decode_string(&mut strict, "string"),
            Err(AbiError::InvalidData { .. })
        ));

        let mut lenient = Reader::new(&data).with_mode(DecodeMode::Lenient);
        let token = decode_string(&mut lenient, "string").unwrap();
        assert_eq!(token.as_str().unwrap(), "\u{fffd}\u{fffd}");
    }

    #[test]
    fn test_string_rejects_bytes_token() {
        let mut writer = Writer::new();
        assert!(matches!(
            encode_string(&mut writer, "string", &Token::bytes(vec![1])),
            Err(AbiError::TypeMismatch { .. })
        ));
    }
}
