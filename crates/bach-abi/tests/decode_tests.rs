//! Decoding tests
//!
//! Strict and lenient handling of non-canonical words, malformed offsets and
//! lengths, offset relativity, named access and the coercion hook.

use bach_abi::{
    encode, parse_params, AbiCoder, AbiError, Address, CoderConfig, DecodeMode, ErrorKind, Param,
    Token, U256,
};

fn word(value: u64) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[24..].copy_from_slice(&value.to_be_bytes());
    out
}

fn params(types: &[&str]) -> Vec<Param> {
    parse_params(types).unwrap()
}

fn lenient() -> AbiCoder {
    init_tracing();
    AbiCoder::with_config(CoderConfig::lenient())
}

// Lenient acceptances are logged; RUST_LOG=bach_abi=warn shows them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Round trips through the public API
// =============================================================================

mod round_trip_tests {
    use super::*;

    #[test]
    fn int8_min_round_trips() {
        let types = params(&["int8"]);
        let data = encode(&types, &[Token::int(-128)]).unwrap();
        let decoded = AbiCoder::new().decode(&types, &data).unwrap();
        assert_eq!(decoded[0], Token::int(-128));
    }

    #[test]
    fn nested_composites_round_trip() {
        let types = params(&[
            "(uint8 id, string name)[2] people",
            "string[][] grid",
            "bytes32[2][] hashes",
            "(bool,(address,bytes))",
        ]);
        let values = vec![
            Token::FixedArray(vec![
                Token::Tuple(vec![Token::uint(1u64), Token::string("ann")]),
                Token::Tuple(vec![Token::uint(2u64), Token::string("bob")]),
            ]),
            Token::Array(vec![
                Token::Array(vec![Token::string("a"), Token::string("")]),
                Token::Array(vec![]),
            ]),
            Token::Array(vec![Token::FixedArray(vec![
                Token::FixedBytes(vec![1; 32]),
                Token::FixedBytes(vec![2; 32]),
            ])]),
            Token::Tuple(vec![
                Token::Bool(true),
                Token::Tuple(vec![Token::Address(Address::repeat_byte(7)), Token::bytes(vec![1, 2, 3])]),
            ]),
        ];

        let coder = AbiCoder::new();
        let data = coder.encode(&types, &values).unwrap();
        assert_eq!(data.len() % 32, 0);

        let decoded = coder.decode(&types, &data).unwrap();
        assert_eq!(decoded.as_slice(), values.as_slice());
        assert_eq!(decoded.by_name("grid").unwrap(), &values[1]);
    }

    #[test]
    fn zero_width_elements_round_trip() {
        let types = params(&["()[]"]);
        let values = vec![Token::Array(vec![Token::Tuple(vec![]), Token::Tuple(vec![])])];
        let data = encode(&types, &values).unwrap();
        assert_eq!(data, [word(32), word(2)].concat());
        assert_eq!(AbiCoder::new().decode(&types, &data).unwrap().into_tokens(), values);

        let types = params(&["[]", "()[3]", "uint8"]);
        let values = vec![
            Token::Array(vec![Token::Null; 3]),
            Token::FixedArray(vec![Token::Tuple(vec![]); 3]),
            Token::uint(4u64),
        ];
        let data = encode(&types, &values).unwrap();
        assert_eq!(AbiCoder::new().decode(&types, &data).unwrap().into_tokens(), values);
    }

    #[test]
    fn uint_tokens_decode_as_int_for_signed_types() {
        let types = params(&["int16"]);
        let data = encode(&types, &[Token::uint(300u64)]).unwrap();
        assert_eq!(AbiCoder::new().decode(&types, &data).unwrap()[0], Token::int(300));
    }
}

// =============================================================================
// Strict vs. lenient
// =============================================================================

mod mode_tests {
    use super::*;

    #[test]
    fn bool_word_two() {
        let data = word(2);
        let types = params(&["bool"]);

        let err = AbiCoder::new().decode(&types, &data).unwrap_err();
        assert!(matches!(err, AbiError::InvalidData { .. }));
        assert_eq!(lenient().decode(&types, &data).unwrap()[0], Token::Bool(true));
    }

    #[test]
    fn dirty_address_word() {
        let mut data = [0u8; 32];
        data[0] = 0xff;
        data[12..].copy_from_slice(Address::repeat_byte(0x22).as_bytes());
        let types = params(&["address"]);

        assert!(AbiCoder::new().decode(&types, &data).is_err());
        assert_eq!(
            lenient().decode(&types, &data).unwrap()[0],
            Token::Address(Address::repeat_byte(0x22))
        );
    }

    #[test]
    fn int_without_sign_extension() {
        // 0x80 in the low byte with zero high bytes is not a canonical int8
        let data = word(0x80);
        let types = params(&["int8"]);

        assert!(AbiCoder::new().decode(&types, &data).is_err());
        assert_eq!(lenient().decode(&types, &data).unwrap()[0], Token::int(-128));
    }

    #[test]
    fn dirty_fixed_bytes_padding() {
        let mut data = [0u8; 32];
        data[0] = 0xaa;
        data[31] = 1;
        let types = params(&["bytes1"]);

        assert!(AbiCoder::new().decode(&types, &data).is_err());
        assert_eq!(lenient().decode(&types, &data).unwrap()[0], Token::FixedBytes(vec![0xaa]));
    }

    #[test]
    fn mode_from_json_config() {
        let config = CoderConfig::from_json(r#"{"decode_mode": "lenient"}"#).unwrap();
        assert_eq!(config.decode_mode, DecodeMode::Lenient);
        let coder = AbiCoder::with_config(config);
        assert_eq!(coder.decode(&params(&["bool"]), &word(9)).unwrap()[0], Token::Bool(true));
    }
}

// =============================================================================
// Malformed input
// =============================================================================

mod malformed_tests {
    use super::*;

    #[test]
    fn short_input_is_buffer_overrun() {
        let err = AbiCoder::new().decode(&params(&["uint256"]), &[0u8; 31]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn offset_past_end() {
        let data = word(4096);
        let err = AbiCoder::new().decode(&params(&["string"]), &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn huge_offset_word() {
        let data = [0xffu8; 32];
        let err = AbiCoder::new().decode(&params(&["bytes"]), &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn length_past_end() {
        let data = [word(32), word(100), [0u8; 32]].concat();
        let err = AbiCoder::new().decode(&params(&["bytes"]), &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn array_count_past_end() {
        let data = [word(32), word(1_000_000)].concat();
        let err = AbiCoder::new().decode(&params(&["uint256[]"]), &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn zero_width_count_past_input() {
        let data = [word(32), word(1 << 40)].concat();
        let err = AbiCoder::new().decode(&params(&["()[]"]), &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);

        let err = AbiCoder::new().decode(&params(&["()[4294967296]"]), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);
    }

    #[test]
    fn invalid_utf8_string() {
        let mut content = [0u8; 32];
        content[0] = 0xc3;
        let data = [word(32), word(1), content].concat();
        let types = params(&["string"]);

        assert!(matches!(
            AbiCoder::new().decode(&types, &data),
            Err(AbiError::InvalidData { .. })
        ));
        assert_eq!(lenient().decode(&types, &data).unwrap()[0], Token::string("\u{fffd}"));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let data = [word(1), word(99)].concat();
        let decoded = AbiCoder::new().decode(&params(&["uint8"]), &data).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0], Token::uint(1u64));
    }
}

// =============================================================================
// Offset relativity
// =============================================================================

mod offset_tests {
    use super::*;

    fn nested() -> (Vec<Param>, Vec<Token>, Vec<u8>) {
        let types = params(&["uint256", "(uint256,bytes[])"]);
        let values = vec![
            Token::uint(5u64),
            Token::Tuple(vec![Token::uint(9u64), Token::Array(vec![Token::bytes(b"ab".to_vec())])]),
        ];
        let data = encode(&types, &values).unwrap();
        (types, values, data)
    }

    #[test]
    fn relocated_tuple_decodes_unchanged() {
        let (types, values, data) = nested();

        // Move the tuple one word further; only its own offset changes
        let mut moved = data[..64].to_vec();
        moved[32..64].copy_from_slice(&word(96));
        moved.extend_from_slice(&[0u8; 32]);
        moved.extend_from_slice(&data[64..]);

        let decoded = AbiCoder::new().decode(&types, &moved).unwrap();
        assert_eq!(decoded.as_slice(), values.as_slice());
    }

    #[test]
    fn corrupt_outer_offset_leaves_static_sibling() {
        let (types, _, mut data) = nested();
        data[32..64].copy_from_slice(&word(1 << 20));

        let err = AbiCoder::new().decode(&types, &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferOverrun);

        let sibling = AbiCoder::new().decode(&types[..1], &data).unwrap();
        assert_eq!(sibling[0], Token::uint(5u64));
    }

    #[test]
    fn corrupt_inner_offset_fails_only_inside_tuple() {
        let (types, _, mut data) = nested();
        // The tuple's offset to its array counts from the tuple head at 64
        data[96..128].copy_from_slice(&word(1 << 20));
        assert!(AbiCoder::new().decode(&types, &data).is_err());
    }
}

// =============================================================================
// Names and coercion
// =============================================================================

mod access_tests {
    use super::*;

    #[test]
    fn named_and_positional_access() {
        let types = params(&["address owner", "uint256 balance", "uint256 balance", "bool"]);
        let values = [
            Token::Address(Address::repeat_byte(1)),
            Token::uint(10u64),
            Token::uint(20u64),
            Token::Bool(true),
        ];
        let coder = AbiCoder::new();
        let decoded = coder.decode(&types, &coder.encode(&types, &values).unwrap()).unwrap();

        assert_eq!(decoded.by_name("owner").unwrap(), &values[0]);
        assert!(matches!(decoded.by_name("balance"), Err(AbiError::AmbiguousName(_))));
        assert!(matches!(decoded.by_name("nope"), Err(AbiError::UnknownName(_))));
        assert_eq!(decoded[2], Token::uint(20u64));
        assert_eq!(decoded.iter().count(), 4);
    }

    #[test]
    fn coercion_sees_canonical_type_names() {
        let coder = AbiCoder::new().with_coerce(|ty, value| match value {
            Token::Uint(v) if ty == "uint64" => Token::string(v.to_string()),
            Token::Address(_) if ty == "address" => Token::Null,
            other => other,
        });
        let types = params(&["uint64", "uint", "address", "(uint64,bool)"]);
        let values = [
            Token::uint(7u64),
            Token::uint(8u64),
            Token::Address(Address::zero()),
            Token::Tuple(vec![Token::uint(9u64), Token::Bool(false)]),
        ];
        let decoded = coder.decode(&types, &coder.encode(&types, &values).unwrap()).unwrap();

        assert_eq!(decoded[0], Token::string("7"));
        assert_eq!(decoded[1], Token::Uint(U256::from(8)));
        assert_eq!(decoded[2], Token::Null);
        assert_eq!(decoded[3], Token::Tuple(vec![Token::string("9"), Token::Bool(false)]));
    }
}
