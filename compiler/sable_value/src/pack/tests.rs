use super::*;
use crate::value::Value;
use pretty_assertions::assert_eq;

fn parse(text: &str) -> PackFormat {
    match PackFormat::parse(text) {
        Ok(format) => format,
        Err(e) => panic!("bad format {text:?}: {e}"),
    }
}

#[test]
fn test_parse_little_endian_short_uint_cstring() {
    let format = parse("<hI12s");
    assert_eq!(format.endianness, Endianness::Little);
    assert_eq!(
        format.items,
        vec![
            PackItem {
                item_type: PackType::Short,
                count: 1
            },
            PackItem {
                item_type: PackType::UInteger,
                count: 1
            },
            PackItem {
                item_type: PackType::CString,
                count: 12
            },
        ]
    );
    assert_eq!(format.length(), 3);
    assert_eq!(format.byte_len(), Ok(18));
}

#[test]
fn test_parse_whitespace_and_counts() {
    let format = parse("  > 3i 2x  10p ?");
    assert_eq!(format.endianness, Endianness::Big);
    assert_eq!(format.items.len(), 4);
    assert_eq!(format.items[0].count, 3);
    assert_eq!(format.length(), 5);
    assert_eq!(format.to_string(), ">3i2x10p?");
}

#[test]
fn test_count_applies_to_next_code_only() {
    let format = parse("4hq");
    assert_eq!(format.items[0].count, 4);
    assert_eq!(format.items[1].count, 1);
}

#[test]
fn test_aliases_normalize() {
    let format = parse("lLe");
    assert_eq!(format.to_string(), "iIf");
    assert_eq!(parse("@i").endianness, Endianness::Native);
    assert_eq!(parse("!i").endianness, Endianness::Network);
    assert_eq!(parse("!i").to_string(), "!i");
}

#[test]
fn test_parse_errors() {
    assert_eq!(
        PackFormat::parse("<hz"),
        Err(PackError::UnexpectedChar {
            ch: 'z',
            position: 2
        })
    );
    assert_eq!(PackFormat::parse("h12"), Err(PackError::DanglingCount));
    assert_eq!(
        PackFormat::parse("h<"),
        Err(PackError::MisplacedEndianness {
            marker: '<',
            position: 1
        })
    );
    assert_eq!(
        PackFormat::parse("0s"),
        Err(PackError::InvalidCount { position: 1 })
    );
    assert!(PackFormat::parse("99999999999999999999999s").is_err());
    assert!(PackError::DanglingCount.is_format_error());
    assert!(!PackError::DanglingCount.to_string().is_empty());
}

#[test]
fn test_pack_unpack_mixed_little_endian() {
    let format = parse("<hI12s");
    let values = vec![Value::Int(-2), Value::Int(7), Value::string("hello")];
    let Ok(bytes) = pack(&format, &values) else {
        panic!("pack failed");
    };
    let mut expected = vec![0xfe, 0xff, 0x07, 0x00, 0x00, 0x00];
    expected.extend_from_slice(b"hello\0\0\0\0\0\0\0");
    assert_eq!(bytes, expected);
    assert_eq!(unpack(&format, &bytes), Ok(values));
}

#[test]
fn test_big_endian_layout() {
    let format = parse(">Hi");
    assert_eq!(
        pack(&format, &[Value::Int(0x0102), Value::Int(-1)]),
        Ok(vec![0x01, 0x02, 0xff, 0xff, 0xff, 0xff])
    );
}

#[test]
fn test_strings_truncate_and_pad() {
    let format = parse("<3s5p3p");
    let values = vec![
        Value::string("abcdef"),
        Value::string("hi"),
        Value::string("hello"),
    ];
    let Ok(bytes) = pack(&format, &values) else {
        panic!("pack failed");
    };
    assert_eq!(bytes, b"abc\x02hi\0\0\x02he".to_vec());
    assert_eq!(
        unpack(&format, &bytes),
        Ok(vec![
            Value::string("abc"),
            Value::string("hi"),
            Value::string("he"),
        ])
    );
}

#[test]
fn test_padding_consumes_no_values() {
    let format = parse("<B2xB");
    assert_eq!(format.length(), 2);
    let Ok(bytes) = pack(&format, &[Value::Int(1), Value::Int(2)]) else {
        panic!("pack failed");
    };
    assert_eq!(bytes, vec![1, 0, 0, 2]);
    assert_eq!(unpack(&format, &bytes), Ok(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn test_bool_char_and_floats() {
    let format = parse("<?cfd");
    let values = vec![
        Value::Bool(true),
        Value::string("é"),
        Value::Float(1.5),
        Value::Float(-0.25),
    ];
    let Ok(bytes) = pack(&format, &values) else {
        panic!("pack failed");
    };
    assert_eq!(&bytes[..3], &[1, 0xe9, 0x00]);
    assert_eq!(unpack(&format, &bytes), Ok(values));
}

#[test]
fn test_pack_value_errors() {
    let format = parse("bh");
    assert_eq!(
        pack(&format, &[Value::Int(1)]),
        Err(PackError::ValueCount {
            expected: 2,
            got: 1
        })
    );
    assert_eq!(
        pack(&format, &[Value::Int(200), Value::Int(1)]),
        Err(PackError::OutOfRange {
            index: 0,
            expected: "signed byte"
        })
    );
    assert_eq!(
        pack(&format, &[Value::Int(1), Value::string("x")]),
        Err(PackError::ValueType {
            index: 1,
            expected: "short",
            found: "string"
        })
    );
    assert!(matches!(
        pack(&parse("c"), &[Value::string("ab")]),
        Err(PackError::ValueType { .. })
    ));
}

#[test]
fn test_unpack_errors() {
    assert_eq!(
        unpack(&parse("<i"), &[1, 2]),
        Err(PackError::Truncated {
            needed: 4,
            available: 2
        })
    );
    assert_eq!(
        unpack(&parse("<Q"), &[0xff; 8]),
        Err(PackError::Overflow {
            expected: "unsigned long"
        })
    );
    assert_eq!(unpack(&parse("<I"), &[0xff; 4]), Ok(vec![Value::Int(4_294_967_295)]));
}

#[test]
fn test_oversized_layouts_are_rejected() {
    let overflowing = parse("3000000000000000000q");
    assert_eq!(overflowing.byte_len(), Err(PackError::TooLarge));
    assert_eq!(unpack(&overflowing, &[]), Err(PackError::TooLarge));

    let huge_padding = parse("1000000000000000000x");
    assert_eq!(pack(&huge_padding, &[]), Err(PackError::TooLarge));
    assert_eq!(unpack(&parse("<i 18446744073709551615x"), &[0; 4]), Err(PackError::TooLarge));
    assert!(PackError::TooLarge.is_format_error());

    let at_limit = format!("{MAX_LAYOUT_BYTES}x");
    assert_eq!(parse(&at_limit).byte_len(), Ok(MAX_LAYOUT_BYTES));
    let past_limit = format!("{}x", MAX_LAYOUT_BYTES + 1);
    assert_eq!(parse(&past_limit).byte_len(), Err(PackError::TooLarge));
}

mod proptest_roundtrip {
    use super::*;
    use proptest::prelude::*;

    fn item() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec![
                '?', 'c', 'b', 'B', 'h', 'H', 'i', 'I', 'q', 'Q', 'f', 'd', 's', 'p', 'P', 'x',
            ]),
            prop::option::of(1usize..40),
        )
            .prop_map(|(code, count)| match count {
                Some(n) => format!("{n}{code}"),
                None => code.to_string(),
            })
    }

    fn format_text() -> impl Strategy<Value = String> {
        (
            prop::sample::select(vec!["", "<", ">", "@", "!"]),
            prop::collection::vec(item(), 0..10),
        )
            .prop_map(|(marker, items)| format!("{marker}{}", items.join(" ")))
    }

    proptest! {
        #[test]
        fn display_reparses_to_same_items(text in format_text()) {
            let parsed = PackFormat::parse(&text);
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap_or_default();
            let reparsed = PackFormat::parse(&parsed.to_string());
            prop_assert_eq!(reparsed, Ok(parsed));
        }
    }
}
