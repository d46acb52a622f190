use crate::{
    de::{decode_payload, from_bytes, from_bytes_with_opts, DecodeOpts},
    error::{Error, ErrorKind},
    test::builder::Builder,
    Tag,
};

fn sample() -> Vec<u8> {
    Builder::new()
        .start_compound("root")
        .byte("b", 1)
        .short("s", 2)
        .int("i", 3)
        .long("l", 4)
        .float("f", 5.0)
        .double("d", 6.0)
        .byte_array("ba", &[7, 8])
        .string("str", "nine")
        .start_list("list", Tag::Int, 2)
        .int_payload(10)
        .int_payload(11)
        .start_list("nodata", Tag::End, 2)
        .start_compound("inner")
        .start_list("compounds", Tag::Compound, 1)
        .int("x", 12)
        .end_compound()
        .end_compound()
        .int_array("ia", &[13])
        .long_array("la", &[14])
        .end_compound()
        .build()
}

#[test]
fn error_impls_sync_send() {
    fn i<T: Clone + Send + Sync + std::error::Error>(_: T) {}
    i(Error::unknown_tag(0, 13));
}

#[test]
fn sample_is_valid() {
    assert!(from_bytes(&sample()).is_ok());
}

#[test]
fn truncated_at_every_boundary() {
    let full = sample();

    for len in 0..full.len() {
        let err = from_bytes(&full[..len]).unwrap_err();
        assert!(
            err.is_truncated(),
            "len {}: expected truncation, got {}",
            len,
            err
        );
        assert!(err.offset() <= len, "len {}: offset {}", len, err.offset());
    }
}

#[test]
fn empty_input() {
    let err = from_bytes(&[]).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TruncatedInput {
            needed: 1,
            remaining: 0
        }
    );
}

#[test]
fn missing_end_of_compound() {
    let payload = Builder::new().start_compound("").int("a", 1).build();
    assert!(from_bytes(&payload).unwrap_err().is_truncated());
}

#[test]
fn partial_input_in_name() {
    let input = Builder::new().start_compound("some long name").build();
    assert!(from_bytes(&input[0..3]).unwrap_err().is_truncated());
}

#[test]
fn unknown_tag_in_compound() {
    let payload = Builder::new()
        .start_compound("")
        .int("a", 1)
        .raw_bytes(&[13])
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(13));
    assert_eq!(err.offset(), payload.len() - 1);
}

#[test]
fn unknown_list_element_tag() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::List)
        .name("l")
        .raw_bytes(&[0xff])
        .int_payload(0)
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::UnknownTagKind(0xff));
    assert_eq!(err.offset(), 1 + 2 + 1 + 2 + 1);
}

#[test]
fn negative_lengths() {
    for tag in [Tag::ByteArray, Tag::IntArray, Tag::LongArray] {
        let payload = Builder::new()
            .start_compound("")
            .tag(tag)
            .name("a")
            .int_payload(-1)
            .end_compound()
            .build();

        let err = from_bytes(&payload).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidLength(-1), "{:?}", tag);
        assert_eq!(err.offset(), 1 + 2 + 1 + 2 + 1, "{:?}", tag);
    }

    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::Byte, i32::MIN)
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidLength(i32::MIN));
}

#[test]
fn huge_lengths_rejected_before_allocating() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::LongArray)
        .name("a")
        .int_payload(i32::MAX)
        .end_compound()
        .build();

    assert!(from_bytes(&payload).unwrap_err().is_truncated());

    let payload = Builder::new()
        .start_compound("")
        .start_list("l", Tag::Compound, i32::MAX)
        .end_compound()
        .build();

    assert!(from_bytes(&payload).unwrap_err().is_truncated());
}

#[test]
fn list_of_end_then_end_tags_is_not_a_compound() {
    // A list of one End followed by an End tag: the End tag closes the root,
    // and the final End is trailing.
    let input = Builder::new()
        .start_compound("")
        .start_list("", Tag::End, 1)
        .tag(Tag::End)
        .end_compound()
        .build();

    let root = from_bytes(&input).unwrap();
    assert_eq!(root.value.as_compound().unwrap().len(), 1);
}

#[test]
fn invalid_utf8_name() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::Int)
        .raw_str_len(2)
        .raw_bytes(&[0xc3, 0x28])
        .int_payload(1)
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TextDecode(vec![0xc3, 0x28]));
    assert_eq!(err.offset(), 6);
}

#[test]
fn invalid_utf8_string_payload() {
    let payload = Builder::new()
        .start_compound("")
        .tag(Tag::String)
        .name("s")
        .raw_str_len(3)
        .raw_bytes(&[255, 255, 255])
        .end_compound()
        .build();

    let err = from_bytes(&payload).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TextDecode(_)));
}

#[test]
fn root_must_be_compound() {
    let payload = Builder::new().int("a", 1).build();
    let err = from_bytes(&payload).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::NoRootCompound(Tag::Int));
    assert_eq!(err.offset(), 0);
}

#[test]
fn descriptive_error_on_gzip_magic() {
    let err = from_bytes(&[0x1f, 0x8b, 0x08]).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::CompressedInput);
    assert!(err.to_string().to_lowercase().contains("gzip"));
}

#[test]
fn display_includes_offset() {
    let err = decode_payload(&[0, 0, 0], Tag::Int, 1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "truncated input: needed 4 bytes, 2 remaining at offset 1"
    );
}

#[test]
fn end_list_over_max_seq_len() {
    // Root compound, then a list of End claiming i32::MAX elements.
    let payload = Builder::new()
        .start_compound("")
        .start_list("nodata", Tag::End, i32::MAX)
        .end_compound()
        .build();

    let opts = DecodeOpts::new().max_seq_len(100);
    let err = from_bytes_with_opts(&payload, opts).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TooLong {
            len: i32::MAX as usize,
            max: 100
        }
    );
    // Tag, name length, list tag, name "nodata", element tag.
    assert_eq!(err.offset(), 3 + 1 + 2 + 6 + 1);
}

#[test]
fn max_seq_len_is_inclusive() {
    let payload = Builder::new()
        .start_compound("")
        .int_array("ia", &[1, 2])
        .start_list("l", Tag::Byte, 2)
        .byte_payload(1)
        .byte_payload(2)
        .end_compound()
        .build();

    assert!(from_bytes_with_opts(&payload, DecodeOpts::new().max_seq_len(2)).is_ok());

    let err = from_bytes_with_opts(&payload, DecodeOpts::new().max_seq_len(1)).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::TooLong { len: 2, max: 1 });
}
