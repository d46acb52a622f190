#![no_main]
use libfuzzer_sys::fuzz_target;
use nbtree::{DecodeOpts, Tag};

fuzz_target!(|input: (Tag, usize, &[u8])| {
    let (tag, cursor, data) = input;
    let cursor = cursor % (data.len() + 1);
    let opts = DecodeOpts::new().max_seq_len(100);

    if let Ok((_, end)) = nbtree::decode_payload_with_opts(data, tag, cursor, opts) {
        assert!(end >= cursor);
        assert!(end <= data.len());
    }
});
