#![no_main]
use libfuzzer_sys::fuzz_target;
use nbtree::DecodeOpts;

fuzz_target!(|data: &[u8]| {
    let _ = nbtree::from_bytes_with_opts(data, DecodeOpts::new().max_seq_len(100));
    let _ = nbtree::scan::LevelSummary::scan(data);
});
