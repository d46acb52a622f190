use flate2::read::GzDecoder;
use nbtree::Value;
use std::io::Read;

// Find the world seed in a level.dat, both by decoding the whole tree and by
// scanning for the field. The two should agree.
fn main() {
    let args: Vec<_> = std::env::args().skip(1).collect();
    let file = std::fs::File::open(args[0].clone()).unwrap();

    let mut decoder = GzDecoder::new(file);
    let mut data = vec![];
    decoder.read_to_end(&mut data).unwrap();

    let root = nbtree::from_bytes(&data).unwrap();
    let data_tag = root.value.get("Data");

    let decoded = data_tag
        .and_then(|d| d.get("WorldGenSettings"))
        .and_then(|w| w.get("seed"))
        .or_else(|| data_tag.and_then(|d| d.get("RandomSeed")))
        .and_then(Value::as_i64);

    let summary = nbtree::scan::LevelSummary::scan(&data);
    let scanned = summary.seed.or(summary.random_seed);

    println!("decoded: {:?}", decoded);
    println!("scanned: {:?}", scanned);
}
