use clap::{App, Arg};
use env_logger::Env;
use log::warn;
use nbtree::scan::LevelSummary;
use nbtree_tools::{format_epoch_millis, read_input, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct FileSummary<'a> {
    path: &'a Path,
    bytes: usize,
    #[serde(flatten)]
    summary: LevelSummary,
}

fn print_summary(s: &FileSummary) {
    println!("{} {} bytes", s.path.display(), s.bytes);

    let summary = &s.summary;
    if let Some(name) = &summary.level_name {
        println!("Name {}", name);
    }
    if let Some(time) = &summary.day_time {
        println!("{}", time);
    }
    if let Some(last) = summary.last_played {
        match format_epoch_millis(last) {
            Some(time) => println!("LastPlayed {}", time),
            None => println!("LastPlayed {} ms since epoch", last),
        }
    }
    // Upgraded worlds can have both.
    for seed in [summary.seed, summary.random_seed].iter().flatten() {
        println!("Seed {:20} Hex {:016x}", seed, seed);
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let matches = App::new("nbt-quickinfo")
        .about("Print the name, time and seed of level.dat files without fully decoding them")
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .help("print each summary as JSON"),
        )
        .arg(
            Arg::with_name("raw")
                .long("raw")
                .takes_value(false)
                .help("input is uncompressed NBT rather than GZip"),
        )
        .arg(
            Arg::with_name("FILE")
                .multiple(true)
                .required(true)
                .help("level.dat files"),
        )
        .get_matches();

    let json = matches.is_present("json");
    let raw = matches.is_present("raw");
    let files: Vec<PathBuf> = matches
        .values_of_os("FILE")
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .collect();

    let mut failed = false;

    for path in &files {
        let data = match read_input(path, raw) {
            Ok(data) => data,
            Err(e) => {
                warn!("failed to read {}: {}", path.display(), e);
                println!("{} is not a valid file: {}", path.display(), e);
                failed = true;
                continue;
            }
        };

        let summary = FileSummary {
            path,
            bytes: data.len(),
            summary: LevelSummary::scan(&data),
        };

        if json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            print_summary(&summary);
        }
    }

    if failed {
        std::process::exit(1);
    }

    Ok(())
}
