use clap::{value_t, App, Arg};
use env_logger::Env;
use nbtree_tools::{dump_files, DumpOpts, Result, DEFAULT_MAX_SEQ_LEN};
use std::io::{self, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let default_max_seq_len = DEFAULT_MAX_SEQ_LEN.to_string();
    let matches = App::new("nbt-dump")
        .about("Print the tag tree of NBT files, such as level.dat")
        .arg(
            Arg::with_name("json")
                .long("json")
                .takes_value(false)
                .help("print each tree as JSON"),
        )
        .arg(
            Arg::with_name("raw")
                .long("raw")
                .takes_value(false)
                .help("input is uncompressed NBT rather than GZip"),
        )
        .arg(
            Arg::with_name("indent")
                .long("indent")
                .takes_value(true)
                .default_value("4")
                .help("spaces per level of nesting"),
        )
        .arg(
            Arg::with_name("max-seq-len")
                .long("max-seq-len")
                .takes_value(true)
                .default_value(&default_max_seq_len)
                .help("refuse files with longer lists or arrays"),
        )
        .arg(
            Arg::with_name("FILE")
                .multiple(true)
                .required(true)
                .help("files to dump"),
        )
        .get_matches();

    let opts = DumpOpts {
        json: matches.is_present("json"),
        raw: matches.is_present("raw"),
        indent: value_t!(matches, "indent", usize).unwrap_or_else(|e| e.exit()),
        max_seq_len: value_t!(matches, "max-seq-len", usize).unwrap_or_else(|e| e.exit()),
    };
    let files: Vec<PathBuf> = matches
        .values_of_os("FILE")
        .into_iter()
        .flatten()
        .map(PathBuf::from)
        .collect();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failed = dump_files(&mut out, &files, &opts)?;
    out.flush()?;

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
