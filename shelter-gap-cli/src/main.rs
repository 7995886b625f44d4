//! Entry point for the `shelter-gap` command-line interface.
#![forbid(unsafe_code)]

use log::LevelFilter;

fn main() {
    init_logger();
    if let Err(err) = shelter_gap_cli::run() {
        eprintln!("shelter-gap: {err}");
        std::process::exit(1);
    }
}

/// Log at info level unless `RUST_LOG` says otherwise.
fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}
