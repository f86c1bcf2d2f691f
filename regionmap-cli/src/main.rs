//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = regionmap_cli::run() {
        eprintln!("regionmap: {err}");
        std::process::exit(1);
    }
}
