use std::process;

fn main() {
    if let Err(e) = gantry::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
