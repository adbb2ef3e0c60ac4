#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    if let Err(error) = umlview::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
