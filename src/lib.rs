pub mod cli;
pub mod config;
pub mod control;
pub mod dispatch;
pub mod identity;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod ui;
pub mod watch;

#[cfg(test)]
mod test_support;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
