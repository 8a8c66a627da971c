use std::io;
use std::process::ExitCode;

use clap::Parser;
use wash_find::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match wash_find::run(&cli, &mut out) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wash-find: {err:#}");
            ExitCode::FAILURE
        }
    }
}
