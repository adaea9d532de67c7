use std::process::ExitCode;

use clap::Parser;

mod platform;

fn main() -> ExitCode {
    let cli = platform::cli::Cli::parse();
    match platform::run_app(cli) {
        Ok(report) if report.succeeded() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("docreel: {err:#}");
            ExitCode::FAILURE
        }
    }
}
