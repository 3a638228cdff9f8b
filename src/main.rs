use std::process::ExitCode;

use clap::Parser;

use health_synth_lib::cli::Cli;

fn main() -> ExitCode {
    match health_synth_lib::run(Cli::parse()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("health-synth: {e}");
            ExitCode::FAILURE
        }
    }
}
