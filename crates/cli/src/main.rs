//! plansim binary entrypoint.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use plansim_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = plansim_cli::logging::init(cli.global.log_format) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(async {
        let mut stdout = io::stdout().lock();
        tokio::select! {
            result = plansim_cli::run(cli, &mut stdout) => result,
            _ = tokio::signal::ctrl_c() => {
                Err(anyhow::anyhow!("interrupted; work already submitted keeps running on the server"))
            }
        }
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
