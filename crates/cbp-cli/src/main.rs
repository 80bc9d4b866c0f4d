//! cBioPortal clinical export CLI.

use cbp_cli::cli::Cli;
use cbp_cli::logging::init_logging;
use cbp_cli::pipeline::run;
use cbp_model::TracingDiagnostics;
use clap::Parser;

mod summary;

use crate::summary::print_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli.run_config(), &TracingDiagnostics) {
        Ok(result) => {
            if !cli.quiet_summary {
                print_summary(&result);
            }
            0
        }
        Err(error) => {
            tracing::error!("clinical export failed: {error:#}");
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
