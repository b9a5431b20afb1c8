use clap::Parser;
use std::process::ExitCode;
use verstamp_cli::args::Args;
use verstamp_cli::{logging, presentation};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    match verstamp_cli::execute(&args) {
        Ok(result) => {
            presentation::print_errors(&result.errors);
            if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Application Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
