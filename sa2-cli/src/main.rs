//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use sa2_cli::CliError;

fn main() {
    pretty_env_logger::init();
    match sa2_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("sa2: {err}");
            std::process::exit(1);
        }
    }
}
