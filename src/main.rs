//! Binary entrypoint for the `filegate` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // A .env file may carry FILEGATE_* settings.
    dotenvy::dotenv().ok();

    match filegate::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
