//! dircert - directory certificate expiry auditor

use std::process::ExitCode;

fn main() -> ExitCode {
    match dircert_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "dircert aborted");
            dircert_cli::output::print_fatal(&e);
            ExitCode::FAILURE
        }
    }
}
