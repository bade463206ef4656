use std::process::ExitCode;

use confcopy::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = confcopy::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
