use std::process::ExitCode;

fn main() -> ExitCode {
    classdoc::cli::run()
}
