use std::process::ExitCode;

fn main() -> ExitCode {
    travel_cli::run()
}
