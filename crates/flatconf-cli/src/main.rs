use std::process::ExitCode;

fn main() -> ExitCode {
    flatconf_cli::run()
}
