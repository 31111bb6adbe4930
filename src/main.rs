use std::process::ExitCode;

fn main() -> ExitCode {
    report_assistant_lib::run()
}
