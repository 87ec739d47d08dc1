use std::process::ExitCode;

use addonkit::ui::output;

fn main() -> ExitCode {
    match addonkit::cli::run() {
        Ok(code) => code,
        Err(err) => {
            output::error(format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
