mod app;

use std::env;
use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    app::init_tracing();

    let args = env::args().skip(1).collect::<Vec<_>>();
    match app::build_app(&args) {
        Ok(app::Startup::Run(wiring)) => app::run(wiring),
        Ok(app::Startup::Help(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(app::BootstrapError::Usage(message)) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
