use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use pan115_browser_lib::cli::Cli;
use pan115_browser_lib::commands::ErrorResponse;
use pan115_browser_lib::pan::PanError;

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => println!(r#"{{"success": false, "error": "serialize: {}"}}"#, e),
    }
}

fn fail(err: &PanError) -> ExitCode {
    print_json(&ErrorResponse::from(err));
    ExitCode::FAILURE
}

/// Exit code after printing --help / --version
fn display_exit_code(printed: std::io::Result<()>) -> ExitCode {
    match printed {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("failed to write help: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => return display_exit_code(e.print()),
        Err(e) => return fail(&PanError::Usage(e.to_string().trim().to_string())),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match pan115_browser_lib::run(&cli).await {
        Ok(response) => {
            print_json(&response);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{}", err);
            fail(&err)
        }
    }
}
