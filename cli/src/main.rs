//! campusctl - deploy and operate CampusConnect on Kubernetes

use std::process::ExitCode;

use campusctl::cli::Cli;
use campusctl::domain::error::{ConfigError, PreconditionError};
use campusctl::output::json;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let as_json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            report(&e, as_json);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &anyhow::Error, as_json: bool) {
    if as_json {
        let code = if e.downcast_ref::<PreconditionError>().is_some() {
            "precondition_failed"
        } else if e.downcast_ref::<ConfigError>().is_some() {
            "config_error"
        } else {
            "error"
        };
        if let Ok(text) = json::format_error(&format!("{e:#}"), code) {
            println!("{text}");
            return;
        }
    }
    eprintln!("Error: {e:#}");
}
