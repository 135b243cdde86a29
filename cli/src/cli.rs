//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Deploy and operate the CampusConnect stack on Kubernetes
#[derive(Parser)]
#[command(
    name = "campusctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also honoured via `NO_COLOR`)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Configuration file (default: ./campusctl.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build images, apply manifests and print the endpoint
    Deploy,

    /// Deploy, then run the test suite and the connectivity check
    Test,

    /// Delete every applied resource
    Reset,

    /// Scale backend and gateway to zero replicas
    Pause,

    /// Scale backend and gateway back to one replica
    Resume,

    /// Print the application endpoint
    Endpoint,

    /// Show logs of pods that are not ready
    Diagnose(commands::diagnose::DiagnoseArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error on precondition failures, configuration errors, or
    /// unexpected failures outside the workflow stages.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            config,
            command,
        } = self;

        if matches!(command, Command::Version) {
            commands::version::run(json);
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, config },
        })?;

        match command {
            Command::Deploy => commands::deploy::run(&app).await,
            Command::Test => commands::test::run(&app).await,
            Command::Reset => commands::reset::run(&app).await,
            Command::Pause => commands::pause::run(&app).await,
            Command::Resume => commands::resume::run(&app).await,
            Command::Endpoint => commands::endpoint::run(&app).await,
            Command::Diagnose(args) => commands::diagnose::run(&app, &args).await,
            Command::Version => Ok(ExitCode::SUCCESS),
        }
    }
}
