mod list;
mod run;
mod stub;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

pub use list::ListCommand;
pub use run::{RunCommand, ScenarioOutcome};
pub use stub::StubCommand;

#[derive(Parser)]
#[command(name = "register-harness")]
#[command(about = "Integration checks for the reqres.in registration endpoint", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "REGISTER_HARNESS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run registration scenarios against the configured endpoint
    Run(RunCommand),

    /// List the available scenarios
    List(ListCommand),

    /// Serve a local stub of the registration endpoint
    Stub(StubCommand),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        }
        .apply_env_overrides();

        match self.command {
            Commands::Run(cmd) => cmd.execute(config).await,
            Commands::List(cmd) => cmd.execute(),
            Commands::Stub(cmd) => cmd.execute(config).await,
        }
    }
}
