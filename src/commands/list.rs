use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::models::Scenario;

#[derive(Args)]
pub struct ListCommand {
    /// Print scenarios as JSON
    #[arg(long)]
    json: bool,
}

impl ListCommand {
    pub fn execute(self) -> Result<()> {
        let scenarios = Scenario::all();

        if self.json {
            let output = serde_json::to_string_pretty(&scenarios)
                .context("Failed to serialize scenarios")?;
            println!("{}", output);
            return Ok(());
        }

        for scenario in scenarios {
            println!("{:<18} {}", scenario.name.bold(), scenario.label);
            println!("{:<18} expects {}", "", scenario.expectation.to_string().dimmed());
        }

        Ok(())
    }
}
