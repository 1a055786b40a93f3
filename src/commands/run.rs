use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;

use crate::api::{ApiError, RegistrationClient};
use crate::assertions::AssertionError;
use crate::config::Config;
use crate::models::Scenario;

#[derive(Args)]
pub struct RunCommand {
    /// Base URL of the API (overrides config and REGISTER_HARNESS_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Scenario to run; repeat to select several (default: all)
    #[arg(short, long = "scenario", value_name = "NAME")]
    scenarios: Vec<String>,
}

/// Result of one scenario run
#[derive(Debug)]
pub enum ScenarioOutcome {
    Passed,
    AssertionFailed(AssertionError),
    TransportFailed(ApiError),
    Errored(anyhow::Error),
}

impl ScenarioOutcome {
    pub fn from_result<T>(result: Result<T>) -> Self {
        match result {
            Ok(_) => ScenarioOutcome::Passed,
            Err(e) => match e.downcast::<AssertionError>() {
                Ok(assertion) => ScenarioOutcome::AssertionFailed(assertion),
                Err(e) => match e.downcast::<ApiError>() {
                    Ok(api) => ScenarioOutcome::TransportFailed(api),
                    Err(e) => ScenarioOutcome::Errored(e),
                },
            },
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, ScenarioOutcome::Passed)
    }
}

impl RunCommand {
    fn selected(&self) -> Result<Vec<Scenario>> {
        if self.scenarios.is_empty() {
            return Ok(Scenario::all().to_vec());
        }

        self.scenarios
            .iter()
            .map(|name| match Scenario::find(name) {
                Some(scenario) => Ok(scenario),
                None => bail!("Unknown scenario '{}'. Run `register-harness list` to see them", name),
            })
            .collect()
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        let scenarios = self.selected()?;
        let config = match self.base_url {
            Some(base_url) => config.with_base_url(base_url),
            None => config,
        };

        let client = RegistrationClient::new(&config)?;
        println!("Running {} scenario(s) against {}", scenarios.len(), client.register_url());
        println!();

        let mut failed = 0;
        for scenario in &scenarios {
            let outcome = ScenarioOutcome::from_result(scenario.execute(&client).await);

            match &outcome {
                ScenarioOutcome::Passed => {
                    println!("{} {}", "✓".green(), scenario.label);
                }
                ScenarioOutcome::AssertionFailed(e) => {
                    println!("{} {}: {}", "✗".red(), scenario.label, e);
                }
                ScenarioOutcome::TransportFailed(e) => {
                    println!("{} {}: {}", "!".yellow(), scenario.label, e);
                }
                ScenarioOutcome::Errored(e) => {
                    println!("{} {}: {:#}", "!".yellow(), scenario.label, e);
                }
            }

            if !outcome.is_passed() {
                failed += 1;
            }
        }

        println!();
        if failed > 0 {
            bail!("{} of {} scenario(s) failed", failed, scenarios.len());
        }

        println!("{}", format!("All {} scenario(s) passed", scenarios.len()).green());
        Ok(())
    }
}
