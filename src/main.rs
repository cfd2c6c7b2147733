use bandit_sim::config::AppConfig;
use bandit_sim::driver;
use bandit_sim::errors::SimulationError;

use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SimulationError> {
    let config = AppConfig::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let summary = driver::run(&config)?;
    info!(id = %summary.id, "Experiments finished");

    Ok(())
}
