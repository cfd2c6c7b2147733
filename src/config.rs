use crate::agents::EstimateUpdate;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    pub arm_count: usize,
    pub environments: usize,
    pub rounds: u64,
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReportConfig {
    pub dump_path: PathBuf,
    pub stats_path: PathBuf,
    pub summary_path: Option<PathBuf>,
    pub collect_iter_data: bool,
    pub collect_stats: bool,
    pub print_every: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UcbConfig {
    pub confidences: Vec<f64>,
    #[serde(default)]
    pub estimate_update: EstimateUpdate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LinearRewardConfig {
    pub rates: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub log_level: String,
    pub simulation: SimulationConfig,
    pub report: ReportConfig,
    pub ucb: Option<UcbConfig>,
    pub linear_reward: Option<LinearRewardConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config"))
            .add_source(Environment::with_prefix("BANDITS").separator("__"))
            .build()?;

        builder.try_deserialize()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
