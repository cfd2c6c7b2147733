use super::errors::AgentError;
use super::linear_reward::LinearRewardAgent;
use super::ucb::{EstimateUpdate, UcbAgent};

use crate::environment::Environment;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Round {
    /// No arm qualified during selection; nothing was mutated.
    Skipped,
    Played {
        arm_id: usize,
        reward: u64,
        optimal: bool,
    },
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum AgentType {
    LinearReward {
        alpha: f64,
        beta: f64,
    },
    Ucb {
        confidence: f64,
        #[serde(default)]
        estimate_update: EstimateUpdate,
    },
}

impl AgentType {
    pub fn name(&self) -> &'static str {
        match self {
            AgentType::LinearReward { .. } => "LinearReward",
            AgentType::Ucb { .. } => "Ucb",
        }
    }

    pub fn into_agent(
        self,
        label: impl Into<String>,
        environment: Arc<Environment>,
        seed: Option<u64>,
    ) -> Result<Box<dyn Agent>, AgentError> {
        let agent: Box<dyn Agent> = match self {
            AgentType::LinearReward { alpha, beta } => Box::new(LinearRewardAgent::new(
                label,
                environment,
                alpha,
                beta,
                seed,
            )?),
            AgentType::Ucb {
                confidence,
                estimate_update,
            } => Box::new(UcbAgent::new(
                label,
                environment,
                confidence,
                estimate_update,
                seed,
            )?),
        };
        Ok(agent)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct RoundCounters {
    pub cumulative_reward: u64,
    pub optimal_selections: u64,
    pub round_number: u64,
}

impl RoundCounters {
    pub fn new() -> Self {
        Self {
            cumulative_reward: 0,
            optimal_selections: 0,
            round_number: 1,
        }
    }

    pub fn record(&mut self, reward: u64, optimal: bool) {
        self.cumulative_reward += reward;
        self.optimal_selections += optimal as u64;
        self.round_number += 1;
    }
}

impl Default for RoundCounters {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AgentStats {
    pub label: String,
    pub optimal_selections: u64,
    pub cumulative_reward: u64,
    pub rounds: u64,
    pub optimal_rate: f64,
    pub reward_rate: f64,
    pub policy_title: &'static str,
    pub policy: Vec<f64>,
    pub arm_probabilities: Vec<f64>,
}

#[typetag::serialize(tag = "type")]
pub trait Agent: Send {
    fn label(&self) -> &str;
    fn agent_type(&self) -> AgentType;
    fn environment(&self) -> &Environment;
    fn select_arm(&mut self) -> Option<usize>;
    fn exec_round(&mut self) -> Result<Round, AgentError>;
    fn cumulative_reward(&self) -> u64;
    fn optimal_selections(&self) -> u64;
    fn round_number(&self) -> u64;
    fn reward_rate(&self) -> f64;
    fn optimal_rate(&self) -> f64;
    fn reparameterize(
        &mut self,
        environment: Arc<Environment>,
        agent_type: AgentType,
    ) -> Result<(), AgentError>;
    fn stats(&self) -> AgentStats;
}

pub(super) fn check_rate(name: &'static str, value: f64) -> Result<f64, AgentError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(AgentError::InvalidRate { name, value })
    }
}

pub(super) fn check_not_empty(environment: &Environment) -> Result<usize, AgentError> {
    match environment.arm_count() {
        0 => Err(AgentError::NoArms),
        arm_count => Ok(arm_count),
    }
}
