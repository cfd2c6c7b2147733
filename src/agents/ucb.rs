use super::agent::{check_not_empty, Agent, AgentStats, AgentType, Round, RoundCounters};
use super::errors::AgentError;

use crate::environment::rng::MaybeSeededRng;
use crate::environment::{first_strict_argmax, Environment};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const INITIAL_ESTIMATE: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum EstimateUpdate {
    /// Running mean of the arm's own rewards: `estimate += (reward - estimate) / pulls`.
    #[default]
    IncrementalMean,
    /// `estimate += reward / round_number`, the historical formula whose baseline
    /// term was never assigned. Estimates only ever grow under this rule.
    AsFound,
}

#[derive(Clone, Debug, Serialize)]
pub struct UcbAgent {
    label: String,
    confidence: f64,
    estimate_update: EstimateUpdate,
    estimates: Vec<f64>,
    pulls: Vec<u64>,
    counters: RoundCounters,
    #[serde(skip)]
    environment: Arc<Environment>,
    rng: MaybeSeededRng,
}

impl UcbAgent {
    pub fn new(
        label: impl Into<String>,
        environment: Arc<Environment>,
        confidence: f64,
        estimate_update: EstimateUpdate,
        seed: Option<u64>,
    ) -> Result<Self, AgentError> {
        let arm_count = validate(&environment, confidence)?;

        Ok(Self {
            label: label.into(),
            confidence,
            estimate_update,
            estimates: vec![INITIAL_ESTIMATE; arm_count],
            pulls: vec![0; arm_count],
            counters: RoundCounters::new(),
            environment,
            rng: MaybeSeededRng::new(seed),
        })
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn estimates(&self) -> &[f64] {
        &self.estimates
    }

    pub fn pulls(&self) -> &[u64] {
        &self.pulls
    }

    pub fn reparameterize(
        &mut self,
        environment: Arc<Environment>,
        confidence: f64,
    ) -> Result<(), AgentError> {
        let arm_count = validate(&environment, confidence)?;

        self.environment = environment;
        self.confidence = confidence;
        self.estimates = vec![INITIAL_ESTIMATE; arm_count];
        self.pulls = vec![0; arm_count];
        self.counters = RoundCounters::new();

        debug!(label = %self.label, confidence, arm_count, "Reparameterized agent");
        Ok(())
    }

    // must run before the round counter moves on
    fn update_estimate(&mut self, arm_id: usize, reward: u64) {
        let reward = reward as f64;
        let estimate = &mut self.estimates[arm_id];

        match self.estimate_update {
            EstimateUpdate::IncrementalMean => {
                *estimate += (reward - *estimate) / self.pulls[arm_id] as f64;
            }
            EstimateUpdate::AsFound => {
                *estimate += reward / self.counters.round_number as f64;
            }
        }
    }

    fn completed_rounds(&self) -> u64 {
        self.counters.round_number - 1
    }
}

fn validate(environment: &Environment, confidence: f64) -> Result<usize, AgentError> {
    if !confidence.is_finite() || confidence < 0.0 {
        return Err(AgentError::InvalidConfidence(confidence));
    }
    check_not_empty(environment)
}

pub fn upper_confidence_scores(
    estimates: &[f64],
    pulls: &[u64],
    confidence: f64,
    round_number: u64,
) -> Vec<f64> {
    let log_round = (round_number as f64).ln();
    estimates
        .iter()
        .zip(pulls)
        .map(|(estimate, &count)| estimate + confidence * (log_round / (count as f64 + 1.0)).sqrt())
        .collect()
}

#[typetag::serialize]
impl Agent for UcbAgent {
    fn label(&self) -> &str {
        &self.label
    }

    fn agent_type(&self) -> AgentType {
        AgentType::Ucb {
            confidence: self.confidence,
            estimate_update: self.estimate_update,
        }
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn select_arm(&mut self) -> Option<usize> {
        first_strict_argmax(upper_confidence_scores(
            &self.estimates,
            &self.pulls,
            self.confidence,
            self.counters.round_number,
        ))
    }

    fn exec_round(&mut self) -> Result<Round, AgentError> {
        let Some(arm_id) = self.select_arm() else {
            return Ok(Round::Skipped);
        };

        let optimal = self.environment.is_optimal(arm_id);
        let reward = self.environment.pull(arm_id, &mut self.rng)?;

        self.pulls[arm_id] += 1;
        self.update_estimate(arm_id, reward);
        self.counters.record(reward, optimal);

        Ok(Round::Played {
            arm_id,
            reward,
            optimal,
        })
    }

    fn cumulative_reward(&self) -> u64 {
        self.counters.cumulative_reward
    }

    fn optimal_selections(&self) -> u64 {
        self.counters.optimal_selections
    }

    fn round_number(&self) -> u64 {
        self.counters.round_number
    }

    fn reward_rate(&self) -> f64 {
        match self.completed_rounds() {
            0 => 0.0,
            rounds => self.counters.cumulative_reward as f64 / rounds as f64,
        }
    }

    fn optimal_rate(&self) -> f64 {
        match self.completed_rounds() {
            0 => 0.0,
            rounds => self.counters.optimal_selections as f64 / rounds as f64,
        }
    }

    fn reparameterize(
        &mut self,
        environment: Arc<Environment>,
        agent_type: AgentType,
    ) -> Result<(), AgentError> {
        match agent_type {
            AgentType::Ucb {
                confidence,
                estimate_update,
            } => {
                UcbAgent::reparameterize(self, environment, confidence)?;
                self.estimate_update = estimate_update;
                Ok(())
            }
            other => Err(AgentError::AgentTypeMismatch {
                label: self.label.clone(),
                requested: other.name(),
            }),
        }
    }

    fn stats(&self) -> AgentStats {
        AgentStats {
            label: self.label.clone(),
            optimal_selections: self.counters.optimal_selections,
            cumulative_reward: self.counters.cumulative_reward,
            rounds: self.completed_rounds(),
            optimal_rate: self.optimal_rate(),
            reward_rate: self.reward_rate(),
            policy_title: "Estimated Arm Probs",
            policy: self.estimates.clone(),
            arm_probabilities: self.environment.describe_probabilities(),
        }
    }
}
