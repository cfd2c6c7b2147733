use super::agent::{check_not_empty, check_rate, Agent, AgentStats, AgentType, Round, RoundCounters};
use super::errors::AgentError;

use crate::environment::rng::{unit_draw, MaybeSeededRng};
use crate::environment::Environment;

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug, Serialize)]
pub struct LinearRewardAgent {
    label: String,
    alpha: f64,
    beta: f64,
    probabilities: Vec<f64>,
    counters: RoundCounters,
    #[serde(skip)]
    environment: Arc<Environment>,
    rng: MaybeSeededRng,
}

impl LinearRewardAgent {
    pub fn new(
        label: impl Into<String>,
        environment: Arc<Environment>,
        alpha: f64,
        beta: f64,
        seed: Option<u64>,
    ) -> Result<Self, AgentError> {
        let arm_count = validate(&environment, alpha, beta)?;

        Ok(Self {
            label: label.into(),
            alpha,
            beta,
            probabilities: uniform(arm_count),
            counters: RoundCounters::new(),
            environment,
            rng: MaybeSeededRng::new(seed),
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn reparameterize(
        &mut self,
        environment: Arc<Environment>,
        alpha: f64,
        beta: f64,
    ) -> Result<(), AgentError> {
        let arm_count = validate(&environment, alpha, beta)?;

        self.environment = environment;
        self.alpha = alpha;
        self.beta = beta;
        self.probabilities = uniform(arm_count);
        self.counters = RoundCounters::new();

        debug!(label = %self.label, alpha, beta, arm_count, "Reparameterized agent");
        Ok(())
    }

    fn reward(&mut self, arm_id: usize) {
        let alpha = self.alpha;
        self.probabilities
            .iter_mut()
            .enumerate()
            .for_each(|(index, probability)| {
                if index == arm_id {
                    *probability += alpha * (1.0 - *probability);
                } else {
                    *probability *= 1.0 - alpha;
                }
            });
    }

    fn penalize(&mut self, arm_id: usize) {
        let beta = self.beta;
        let share = beta / (self.probabilities.len() as f64 - 1.0);
        self.probabilities
            .iter_mut()
            .enumerate()
            .for_each(|(index, probability)| {
                if index == arm_id {
                    *probability *= 1.0 - beta;
                } else {
                    *probability = share + (1.0 - beta) * *probability;
                }
            });
    }
}

fn validate(environment: &Environment, alpha: f64, beta: f64) -> Result<usize, AgentError> {
    let arm_count = check_not_empty(environment)?;
    check_rate("alpha", alpha)?;
    check_rate("beta", beta)?;

    if beta > 0.0 && arm_count < 2 {
        return Err(AgentError::TooFewArms(arm_count));
    }
    Ok(arm_count)
}

fn uniform(arm_count: usize) -> Vec<f64> {
    vec![1.0 / arm_count as f64; arm_count]
}

/// First index whose cumulative probability reaches `draw`, or `None` when the
/// total falls short of it.
pub fn roulette_select(probabilities: &[f64], draw: f64) -> Option<usize> {
    probabilities
        .iter()
        .scan(0.0, |total, probability| {
            *total += probability;
            Some(*total)
        })
        .position(|total| total >= draw)
}

#[typetag::serialize]
impl Agent for LinearRewardAgent {
    fn label(&self) -> &str {
        &self.label
    }

    fn agent_type(&self) -> AgentType {
        AgentType::LinearReward {
            alpha: self.alpha,
            beta: self.beta,
        }
    }

    fn environment(&self) -> &Environment {
        &self.environment
    }

    fn select_arm(&mut self) -> Option<usize> {
        roulette_select(&self.probabilities, unit_draw(&mut self.rng))
    }

    fn exec_round(&mut self) -> Result<Round, AgentError> {
        let Some(arm_id) = self.select_arm() else {
            return Ok(Round::Skipped);
        };

        let optimal = self.environment.is_optimal(arm_id);
        let reward = self.environment.pull(arm_id, &mut self.rng)?;
        self.counters.record(reward, optimal);

        if reward == 1 {
            self.reward(arm_id);
        } else if self.beta > 0.0 {
            self.penalize(arm_id);
        }

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
        self.counters.cumulative_reward as f64 / self.counters.round_number as f64
    }

    fn optimal_rate(&self) -> f64 {
        self.counters.optimal_selections as f64 / self.counters.round_number as f64
    }

    fn reparameterize(
        &mut self,
        environment: Arc<Environment>,
        agent_type: AgentType,
    ) -> Result<(), AgentError> {
        match agent_type {
            AgentType::LinearReward { alpha, beta } => {
                LinearRewardAgent::reparameterize(self, environment, alpha, beta)
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
            rounds: self.counters.round_number,
            optimal_rate: self.optimal_rate(),
            reward_rate: self.reward_rate(),
            policy_title: "Agent Choices Probs",
            policy: self.probabilities.clone(),
            arm_probabilities: self.environment.describe_probabilities(),
        }
    }
}
