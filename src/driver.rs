use crate::agents::{Agent, AgentType, EstimateUpdate};
use crate::config::{AppConfig, LinearRewardConfig, SimulationConfig, UcbConfig};
use crate::environment::rng::MaybeSeededRng;
use crate::environment::Environment;
use crate::errors::SimulationError;
use crate::report;

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub const UCB_LABEL: &str = "UCB";
pub const PENALTY_LABEL: &str = "L(r-p)";
pub const INACTION_LABEL: &str = "L(r-i)";

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq)]
pub struct Rates {
    pub optimal: f64,
    pub reward: f64,
}

impl Rates {
    fn of(agent: &dyn Agent) -> Self {
        Self {
            optimal: agent.optimal_rate(),
            reward: agent.reward_rate(),
        }
    }

    fn add(&mut self, other: Rates) {
        self.optimal += other.optimal;
        self.reward += other.reward;
    }

    fn scaled(self, factor: f64) -> Self {
        Self {
            optimal: self.optimal * factor,
            reward: self.reward * factor,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct UcbResult {
    pub confidence: f64,
    pub rates: Rates,
}

#[derive(Clone, Debug, Serialize)]
pub struct LinearRewardPenaltyResult {
    pub alpha: f64,
    pub beta: f64,
    pub rates: Rates,
}

#[derive(Clone, Debug, Serialize)]
pub struct LinearRewardInactionResult {
    pub alpha: f64,
    pub rates: Rates,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct LinearRewardResults {
    pub penalty: Vec<LinearRewardPenaltyResult>,
    pub inaction: Vec<LinearRewardInactionResult>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExperimentSummary {
    pub id: Uuid,
    pub seed: Option<u64>,
    pub arm_count: usize,
    pub environments: usize,
    pub rounds: u64,
    pub ucb: Option<Vec<UcbResult>>,
    pub linear_reward: Option<LinearRewardResults>,
}

pub struct Driver<W: Write> {
    id: Uuid,
    simulation: SimulationConfig,
    print_every: u64,
    rng: MaybeSeededRng,
    agents_created: u64,
    dump: Option<W>,
}

impl<W: Write> Driver<W> {
    pub fn new(
        simulation: SimulationConfig,
        print_every: u64,
        dump: Option<W>,
    ) -> Result<Self, SimulationError> {
        if simulation.environments == 0 {
            return Err(SimulationError::InvalidConfig(
                "environments must be at least 1".to_string(),
            ));
        }
        if simulation.rounds == 0 {
            return Err(SimulationError::InvalidConfig(
                "rounds must be at least 1".to_string(),
            ));
        }
        if dump.is_some() && print_every == 0 {
            return Err(SimulationError::InvalidConfig(
                "print_every must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            rng: MaybeSeededRng::new(simulation.seed),
            simulation,
            print_every,
            agents_created: 0,
            dump,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn into_dump(self) -> Option<W> {
        self.dump
    }

    pub fn summary(
        &self,
        ucb: Option<Vec<UcbResult>>,
        linear_reward: Option<LinearRewardResults>,
    ) -> ExperimentSummary {
        ExperimentSummary {
            id: self.id,
            seed: self.simulation.seed,
            arm_count: self.simulation.arm_count,
            environments: self.simulation.environments,
            rounds: self.simulation.rounds,
            ucb,
            linear_reward,
        }
    }

    pub fn run_ucb(&mut self, config: &UcbConfig) -> Result<Vec<UcbResult>, SimulationError> {
        info!(id = %self.id, confidences = ?config.confidences, "Running UCB sweep");

        config
            .confidences
            .iter()
            .map(|&confidence| {
                let rates = self.run_trials(&[(
                    UCB_LABEL,
                    ucb_type(confidence, config.estimate_update),
                )])?;
                info!(
                    id = %self.id,
                    confidence,
                    optimal = rates[0].optimal,
                    reward = rates[0].reward,
                    "Finished UCB setting"
                );
                Ok::<_, SimulationError>(UcbResult {
                    confidence,
                    rates: rates[0],
                })
            })
            .collect()
    }

    // L(r-i) ignores beta, so its rates per alpha are averaged over the beta sweep
    pub fn run_linear_reward(
        &mut self,
        config: &LinearRewardConfig,
    ) -> Result<LinearRewardResults, SimulationError> {
        info!(id = %self.id, rates = ?config.rates, "Running linear reward grid");
        let mut results = LinearRewardResults::default();

        for &alpha in &config.rates {
            let mut inaction = Rates::default();

            for &beta in &config.rates {
                let rates = self.run_trials(&[
                    (PENALTY_LABEL, AgentType::LinearReward { alpha, beta }),
                    (INACTION_LABEL, AgentType::LinearReward { alpha, beta: 0.0 }),
                ])?;
                info!(
                    id = %self.id,
                    alpha,
                    beta,
                    optimal = rates[0].optimal,
                    reward = rates[0].reward,
                    "Finished L(r-p) setting"
                );

                results.penalty.push(LinearRewardPenaltyResult {
                    alpha,
                    beta,
                    rates: rates[0],
                });
                inaction.add(rates[1]);
            }

            results.inaction.push(LinearRewardInactionResult {
                alpha,
                rates: inaction.scaled(1.0 / config.rates.len() as f64),
            });
        }

        Ok(results)
    }

    fn next_agent_seed(&mut self) -> Option<u64> {
        self.agents_created += 1;
        self.rng.derive(self.agents_created).seed
    }

    // agents are built on the first environment and rebound for every later one
    fn run_trials(
        &mut self,
        specs: &[(&str, AgentType)],
    ) -> Result<Vec<Rates>, SimulationError> {
        let mut agents: Vec<Box<dyn Agent>> = Vec::with_capacity(specs.len());
        let mut totals = vec![Rates::default(); specs.len()];

        for trial in 0..self.simulation.environments {
            let environment = Arc::new(Environment::new(self.simulation.arm_count, &mut self.rng));
            debug!(id = %self.id, trial, optimal_arm = ?environment.optimal_arm(), "Starting trial");

            if agents.is_empty() {
                for (label, agent_type) in specs {
                    let seed = self.next_agent_seed();
                    agents.push(agent_type.clone().into_agent(
                        *label,
                        environment.clone(),
                        seed,
                    )?);
                }
            } else {
                for (agent, (_, agent_type)) in agents.iter_mut().zip(specs) {
                    agent.reparameterize(environment.clone(), agent_type.clone())?;
                }
            }

            for round in 1..=self.simulation.rounds {
                for agent in agents.iter_mut() {
                    agent.exec_round()?;
                }

                if let Some(dump) = self.dump.as_mut() {
                    if round % self.print_every == 0 {
                        for agent in &agents {
                            report::write_agent_stats(dump, &agent.stats())?;
                        }
                    }
                }
            }

            totals
                .iter_mut()
                .zip(&agents)
                .for_each(|(total, agent)| total.add(Rates::of(agent.as_ref())));
        }

        let factor = 1.0 / self.simulation.environments as f64;
        Ok(totals.into_iter().map(|total| total.scaled(factor)).collect())
    }
}

fn ucb_type(confidence: f64, estimate_update: EstimateUpdate) -> AgentType {
    AgentType::Ucb {
        confidence,
        estimate_update,
    }
}

pub fn run(config: &AppConfig) -> Result<ExperimentSummary, SimulationError> {
    let dump = if config.report.collect_iter_data {
        Some(BufWriter::new(File::create(&config.report.dump_path)?))
    } else {
        None
    };
    let mut driver = Driver::new(config.simulation.clone(), config.report.print_every, dump)?;
    info!(id = %driver.id(), seed = ?config.simulation.seed, "Starting experiments");

    let ucb = config
        .ucb
        .as_ref()
        .map(|ucb| driver.run_ucb(ucb))
        .transpose()?;
    let linear_reward = config
        .linear_reward
        .as_ref()
        .map(|linear_reward| driver.run_linear_reward(linear_reward))
        .transpose()?;
    let summary = driver.summary(ucb, linear_reward);

    if let Some(mut dump) = driver.into_dump() {
        dump.flush()?;
    }

    if config.report.collect_stats {
        let mut stats = BufWriter::new(File::create(&config.report.stats_path)?);
        if let Some(results) = &summary.linear_reward {
            report::write_linear_reward_tables(&mut stats, results)?;
        }
        if let Some(results) = &summary.ucb {
            report::write_ucb_table(&mut stats, results)?;
        }
        stats.flush()?;
        info!(path = %config.report.stats_path.display(), "Wrote statistics");
    }

    if let Some(path) = &config.report.summary_path {
        let mut out = BufWriter::new(File::create(path)?);
        report::write_summary(&mut out, &summary)?;
        out.flush()?;
        info!(path = %path.display(), "Wrote summary");
    }

    Ok(summary)
}
