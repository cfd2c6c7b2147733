mod agent;
pub mod errors;
pub mod linear_reward;
pub mod ucb;

pub use agent::{Agent, AgentStats, AgentType, Round, RoundCounters};
pub use linear_reward::LinearRewardAgent;
pub use ucb::{EstimateUpdate, UcbAgent};
