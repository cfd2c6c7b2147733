use crate::environment::errors::EnvironmentError;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("Environment has no arms to draw from")]
    NoArms,
    #[error("Penalty updates need at least 2 arms, environment has {0}")]
    TooFewArms(usize),
    #[error("Rate {name} = {value} outside of [0, 1]")]
    InvalidRate { name: &'static str, value: f64 },
    #[error("Confidence {0} must be finite and non-negative")]
    InvalidConfidence(f64),
    #[error("Agent {label} cannot be reparameterized as {requested}")]
    AgentTypeMismatch {
        label: String,
        requested: &'static str,
    },
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}
