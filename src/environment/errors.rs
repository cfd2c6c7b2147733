use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EnvironmentError {
    #[error("Arm {arm_id} out of range for an environment of {arm_count} arms")]
    ArmOutOfRange { arm_id: usize, arm_count: usize },
    #[error("Arm probability {0} outside of [0, 1]")]
    InvalidProbability(f64),
}
