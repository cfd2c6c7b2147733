use super::arm::Arm;
use super::errors::EnvironmentError;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

#[derive(Clone, Debug, Serialize)]
pub struct Environment {
    arms: Vec<Arm>,
    optimal_arm: Option<usize>,
}

impl Environment {
    pub fn new<R: Rng + ?Sized>(arm_count: usize, rng: &mut R) -> Self {
        let arms = (0..arm_count).map(|_| Arm::new(rng)).collect();
        Self::from_arms(arms)
    }

    pub fn from_probabilities(probabilities: Vec<f64>) -> Result<Self, EnvironmentError> {
        let arms = probabilities
            .into_iter()
            .map(|probability| {
                if (0.0..=1.0).contains(&probability) {
                    Ok(Arm::with_probability(probability))
                } else {
                    Err(EnvironmentError::InvalidProbability(probability))
                }
            })
            .collect::<Result<Vec<Arm>, EnvironmentError>>()?;

        Ok(Self::from_arms(arms))
    }

    fn from_arms(arms: Vec<Arm>) -> Self {
        let optimal_arm = first_strict_argmax(arms.iter().map(Arm::probability));
        debug!(arm_count = arms.len(), ?optimal_arm, "Generated environment");

        Self { arms, optimal_arm }
    }

    pub fn arm_count(&self) -> usize {
        self.arms.len()
    }

    pub fn optimal_arm(&self) -> Option<usize> {
        self.optimal_arm
    }

    pub fn is_optimal(&self, arm_id: usize) -> bool {
        self.optimal_arm == Some(arm_id)
    }

    pub fn pull<R: Rng + ?Sized>(&self, arm_id: usize, rng: &mut R) -> Result<u64, EnvironmentError> {
        self.arms
            .get(arm_id)
            .map(|arm| arm.pull(rng))
            .ok_or(EnvironmentError::ArmOutOfRange {
                arm_id,
                arm_count: self.arms.len(),
            })
    }

    pub fn describe_probabilities(&self) -> Vec<f64> {
        self.arms.iter().map(Arm::probability).collect()
    }
}

/// Index of the first value strictly above the running maximum, which starts at zero.
///
/// Ties keep the earliest index. Returns `None` when no value is positive.
pub fn first_strict_argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .enumerate()
        .fold((None, 0.0), |(best, best_value), (index, value)| {
            if value > best_value {
                (Some(index), value)
            } else {
                (best, best_value)
            }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::rng::{unit_draw, MaybeSeededRng};

    const SEED: u64 = 1234;

    #[test]
    fn create() {
        let mut rng = MaybeSeededRng::new(Some(SEED));
        let environment = Environment::new(10, &mut rng);
        assert_eq!(environment.arm_count(), 10);
        assert_eq!(environment.describe_probabilities().len(), 10);
    }

    #[test]
    fn optimal_is_maximal() {
        let mut rng = MaybeSeededRng::new(Some(SEED));
        for arm_count in 1..20 {
            let environment = Environment::new(arm_count, &mut rng);
            let optimal = environment.optimal_arm().unwrap();
            let probabilities = environment.describe_probabilities();

            assert!(optimal < arm_count);
            assert!(probabilities
                .iter()
                .all(|&probability| probability <= probabilities[optimal]));
        }
    }

    #[test]
    fn optimal_first_wins_ties() {
        let environment = Environment::from_probabilities(vec![0.2, 0.7, 0.7, 0.1]).unwrap();
        assert_eq!(environment.optimal_arm(), Some(1));
        assert!(environment.is_optimal(1));
        assert!(!environment.is_optimal(2));
    }

    #[test]
    fn optimal_none() {
        let mut rng = MaybeSeededRng::new(Some(SEED));
        assert_eq!(Environment::new(0, &mut rng).optimal_arm(), None);

        let environment = Environment::from_probabilities(vec![0.0, 0.0]).unwrap();
        assert_eq!(environment.optimal_arm(), None);
        assert!(!environment.is_optimal(0));
    }

    #[test]
    fn two_arms() {
        let environment = Environment::from_probabilities(vec![0.9, 0.1]).unwrap();
        assert_eq!(environment.optimal_arm(), Some(0));

        let arms = &environment.arms;
        assert_eq!(arms[0].reward_for(0.5), 1);
        assert_eq!(arms[1].reward_for(0.5), 0);
    }

    #[test]
    fn pull() {
        let mut rng = MaybeSeededRng::new(Some(SEED));
        let environment = Environment::from_probabilities(vec![1.0, 0.0]).unwrap();

        assert_eq!(environment.pull(0, &mut rng), Ok(1));
        // a zero-probability arm only pays out on an exact zero draw
        let draw = unit_draw(&mut rng.clone());
        let expected = (draw <= 0.0) as u64;
        assert_eq!(environment.pull(1, &mut rng), Ok(expected));
    }

    #[test]
    fn pull_out_of_range() {
        let mut rng = MaybeSeededRng::new(Some(SEED));
        let environment = Environment::new(3, &mut rng);
        assert_eq!(
            environment.pull(3, &mut rng),
            Err(EnvironmentError::ArmOutOfRange {
                arm_id: 3,
                arm_count: 3
            })
        );
        assert!(!environment.is_optimal(3));
    }

    #[test]
    fn argmax() {
        assert_eq!(first_strict_argmax(vec![0.1, 0.4, 0.4]), Some(1));
        assert_eq!(first_strict_argmax(vec![0.0, -1.0]), None);
        assert_eq!(first_strict_argmax(Vec::new()), None);
    }

    #[test]
    fn invalid_probability() {
        assert_eq!(
            Environment::from_probabilities(vec![0.5, 1.5]).err(),
            Some(EnvironmentError::InvalidProbability(1.5))
        );
    }
}
