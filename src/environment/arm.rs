use super::rng::unit_draw;

use rand::Rng;
use serde::Serialize;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Arm {
    probability: f64,
}

impl Arm {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut arm = Self { probability: 0.0 };
        arm.generate_probability(rng);
        arm
    }

    pub(super) fn with_probability(probability: f64) -> Self {
        Self { probability }
    }

    pub fn generate_probability<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.probability = unit_draw(rng);
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn pull<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.reward_for(unit_draw(rng))
    }

    pub fn reward_for(&self, draw: f64) -> u64 {
        (draw <= self.probability) as u64
    }
}
