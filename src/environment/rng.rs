use rand::{rngs::SmallRng, Rng, RngCore, SeedableRng};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct MaybeSeededRng {
    pub seed: Option<u64>,
    #[serde(skip)]
    rng: SmallRng,
}

impl MaybeSeededRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = if let Some(seed) = seed {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_os_rng()
        };

        Self { seed, rng }
    }

    pub fn derive(&self, offset: u64) -> Self {
        Self::new(self.seed.map(|seed| seed.wrapping_add(offset)))
    }
}

impl RngCore for MaybeSeededRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.rng.fill_bytes(dst)
    }
}

/// Uniform draw over the closed interval [0, 1].
pub fn unit_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(0.0..=1.0)
}
