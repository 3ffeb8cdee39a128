use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// The one random source of the simulation. Seeded runs replay exactly.
#[derive(Resource, Debug, Clone)]
pub struct GameRng {
    rng: StdRng,
}

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniformly distributed unit vector.
    pub fn direction(&mut self) -> Vec2 {
        let angle = self.unit() * std::f32::consts::TAU;
        Vec2::from_angle(angle)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
