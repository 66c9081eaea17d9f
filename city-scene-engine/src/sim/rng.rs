use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const DEFAULT_SEED: u64 = 0xC17C_0881_D15C_0BA1;

/// Single random source for all generation and recycling. Seedable through
/// the config so whole-city layouts are reproducible.
#[derive(Resource)]
pub struct CityRng(pub SmallRng);

impl CityRng {
    pub fn from_seed(seed: Option<u64>) -> Self {
        Self(SmallRng::seed_from_u64(seed.unwrap_or(DEFAULT_SEED)))
    }
}
