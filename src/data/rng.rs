use bevy::prelude::*;
use noise::Perlin;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const WORLD_SEED: u64 = 8291;

pub struct RngPlugin;
impl Plugin for RngPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GlobalRng::default());
    }
}

#[derive(Resource)]
pub struct GlobalRng {
    pub uniform: Pcg64Mcg,
    pub perlin: Perlin,
}

impl Default for GlobalRng {
    fn default() -> Self {
        GlobalRng {
            uniform: Pcg64Mcg::seed_from_u64(WORLD_SEED),
            perlin: Perlin::new(WORLD_SEED as u32),
        }
    }
}

impl GlobalRng {
    /// Isotropic offset with every component in `[-scale, scale]`.
    pub fn jitter(&mut self, scale: f32) -> Vec3 {
        Vec3::new(
            self.uniform.random_range(-scale..=scale),
            self.uniform.random_range(-scale..=scale),
            self.uniform.random_range(-scale..=scale),
        )
    }

    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        self.uniform.random_range(min..max)
    }
}
