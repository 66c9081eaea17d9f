use crate::sim::windows::BatchInstance;
use bevy::math::{Vec2, Vec3};
use constants::layout::NEON_FACE_OFFSET;
use constants::palette::NEON_COLORS;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::f32::consts::{FRAC_PI_2, PI};

/// A batch of neon sign quads for one host surface. All signs in a batch
/// share one palette color and brightness tier.
#[derive(Debug, Clone)]
pub struct NeonLayout {
    pub instances: Vec<BatchInstance>,
    pub color: u32,
    pub intensity: f32,
    pub opacity: f32,
}

/// Scatter 3-7 signs over the four faces of a `width x depth x height`
/// volume. `enabled == false` yields no batch; the scene layer treats that
/// as an instruction to tear down any batch previously attached to the host
/// and drop it from the neon registry.
pub fn layout_neon_signs(
    rng: &mut SmallRng,
    width: f32,
    depth: f32,
    height: f32,
    enabled: bool,
) -> Option<NeonLayout> {
    if !enabled {
        return None;
    }
    let count = rng.random_range(3..=7);
    let color = *NEON_COLORS.choose(&mut *rng).unwrap_or(&0x00ffff);
    let intensity = 1.5 + rng.random::<f32>() * 1.0;
    let opacity = 0.6 + rng.random::<f32>() * 0.4;

    let mut instances = Vec::with_capacity(count);
    for _ in 0..count {
        let face = rng.random_range(0..4u8);
        let sign_height = rng.random::<f32>() * 7.0 + 2.0;
        let face_width = if face < 2 { width } else { depth };
        let sign_width = face_width * (rng.random::<f32>() * 0.6 + 0.2);
        let y = (rng.random::<f32>() - 0.5) * (height * 0.85);
        let (translation, yaw) = match face {
            0 => (Vec3::new(0.0, y, depth / 2.0 + NEON_FACE_OFFSET), 0.0),
            1 => (Vec3::new(0.0, y, -depth / 2.0 - NEON_FACE_OFFSET), PI),
            2 => (Vec3::new(width / 2.0 + NEON_FACE_OFFSET, y, 0.0), FRAC_PI_2),
            _ => (
                Vec3::new(-width / 2.0 - NEON_FACE_OFFSET, y, 0.0),
                -FRAC_PI_2,
            ),
        };
        instances.push(BatchInstance {
            translation,
            yaw,
            scale: Vec2::new(sign_width, sign_height),
        });
    }
    Some(NeonLayout {
        instances,
        color,
        intensity,
        opacity,
    })
}
