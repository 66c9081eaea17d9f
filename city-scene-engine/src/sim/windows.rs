use bevy::math::{Vec2, Vec3};
use constants::layout::{WINDOW_FACE_OFFSET, WINDOW_SPACING_X, WINDOW_SPACING_Y};
use constants::palette::WINDOW_LIT_COLORS;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::f32::consts::{FRAC_PI_2, PI};

/// One quad inside a batched mesh: position and yaw in the host's local
/// space, scale applied on top of the batch's base quad size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchInstance {
    pub translation: Vec3,
    pub yaw: f32,
    pub scale: Vec2,
}

/// Window grid for one box volume, partitioned into lit and dark instances
/// so each group renders as a single batch.
#[derive(Debug, Clone)]
pub struct WindowLayout {
    pub lit: Vec<BatchInstance>,
    pub dark: Vec<BatchInstance>,
    pub lit_color: u32,
}

impl WindowLayout {
    pub fn candidate_count(&self) -> usize {
        self.lit.len() + self.dark.len()
    }
}

/// Tile the four vertical faces of a `width x height x depth` volume with
/// window slots. Column count is derived from the width on every face, row
/// count from the height; each slot rolls lit vs dark independently.
pub fn layout_windows(
    rng: &mut SmallRng,
    width: f32,
    height: f32,
    depth: f32,
    margin: f32,
    lit_probability: f64,
) -> WindowLayout {
    let lit_color = *WINDOW_LIT_COLORS.choose(&mut *rng).unwrap_or(&0xffeeaa);
    let cols = ((width - margin * 2.0) / WINDOW_SPACING_X).floor() as i64;
    let rows = ((height - margin * 2.0) / WINDOW_SPACING_Y).floor() as i64;

    let mut layout = WindowLayout {
        lit: Vec::new(),
        dark: Vec::new(),
        lit_color,
    };
    if cols <= 0 || rows <= 0 {
        return layout;
    }

    for side in 0..4u8 {
        for i in 0..cols {
            for j in 0..rows {
                let x = -width / 2.0 + margin + i as f32 * WINDOW_SPACING_X;
                let y = -height / 2.0 + margin + j as f32 * WINDOW_SPACING_Y;
                let (translation, yaw) = match side {
                    0 => (Vec3::new(x, y, depth / 2.0 + WINDOW_FACE_OFFSET), 0.0),
                    1 => (Vec3::new(x, y, -depth / 2.0 - WINDOW_FACE_OFFSET), PI),
                    2 => (
                        Vec3::new(-width / 2.0 - WINDOW_FACE_OFFSET, y, x),
                        -FRAC_PI_2,
                    ),
                    _ => (Vec3::new(width / 2.0 + WINDOW_FACE_OFFSET, y, x), FRAC_PI_2),
                };
                let instance = BatchInstance {
                    translation,
                    yaw,
                    scale: Vec2::ONE,
                };
                if rng.random_bool(lit_probability) {
                    layout.lit.push(instance);
                } else {
                    layout.dark.push(instance);
                }
            }
        }
    }
    layout
}

/// Drop every instance whose position falls inside the axis-aligned box.
/// Returns how many were removed. Used when a billboard covers part of a
/// window batch.
pub fn prune_inside(instances: &mut Vec<BatchInstance>, min: Vec3, max: Vec3) -> usize {
    let before = instances.len();
    instances.retain(|instance| {
        let p = instance.translation;
        !(p.x >= min.x
            && p.x <= max.x
            && p.y >= min.y
            && p.y <= max.y
            && p.z >= min.z
            && p.z <= max.z)
    });
    before - instances.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn candidate_count_is_deterministic() {
        // 40x150x40 with margin 5: cols = floor(30/5) = 6, rows = floor(140/4) = 35,
        // four faces -> 840 slots regardless of the lit roll.
        for probability in [0.0, 0.15, 1.0] {
            let mut rng = SmallRng::seed_from_u64(9);
            let layout = layout_windows(&mut rng, 40.0, 150.0, 40.0, 5.0, probability);
            assert_eq!(layout.candidate_count(), 840);
        }
    }

    #[test]
    fn zero_probability_means_all_dark() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layout = layout_windows(&mut rng, 40.0, 150.0, 40.0, 5.0, 0.0);
        assert!(layout.lit.is_empty());
        assert_eq!(layout.dark.len(), 840);
    }

    #[test]
    fn same_seed_same_partition() {
        let a = layout_windows(&mut SmallRng::seed_from_u64(11), 60.0, 90.0, 30.0, 1.0, 0.15);
        let b = layout_windows(&mut SmallRng::seed_from_u64(11), 60.0, 90.0, 30.0, 1.0, 0.15);
        assert_eq!(a.lit, b.lit);
        assert_eq!(a.dark, b.dark);
    }

    #[test]
    fn degenerate_volume_yields_empty_layout() {
        let mut rng = SmallRng::seed_from_u64(1);
        let layout = layout_windows(&mut rng, 3.0, 150.0, 3.0, 5.0, 0.5);
        assert_eq!(layout.candidate_count(), 0);
    }

    #[test]
    fn prune_removes_exactly_the_contained_instances() {
        let mut rng = SmallRng::seed_from_u64(5);
        let layout = layout_windows(&mut rng, 40.0, 150.0, 40.0, 5.0, 0.0);
        let mut dark = layout.dark;
        let min = Vec3::new(-100.0, -80.0, 0.0);
        let max = Vec3::new(100.0, -40.0, 100.0);
        let expected = dark
            .iter()
            .filter(|i| {
                let p = i.translation;
                p.x >= min.x
                    && p.x <= max.x
                    && p.y >= min.y
                    && p.y <= max.y
                    && p.z >= min.z
                    && p.z <= max.z
            })
            .count();
        assert!(expected > 0);
        let removed = prune_inside(&mut dark, min, max);
        assert_eq!(removed, expected);
        assert_eq!(dark.len() + removed, 840);
    }
}
