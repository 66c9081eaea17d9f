use crate::sim::pools::BuildingSlot;
use bevy::math::Vec3;
use constants::layout::{BILLBOARD_FACE_OFFSET, COMMERCIAL_ASPECT_RATIO};
use constants::palette::NEON_COLORS;
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BillboardKind {
    /// Bare glowing plane in a palette color.
    Neon { color: u32, opacity: f32 },
    /// Advert panel textured from the media manifest.
    Media {
        curved: bool,
        skew: f32,
        media_index: usize,
    },
}

/// Placement of one billboard on a host building, in building-local space.
/// Billboards ride their host through every recycle and are never moved
/// independently.
#[derive(Debug, Clone)]
pub struct BillboardPlan {
    pub building: usize,
    pub segment: usize,
    pub face: u8,
    pub width: f32,
    pub height: f32,
    pub kind: BillboardKind,
    pub local: Vec3,
    pub yaw: f32,
}

impl BillboardPlan {
    /// Building-local bounding box, slightly expanded, used to prune window
    /// instances the billboard would cover.
    pub fn occlusion_aabb(&self) -> (Vec3, Vec3) {
        let half_x = (self.yaw.cos().abs() * self.width / 2.0).max(0.2);
        let half_z = (self.yaw.sin().abs() * self.width / 2.0).max(0.2);
        let half_y = self.height / 2.0;
        let margin = 0.5;
        let half = Vec3::new(half_x + margin, half_y + margin, half_z + margin);
        (self.local - half, self.local + half)
    }
}

/// Pick hosts and faces for the whole billboard population. Tunnels and
/// small-footprint towers are skipped so panels never hang inside a
/// drive-through opening.
pub fn plan_billboards(
    rng: &mut SmallRng,
    buildings: &[BuildingSlot],
    neon_count: usize,
    media_count: usize,
) -> Vec<BillboardPlan> {
    let hosts: Vec<usize> = buildings
        .iter()
        .enumerate()
        .filter(|(_, slot)| {
            !slot.plan.is_tunnel() && slot.plan.base.width.max(slot.plan.base.depth) > 40.0
        })
        .map(|(index, _)| index)
        .collect();
    if hosts.is_empty() {
        return Vec::new();
    }

    let mut plans = Vec::with_capacity(neon_count + media_count);
    for _ in 0..neon_count {
        let Some(&building) = hosts.choose(&mut *rng) else {
            break;
        };
        let width = rng.random::<f32>() * 18.0 + 12.0;
        let height = rng.random::<f32>() * 10.0 + 6.0;
        let kind = BillboardKind::Neon {
            color: *NEON_COLORS.choose(&mut *rng).unwrap_or(&0xff00ff),
            opacity: 0.15 + rng.random::<f32>() * 0.3,
        };
        plans.push(place(rng, buildings, building, None, width, height, kind));
    }
    for media in 0..media_count {
        let Some(&building) = hosts.choose(&mut *rng) else {
            break;
        };
        let face = rng.random_range(0..4u8);
        let slot = &buildings[building];
        let segment = rng.random_range(0..slot.plan.segments.len());
        let dims = &slot.plan.segments[segment];
        let width = if face < 2 { dims.width } else { dims.depth };
        let height = width / COMMERCIAL_ASPECT_RATIO;
        let variation = rng.random::<f32>();
        let kind = BillboardKind::Media {
            curved: (0.33..0.66).contains(&variation),
            skew: if variation >= 0.66 {
                (rng.random::<f32>() - 0.5) * PI / 6.0
            } else {
                0.0
            },
            media_index: media,
        };
        plans.push(place(
            rng,
            buildings,
            building,
            Some((segment, face)),
            width,
            height,
            kind,
        ));
    }
    plans
}

fn place(
    rng: &mut SmallRng,
    buildings: &[BuildingSlot],
    building: usize,
    fixed: Option<(usize, u8)>,
    width: f32,
    height: f32,
    kind: BillboardKind,
) -> BillboardPlan {
    let slot = &buildings[building];
    let (segment, face) = fixed.unwrap_or_else(|| {
        (
            rng.random_range(0..slot.plan.segments.len()),
            rng.random_range(0..4u8),
        )
    });
    let dims = &slot.plan.segments[segment];
    let y0 = dims.offset.y - dims.height / 2.0;
    let y = y0 + rng.random::<f32>() * dims.height * 0.8 + dims.height * 0.1;

    let off = BILLBOARD_FACE_OFFSET;
    let (local, yaw) = match face {
        0 => (Vec3::new(0.0, y, dims.depth / 2.0 + off), 0.0),
        1 => (Vec3::new(0.0, y, -dims.depth / 2.0 - off), PI),
        2 => (Vec3::new(dims.width / 2.0 + off, y, 0.0), FRAC_PI_2),
        _ => (Vec3::new(-dims.width / 2.0 - off, y, 0.0), -FRAC_PI_2),
    };

    BillboardPlan {
        building,
        segment,
        face,
        width,
        height,
        kind,
        local,
        yaw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::pools::CityPools;
    use rand::SeedableRng;

    #[test]
    fn billboards_never_pick_tunnels() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(99);
        let pools = CityPools::populate(&config, &mut rng, 0.0);
        for slot in &pools.billboards {
            assert!(!pools.buildings[slot.plan.building].plan.is_tunnel());
        }
    }

    #[test]
    fn media_panels_keep_the_advert_aspect() {
        let config = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(5);
        let pools = CityPools::populate(&config, &mut rng, 0.0);
        for slot in &pools.billboards {
            if matches!(slot.plan.kind, BillboardKind::Media { .. }) {
                let expected = slot.plan.width / COMMERCIAL_ASPECT_RATIO;
                assert!((slot.plan.height - expected).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn occlusion_box_tracks_the_face_orientation() {
        let plan = BillboardPlan {
            building: 0,
            segment: 0,
            face: 2,
            width: 20.0,
            height: 10.0,
            kind: BillboardKind::Neon {
                color: 0xff00ff,
                opacity: 0.2,
            },
            local: Vec3::new(25.0, 40.0, 0.0),
            yaw: FRAC_PI_2,
        };
        let (min, max) = plan.occlusion_aabb();
        // side-face panel extends along Z, stays thin along X
        assert!(max.z - min.z > 20.0);
        assert!(max.x - min.x < 2.0);
    }
}
