use crate::config::SimConfig;
use crate::engine::scene::bindings::{NeonRegistry, RenderBindings};
use crate::sim::billboards::BillboardKind;
use crate::sim::fade::FadeBand;
use crate::sim::pools::CityPools;
use crate::sim::rng::CityRng;
use crate::sim::viewpoint::Viewpoint;
use bevy::prelude::*;
use constants::palette::{NEON_COLORS, srgb_components};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Drive every tracked material's opacity from its owner's depth, scaling
/// the captured base alpha so the recycle boundary is always crossed at
/// zero opacity. Also services the recycle-time material reset: colors and
/// alphas snap back to their generation-time values before the fade factor
/// is reapplied.
pub fn apply_depth_fades(
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
    mut pools: ResMut<CityPools>,
    bindings: Res<RenderBindings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let band = FadeBand::from_config(&config.misc);
    let cam_z = viewpoint.position.z;

    for (index, slot) in pools.buildings.iter_mut().enumerate() {
        let Some(binding) = bindings.buildings.get(index) else {
            continue;
        };
        let factor = band.factor(slot.position.z - cam_z);
        let reset = slot.needs_material_reset;
        slot.needs_material_reset = false;
        for target in &binding.fade_targets {
            if let Some(material) = materials.get_mut(&target.material) {
                if reset {
                    material.base_color = target.base_color;
                }
                material.base_color.set_alpha(target.base_alpha * factor);
            }
        }
    }

    for (index, slot) in pools.cars_z.iter().enumerate() {
        let Some(Some(binding)) = bindings.cars_z.get(index) else {
            continue;
        };
        let factor = band.factor(slot.position.z - cam_z);
        for target in &binding.fade_targets {
            if let Some(material) = materials.get_mut(&target.material) {
                material.base_color.set_alpha(target.base_alpha * factor);
            }
        }
    }

    for (index, slot) in pools.cars_x.iter().enumerate() {
        let Some(Some(binding)) = bindings.cars_x.get(index) else {
            continue;
        };
        let factor = band.factor(slot.position.z - cam_z);
        for target in &binding.fade_targets {
            if let Some(material) = materials.get_mut(&target.material) {
                material.base_color.set_alpha(target.base_alpha * factor);
            }
        }
    }

    // billboards ride their host building, so they share its depth
    for (index, slot) in pools.billboards.iter().enumerate() {
        let Some(binding) = bindings.billboards.get(index) else {
            continue;
        };
        let Some(host) = pools.buildings.get(slot.plan.building) else {
            continue;
        };
        let factor = band.factor(host.position.z - cam_z);
        if let Some(material) = materials.get_mut(&binding.material) {
            material.base_color.set_alpha(binding.base_alpha * factor);
        }
    }
}

/// Ambience only: occasionally dim or pop the street-level neon batches and
/// the bare glow billboards. Writes race the fade on the same materials;
/// last writer wins and the next fade pass re-levels everything.
pub fn neon_flicker(
    config: Res<SimConfig>,
    pools: Res<CityPools>,
    bindings: Res<RenderBindings>,
    mut rng: ResMut<CityRng>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !config.misc.enable_flicker {
        return;
    }

    for binding in &bindings.buildings {
        for neon in &binding.neon {
            if neon.segment != 0 {
                continue;
            }
            let alpha = if rng.0.random_bool(0.008) {
                Some(rng.0.random::<f32>() * 0.3 + 0.1)
            } else if rng.0.random_bool(0.012) {
                Some(rng.0.random::<f32>() * 0.5 + 0.5)
            } else {
                None
            };
            if let Some(alpha) = alpha {
                if let Some(material) = materials.get_mut(&neon.material) {
                    material.base_color.set_alpha(alpha);
                }
            }
        }
    }

    for (slot, binding) in pools.billboards.iter().zip(bindings.billboards.iter()) {
        if !matches!(slot.plan.kind, BillboardKind::Neon { .. }) {
            continue;
        }
        if rng.0.random_bool(0.01) {
            if let Some(material) = materials.get_mut(&binding.material) {
                material
                    .base_color
                    .set_alpha(0.15 + rng.0.random::<f32>() * 0.3);
            }
        }
    }
}

/// Re-color every registered neon batch on a fixed cadence so the skyline
/// never settles.
pub fn shuffle_neon_colors(
    time: Res<Time>,
    config: Res<SimConfig>,
    mut registry: ResMut<NeonRegistry>,
    mut rng: ResMut<CityRng>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let interval = config.misc.neon_shuffle_interval;
    if interval <= 0.0 {
        return;
    }
    let now = time.elapsed_secs();
    if now - registry.last_shuffle < interval {
        return;
    }
    registry.last_shuffle = now;

    for batch in &registry.batches {
        if let Some(material) = materials.get_mut(&batch.material) {
            let base = srgb_components(*NEON_COLORS.choose(&mut rng.0).unwrap_or(&0x00ffff));
            let intensity = 1.6 + rng.0.random::<f32>() * 1.5;
            let alpha = material.base_color.alpha();
            material.base_color = Color::srgb(
                base[0] * intensity,
                base[1] * intensity,
                base[2] * intensity,
            )
            .with_alpha(alpha);
        }
    }
}
