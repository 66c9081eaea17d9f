use crate::config::SimConfig;
use crate::sim::buildings::{district_index, tunnel_y_offset};
use crate::sim::pools::CityPools;
use crate::sim::vehicles::generate_z_vehicle;
use rand::Rng;
use rand::rngs::SmallRng;

/// Depth thresholds around the viewpoint, all positive distances. An entity
/// at signed depth `dz = z - cam_z` is live while `-far_front <= dz <=
/// far_back`; vehicles use the tighter symmetric `vehicle_limit`.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityWindow {
    pub far_front: f32,
    pub far_back: f32,
    pub vehicle_limit: f32,
}

impl VisibilityWindow {
    pub fn from_config(config: &SimConfig) -> VisibilityWindow {
        let visible = config.misc.visible_depth;
        let padding = config.misc.spawn_padding;
        VisibilityWindow {
            far_front: visible + padding * 2.0,
            far_back: padding,
            vehicle_limit: visible + padding,
        }
    }
}

/// Teleport every building that left the window to a fresh spot ahead of the
/// viewpoint. The building keeps its geometry, batches and generation-time
/// colors; only the transform and the derived district index change, plus a
/// flag telling the scene layer to restore captured material state.
pub fn recycle_buildings(
    pools: &mut CityPools,
    config: &SimConfig,
    rng: &mut SmallRng,
    cam_z: f32,
) -> usize {
    let window = VisibilityWindow::from_config(config);
    let visible = config.misc.visible_depth;
    let padding = config.misc.spawn_padding;
    let mut recycled = 0;

    for slot in &mut pools.buildings {
        let dz = slot.position.z - cam_z;
        if dz >= -window.far_front && dz <= window.far_back {
            continue;
        }

        slot.position.z = cam_z - (visible + padding + rng.random::<f32>() * padding);
        let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        let min_x = config.city.corridor_width / 2.0 + slot.plan.base.width / 2.0 + 6.0;
        slot.position.x =
            side * (min_x + rng.random::<f32>() * (config.city.city_radius - min_x));
        slot.position.y = if slot.plan.is_tunnel() {
            tunnel_y_offset(config.camera.base_height)
        } else {
            config.city.building_min_y_offset
                + rng.random::<f32>() * config.city.building_y_random_range
        };
        slot.district = district_index(slot.position.z, config.city.district_length);
        slot.needs_material_reset = true;
        recycled += 1;
    }
    recycled
}

/// Replace every corridor vehicle that left the window with a freshly
/// generated one in the same pool slot. Unlike buildings, the renderable is
/// rebuilt so body styles vary between cycles; most exits ahead respawn far
/// in front, a few drop in just behind the viewpoint as overtaking traffic.
pub fn recycle_z_vehicles(
    pools: &mut CityPools,
    config: &SimConfig,
    rng: &mut SmallRng,
    cam_z: f32,
) -> usize {
    let window = VisibilityWindow::from_config(config);
    let visible = config.misc.visible_depth;
    let padding = config.misc.spawn_padding;
    let mut recycled = 0;

    for slot in &mut pools.cars_z {
        let dz = slot.position.z - cam_z;
        if dz.abs() <= window.vehicle_limit {
            continue;
        }

        let z = if dz < 0.0 && rng.random_bool(0.3) {
            cam_z + padding + rng.random::<f32>() * 100.0
        } else {
            cam_z - (visible + rng.random::<f32>() * padding)
        };
        let spawn = generate_z_vehicle(
            rng,
            &config.traffic_z,
            &config.camera,
            config.city.corridor_width,
            z,
        );
        slot.plan = spawn.plan;
        slot.position = spawn.position;
        slot.speed = spawn.speed;
        slot.respawn = true;
        recycled += 1;
    }
    recycled
}
