use crate::config::SimConfig;
use crate::engine::assets::player_vehicle::PlayerVehicle;
use crate::engine::scene::billboards::{prune_covered_windows, spawn_billboard};
use crate::engine::scene::bindings::{NeonRegistry, RenderBindings};
use crate::engine::scene::building_spawner::spawn_building;
use crate::engine::scene::vehicle_spawner::spawn_vehicle;
use crate::sim::pools::CityPools;
use crate::sim::recycle::{recycle_buildings, recycle_z_vehicles};
use crate::sim::rng::CityRng;
use crate::sim::traffic::{advance_x_traffic, advance_z_traffic};
use crate::sim::viewpoint::Viewpoint;
use bevy::prelude::*;

/// Build the whole city once: fill the pools, realize every building, hang
/// the billboards and prune the windows they cover. Vehicles are only
/// planned here; the respawn system materializes them on the first tick
/// through the same path recycling uses ever after.
pub fn setup_city(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rng: ResMut<CityRng>,
    mut pools: ResMut<CityPools>,
    mut bindings: ResMut<RenderBindings>,
    mut registry: ResMut<NeonRegistry>,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
) {
    *pools = CityPools::populate(&config, &mut rng.0, viewpoint.position.z);
    info!(
        "City pools filled: {} buildings, {} corridor vehicles, {} junction vehicles, {} billboards",
        pools.buildings.len(),
        pools.cars_z.len(),
        pools.cars_x.len(),
        pools.billboards.len()
    );

    for slot in &mut pools.buildings {
        let (entity, binding) = spawn_building(
            &mut commands,
            &mut meshes,
            &mut materials,
            &mut registry,
            &slot.plan,
        );
        slot.render = Some(entity);
        bindings.buildings.push(binding);
    }
    bindings.cars_z = pools.cars_z.iter().map(|_| None).collect();
    bindings.cars_x = pools.cars_x.iter().map(|_| None).collect();

    // rebuilt slot-by-slot so the pool and its bindings stay index-aligned
    let billboard_slots = std::mem::take(&mut pools.billboards);
    let mut kept = Vec::with_capacity(billboard_slots.len());
    for mut slot in billboard_slots {
        let host_index = slot.plan.building;
        let Some(host) = pools.buildings[host_index].render else {
            continue;
        };
        let binding = spawn_billboard(&mut commands, &mut meshes, &mut materials, &slot.plan, host);
        slot.render = Some(binding.entity);
        prune_covered_windows(&mut meshes, &mut bindings.buildings[host_index], &slot.plan);
        bindings.billboards.push(binding);
        kept.push(slot);
    }
    pools.billboards = kept;
}

pub fn viewpoint_controller(
    time: Res<Time>,
    config: Res<SimConfig>,
    pools: Res<CityPools>,
    mut viewpoint: ResMut<Viewpoint>,
) {
    viewpoint.advance(
        &pools.cars_z,
        &config.camera,
        time.delta_secs(),
        time.elapsed_secs(),
    );
}

pub fn traffic_system(
    time: Res<Time>,
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
    mut pools: ResMut<CityPools>,
) {
    advance_z_traffic(&mut pools.cars_z, time.delta_secs());
    advance_x_traffic(
        &mut pools.cars_x,
        &config.traffic_x,
        viewpoint.position.z,
        time.delta_secs(),
    );
}

pub fn recycle_system(
    config: Res<SimConfig>,
    viewpoint: Res<Viewpoint>,
    mut pools: ResMut<CityPools>,
    mut rng: ResMut<CityRng>,
) {
    recycle_buildings(&mut pools, &config, &mut rng.0, viewpoint.position.z);
    recycle_z_vehicles(&mut pools, &config, &mut rng.0, viewpoint.position.z);
}

/// Rebuild the renderable for every vehicle slot whose plan changed: the
/// initial fill and every corridor recycle. This is the only place pooled
/// render resources are destroyed.
pub fn respawn_vehicles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut pools: ResMut<CityPools>,
    mut bindings: ResMut<RenderBindings>,
) {
    for (index, slot) in pools.cars_z.iter_mut().enumerate() {
        if !slot.respawn {
            continue;
        }
        if let Some(old) = slot.render.take() {
            commands.entity(old).despawn();
        }
        let (entity, binding) = spawn_vehicle(
            &mut commands,
            &mut meshes,
            &mut materials,
            &slot.plan,
            slot.position,
            0.0,
        );
        slot.render = Some(entity);
        if let Some(entry) = bindings.cars_z.get_mut(index) {
            *entry = Some(binding);
        }
        slot.respawn = false;
    }

    for (index, slot) in pools.cars_x.iter_mut().enumerate() {
        if !slot.respawn {
            continue;
        }
        if let Some(old) = slot.render.take() {
            commands.entity(old).despawn();
        }
        let (entity, binding) = spawn_vehicle(
            &mut commands,
            &mut meshes,
            &mut materials,
            &slot.plan,
            slot.position,
            slot.yaw,
        );
        slot.render = Some(entity);
        if let Some(entry) = bindings.cars_x.get_mut(index) {
            *entry = Some(binding);
        }
        slot.respawn = false;
    }
}

/// Copy simulation-owned transforms onto the renderables. The pools are the
/// single source of truth; renderable entities never move themselves.
pub fn sync_render_transforms(
    pools: Res<CityPools>,
    viewpoint: Res<Viewpoint>,
    player: Res<PlayerVehicle>,
    mut transforms: Query<&mut Transform>,
) {
    for slot in &pools.buildings {
        if let Some(entity) = slot.render {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.translation = slot.position;
            }
        }
    }
    for slot in &pools.cars_z {
        if let Some(entity) = slot.render {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.translation = slot.position;
            }
        }
    }
    for slot in &pools.cars_x {
        if let Some(entity) = slot.render {
            if let Ok(mut transform) = transforms.get_mut(entity) {
                transform.translation = slot.position;
                transform.rotation = Quat::from_rotation_y(slot.yaw);
            }
        }
    }
    if let Some(rig) = player.rig {
        if let Ok(mut transform) = transforms.get_mut(rig) {
            transform.translation = viewpoint.position;
        }
    }
}
