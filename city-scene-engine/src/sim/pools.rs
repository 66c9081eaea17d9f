use crate::config::SimConfig;
use crate::sim::billboards::{BillboardPlan, plan_billboards};
use crate::sim::buildings::{BuildingPlan, generate_building};
use crate::sim::vehicles::{VehiclePlan, generate_x_vehicle, generate_z_vehicle};
use bevy::prelude::*;
use rand::Rng;
use rand::rngs::SmallRng;

/// One pooled building. The slot owns the authoritative transform; the
/// renderable entity is looked up from here, never the other way around.
/// Slots are created once and only ever mutated in place.
pub struct BuildingSlot {
    pub plan: BuildingPlan,
    pub position: Vec3,
    pub district: usize,
    pub needs_material_reset: bool,
    pub render: Option<Entity>,
}

/// One pooled corridor vehicle. `respawn` marks the renderable as stale:
/// set at creation and whenever recycling swaps in a fresh plan, cleared by
/// the scene layer after it rebuilds the entity.
pub struct ZVehicleSlot {
    pub plan: VehiclePlan,
    pub position: Vec3,
    pub speed: f32,
    pub respawn: bool,
    pub render: Option<Entity>,
}

/// One pooled cross-traffic vehicle, bound to a junction for life. Depth is
/// recomputed from the viewpoint every tick, so these never recycle.
pub struct XVehicleSlot {
    pub plan: VehiclePlan,
    pub position: Vec3,
    pub speed_x: f32,
    pub yaw: f32,
    pub junction: usize,
    pub z_jitter: f32,
    pub respawn: bool,
    pub render: Option<Entity>,
}

pub struct BillboardSlot {
    pub plan: BillboardPlan,
    pub render: Option<Entity>,
}

/// All pooled scene objects, sized once at startup and never grown.
#[derive(Resource, Default)]
pub struct CityPools {
    pub buildings: Vec<BuildingSlot>,
    pub cars_z: Vec<ZVehicleSlot>,
    pub cars_x: Vec<XVehicleSlot>,
    pub billboards: Vec<BillboardSlot>,
}

pub const NEON_BILLBOARD_COUNT: usize = 40;
pub const MEDIA_BILLBOARD_COUNT: usize = 20;

impl CityPools {
    /// Fill every pool to its configured size around the starting viewpoint
    /// depth. Deterministic for a given RNG state.
    pub fn populate(config: &SimConfig, rng: &mut SmallRng, cam_z: f32) -> CityPools {
        let mut pools = CityPools::default();

        let spread = config.misc.visible_depth;
        for _ in 0..config.city.num_buildings {
            let z = cam_z - spread + rng.random::<f32>() * spread * 2.0;
            let plan = generate_building(rng, &config.city, &config.camera, z);
            pools.buildings.push(BuildingSlot {
                position: plan.position,
                district: plan.district,
                needs_material_reset: false,
                render: None,
                plan,
            });
        }

        for _ in 0..config.traffic_z.num_cars {
            let z = cam_z - rng.random::<f32>() * config.misc.visible_depth;
            let spawn = generate_z_vehicle(
                rng,
                &config.traffic_z,
                &config.camera,
                config.city.corridor_width,
                z,
            );
            pools.cars_z.push(ZVehicleSlot {
                plan: spawn.plan,
                position: spawn.position,
                speed: spawn.speed,
                respawn: true,
                render: None,
            });
        }

        for junction in 0..config.traffic_x.num_junctions {
            for _ in 0..config.traffic_x.cars_per_junction {
                let spawn = generate_x_vehicle(rng, &config.traffic_x, config.camera.base_height);
                let z = cam_z
                    + config.traffic_x.junction_z_offsets[junction]
                    + spawn.z_jitter;
                pools.cars_x.push(XVehicleSlot {
                    plan: spawn.plan,
                    position: Vec3::new(spawn.x, spawn.y, z),
                    speed_x: spawn.speed_x,
                    yaw: spawn.yaw,
                    junction,
                    z_jitter: spawn.z_jitter,
                    respawn: true,
                    render: None,
                });
            }
        }

        let billboard_plans = plan_billboards(
            rng,
            &pools.buildings,
            NEON_BILLBOARD_COUNT,
            MEDIA_BILLBOARD_COUNT,
        );
        pools.billboards = billboard_plans
            .into_iter()
            .map(|plan| BillboardSlot { plan, render: None })
            .collect();

        pools
    }
}
