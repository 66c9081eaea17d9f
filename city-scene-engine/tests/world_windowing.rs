use bevy::prelude::Entity;
use city_scene_engine::config::SimConfig;
use city_scene_engine::sim::fade::FadeBand;
use city_scene_engine::sim::pools::CityPools;
use city_scene_engine::sim::recycle::{VisibilityWindow, recycle_buildings, recycle_z_vehicles};
use city_scene_engine::sim::traffic::{advance_x_traffic, advance_z_traffic};
use city_scene_engine::sim::vehicles::VehicleKind;
use city_scene_engine::sim::viewpoint::Viewpoint;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn long_run_keeps_every_entity_inside_the_window() {
    let config = SimConfig::default();
    let window = VisibilityWindow::from_config(&config);
    let mut rng = SmallRng::seed_from_u64(0x5EED);
    let mut viewpoint = Viewpoint::new(&config.camera);
    let mut pools = CityPools::populate(&config, &mut rng, viewpoint.position.z);

    // the initial spread intentionally overshoots the back threshold; the
    // first recycle pass pulls the strays in
    recycle_buildings(&mut pools, &config, &mut rng, viewpoint.position.z);
    recycle_z_vehicles(&mut pools, &config, &mut rng, viewpoint.position.z);

    let dt = 1.0 / 60.0;
    for step in 0..5_000 {
        viewpoint.advance(&pools.cars_z, &config.camera, dt, step as f32 * dt);
        advance_z_traffic(&mut pools.cars_z, dt);
        advance_x_traffic(
            &mut pools.cars_x,
            &config.traffic_x,
            viewpoint.position.z,
            dt,
        );
        let cam_z = viewpoint.position.z;
        recycle_buildings(&mut pools, &config, &mut rng, cam_z);
        recycle_z_vehicles(&mut pools, &config, &mut rng, cam_z);

        for slot in &pools.buildings {
            let dz = slot.position.z - cam_z;
            assert!(dz >= -window.far_front && dz <= window.far_back);
        }
        for slot in &pools.cars_z {
            assert!((slot.position.z - cam_z).abs() <= window.vehicle_limit);
        }
        let half_travel = config.traffic_x.junction_x_travel_width / 2.0;
        for slot in &pools.cars_x {
            assert!(slot.position.x.abs() <= half_travel);
            let expected_z = cam_z
                + config.traffic_x.junction_z_offsets[slot.junction]
                + slot.z_jitter;
            assert_eq!(slot.position.z, expected_z);
        }
    }
}

#[test]
fn single_building_scenario_recycles_exactly_at_the_threshold() {
    let mut config = SimConfig::default();
    config.city.num_buildings = 1;
    config.city.tunnel_building_probability = 0.0;
    config.traffic_z.num_cars = 0;
    config.traffic_x.num_junctions = 0;

    let mut rng = SmallRng::seed_from_u64(1);
    let mut pools = CityPools::populate(&config, &mut rng, 0.0);
    pools.buildings[0].render = Some(Entity::from_raw(42));
    let base = pools.buildings[0].plan.base;

    // 1700 ahead of the viewpoint, inside far_front = 2000: still live
    pools.buildings[0].position.z = -1700.0;
    recycle_buildings(&mut pools, &config, &mut rng, 0.0);
    assert_eq!(pools.buildings[0].position.z, -1700.0);
    assert!(!pools.buildings[0].needs_material_reset);

    // 2100 ahead: must recycle into [cam_z - 2000, cam_z - 1600]
    pools.buildings[0].position.z = -2100.0;
    recycle_buildings(&mut pools, &config, &mut rng, 0.0);
    let slot = &pools.buildings[0];
    assert!(slot.position.z >= -2000.0);
    assert!(slot.position.z <= -1600.0);
    assert_eq!(slot.plan.base, base);
    assert_eq!(slot.render, Some(Entity::from_raw(42)));
    assert!(slot.needs_material_reset);
}

#[test]
fn same_seed_builds_identical_cities() {
    let config = SimConfig::default();
    let pools_a = CityPools::populate(&config, &mut SmallRng::seed_from_u64(0xA11CE), 0.0);
    let pools_b = CityPools::populate(&config, &mut SmallRng::seed_from_u64(0xA11CE), 0.0);

    assert_eq!(pools_a.buildings.len(), pools_b.buildings.len());
    for (a, b) in pools_a.buildings.iter().zip(pools_b.buildings.iter()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.plan.base, b.plan.base);
        assert_eq!(a.plan.segments.len(), b.plan.segments.len());
        assert_eq!(a.district, b.district);
    }
    for (a, b) in pools_a.cars_z.iter().zip(pools_b.cars_z.iter()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.speed, b.speed);
        assert_eq!(a.plan.kind, b.plan.kind);
    }
    for (a, b) in pools_a.billboards.iter().zip(pools_b.billboards.iter()) {
        assert_eq!(a.plan.building, b.plan.building);
        assert_eq!(a.plan.face, b.plan.face);
    }
}

#[test]
fn recycled_buildings_reappear_inside_the_invisible_half_of_the_fade_band() {
    let config = SimConfig::default();
    let band = FadeBand::from_config(&config.misc);
    let window = VisibilityWindow::from_config(&config);

    // the ahead recycle boundary coincides with the zero end of the ramp
    assert_eq!(band.factor(-window.far_front), 0.0);

    let mut rng = SmallRng::seed_from_u64(3);
    let mut pools = CityPools::populate(&config, &mut rng, 0.0);
    for slot in &mut pools.buildings {
        slot.position.z = 10_000.0;
    }
    recycle_buildings(&mut pools, &config, &mut rng, 0.0);
    for slot in &pools.buildings {
        assert!(band.factor(slot.position.z) <= 0.5);
    }
}

#[test]
fn ahead_exits_split_between_overtake_and_far_respawn() {
    let config = SimConfig::default();
    let mut rng = SmallRng::seed_from_u64(0xCAB);
    let mut pools = CityPools::populate(&config, &mut rng, 0.0);

    let mut behind = 0;
    let mut ahead = 0;
    for _ in 0..50 {
        for slot in &mut pools.cars_z {
            slot.position.z = -5_000.0; // exited far ahead of the viewpoint
        }
        recycle_z_vehicles(&mut pools, &config, &mut rng, 0.0);
        for slot in &pools.cars_z {
            if slot.position.z > 0.0 {
                behind += 1;
                assert!(slot.position.z >= 400.0 && slot.position.z <= 500.0);
            } else {
                ahead += 1;
                assert!(slot.position.z <= -1_200.0 && slot.position.z >= -1_600.0);
            }
        }
    }
    assert!(behind > 0, "no overtaking respawns in {} recycles", behind + ahead);
    assert!(ahead > behind, "far respawns should dominate");
}

#[test]
fn truck_slots_carry_composite_length() {
    let config = SimConfig::default();
    let mut rng = SmallRng::seed_from_u64(0x7B0C);
    let mut pools = CityPools::populate(&config, &mut rng, 0.0);
    let mut seen_truck = false;
    for _ in 0..20 {
        for slot in &mut pools.cars_z {
            slot.position.z = 5_000.0;
        }
        recycle_z_vehicles(&mut pools, &config, &mut rng, 0.0);
        for slot in &pools.cars_z {
            assert!(slot.plan.base.depth.is_finite());
            if slot.plan.kind == VehicleKind::Truck {
                seen_truck = true;
                // cab plus trailer always beats the longest single body
                assert!(slot.plan.base.depth >= 17.0);
            }
        }
    }
    assert!(seen_truck);
}
