use crate::config::TrafficXConfig;
use crate::sim::pools::{XVehicleSlot, ZVehicleSlot};

/// Advance corridor traffic along Z. Positive speed drives deeper into the
/// scene (forward, -Z), negative speed is oncoming.
pub fn advance_z_traffic(cars: &mut [ZVehicleSlot], dt: f32) {
    for slot in cars {
        slot.position.z -= slot.speed * dt;
    }
}

/// Advance cross traffic: integrate laterally, wrap at the travel edges, and
/// pin depth to the vehicle's junction so junctions trail the viewpoint
/// forever.
pub fn advance_x_traffic(
    cars: &mut [XVehicleSlot],
    traffic: &TrafficXConfig,
    cam_z: f32,
    dt: f32,
) {
    let half_travel = traffic.junction_x_travel_width / 2.0;
    for slot in cars {
        slot.position.x += slot.speed_x * dt;
        slot.position.z = cam_z + traffic.junction_z_offsets[slot.junction] + slot.z_jitter;

        if slot.speed_x > 0.0 && slot.position.x > half_travel {
            slot.position.x = -half_travel;
        } else if slot.speed_x < 0.0 && slot.position.x < -half_travel {
            slot.position.x = half_travel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::vehicles::{VehicleKind, vehicle_visuals};
    use bevy::math::Vec3;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn x_slot(x: f32, speed_x: f32, junction: usize) -> XVehicleSlot {
        let mut rng = SmallRng::seed_from_u64(1);
        XVehicleSlot {
            plan: vehicle_visuals(&mut rng, VehicleKind::Normal),
            position: Vec3::new(x, 380.0, 0.0),
            speed_x,
            yaw: 0.0,
            junction,
            z_jitter: 4.0,
            respawn: false,
            render: None,
        }
    }

    #[test]
    fn x_position_wraps_to_the_opposite_edge() {
        let config = SimConfig::default();
        let mut cars = vec![x_slot(499.0, 60.0, 0)];
        advance_x_traffic(&mut cars, &config.traffic_x, 0.0, 1.0);
        assert_eq!(cars[0].position.x, -500.0);

        let mut cars = vec![x_slot(-499.0, -60.0, 0)];
        advance_x_traffic(&mut cars, &config.traffic_x, 0.0, 1.0);
        assert_eq!(cars[0].position.x, 500.0);
    }

    #[test]
    fn x_depth_is_pinned_to_the_junction() {
        let config = SimConfig::default();
        let mut cars = vec![x_slot(0.0, 40.0, 1)];
        advance_x_traffic(&mut cars, &config.traffic_x, -3000.0, 0.016);
        assert_eq!(cars[0].position.z, -3000.0 - 450.0 + 4.0);
    }

    #[test]
    fn z_traffic_integrates_signed_speed() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut cars = vec![
            ZVehicleSlot {
                plan: vehicle_visuals(&mut rng, VehicleKind::Normal),
                position: Vec3::new(0.0, 450.0, -100.0),
                speed: 50.0,
                respawn: false,
                render: None,
            },
            ZVehicleSlot {
                plan: vehicle_visuals(&mut rng, VehicleKind::Normal),
                position: Vec3::new(0.0, 510.0, -100.0),
                speed: -50.0,
                respawn: false,
                render: None,
            },
        ];
        advance_z_traffic(&mut cars, 0.5);
        assert_eq!(cars[0].position.z, -125.0);
        assert_eq!(cars[1].position.z, -75.0);
    }
}
