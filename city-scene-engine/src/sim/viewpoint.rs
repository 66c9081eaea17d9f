use crate::config::CameraConfig;
use crate::sim::pools::ZVehicleSlot;
use bevy::prelude::*;

/// The tracked position everything else keys off. Advances forward at a
/// constant rate while the lateral position loosely follows whichever
/// corridor vehicle is ahead, with a sinusoidal sway on top.
#[derive(Resource)]
pub struct Viewpoint {
    pub position: Vec3,
    tracked_x: f32,
}

impl Viewpoint {
    pub fn new(camera: &CameraConfig) -> Viewpoint {
        Viewpoint {
            position: Vec3::new(0.0, camera.base_height, -50.0),
            tracked_x: 0.0,
        }
    }

    pub fn advance(
        &mut self,
        cars: &[ZVehicleSlot],
        camera: &CameraConfig,
        dt: f32,
        elapsed: f32,
    ) {
        self.position.z -= camera.forward_speed * dt;

        let mut lead_x = None;
        let mut closest = f32::INFINITY;
        for slot in cars {
            let dz = slot.position.z - self.position.z;
            if dz < -camera.min_lead_distance
                && dz > -camera.max_lead_distance
                && dz.abs() < closest
            {
                closest = dz.abs();
                lead_x = Some(slot.position.x);
            }
        }
        let influence = lead_x.map_or(0.0, |x| x * 0.7);

        // exponential smoothing tuned for 60Hz, scaled by the actual frame time
        let correction = dt * 60.0;
        self.tracked_x += (influence - self.tracked_x) * camera.x_target_lerp_factor * correction;
        let target_x = self.tracked_x
            + (elapsed * camera.sway_frequency).sin() * camera.sway_amplitude;
        self.position.x += (target_x - self.position.x) * camera.x_pos_lerp_factor * correction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim::vehicles::{VehicleKind, vehicle_visuals};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn lead_car(x: f32, z: f32) -> ZVehicleSlot {
        let mut rng = SmallRng::seed_from_u64(0);
        ZVehicleSlot {
            plan: vehicle_visuals(&mut rng, VehicleKind::Normal),
            position: Vec3::new(x, 450.0, z),
            speed: 40.0,
            respawn: false,
            render: None,
        }
    }

    #[test]
    fn advances_forward_at_configured_speed() {
        let config = SimConfig::default();
        let mut viewpoint = Viewpoint::new(&config.camera);
        let z0 = viewpoint.position.z;
        viewpoint.advance(&[], &config.camera, 1.0, 0.0);
        assert!((viewpoint.position.z - (z0 - config.camera.forward_speed)).abs() < 1e-4);
    }

    #[test]
    fn drifts_toward_a_lead_vehicle() {
        let config = SimConfig::default();
        let mut viewpoint = Viewpoint::new(&config.camera);
        let mut x_history = Vec::new();
        for step in 0..600 {
            let z = viewpoint.position.z - 100.0;
            let cars = [lead_car(30.0, z)];
            viewpoint.advance(&cars, &config.camera, 1.0 / 60.0, step as f32 / 60.0);
            x_history.push(viewpoint.position.x);
        }
        // pulled a meaningful way toward 0.7 * 30, sway keeps it off-center
        assert!(*x_history.last().unwrap() > 4.0);
    }

    #[test]
    fn out_of_range_vehicles_have_no_pull() {
        let config = SimConfig::default();
        let mut viewpoint = Viewpoint::new(&config.camera);
        for step in 0..120 {
            let z = viewpoint.position.z - 1000.0; // far outside max_lead_distance
            let cars = [lead_car(200.0, z)];
            viewpoint.advance(&cars, &config.camera, 1.0 / 60.0, step as f32 / 60.0);
        }
        // sway alone bounds the lateral drift by the configured amplitude
        assert!(viewpoint.position.x.abs() <= config.camera.sway_amplitude + 1e-3);
    }
}
