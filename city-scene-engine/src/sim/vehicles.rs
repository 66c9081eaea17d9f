use crate::config::{CameraConfig, TrafficXConfig, TrafficZConfig};
use crate::sim::buildings::{BaseDimensions, SurfaceMaterial};
use crate::sim::color;
use bevy::math::{Quat, Vec3};
use constants::materials::VEHICLE_BODY_GREY;
use constants::palette::{NEON_COLORS, srgb_components};
use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use std::f32::consts::{FRAC_PI_2, PI};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleKind {
    Normal,
    Van,
    Sporty,
    Bus,
    Hover,
    Suv,
    Police,
    Truck,
}

impl VehicleKind {
    pub fn parse(name: &str) -> Option<VehicleKind> {
        match name {
            "normal" => Some(VehicleKind::Normal),
            "van" => Some(VehicleKind::Van),
            "sporty" => Some(VehicleKind::Sporty),
            "bus" => Some(VehicleKind::Bus),
            "hover" => Some(VehicleKind::Hover),
            "suv" => Some(VehicleKind::Suv),
            "police" => Some(VehicleKind::Police),
            "truck" => Some(VehicleKind::Truck),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartShape {
    Box(Vec3),
    Cylinder { radius: f32, height: f32 },
    Sphere(f32),
}

#[derive(Debug, Clone)]
pub struct BodyPart {
    pub shape: PartShape,
    pub offset: Vec3,
    pub rotation: Quat,
    pub material: SurfaceMaterial,
}

/// Emissive fixture: headlight, taillight, siren, thruster, marker.
#[derive(Debug, Clone)]
pub struct LampPlan {
    pub shape: PartShape,
    pub offset: Vec3,
    pub color: [f32; 3],
}

/// Complete visual description of one vehicle, oriented nose toward -Z.
#[derive(Debug, Clone)]
pub struct VehiclePlan {
    pub kind: VehicleKind,
    pub base: BaseDimensions,
    pub parts: Vec<BodyPart>,
    pub lamps: Vec<LampPlan>,
}

/// A ready-to-place Z-corridor vehicle.
#[derive(Debug, Clone)]
pub struct ZVehicleSpawn {
    pub plan: VehiclePlan,
    pub position: Vec3,
    pub speed: f32,
}

/// A ready-to-place cross-traffic vehicle; depth is pinned per tick, so only
/// the lateral position and lane height are drawn here.
#[derive(Debug, Clone)]
pub struct XVehicleSpawn {
    pub plan: VehiclePlan,
    pub x: f32,
    pub y: f32,
    pub speed_x: f32,
    pub yaw: f32,
    pub z_jitter: f32,
}

fn pick_kind(rng: &mut SmallRng, truck_probability: f64, car_types: &[String]) -> VehicleKind {
    if rng.random_bool(truck_probability) {
        return VehicleKind::Truck;
    }
    car_types
        .choose(&mut *rng)
        .and_then(|name| VehicleKind::parse(name))
        .unwrap_or(VehicleKind::Normal)
}

pub fn generate_z_vehicle(
    rng: &mut SmallRng,
    traffic: &TrafficZConfig,
    camera: &CameraConfig,
    corridor_width: f32,
    z: f32,
) -> ZVehicleSpawn {
    let kind = pick_kind(rng, traffic.truck_probability, &traffic.car_types);
    let plan = vehicle_visuals(rng, kind);

    let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let mut speed =
        sign * (rng.random::<f32>() * (traffic.speed_max - traffic.speed_min) + traffic.speed_min);
    match kind {
        VehicleKind::Bus => speed *= 0.7,
        VehicleKind::Hover => speed *= 1.0 + rng.random::<f32>() * 0.3,
        VehicleKind::Truck => speed *= if speed < 0.0 { 0.75 } else { 0.85 },
        _ => {}
    }

    let lane_jitter = (rng.random::<f32>() - 0.5)
        * traffic.y_spread_around_camera
        * traffic.lane_y_spread_factor;
    // oncoming traffic rides the upper tier
    let y = if speed < 0.0 {
        camera.base_height + traffic.lane_vertical_separation + lane_jitter
    } else {
        camera.base_height + lane_jitter
    };

    let lane_width_factor = if kind == VehicleKind::Truck { 0.5 } else { 0.6 };
    let x = (rng.random::<f32>() - 0.5) * (corridor_width * lane_width_factor);

    ZVehicleSpawn {
        plan,
        position: Vec3::new(x, y, z),
        speed,
    }
}

pub fn generate_x_vehicle(
    rng: &mut SmallRng,
    traffic: &TrafficXConfig,
    base_height: f32,
) -> XVehicleSpawn {
    let kind = pick_kind(rng, traffic.truck_probability, &traffic.car_types);
    let plan = vehicle_visuals(rng, kind);

    let sign = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let mut speed_x =
        sign * (rng.random::<f32>() * (traffic.speed_max - traffic.speed_min) + traffic.speed_min);
    match kind {
        VehicleKind::Bus => speed_x *= 0.75,
        VehicleKind::Hover => speed_x *= 1.0 + rng.random::<f32>() * 0.2,
        _ => {}
    }

    // bodies face -Z, so lateral travel is a fixed quarter turn
    let yaw = if speed_x > 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };

    let lane_base = base_height + traffic.base_y_offset_from_z_traffic;
    let lane_jitter =
        (rng.random::<f32>() - 0.5) * traffic.y_spread_in_junction * traffic.lane_y_spread_factor;
    let y = if speed_x < 0.0 {
        lane_base + traffic.lane_vertical_separation + lane_jitter
    } else {
        lane_base + lane_jitter
    };

    XVehicleSpawn {
        plan,
        x: (rng.random::<f32>() - 0.5) * traffic.junction_x_travel_width,
        y,
        speed_x,
        yaw,
        z_jitter: (rng.random::<f32>() - 0.5) * traffic.junction_z_depth_variation,
    }
}

/// Body, fixtures and dimensions for one vehicle kind. Bodies are always the
/// fleet grey; only the emissive fixtures carry color.
pub fn vehicle_visuals(rng: &mut SmallRng, kind: VehicleKind) -> VehiclePlan {
    if kind == VehicleKind::Truck {
        return truck_visuals(rng);
    }

    let (bw, bh, bl, roughness, metalness) = match kind {
        VehicleKind::Van => (
            rng.random::<f32>() * 2.2 + 2.8,
            rng.random::<f32>() * 1.5 + 2.0,
            rng.random::<f32>() * 4.0 + 6.0,
            0.7,
            0.4,
        ),
        VehicleKind::Sporty => (
            rng.random::<f32>() * 2.0 + 3.5,
            rng.random::<f32>() * 0.8 + 0.9,
            rng.random::<f32>() * 4.0 + 5.0,
            0.2,
            0.85,
        ),
        VehicleKind::Bus => (
            rng.random::<f32>() * 2.5 + 3.2,
            rng.random::<f32>() * 2.0 + 2.8,
            rng.random::<f32>() * 9.0 + 12.0,
            0.6,
            0.5,
        ),
        VehicleKind::Hover => (
            rng.random::<f32>() * 2.8 + 4.0,
            rng.random::<f32>() * 0.6 + 0.7,
            rng.random::<f32>() * 5.0 + 6.5,
            0.25,
            0.7,
        ),
        VehicleKind::Suv => (
            rng.random::<f32>() * 2.5 + 3.5,
            rng.random::<f32>() * 1.5 + 1.8,
            rng.random::<f32>() * 4.5 + 6.0,
            0.5,
            0.6,
        ),
        VehicleKind::Police => (
            rng.random::<f32>() * 2.2 + 3.2,
            rng.random::<f32>() * 1.2 + 1.4,
            rng.random::<f32>() * 4.5 + 6.0,
            0.4,
            0.9,
        ),
        _ => (
            rng.random::<f32>() * 2.5 + 3.0,
            rng.random::<f32>() * 1.2 + 1.0,
            rng.random::<f32>() * 4.5 + 5.5,
            0.45,
            0.6,
        ),
    };

    let body_material = SurfaceMaterial {
        color: srgb_components(VEHICLE_BODY_GREY),
        roughness,
        metalness,
    };
    let parts = vec![BodyPart {
        shape: PartShape::Box(Vec3::new(bw, bh, bl)),
        offset: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        material: body_material,
    }];
    let mut lamps = Vec::new();

    if kind == VehicleKind::Hover {
        let thruster_base = srgb_components(*NEON_COLORS.choose(&mut *rng).unwrap_or(&0x00ffff));
        let thruster_color = color::scale(thruster_base, 0.8 + rng.random::<f32>() * 0.5);
        let thruster = Vec3::new(bw * 0.15, bh * 0.4, bl * 0.1);
        for side in [-1.0f32, 1.0] {
            for end in [0.8f32, -0.8] {
                lamps.push(LampPlan {
                    shape: PartShape::Box(thruster),
                    offset: Vec3::new((bw / 3.0) * side, -bh * 0.1, bl / 2.0 * end),
                    color: thruster_color,
                });
            }
        }
        lamps.push(LampPlan {
            shape: PartShape::Sphere(0.15),
            offset: Vec3::new(0.0, bh / 2.0 + 0.1, 0.0),
            color: color::scale(srgb_components(0xffaa00), 0.7 + rng.random::<f32>() * 0.6),
        });
    }

    if kind == VehicleKind::Police {
        let siren = Vec3::new(bw * 0.4, bh * 0.15, 0.6);
        lamps.push(LampPlan {
            shape: PartShape::Box(siren),
            offset: Vec3::new(-bw * 0.25, bh / 2.0 + 0.1, 0.0),
            color: [1.0, 0.0, 0.0],
        });
        lamps.push(LampPlan {
            shape: PartShape::Box(siren),
            offset: Vec3::new(bw * 0.25, bh / 2.0 + 0.1, 0.0),
            color: [0.0, 0.0, 1.0],
        });
    }

    let wide_lights = matches!(kind, VehicleKind::Bus | VehicleKind::Van);
    let head_size = if wide_lights { 0.6 } else { 0.5 };
    let tail_size = if wide_lights { 0.7 } else { 0.6 };
    let head_color = headlight_color(rng);
    let tail_color = taillight_color(rng);
    let lamp_x_factor = if kind == VehicleKind::Hover { 0.35 } else { 0.3 };
    let tail_y = if kind == VehicleKind::Bus {
        bh * 0.25
    } else {
        bh * 0.1
    };
    for side in [-1.0f32, 1.0] {
        lamps.push(LampPlan {
            shape: PartShape::Box(Vec3::new(head_size, bh * 0.25, 0.2)),
            offset: Vec3::new(bw * lamp_x_factor * side, bh * 0.1, -bl / 2.0 - 0.08),
            color: head_color,
        });
        lamps.push(LampPlan {
            shape: PartShape::Box(Vec3::new(tail_size, bh * 0.2, 0.2)),
            offset: Vec3::new(bw * lamp_x_factor * side, tail_y, bl / 2.0 + 0.08),
            color: tail_color,
        });
    }

    VehiclePlan {
        kind,
        base: BaseDimensions {
            width: bw,
            height: bh,
            depth: bl,
        },
        parts,
        lamps,
    }
}

fn truck_visuals(rng: &mut SmallRng) -> VehiclePlan {
    let cab_w = rng.random::<f32>() * 2.8 + 3.2;
    let cab_h = rng.random::<f32>() * 2.2 + 2.8;
    let cab_l = rng.random::<f32>() * 2.5 + 3.0;
    let trailer_w = cab_w * (rng.random::<f32>() * 0.05 + 0.95);
    let trailer_h = cab_h * (rng.random::<f32>() * 0.05 + 0.95);
    let trailer_l = rng.random::<f32>() * 10.0 + 14.0;

    let grey = srgb_components(VEHICLE_BODY_GREY);
    let cab_z = -(trailer_l / 2.0 + cab_l / 2.0) * 0.7;
    let trailer_z = (cab_l / 2.0) * 0.3;

    let parts = vec![
        BodyPart {
            shape: PartShape::Box(Vec3::new(cab_w, cab_h, cab_l)),
            offset: Vec3::new(0.0, 0.0, cab_z),
            rotation: Quat::IDENTITY,
            material: SurfaceMaterial {
                color: grey,
                roughness: 0.6,
                metalness: 0.5,
            },
        },
        BodyPart {
            shape: PartShape::Box(Vec3::new(trailer_w, trailer_h, trailer_l)),
            offset: Vec3::new(0.0, 0.0, trailer_z),
            rotation: Quat::IDENTITY,
            material: SurfaceMaterial {
                color: grey,
                roughness: 0.8,
                metalness: 0.3,
            },
        },
    ];

    let mut lamps = Vec::new();
    let head_color = headlight_color(rng);
    let tail_color = taillight_color(rng);
    let marker_orange = color::scale(srgb_components(0xffa500), 0.7 + rng.random::<f32>() * 0.5);
    let marker_red = color::scale(srgb_components(0xff0000), 0.6 + rng.random::<f32>() * 0.4);

    for side in [-1.0f32, 1.0] {
        lamps.push(LampPlan {
            shape: PartShape::Box(Vec3::new(0.6, 0.4, 0.2)),
            offset: Vec3::new(
                (cab_w / 2.8) * side,
                -cab_h * 0.25,
                cab_z - cab_l / 2.0 - 0.1,
            ),
            color: head_color,
        });
        lamps.push(LampPlan {
            shape: PartShape::Box(Vec3::new(0.7, 0.3, 0.2)),
            offset: Vec3::new(
                (trailer_w / 2.8) * side,
                -trailer_h * 0.3,
                trailer_z + trailer_l / 2.0 + 0.1,
            ),
            color: tail_color,
        });
    }
    for i in 0..3 {
        lamps.push(LampPlan {
            shape: PartShape::Sphere(0.15),
            offset: Vec3::new(
                (i as f32 - 1.0) * cab_w * 0.3,
                cab_h / 2.0 + 0.1,
                cab_z - cab_l / 2.0 + 0.1,
            ),
            color: marker_orange,
        });
        lamps.push(LampPlan {
            shape: PartShape::Sphere(0.15),
            offset: Vec3::new(
                (i as f32 - 1.0) * trailer_w * 0.3,
                trailer_h / 2.0 + 0.1,
                trailer_z + trailer_l / 2.0 - 0.1,
            ),
            color: marker_red,
        });
    }
    for i in 0..(trailer_l / 4.0).floor() as i32 {
        for side in [-1.0f32, 1.0] {
            lamps.push(LampPlan {
                shape: PartShape::Sphere(0.15),
                offset: Vec3::new(
                    side * (trailer_w / 2.0 + 0.05),
                    -trailer_h * 0.4,
                    trailer_z - trailer_l / 2.0 + 2.0 + i as f32 * 4.0,
                ),
                color: marker_orange,
            });
        }
    }

    VehiclePlan {
        kind: VehicleKind::Truck,
        base: BaseDimensions {
            width: cab_w,
            height: cab_h,
            depth: cab_l + trailer_l,
        },
        parts,
        lamps,
    }
}

fn headlight_color(rng: &mut SmallRng) -> [f32; 3] {
    let roll = rng.random::<f32>();
    let base = if roll < 0.5 {
        color::hsl_to_rgb(0.155, 0.9, 0.85)
    } else if roll < 0.85 {
        color::hsl_to_rgb(0.0, 0.0, 0.9)
    } else {
        color::hsl_to_rgb(0.6, 0.8, 0.9)
    };
    color::scale(base, 0.9 + rng.random::<f32>() * 0.3)
}

fn taillight_color(rng: &mut SmallRng) -> [f32; 3] {
    // red nudged around in hue/saturation/lightness so brake lights vary
    let base = color::hsl_to_rgb(
        (rng.random::<f32>() - 0.5) * 0.03,
        1.0 + (rng.random::<f32>() - 0.5) * 0.3,
        0.5 + (rng.random::<f32>() - 0.5) * 0.2,
    );
    color::scale(base, 0.8 + rng.random::<f32>() * 0.4)
}

/// Placeholder vehicle used when an external model fails to load: a flat box
/// body on four cylinder wheels.
pub fn simple_vehicle_plan(rng: &mut SmallRng) -> VehiclePlan {
    const PRESETS: &[(u32, f32, f32)] = &[
        (0x111111, 0.9, 0.2),
        (0x333333, 0.6, 0.8),
        (0x222222, 0.7, 0.6),
        (0x2b2b35, 0.5, 0.7),
        (0x0f0f10, 0.85, 0.3),
        (0x444444, 0.4, 0.9),
        (0x1a1e20, 0.65, 0.7),
        (0x262626, 0.3, 1.0),
        (0x191d1f, 0.55, 0.75),
    ];
    const VARIANTS: &[[f32; 3]] = &[
        [16.0, 4.0, 8.0],
        [20.0, 4.0, 8.0],
        [16.0, 5.0, 8.0],
        [16.0, 4.0, 10.0],
    ];

    let &(body_color, roughness, metalness) = PRESETS.choose(&mut *rng).unwrap_or(&PRESETS[0]);
    let &[bw, bh, bd] = VARIANTS.choose(&mut *rng).unwrap_or(&VARIANTS[0]);

    let mut parts = vec![BodyPart {
        shape: PartShape::Box(Vec3::new(bw, bh, bd)),
        offset: Vec3::new(0.0, bh / 2.0, 0.0),
        rotation: Quat::IDENTITY,
        material: SurfaceMaterial {
            color: srgb_components(body_color),
            roughness,
            metalness,
        },
    }];
    let wheel_x = if bw > 16.0 { 6.0 } else { 5.0 };
    let wheel_z = if bd > 8.0 { 4.0 } else { 3.0 };
    let wheel_material = SurfaceMaterial {
        color: [0.0, 0.0, 0.0],
        roughness: 0.9,
        metalness: 0.1,
    };
    for x in [-wheel_x, wheel_x] {
        for z in [-wheel_z, wheel_z] {
            parts.push(BodyPart {
                shape: PartShape::Cylinder {
                    radius: 2.0,
                    height: 1.0,
                },
                offset: Vec3::new(x, 1.0, z),
                rotation: Quat::from_rotation_z(PI / 2.0),
                material: wheel_material,
            });
        }
    }

    VehiclePlan {
        kind: VehicleKind::Normal,
        base: BaseDimensions {
            width: bw,
            height: bh,
            depth: bd,
        },
        parts,
        lamps: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;

    #[test]
    fn truck_base_length_covers_cab_and_trailer() {
        for seed in 0..32 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let plan = truck_visuals(&mut rng);
            let cab = match plan.parts[0].shape {
                PartShape::Box(size) => size,
                _ => unreachable!(),
            };
            let trailer = match plan.parts[1].shape {
                PartShape::Box(size) => size,
                _ => unreachable!(),
            };
            assert!((plan.base.depth - (cab.z + trailer.z)).abs() < 1e-4);
        }
    }

    #[test]
    fn bodies_are_fleet_grey() {
        let grey = srgb_components(VEHICLE_BODY_GREY);
        for kind in [
            VehicleKind::Normal,
            VehicleKind::Van,
            VehicleKind::Sporty,
            VehicleKind::Bus,
            VehicleKind::Hover,
            VehicleKind::Suv,
        ] {
            let mut rng = SmallRng::seed_from_u64(7);
            let plan = vehicle_visuals(&mut rng, kind);
            assert_eq!(plan.parts[0].material.color, grey);
        }
    }

    #[test]
    fn hover_gets_thrusters_and_beacon() {
        let mut rng = SmallRng::seed_from_u64(4);
        let plan = vehicle_visuals(&mut rng, VehicleKind::Hover);
        let spheres = plan
            .lamps
            .iter()
            .filter(|l| matches!(l.shape, PartShape::Sphere(_)))
            .count();
        // four thrusters + beacon + head/tail pairs
        assert_eq!(spheres, 1);
        assert!(plan.lamps.len() >= 9);
    }

    #[test]
    fn z_speed_sign_picks_the_lane_tier() {
        let cfg = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(0);
        for _ in 0..64 {
            let spawn =
                generate_z_vehicle(&mut rng, &cfg.traffic_z, &cfg.camera, 120.0, -500.0);
            if spawn.speed < 0.0 {
                assert!(spawn.position.y >= cfg.camera.base_height + 60.0 - 8.0);
            } else {
                assert!(spawn.position.y <= cfg.camera.base_height + 8.0);
            }
        }
    }

    #[test]
    fn x_vehicle_yaw_matches_travel_direction() {
        let cfg = SimConfig::default();
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..32 {
            let spawn = generate_x_vehicle(&mut rng, &cfg.traffic_x, cfg.camera.base_height);
            if spawn.speed_x > 0.0 {
                assert!((spawn.yaw + FRAC_PI_2).abs() < 1e-6);
            } else {
                assert!((spawn.yaw - FRAC_PI_2).abs() < 1e-6);
            }
        }
    }
}
