use crate::config::SimConfig;
use crate::sim::viewpoint::Viewpoint;
use bevy::core_pipeline::bloom::{Bloom, BloomPrefilter};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use constants::palette::hex_color;

/// Offsets from the viewpoint to the lens and to the look target.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 8.0, 20.0);
const LOOK_OFFSET: Vec3 = Vec3::new(0.0, 3.0, -20.0);

pub fn spawn_chase_camera(commands: &mut Commands, config: &SimConfig, viewpoint: &Viewpoint) {
    // The far plane hugs the recycle boundary; anything past it is mid-fade
    // or already teleporting.
    let far = config.misc.visible_depth + config.misc.spawn_padding * 2.0 + 400.0;
    commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Tonemapping::AcesFitted,
        Projection::from(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 1.0,
            far,
            ..default()
        }),
        Bloom {
            intensity: (config.effects.bloom_strength * 0.15).clamp(0.0, 0.8),
            prefilter: BloomPrefilter {
                threshold: config.effects.bloom_threshold,
                threshold_softness: 0.4,
            },
            ..default()
        },
        DistanceFog {
            color: hex_color(0x101520),
            falloff: FogFalloff::Exponential { density: 0.0012 },
            ..default()
        },
        Transform::from_translation(viewpoint.position + CAMERA_OFFSET),
    ));
}

/// Hard-follow the viewpoint; the viewpoint itself carries all smoothing.
pub fn update_chase_camera(
    viewpoint: Res<Viewpoint>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    for mut transform in &mut cameras {
        transform.translation = viewpoint.position + CAMERA_OFFSET;
        let target = viewpoint.position + LOOK_OFFSET;
        transform.look_at(target, Vec3::Y);
    }
}
